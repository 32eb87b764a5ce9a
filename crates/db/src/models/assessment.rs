//! Assessment schedule and assessment form models.

use kennel_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssessmentSchedule {
    pub id: DbId,
    pub user_id: DbId,
    pub dog_id: DbId,
    pub requested_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateAssessmentSchedule {
    pub user_id: DbId,
    pub dog_id: DbId,
    pub requested_date: Date,
    pub notes: Option<String>,
}

/// Staff listing row with owner and dog names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssessmentListing {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_name: String,
    pub dog_id: DbId,
    pub dog_name: String,
    pub requested_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssessmentForm {
    pub id: DbId,
    pub dog_id: DbId,
    pub user_id: DbId,
    pub temperament: Option<String>,
    pub socialization: Option<String>,
    pub play_style: Option<String>,
    pub triggers: Option<String>,
    pub separation_anxiety: bool,
    pub bite_history: bool,
    pub bite_history_details: Option<String>,
    pub feeding_instructions: Option<String>,
    pub medical_conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub signature: String,
    pub signed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssessmentForm {
    pub temperament: Option<String>,
    pub socialization: Option<String>,
    pub play_style: Option<String>,
    pub triggers: Option<String>,
    #[serde(default)]
    pub separation_anxiety: bool,
    #[serde(default)]
    pub bite_history: bool,
    pub bite_history_details: Option<String>,
    pub feeding_instructions: Option<String>,
    pub medical_conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub signature: String,
}
