//! Medication model and DTOs.

use kennel_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Medication {
    pub id: DbId,
    pub dog_id: DbId,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub instructions: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub instructions: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMedication {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub instructions: Option<String>,
}
