//! Legal agreement model.

use kennel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LegalAgreement {
    pub id: DbId,
    pub user_id: DbId,
    pub liability_waiver_accepted: bool,
    pub liability_waiver_accepted_at: Option<Timestamp>,
    pub vaccination_requirements_accepted: bool,
    pub vaccination_requirements_accepted_at: Option<Timestamp>,
    pub behavior_policy_accepted: bool,
    pub behavior_policy_accepted_at: Option<Timestamp>,
    pub emergency_care_accepted: bool,
    pub emergency_care_accepted_at: Option<Timestamp>,
    pub photo_release_accepted: bool,
    pub photo_release_accepted_at: Option<Timestamp>,
    pub cancellation_policy_accepted: bool,
    pub cancellation_policy_accepted_at: Option<Timestamp>,
    pub signature: String,
    pub signed_at: Timestamp,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Clause acceptances as submitted by the customer.
#[derive(Debug, Clone, Deserialize)]
pub struct ClauseAcceptances {
    #[serde(default)]
    pub liability_waiver: bool,
    #[serde(default)]
    pub vaccination_requirements: bool,
    #[serde(default)]
    pub behavior_policy: bool,
    #[serde(default)]
    pub emergency_care: bool,
    #[serde(default)]
    pub photo_release: bool,
    #[serde(default)]
    pub cancellation_policy: bool,
}

impl ClauseAcceptances {
    /// `(clause name, accepted)` pairs in clause order.
    pub fn as_pairs(&self) -> [(&'static str, bool); 6] {
        use kennel_core::validation::*;
        [
            (CLAUSE_LIABILITY_WAIVER, self.liability_waiver),
            (CLAUSE_VACCINATION, self.vaccination_requirements),
            (CLAUSE_BEHAVIOR, self.behavior_policy),
            (CLAUSE_EMERGENCY_CARE, self.emergency_care),
            (CLAUSE_PHOTO_RELEASE, self.photo_release),
            (CLAUSE_CANCELLATION, self.cancellation_policy),
        ]
    }
}

#[derive(Debug)]
pub struct CreateLegalAgreement {
    pub user_id: DbId,
    pub clauses: ClauseAcceptances,
    pub signature: String,
    pub ip_address: Option<String>,
}
