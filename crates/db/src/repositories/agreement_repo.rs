//! Repository for the `legal_agreements` table.

use kennel_core::types::DbId;
use sqlx::PgPool;

use crate::models::agreement::{CreateLegalAgreement, LegalAgreement};

const COLUMNS: &str = "id, user_id, \
    liability_waiver_accepted, liability_waiver_accepted_at, \
    vaccination_requirements_accepted, vaccination_requirements_accepted_at, \
    behavior_policy_accepted, behavior_policy_accepted_at, \
    emergency_care_accepted, emergency_care_accepted_at, \
    photo_release_accepted, photo_release_accepted_at, \
    cancellation_policy_accepted, cancellation_policy_accepted_at, \
    signature, signed_at, ip_address, created_at, updated_at";

/// Write-once legal agreements, one per customer.
pub struct LegalAgreementRepo;

impl LegalAgreementRepo {
    /// Record the signed agreement. Each accepted clause is stamped with the
    /// signing time. A second submission violates `uq_legal_agreements_user`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLegalAgreement,
    ) -> Result<LegalAgreement, sqlx::Error> {
        let query = format!(
            "INSERT INTO legal_agreements
                (user_id,
                 liability_waiver_accepted, liability_waiver_accepted_at,
                 vaccination_requirements_accepted, vaccination_requirements_accepted_at,
                 behavior_policy_accepted, behavior_policy_accepted_at,
                 emergency_care_accepted, emergency_care_accepted_at,
                 photo_release_accepted, photo_release_accepted_at,
                 cancellation_policy_accepted, cancellation_policy_accepted_at,
                 signature, ip_address)
             VALUES ($1,
                     $2, CASE WHEN $2 THEN NOW() END,
                     $3, CASE WHEN $3 THEN NOW() END,
                     $4, CASE WHEN $4 THEN NOW() END,
                     $5, CASE WHEN $5 THEN NOW() END,
                     $6, CASE WHEN $6 THEN NOW() END,
                     $7, CASE WHEN $7 THEN NOW() END,
                     $8, $9)
             RETURNING {COLUMNS}"
        );
        let c = &input.clauses;
        sqlx::query_as::<_, LegalAgreement>(&query)
            .bind(input.user_id)
            .bind(c.liability_waiver)
            .bind(c.vaccination_requirements)
            .bind(c.behavior_policy)
            .bind(c.emergency_care)
            .bind(c.photo_release)
            .bind(c.cancellation_policy)
            .bind(input.signature.trim())
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<LegalAgreement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM legal_agreements WHERE user_id = $1");
        sqlx::query_as::<_, LegalAgreement>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
