//! Repositories for `assessment_schedules` and `assessment_forms`.
//!
//! Friday exclusivity is an exclusion constraint (one customer per open
//! date) and one-open-request-per-dog a partial unique index, so a
//! concurrent double booking surfaces as a constraint violation rather than
//! a second row.

use kennel_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::assessment::{
    AssessmentForm, AssessmentListing, AssessmentSchedule, CreateAssessmentForm,
    CreateAssessmentSchedule,
};

const COLUMNS: &str = "id, user_id, dog_id, requested_date, status, notes, created_at, updated_at";

const FORM_COLUMNS: &str = "id, dog_id, user_id, temperament, socialization, play_style, \
    triggers, separation_anxiety, bite_history, bite_history_details, feeding_instructions, \
    medical_conditions, additional_notes, signature, signed_at, created_at, updated_at";

/// Provides CRUD operations for assessment schedules.
pub struct AssessmentRepo;

impl AssessmentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssessmentSchedule,
    ) -> Result<AssessmentSchedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO assessment_schedules (user_id, dog_id, requested_date, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssessmentSchedule>(&query)
            .bind(input.user_id)
            .bind(input.dog_id)
            .bind(input.requested_date)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssessmentSchedule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assessment_schedules WHERE id = $1");
        sqlx::query_as::<_, AssessmentSchedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AssessmentSchedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assessment_schedules
             WHERE user_id = $1
             ORDER BY requested_date DESC, id DESC"
        );
        sqlx::query_as::<_, AssessmentSchedule>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// All requests with owner and dog names, optionally filtered by status.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<AssessmentListing>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentListing>(
            "SELECT a.id, a.user_id, p.full_name AS owner_name, a.dog_id, d.name AS dog_name,
                    a.requested_date, a.status, a.notes, a.created_at
             FROM assessment_schedules a
             JOIN profiles p ON p.id = a.user_id
             JOIN dogs d ON d.id = a.dog_id
             WHERE ($1::text IS NULL OR a.status = $1)
             ORDER BY a.requested_date ASC, a.id ASC",
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// `(date, holder user id)` for every Friday in range held by an open request.
    pub async fn held_dates(
        pool: &PgPool,
        from: Date,
        to: Date,
    ) -> Result<Vec<(Date, DbId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT requested_date, user_id FROM assessment_schedules
             WHERE requested_date BETWEEN $1 AND $2
               AND status IN ('pending', 'confirmed')",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Whether the dog already has a pending or confirmed request.
    pub async fn has_open_for_dog(pool: &PgPool, dog_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM assessment_schedules
                WHERE dog_id = $1 AND status IN ('pending', 'confirmed')
             )",
        )
        .bind(dog_id)
        .fetch_one(pool)
        .await
    }

    /// Move a request from `from` to `to`. Returns `None` if the row's status
    /// changed underneath the caller.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<AssessmentSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE assessment_schedules SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssessmentSchedule>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Cancel a customer's own open request, releasing its Friday.
    pub async fn cancel_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<AssessmentSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE assessment_schedules SET status = 'cancelled'
             WHERE id = $1 AND user_id = $2 AND status IN ('pending', 'confirmed')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssessmentSchedule>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}

/// Write-once behavioural assessment forms, one per dog.
pub struct AssessmentFormRepo;

impl AssessmentFormRepo {
    /// Insert the form. A second submission for the same dog violates
    /// `uq_assessment_forms_dog`.
    pub async fn create(
        pool: &PgPool,
        dog_id: DbId,
        user_id: DbId,
        input: &CreateAssessmentForm,
    ) -> Result<AssessmentForm, sqlx::Error> {
        let query = format!(
            "INSERT INTO assessment_forms
                (dog_id, user_id, temperament, socialization, play_style, triggers,
                 separation_anxiety, bite_history, bite_history_details, feeding_instructions,
                 medical_conditions, additional_notes, signature)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {FORM_COLUMNS}"
        );
        sqlx::query_as::<_, AssessmentForm>(&query)
            .bind(dog_id)
            .bind(user_id)
            .bind(&input.temperament)
            .bind(&input.socialization)
            .bind(&input.play_style)
            .bind(&input.triggers)
            .bind(input.separation_anxiety)
            .bind(input.bite_history)
            .bind(&input.bite_history_details)
            .bind(&input.feeding_instructions)
            .bind(&input.medical_conditions)
            .bind(&input.additional_notes)
            .bind(input.signature.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_dog(
        pool: &PgPool,
        dog_id: DbId,
    ) -> Result<Option<AssessmentForm>, sqlx::Error> {
        let query = format!("SELECT {FORM_COLUMNS} FROM assessment_forms WHERE dog_id = $1");
        sqlx::query_as::<_, AssessmentForm>(&query)
            .bind(dog_id)
            .fetch_optional(pool)
            .await
    }
}
