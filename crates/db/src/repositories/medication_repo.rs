//! Repository for the `medications` table.

use kennel_core::types::DbId;
use sqlx::PgPool;

use crate::models::medication::{CreateMedication, Medication, UpdateMedication};

const COLUMNS: &str = "id, dog_id, name, dosage, frequency, start_date, end_date, \
                        instructions, created_at, updated_at";

/// Provides CRUD operations for medications.
pub struct MedicationRepo;

impl MedicationRepo {
    pub async fn create(
        pool: &PgPool,
        dog_id: DbId,
        input: &CreateMedication,
    ) -> Result<Medication, sqlx::Error> {
        let query = format!(
            "INSERT INTO medications (dog_id, name, dosage, frequency, start_date, end_date, instructions)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(dog_id)
            .bind(&input.name)
            .bind(&input.dosage)
            .bind(&input.frequency)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.instructions)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications WHERE id = $1");
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a medication only if its dog belongs to `owner_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medications
             WHERE id = $1 AND dog_id IN (SELECT id FROM dogs WHERE owner_id = $2)"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_dog(pool: &PgPool, dog_id: DbId) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medications
             WHERE dog_id = $1
             ORDER BY start_date DESC NULLS FIRST, id DESC"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(dog_id)
            .fetch_all(pool)
            .await
    }

    /// Update a medication. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedication,
    ) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!(
            "UPDATE medications SET
                name = COALESCE($2, name),
                dosage = COALESCE($3, dosage),
                frequency = COALESCE($4, frequency),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                instructions = COALESCE($7, instructions)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.dosage)
            .bind(&input.frequency)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.instructions)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
