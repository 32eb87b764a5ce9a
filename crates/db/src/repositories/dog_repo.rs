//! Repository for the `dogs` table.

use kennel_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::dog::{CreateDog, Dog, PendingDog, UpdateDog};

const COLUMNS: &str = "id, owner_id, name, breed, birth_date, weight_lbs, sex, \
    is_spayed_neutered, vet_name, vet_phone, notes, photo_url, is_approved, approved_at, \
    created_at, updated_at";

/// Provides CRUD operations for dogs.
pub struct DogRepo;

impl DogRepo {
    /// Register a dog for `owner_id`. New dogs start unapproved.
    pub async fn create(pool: &PgPool, owner_id: DbId, input: &CreateDog) -> Result<Dog, sqlx::Error> {
        let query = format!(
            "INSERT INTO dogs (owner_id, name, breed, birth_date, weight_lbs, sex,
                               is_spayed_neutered, vet_name, vet_phone, notes, photo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dog>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.breed)
            .bind(input.birth_date)
            .bind(input.weight_lbs)
            .bind(&input.sex)
            .bind(input.is_spayed_neutered)
            .bind(&input.vet_name)
            .bind(&input.vet_phone)
            .bind(&input.notes)
            .bind(&input.photo_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dogs WHERE id = $1");
        sqlx::query_as::<_, Dog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a dog only if `owner_id` owns it.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Dog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dogs WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Dog>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// The subset of `ids` owned by `owner_id`.
    pub async fn find_many_owned(
        pool: &PgPool,
        ids: &[DbId],
        owner_id: DbId,
    ) -> Result<Vec<Dog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dogs WHERE id = ANY($1) AND owner_id = $2 ORDER BY id"
        );
        sqlx::query_as::<_, Dog>(&query)
            .bind(ids)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Dog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dogs WHERE owner_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Dog>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update an owned dog. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no such dog belongs to `owner_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateDog,
    ) -> Result<Option<Dog>, sqlx::Error> {
        let query = format!(
            "UPDATE dogs SET
                name = COALESCE($3, name),
                breed = COALESCE($4, breed),
                birth_date = COALESCE($5, birth_date),
                weight_lbs = COALESCE($6, weight_lbs),
                sex = COALESCE($7, sex),
                is_spayed_neutered = COALESCE($8, is_spayed_neutered),
                vet_name = COALESCE($9, vet_name),
                vet_phone = COALESCE($10, vet_phone),
                notes = COALESCE($11, notes),
                photo_url = COALESCE($12, photo_url)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dog>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.breed)
            .bind(input.birth_date)
            .bind(input.weight_lbs)
            .bind(&input.sex)
            .bind(input.is_spayed_neutered)
            .bind(&input.vet_name)
            .bind(&input.vet_phone)
            .bind(&input.notes)
            .bind(&input.photo_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete an owned dog. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dogs WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Approve a dog. Returns `None` if it does not exist or was already approved.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<Dog>, sqlx::Error> {
        let query = format!(
            "UPDATE dogs SET is_approved = true, approved_at = NOW()
             WHERE id = $1 AND is_approved = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Dogs awaiting approval, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingDog>, sqlx::Error> {
        sqlx::query_as::<_, PendingDog>(
            "SELECT d.id, d.owner_id, p.full_name AS owner_name, d.name, d.breed,
                    d.photo_url, d.created_at
             FROM dogs d
             JOIN profiles p ON p.id = d.owner_id
             WHERE d.is_approved = false
             ORDER BY d.created_at ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Whether any live booking still references the dog.
    pub async fn has_upcoming_bookings(
        pool: &PgPool,
        id: DbId,
        today: Date,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE $1 = ANY(dog_ids) AND status = 'booked' AND booking_date >= $2
             )",
        )
        .bind(id)
        .bind(today)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
