//! Repository for the `profiles` table.
//!
//! Profiles are always read joined with `users` so the login email travels
//! with them.

use kennel_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::profile::{Profile, UpdateProfile};

/// Column list for a profile joined with its user (`p` and `u` aliases).
pub(crate) const PROFILE_COLUMNS: &str = "p.id, u.email, p.full_name, p.phone, p.address, \
    p.emergency_contact_name, p.emergency_contact_phone, p.role, p.is_approved, \
    p.approved_at, p.approved_by, p.created_at, p.updated_at";

pub(crate) const PROFILE_FROM: &str = "FROM profiles p JOIN users u ON u.id = p.id";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn exists<'c, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'c>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM profiles WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Find a profile by its user id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} {PROFILE_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a self-service edit. Only non-`None` fields are changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                emergency_contact_name = COALESCE($5, emergency_contact_name),
                emergency_contact_phone = COALESCE($6, emergency_contact_phone)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.emergency_contact_name)
        .bind(&input.emergency_contact_phone)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// List customer profiles by approval state, oldest first so the queue
    /// is worked in signup order.
    pub async fn list_customers(
        pool: &PgPool,
        is_approved: bool,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} {PROFILE_FROM}
             WHERE p.role = 'user' AND p.is_approved = $1 AND u.is_active = true
             ORDER BY p.created_at ASC"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(is_approved)
            .fetch_all(pool)
            .await
    }

    /// Approve a profile. Returns `false` if it does not exist or was
    /// already approved.
    pub async fn approve(pool: &PgPool, id: DbId, approved_by: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET is_approved = true, approved_at = NOW(), approved_by = $2
             WHERE id = $1 AND is_approved = false",
        )
        .bind(id)
        .bind(approved_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change a profile's role. Returns `false` if the profile does not exist.
    pub async fn set_role(pool: &PgPool, id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
