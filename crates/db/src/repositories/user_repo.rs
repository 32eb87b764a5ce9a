//! Repository for the `users` table.

use kennel_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::profile::Profile;
use crate::models::user::{Account, AccountSummary, CreateAccount, User};
use crate::repositories::profile_repo::{PROFILE_COLUMNS, PROFILE_FROM};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, is_active, \
                        last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Provides CRUD operations for login identities.
pub struct UserRepo;

impl UserRepo {
    /// Insert an identity and its profile in one transaction.
    ///
    /// Either both rows exist afterwards or neither does. A duplicate email
    /// surfaces as a unique violation on `uq_users_email`.
    pub async fn create_account(
        pool: &PgPool,
        input: &CreateAccount,
    ) -> Result<Account, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO profiles (id, full_name, phone, role, is_approved, approved_at, approved_by)
             VALUES ($1, $2, $3, $4, $5, CASE WHEN $5 THEN NOW() END, $6)",
        )
        .bind(user.id)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.role)
        .bind(input.is_approved)
        .bind(input.approved_by)
        .execute(&mut *tx)
        .await?;

        let query = format!("SELECT {PROFILE_COLUMNS} {PROFILE_FROM} WHERE p.id = $1");
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Account { user, profile })
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by (normalized) email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all accounts with their role and approval, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AccountSummary>, sqlx::Error> {
        sqlx::query_as::<_, AccountSummary>(
            "SELECT u.id, u.email, p.full_name, p.role, u.is_active, p.is_approved,
                    u.last_login_at, u.created_at
             FROM users u
             JOIN profiles p ON p.id = u.id
             ORDER BY u.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
