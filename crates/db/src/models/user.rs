//! Login identity model and DTOs.

use kennel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::profile::Profile;

/// Full row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Account listing row for the admin user table (identity + profile role).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccountSummary {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub is_approved: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating an identity together with its profile.
#[derive(Debug)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_approved: bool,
    /// Set when an admin creates and pre-approves the account.
    pub approved_by: Option<DbId>,
}

/// Result of [`CreateAccount`]: the identity and its profile, written together.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub profile: Profile,
}
