//! Well-known role name constants.
//!
//! These must match the `ck_profiles_role` check constraint in the
//! profiles migration.

pub const ROLE_USER: &str = "user";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ADMIN: &str = "admin";

/// All assignable roles.
pub const ALL_ROLES: &[&str] = &[ROLE_USER, ROLE_STAFF, ROLE_ADMIN];

/// Whether `role` is one of the known role names.
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

/// Staff workflows (approval, check-in/out) are open to staff and admins.
pub fn is_staff_role(role: &str) -> bool {
    role == ROLE_STAFF || role == ROLE_ADMIN
}
