//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireStaff`] -- `staff` or `admin`.
//! - [`rbac::RequireAdmin`] -- `admin` only.
//! - [`rbac::RequireAuth`] -- any authenticated caller.

pub mod auth;
pub mod rbac;
