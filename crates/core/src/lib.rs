//! Domain rules for the daycare portal.
//!
//! This crate has zero internal dependencies so the same rules back the API
//! layer, the repositories, and any future CLI tooling.

pub mod assessment;
pub mod booking;
pub mod checkout;
pub mod error;
pub mod medication;
pub mod roles;
pub mod types;
pub mod validation;
