//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where rows are mutable

pub mod agreement;
pub mod assessment;
pub mod booking;
pub mod contact;
pub mod dog;
pub mod medication;
pub mod profile;
pub mod session;
pub mod subscription;
pub mod tier;
pub mod user;
pub mod webhook_event;
