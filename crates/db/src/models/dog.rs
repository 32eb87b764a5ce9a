//! Dog model and DTOs.

use kennel_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dog {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub breed: Option<String>,
    pub birth_date: Option<Date>,
    pub weight_lbs: Option<f64>,
    pub sex: Option<String>,
    pub is_spayed_neutered: Option<bool>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub is_approved: bool,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateDog {
    pub name: String,
    pub breed: Option<String>,
    pub birth_date: Option<Date>,
    pub weight_lbs: Option<f64>,
    pub sex: Option<String>,
    pub is_spayed_neutered: Option<bool>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDog {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<Date>,
    pub weight_lbs: Option<f64>,
    pub sex: Option<String>,
    pub is_spayed_neutered: Option<bool>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

/// Dog awaiting approval, with its owner's name for the staff queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingDog {
    pub id: DbId,
    pub owner_id: DbId,
    pub owner_name: String,
    pub name: String,
    pub breed: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
}
