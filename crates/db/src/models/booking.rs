//! Booking model and DTOs.

use kennel_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const STATUS_BOOKED: &str = "booked";
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub subscription_id: DbId,
    pub dog_ids: Vec<DbId>,
    pub booking_date: Date,
    pub session_type: String,
    pub session_time: Option<String>,
    pub status: String,
    pub checked_in: bool,
    pub checked_in_at: Option<Timestamp>,
    pub checked_in_by: Option<DbId>,
    pub checked_out: bool,
    pub checked_out_at: Option<Timestamp>,
    pub checked_out_by: Option<DbId>,
    pub cancelled_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Staff roster row: a booking joined with its owner's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RosterEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_name: String,
    pub dog_ids: Vec<DbId>,
    pub booking_date: Date,
    pub session_type: String,
    pub session_time: Option<String>,
    pub checked_in: bool,
    pub checked_in_at: Option<Timestamp>,
    pub checked_out: bool,
    pub checked_out_at: Option<Timestamp>,
    pub notes: Option<String>,
}

/// A multi-date booking request, already validated.
#[derive(Debug)]
pub struct CreateBookings {
    pub user_id: DbId,
    pub subscription_id: DbId,
    pub dog_ids: Vec<DbId>,
    pub dates: Vec<Date>,
    pub session_type: String,
    pub session_time: Option<String>,
    pub notes: Option<String>,
    /// Days debited from the subscription for the whole request.
    pub days: i32,
    /// Maximum live bookings per calendar date.
    pub daily_capacity: i64,
}

/// Result of the transactional booking write.
#[derive(Debug)]
pub enum BookingOutcome {
    Created {
        bookings: Vec<Booking>,
        days_remaining: i32,
    },
    /// Subscription no longer active or balance too low; nothing was written.
    InsufficientDays,
    /// A date reached capacity; nothing was written.
    DateFull(Date),
}
