//! Booking day accounting and attendance rules.
//!
//! A booking request covers one or more calendar dates for one or more dogs.
//! Each distinct date consumes exactly one day from the owner's subscription
//! balance, regardless of how many dogs attend or whether the session is a
//! full or half day.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// Upper bound on the number of dates accepted in a single booking request.
pub const MAX_DATES_PER_REQUEST: usize = 31;

/// Upper bound on the number of dogs attached to a single booking.
pub const MAX_DOGS_PER_BOOKING: usize = 6;

// ---------------------------------------------------------------------------
// Session type / time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    FullDay,
    HalfDay,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::FullDay => "full_day",
            SessionType::HalfDay => "half_day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTime {
    Morning,
    Afternoon,
}

impl SessionTime {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionTime::Morning => "morning",
            SessionTime::Afternoon => "afternoon",
        }
    }
}

/// Half-day sessions need a morning/afternoon slot; full days must not carry one.
pub fn validate_session(
    session_type: SessionType,
    session_time: Option<SessionTime>,
) -> Result<(), CoreError> {
    match (session_type, session_time) {
        (SessionType::HalfDay, None) => Err(CoreError::Validation(
            "Half-day bookings require a session time (morning or afternoon)".into(),
        )),
        (SessionType::FullDay, Some(_)) => Err(CoreError::Validation(
            "Full-day bookings do not take a session time".into(),
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Request validation and day balance
// ---------------------------------------------------------------------------

/// Shape checks on a booking request that need no database access.
pub fn validate_booking_request(
    dates: &[Date],
    dog_ids: &[DbId],
    today: Date,
) -> Result<(), CoreError> {
    if dates.is_empty() {
        return Err(CoreError::Validation(
            "At least one booking date is required".into(),
        ));
    }
    if dates.len() > MAX_DATES_PER_REQUEST {
        return Err(CoreError::Validation(format!(
            "At most {MAX_DATES_PER_REQUEST} dates can be booked at once"
        )));
    }
    if dog_ids.is_empty() {
        return Err(CoreError::Validation(
            "At least one dog must be selected".into(),
        ));
    }
    if dog_ids.len() > MAX_DOGS_PER_BOOKING {
        return Err(CoreError::Validation(format!(
            "At most {MAX_DOGS_PER_BOOKING} dogs can share a booking"
        )));
    }

    let unique_dates: BTreeSet<&Date> = dates.iter().collect();
    if unique_dates.len() != dates.len() {
        return Err(CoreError::Validation(
            "Booking dates must not repeat".into(),
        ));
    }
    let unique_dogs: BTreeSet<&DbId> = dog_ids.iter().collect();
    if unique_dogs.len() != dog_ids.len() {
        return Err(CoreError::Validation("Dogs must not repeat".into()));
    }

    if let Some(past) = dates.iter().find(|d| **d < today) {
        return Err(CoreError::Validation(format!(
            "Cannot book a date in the past: {past}"
        )));
    }

    Ok(())
}

/// Number of subscription days a set of dates consumes.
pub fn days_required(dates: &[Date]) -> i32 {
    let unique: BTreeSet<&Date> = dates.iter().collect();
    i32::try_from(unique.len()).unwrap_or(i32::MAX)
}

/// Reject a booking that needs more days than the subscription has left.
pub fn check_day_balance(required: i32, remaining: i32) -> Result<(), CoreError> {
    if required > remaining {
        return Err(CoreError::Validation(format!(
            "Not enough days remaining: {required} requested, {remaining} available"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Attendance state machine
// ---------------------------------------------------------------------------

/// Attendance state derived from the booking's check-in/check-out flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    Booked,
    CheckedIn,
    CheckedOut,
}

impl AttendanceState {
    pub fn from_flags(checked_in: bool, checked_out: bool) -> Self {
        match (checked_in, checked_out) {
            (_, true) => AttendanceState::CheckedOut,
            (true, false) => AttendanceState::CheckedIn,
            (false, false) => AttendanceState::Booked,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceState::Booked => "booked",
            AttendanceState::CheckedIn => "checked_in",
            AttendanceState::CheckedOut => "checked_out",
        }
    }

    /// Transition for a check-in. Only a booked dog can be checked in.
    pub fn check_in(self) -> Result<Self, String> {
        match self {
            AttendanceState::Booked => Ok(AttendanceState::CheckedIn),
            AttendanceState::CheckedIn => Err("Booking is already checked in".into()),
            AttendanceState::CheckedOut => Err("Booking is already checked out".into()),
        }
    }

    /// Transition for a check-out. Only a checked-in dog can be checked out.
    pub fn check_out(self) -> Result<Self, String> {
        match self {
            AttendanceState::CheckedIn => Ok(AttendanceState::CheckedOut),
            AttendanceState::Booked => Err("Booking has not been checked in".into()),
            AttendanceState::CheckedOut => Err("Booking is already checked out".into()),
        }
    }
}

/// Check-in is only possible on the booking date itself.
pub fn validate_check_in(
    booking_date: Date,
    today: Date,
    state: AttendanceState,
) -> Result<AttendanceState, CoreError> {
    if booking_date != today {
        return Err(CoreError::Validation(format!(
            "Booking is for {booking_date}, check-in is only allowed on that date"
        )));
    }
    state.check_in().map_err(CoreError::Conflict)
}

/// A cancellation gives the day back only for a future date that nobody has
/// checked in for yet.
pub fn is_refundable_cancellation(booking_date: Date, today: Date, state: AttendanceState) -> bool {
    booking_date > today && state == AttendanceState::Booked
}
