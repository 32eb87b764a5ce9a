//! Assessment-day rules.
//!
//! New dogs are evaluated on a Friday before they can attend daycare. A
//! Friday belongs to one customer at a time: that customer may bring several
//! dogs, and the date is unavailable to everyone else until every open
//! request on it is cancelled.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Weekday};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// Maximum span of an availability listing, in weeks.
pub const MAX_AVAILABILITY_WEEKS: i64 = 26;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// Statuses that hold the date's slot.
pub const OPEN_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_CONFIRMED];

/// Requested date must be a Friday after today.
pub fn validate_requested_date(date: Date, today: Date) -> Result<(), CoreError> {
    if date.weekday() != Weekday::Fri {
        return Err(CoreError::Validation(format!(
            "Assessments are only held on Fridays; {date} is a {}",
            date.weekday()
        )));
    }
    if date <= today {
        return Err(CoreError::Validation(format!(
            "Assessments must be booked ahead; {date} is not a future Friday"
        )));
    }
    Ok(())
}

/// Valid status transitions for an assessment schedule.
pub fn valid_transitions(from: &str) -> &'static [&'static str] {
    match from {
        STATUS_PENDING => &[STATUS_CONFIRMED, STATUS_CANCELLED],
        STATUS_CONFIRMED => &[STATUS_COMPLETED, STATUS_CANCELLED],
        _ => &[],
    }
}

/// Validate a status transition, returning an error message for invalid ones.
pub fn validate_transition(from: &str, to: &str) -> Result<(), String> {
    if valid_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(format!("Invalid assessment status transition: {from} -> {to}"))
    }
}

/// All Fridays in `[from, to]`, capped at [`MAX_AVAILABILITY_WEEKS`].
pub fn fridays_between(from: Date, to: Date) -> Vec<Date> {
    let days_until_friday = (Weekday::Fri.num_days_from_monday() + 7
        - from.weekday().num_days_from_monday())
        % 7;
    let mut current = from + Duration::days(i64::from(days_until_friday));
    let limit = from + Duration::weeks(MAX_AVAILABILITY_WEEKS);
    let end = to.min(limit);

    let mut fridays = Vec::new();
    while current <= end {
        fridays.push(current);
        current += Duration::weeks(1);
    }
    fridays
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Available,
    /// Held by the viewing user.
    Yours,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FridaySlot {
    pub date: Date,
    pub state: SlotState,
}

/// Mark each Friday against the set of held dates (`date -> holder user id`).
pub fn availability(fridays: &[Date], held: &HashMap<Date, DbId>, viewer: DbId) -> Vec<FridaySlot> {
    fridays
        .iter()
        .map(|date| {
            let state = match held.get(date) {
                None => SlotState::Available,
                Some(holder) if *holder == viewer => SlotState::Yours,
                Some(_) => SlotState::Unavailable,
            };
            FridaySlot { date: *date, state }
        })
        .collect()
}
