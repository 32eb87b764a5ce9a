//! Medication schedule classification.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationPhase {
    Active,
    Upcoming,
    Historical,
}

/// Classify a medication by its date range relative to `today`.
///
/// A missing start date means the medication is already running; a missing
/// end date means it is ongoing.
pub fn phase(start: Option<Date>, end: Option<Date>, today: Date) -> MedicationPhase {
    if end.is_some_and(|e| e < today) {
        return MedicationPhase::Historical;
    }
    if start.is_some_and(|s| s > today) {
        return MedicationPhase::Upcoming;
    }
    MedicationPhase::Active
}

/// End date, when present, must not precede the start date.
pub fn validate_range(start: Option<Date>, end: Option<Date>) -> Result<(), CoreError> {
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            return Err(CoreError::Validation(format!(
                "Medication end date {e} is before start date {s}"
            )));
        }
    }
    Ok(())
}

/// Split items into `(current, historical)`. Upcoming medications are
/// listed with the current ones.
pub fn partition<T, F>(items: Vec<T>, today: Date, range: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> (Option<Date>, Option<Date>),
{
    items.into_iter().partition(|item| {
        let (start, end) = range(item);
        phase(start, end, today) != MedicationPhase::Historical
    })
}
