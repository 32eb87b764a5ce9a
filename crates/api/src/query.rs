//! Shared query parameter types for API handlers.

use kennel_core::types::Date;
use serde::Deserialize;

/// `?status=` filter used by the staff queues.
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

/// `?from=&to=` date window.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// `?date=` single-day filter.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<Date>,
}
