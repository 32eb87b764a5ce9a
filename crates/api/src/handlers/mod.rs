//! Request handlers, one module per resource.
//!
//! Handlers validate input with `kennel_core` rules before touching the
//! database, delegate persistence to the `kennel_db` repositories, and map
//! failures through [`AppError`](crate::error::AppError).

pub mod admin;
pub mod assessments;
pub mod auth;
pub mod billing;
pub mod bookings;
pub mod dogs;
pub mod forms;
pub mod medications;
pub mod profile;
pub mod public;
pub mod staff;
pub mod webhook;

use axum::http::HeaderMap;

/// Best-effort client address: first hop of `x-forwarded-for`, else `x-real-ip`.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
