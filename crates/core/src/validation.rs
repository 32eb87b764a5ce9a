//! Form validation shared by the signup, profile, and agreement handlers.
//!
//! Every check here runs before any database access so a rejected form never
//! produces a write.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Minimum password length for self-service signup and admin-created accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length accepted for short free-text fields (names, breeds, ...).
pub const MAX_SHORT_TEXT: usize = 200;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-.]{7,20}$").expect("phone pattern is valid"));

/// Reject empty or whitespace-only values for a required field.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if value.len() > MAX_SHORT_TEXT {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_SHORT_TEXT} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if !PHONE_RE.is_match(phone.trim()) {
        return Err(CoreError::Validation(format!(
            "'{phone}' is not a valid phone number"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Signup form checks: required fields, email shape, password strength, and
/// matching confirmation.
pub fn validate_signup(
    email: &str,
    full_name: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), CoreError> {
    require_non_empty("Email", email)?;
    require_non_empty("Full name", full_name)?;
    validate_email(email)?;
    if password != confirm_password {
        return Err(CoreError::Validation("Passwords do not match".into()));
    }
    validate_password(password)
}

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Legal agreement clauses
// ---------------------------------------------------------------------------

pub const CLAUSE_LIABILITY_WAIVER: &str = "liability_waiver";
pub const CLAUSE_VACCINATION: &str = "vaccination_requirements";
pub const CLAUSE_BEHAVIOR: &str = "behavior_policy";
pub const CLAUSE_EMERGENCY_CARE: &str = "emergency_care";
pub const CLAUSE_PHOTO_RELEASE: &str = "photo_release";
pub const CLAUSE_CANCELLATION: &str = "cancellation_policy";

/// Every clause, in display order.
pub const AGREEMENT_CLAUSES: &[&str] = &[
    CLAUSE_LIABILITY_WAIVER,
    CLAUSE_VACCINATION,
    CLAUSE_BEHAVIOR,
    CLAUSE_EMERGENCY_CARE,
    CLAUSE_PHOTO_RELEASE,
    CLAUSE_CANCELLATION,
];

/// Clauses the customer may decline.
pub const OPTIONAL_CLAUSES: &[&str] = &[CLAUSE_PHOTO_RELEASE];

/// Every mandatory clause must be accepted and the signature present.
pub fn validate_agreement(acceptances: &[(&str, bool)], signature: &str) -> Result<(), CoreError> {
    require_non_empty("Signature", signature)?;

    let missing: Vec<&str> = AGREEMENT_CLAUSES
        .iter()
        .filter(|clause| !OPTIONAL_CLAUSES.contains(clause))
        .filter(|clause| {
            !acceptances
                .iter()
                .any(|(name, accepted)| name == *clause && *accepted)
        })
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "The following clauses must be accepted: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}
