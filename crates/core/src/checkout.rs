//! Checkout metadata codec.
//!
//! Metadata attached to a hosted checkout session is echoed back on the
//! `checkout.session.completed` webhook, which uses it to decide which
//! subscription row to create or credit. The key names are part of the
//! contract with sessions created by earlier deployments and must not change.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::types::DbId;

pub const KEY_TYPE: &str = "type";
pub const KEY_TIER_ID: &str = "tierId";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_DAYS: &str = "days";
pub const KEY_SUBSCRIPTION_ID: &str = "subscriptionId";
pub const KEY_NUM_DAYS: &str = "numDays";

pub const TYPE_SUBSCRIPTION: &str = "subscription";
pub const TYPE_EXTRA_DAYS: &str = "extra_days";

/// Bounds on a single extra-day purchase.
pub const MIN_EXTRA_DAYS: i32 = 1;
pub const MAX_EXTRA_DAYS: i32 = 20;

/// What a checkout session is paying for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutKind {
    /// A monthly subscription to a tier granting `days` daycare days.
    Subscription {
        tier_id: DbId,
        user_id: DbId,
        days: i32,
    },
    /// A one-off top-up of `num_days` on an existing subscription.
    ExtraDays {
        user_id: DbId,
        subscription_id: DbId,
        num_days: i32,
    },
}

impl CheckoutKind {
    pub fn user_id(&self) -> DbId {
        match self {
            CheckoutKind::Subscription { user_id, .. } | CheckoutKind::ExtraDays { user_id, .. } => {
                *user_id
            }
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            CheckoutKind::Subscription { .. } => TYPE_SUBSCRIPTION,
            CheckoutKind::ExtraDays { .. } => TYPE_EXTRA_DAYS,
        }
    }

    /// Encode as checkout session metadata.
    pub fn to_metadata(&self) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert(KEY_TYPE.to_string(), self.type_str().to_string());
        match self {
            CheckoutKind::Subscription {
                tier_id,
                user_id,
                days,
            } => {
                metadata.insert(KEY_TIER_ID.to_string(), tier_id.to_string());
                metadata.insert(KEY_USER_ID.to_string(), user_id.to_string());
                metadata.insert(KEY_DAYS.to_string(), days.to_string());
            }
            CheckoutKind::ExtraDays {
                user_id,
                subscription_id,
                num_days,
            } => {
                metadata.insert(KEY_USER_ID.to_string(), user_id.to_string());
                metadata.insert(KEY_SUBSCRIPTION_ID.to_string(), subscription_id.to_string());
                metadata.insert(KEY_NUM_DAYS.to_string(), num_days.to_string());
            }
        }
        metadata
    }

    /// Decode from webhook metadata. Unknown `type` values and missing or
    /// non-numeric fields are validation errors.
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self, CoreError> {
        let kind = metadata
            .get(KEY_TYPE)
            .ok_or_else(|| CoreError::Validation("Checkout metadata is missing 'type'".into()))?;

        match kind.as_str() {
            TYPE_SUBSCRIPTION => {
                let days: i32 = parse_field(metadata, KEY_DAYS)?;
                if days <= 0 {
                    return Err(CoreError::Validation(format!(
                        "Checkout metadata 'days' must be positive, got {days}"
                    )));
                }
                Ok(CheckoutKind::Subscription {
                    tier_id: parse_field(metadata, KEY_TIER_ID)?,
                    user_id: parse_field(metadata, KEY_USER_ID)?,
                    days,
                })
            }
            TYPE_EXTRA_DAYS => {
                let num_days: i32 = parse_field(metadata, KEY_NUM_DAYS)?;
                validate_extra_days(num_days)?;
                Ok(CheckoutKind::ExtraDays {
                    user_id: parse_field(metadata, KEY_USER_ID)?,
                    subscription_id: parse_field(metadata, KEY_SUBSCRIPTION_ID)?,
                    num_days,
                })
            }
            other => Err(CoreError::Validation(format!(
                "Unknown checkout type '{other}'"
            ))),
        }
    }
}

/// Reject extra-day quantities outside [`MIN_EXTRA_DAYS`]..=[`MAX_EXTRA_DAYS`].
pub fn validate_extra_days(num_days: i32) -> Result<(), CoreError> {
    if !(MIN_EXTRA_DAYS..=MAX_EXTRA_DAYS).contains(&num_days) {
        return Err(CoreError::Validation(format!(
            "Extra days must be between {MIN_EXTRA_DAYS} and {MAX_EXTRA_DAYS}, got {num_days}"
        )));
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(
    metadata: &HashMap<String, String>,
    key: &str,
) -> Result<T, CoreError> {
    let raw = metadata
        .get(key)
        .ok_or_else(|| CoreError::Validation(format!("Checkout metadata is missing '{key}'")))?;
    raw.trim().parse().map_err(|_| {
        CoreError::Validation(format!("Checkout metadata '{key}' is not a number: '{raw}'"))
    })
}
