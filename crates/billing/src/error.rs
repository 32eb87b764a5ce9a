//! Billing error types.

use stripe::{StripeError, WebhookError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BillingError>;

#[derive(Error, Debug)]
pub enum BillingError {
    /// The provider rejected a request, or could not be reached.
    #[error("Billing provider error: {0}")]
    Provider(#[from] StripeError),

    /// Webhook signature missing, malformed, stale, or wrong.
    #[error("Webhook signature invalid: {0}")]
    Signature(String),

    /// Webhook or provider payload could not be parsed.
    #[error("Billing payload parse error: {0}")]
    Parse(String),

    /// A request this service built is not acceptable to the provider.
    #[error("Invalid billing request: {0}")]
    InvalidRequest(String),

    #[error("Billing configuration error: {0}")]
    Config(String),
}

impl From<WebhookError> for BillingError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::BadParse(e) => BillingError::Parse(e.to_string()),
            other => BillingError::Signature(other.to_string()),
        }
    }
}

impl BillingError {
    /// Message safe to show to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            BillingError::Provider(_) => "Payment processing failed. Please try again.",
            BillingError::Signature(_) | BillingError::Parse(_) => "Invalid webhook payload.",
            BillingError::InvalidRequest(_) | BillingError::Config(_) => {
                "Payments are not configured."
            }
        }
    }
}
