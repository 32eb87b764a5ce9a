//! The billing provider seam.
//!
//! Handlers only ever talk to `dyn BillingProvider`, so tests can swap the
//! REST client for an in-memory fake.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Whether the session sets up a recurring subscription or takes a one-off payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    Subscription,
    Payment,
}

impl CheckoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutMode::Subscription => "subscription",
            CheckoutMode::Payment => "payment",
        }
    }
}

/// Everything needed to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub mode: CheckoutMode,
    pub product_name: String,
    pub description: Option<String>,
    /// Price of a single unit in the currency's minor unit.
    pub unit_amount_cents: i64,
    pub quantity: i64,
    /// ISO currency code, lowercase.
    pub currency: String,
    pub customer_email: Option<String>,
    /// Our user id, echoed back on the completed session.
    pub client_reference_id: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    /// Echoed back verbatim on `checkout.session.completed`.
    pub metadata: HashMap<String, String>,
}

impl CheckoutSessionRequest {
    /// Total charged for this session.
    pub fn amount_total_cents(&self) -> i64 {
        self.unit_amount_cents * self.quantity
    }
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the customer is redirected to.
    pub url: String,
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Create a hosted checkout session.
    async fn create_checkout_session(&self, request: CheckoutSessionRequest)
        -> Result<CheckoutSession>;

    /// Cancel a recurring subscription immediately. The provider follows up
    /// with a `customer.subscription.deleted` webhook.
    async fn cancel_subscription(&self, provider_subscription_id: &str) -> Result<()>;
}
