//! Webhook verification and event classification.

use std::collections::HashMap;

use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionPaymentStatus, Event, EventObject,
    EventType, InvoiceBillingReason, Webhook,
};

use crate::error::{BillingError, Result};

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// A completed hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCompleted {
    pub session_id: String,
    pub metadata: HashMap<String, String>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub amount_total: Option<i64>,
    /// False while a delayed payment method (bank debit, voucher) is still
    /// settling. The provider follows up with an async-payment event.
    pub paid: bool,
}

/// A paid invoice on a recurring subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePaid {
    pub subscription_id: String,
    pub billing_reason: Option<InvoiceBillingReason>,
    pub period_start: Option<i64>,
    pub period_end: Option<i64>,
}

impl InvoicePaid {
    /// Whether this invoice renews an existing subscription for a new period.
    pub fn is_renewal(&self) -> bool {
        self.billing_reason == Some(InvoiceBillingReason::SubscriptionCycle)
    }
}

/// The events this service acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    CheckoutCompleted(CheckoutCompleted),
    /// A previously unpaid checkout has now been paid.
    CheckoutPaymentSucceeded(CheckoutCompleted),
    SubscriptionDeleted { subscription_id: String },
    InvoicePaid(InvoicePaid),
    /// Delivered but not handled; acknowledged so the provider stops retrying.
    Ignored { event_type: String },
}

/// Verify the signature header against the raw body and parse the event.
///
/// Deliveries signed more than five minutes away from the current clock are
/// rejected.
pub fn construct_event(payload: &[u8], signature: &str, secret: &str) -> Result<Event> {
    let payload = std::str::from_utf8(payload)
        .map_err(|_| BillingError::Parse("Webhook body is not UTF-8".into()))?;
    Ok(Webhook::construct_event(payload, signature, secret)?)
}

/// Interpret a verified event according to its type.
pub fn classify(event: &Event) -> Result<ProviderEvent> {
    match (event.type_, &event.data.object) {
        (EventType::CheckoutSessionCompleted, EventObject::CheckoutSession(session)) => {
            Ok(ProviderEvent::CheckoutCompleted(checkout(session)))
        }
        (EventType::CheckoutSessionAsyncPaymentSucceeded, EventObject::CheckoutSession(session)) => {
            let mut checkout = checkout(session);
            checkout.paid = true;
            Ok(ProviderEvent::CheckoutPaymentSucceeded(checkout))
        }
        (EventType::CustomerSubscriptionDeleted, EventObject::Subscription(sub)) => {
            Ok(ProviderEvent::SubscriptionDeleted {
                subscription_id: sub.id.to_string(),
            })
        }
        (EventType::InvoicePaid, EventObject::Invoice(invoice)) => {
            let subscription_id = invoice
                .subscription
                .as_ref()
                .map(|s| s.id().to_string())
                .ok_or_else(|| {
                    BillingError::Parse("Invoice is not attached to a subscription".into())
                })?;
            Ok(ProviderEvent::InvoicePaid(InvoicePaid {
                subscription_id,
                billing_reason: invoice.billing_reason,
                period_start: invoice.period_start,
                period_end: invoice.period_end,
            }))
        }
        (
            EventType::CheckoutSessionCompleted
            | EventType::CheckoutSessionAsyncPaymentSucceeded
            | EventType::CustomerSubscriptionDeleted
            | EventType::InvoicePaid,
            _,
        ) => Err(BillingError::Parse(format!(
            "Unexpected object in {} event",
            event.type_
        ))),
        (other, _) => Ok(ProviderEvent::Ignored {
            event_type: other.to_string(),
        }),
    }
}

fn checkout(session: &StripeCheckoutSession) -> CheckoutCompleted {
    CheckoutCompleted {
        session_id: session.id.to_string(),
        metadata: session.metadata.clone().unwrap_or_default(),
        customer_id: session.customer.as_ref().map(|c| c.id().to_string()),
        subscription_id: session.subscription.as_ref().map(|s| s.id().to_string()),
        amount_total: session.amount_total,
        paid: matches!(
            session.payment_status,
            CheckoutSessionPaymentStatus::Paid | CheckoutSessionPaymentStatus::NoPaymentRequired
        ),
    }
}
