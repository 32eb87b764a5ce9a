//! Billing provider integration.
//!
//! Payments never touch this service directly. The flow is:
//!
//! ```text
//! ┌──────────────┐  create session  ┌─────────────────┐  redirect  ┌──────────────┐
//! │  Portal API  │─────────────────▶│ Provider-hosted │───────────▶│   Customer   │
//! │  (checkout)  │◀─── session url ─│  checkout page  │            │   browser    │
//! └──────────────┘                  └─────────────────┘            └──────────────┘
//!         ▲                                  │
//!         │        signed webhook event      │
//!         └──────────────────────────────────┘
//! ```
//!
//! - [`provider`] -- the [`BillingProvider`] seam and its request/response types.
//! - [`client`] -- `async-stripe` implementation of the seam.
//! - [`event`] -- webhook signature verification and classification into
//!   [`ProviderEvent`]s.

pub mod client;
pub mod error;
pub mod event;
pub mod provider;

pub use client::{StripeClient, StripeConfig};
pub use error::{BillingError, Result};
pub use event::{CheckoutCompleted, InvoicePaid, ProviderEvent, SIGNATURE_HEADER};
pub use provider::{BillingProvider, CheckoutMode, CheckoutSession, CheckoutSessionRequest};
