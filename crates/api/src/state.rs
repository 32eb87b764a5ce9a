use std::sync::Arc;

use kennel_billing::BillingProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: kennel_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Hosted-checkout provider. Tests substitute an in-memory fake.
    pub billing: Arc<dyn BillingProvider>,
}
