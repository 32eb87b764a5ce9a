//! Hosted-checkout client backed by `async-stripe`.

use async_trait::async_trait;
use stripe::{
    CancelSubscription, CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionLineItemsPriceDataRecurring,
    CreateCheckoutSessionLineItemsPriceDataRecurringInterval, CreateCheckoutSessionSubscriptionData,
    Currency, Subscription, SubscriptionId,
};

use crate::error::{BillingError, Result};
use crate::provider::{BillingProvider, CheckoutMode, CheckoutSession, CheckoutSessionRequest};

/// Billing provider credentials and endpoints.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// Returned to browsers so they can initialise the provider's client SDK.
    pub publishable_key: Option<String>,
    pub webhook_secret: String,
    /// Overrides the provider's API URL (e.g. a local mock server).
    pub api_base: Option<String>,
}

impl StripeConfig {
    /// Load from environment variables.
    ///
    /// | Env Var                  | Required | Default                  |
    /// |--------------------------|----------|--------------------------|
    /// | `STRIPE_SECRET_KEY`      | **yes**  | --                       |
    /// | `STRIPE_WEBHOOK_SECRET`  | **yes**  | --                       |
    /// | `STRIPE_PUBLISHABLE_KEY` | no       | --                       |
    /// | `STRIPE_API_BASE`        | no       | `https://api.stripe.com` |
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| BillingError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| BillingError::Config("STRIPE_WEBHOOK_SECRET not set".into()))?;
        let publishable_key = std::env::var("STRIPE_PUBLISHABLE_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let api_base = std::env::var("STRIPE_API_BASE")
            .ok()
            .filter(|url| !url.is_empty());

        Ok(Self {
            secret_key,
            publishable_key,
            webhook_secret,
            api_base,
        })
    }
}

/// Provider client implementing [`BillingProvider`].
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// # Panics
    ///
    /// When `api_base` is set but is not a valid URL.
    pub fn new(config: &StripeConfig) -> Self {
        let client = match &config.api_base {
            Some(url) => Client::from_url(url.as_str(), config.secret_key.as_str()),
            None => Client::new(config.secret_key.as_str()),
        };
        Self { client }
    }

    /// Get the underlying provider client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        let params = checkout_params(&request)?;
        tracing::debug!(mode = request.mode.as_str(), "Creating checkout session");

        let session = StripeCheckoutSession::create(&self.client, params).await?;
        let url = session
            .url
            .ok_or_else(|| BillingError::Parse("No checkout URL returned".into()))?;

        tracing::info!(session_id = %session.id, "Checkout session created");
        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }

    async fn cancel_subscription(&self, provider_subscription_id: &str) -> Result<()> {
        let id: SubscriptionId = provider_subscription_id.parse().map_err(|_| {
            BillingError::InvalidRequest(format!(
                "'{provider_subscription_id}' is not a subscription id"
            ))
        })?;
        Subscription::cancel(&self.client, &id, CancelSubscription::new()).await?;
        tracing::info!(subscription_id = %provider_subscription_id, "Subscription cancelled");
        Ok(())
    }
}

/// Build the provider's create-session parameters for `request`.
///
/// Subscription sessions copy the metadata onto the subscription itself as
/// well, so later subscription events carry it too.
pub fn checkout_params(request: &CheckoutSessionRequest) -> Result<CreateCheckoutSession<'_>> {
    let currency: Currency = request
        .currency
        .parse()
        .map_err(|_| BillingError::Config(format!("Unsupported currency '{}'", request.currency)))?;
    let quantity = u64::try_from(request.quantity).map_err(|_| {
        BillingError::InvalidRequest(format!("Invalid quantity {}", request.quantity))
    })?;
    let subscription = request.mode == CheckoutMode::Subscription;

    let mut params = CreateCheckoutSession::new();
    params.mode = Some(if subscription {
        CheckoutSessionMode::Subscription
    } else {
        CheckoutSessionMode::Payment
    });
    params.success_url = Some(&request.success_url);
    params.cancel_url = Some(&request.cancel_url);
    params.customer_email = request.customer_email.as_deref();
    params.client_reference_id = request.client_reference_id.as_deref();
    params.metadata = Some(request.metadata.clone());
    if subscription {
        params.subscription_data = Some(CreateCheckoutSessionSubscriptionData {
            metadata: Some(request.metadata.clone()),
            ..Default::default()
        });
    }

    params.line_items = Some(vec![CreateCheckoutSessionLineItems {
        quantity: Some(quantity),
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency,
            unit_amount: Some(request.unit_amount_cents),
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: request.product_name.clone(),
                description: request.description.clone(),
                ..Default::default()
            }),
            recurring: subscription.then(|| CreateCheckoutSessionLineItemsPriceDataRecurring {
                interval: CreateCheckoutSessionLineItemsPriceDataRecurringInterval::Month,
                interval_count: Some(1),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }]);

    Ok(params)
}
