use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use kennel_core::types::Date;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public site URL used to build checkout success/cancel redirects.
    pub public_base_url: String,
    /// Maximum live bookings per calendar date.
    pub daily_capacity: i64,
    /// Zone whose calendar decides "today" for bookings, check-in, refunds
    /// and assessment dates.
    pub timezone: Tz,
    pub jwt: JwtConfig,
    pub billing: BillingSettings,
}

/// Billing settings the handlers need. Provider credentials for outbound
/// calls live in the client itself.
#[derive(Debug, Clone)]
pub struct BillingSettings {
    /// Secret used to verify webhook signatures.
    pub webhook_secret: String,
    /// Handed to browsers by `GET /billing/config`.
    pub publishable_key: Option<String>,
    /// Price of a single extra daycare day, in cents.
    pub extra_day_price_cents: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:5173` |
    /// | `DAILY_CAPACITY`        | `20`                    |
    /// | `EXTRA_DAY_PRICE_CENTS` | `4500`                  |
    /// | `CURRENCY`              | `usd`                   |
    /// | `BUSINESS_TIMEZONE`     | `UTC`                   |
    ///
    /// `STRIPE_WEBHOOK_SECRET` and `JWT_SECRET` are required; see
    /// [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let daily_capacity: i64 = std::env::var("DAILY_CAPACITY")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DAILY_CAPACITY must be a valid i64");
        assert!(daily_capacity > 0, "DAILY_CAPACITY must be positive");

        let extra_day_price_cents: i64 = std::env::var("EXTRA_DAY_PRICE_CENTS")
            .unwrap_or_else(|_| "4500".into())
            .parse()
            .expect("EXTRA_DAY_PRICE_CENTS must be a valid i64");

        let timezone: Tz = std::env::var("BUSINESS_TIMEZONE")
            .unwrap_or_else(|_| "UTC".into())
            .parse()
            .expect("BUSINESS_TIMEZONE must be an IANA zone name such as America/Denver");

        let billing = BillingSettings {
            webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
                .expect("STRIPE_WEBHOOK_SECRET must be set in the environment"),
            publishable_key: std::env::var("STRIPE_PUBLISHABLE_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            extra_day_price_cents,
            currency: std::env::var("CURRENCY")
                .unwrap_or_else(|_| "usd".into())
                .to_lowercase(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            daily_capacity,
            timezone,
            jwt: JwtConfig::from_env(),
            billing,
        }
    }

    /// Today's date on the daycare's local calendar.
    pub fn today(&self) -> Date {
        local_date(Utc::now(), self.timezone)
    }
}

/// Calendar date of `now` in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> Date {
    now.with_timezone(&tz).date_naive()
}
