//! Payments Config

use clap::Args;

use brewhouse_app::{
    payments::{Currency, stripe::STRIPE_API_BASE},
    secrets::Secret,
};

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: Secret,

    /// Stripe API base address
    #[arg(long, env = "STRIPE_API_BASE", default_value = STRIPE_API_BASE)]
    pub stripe_api_base: String,

    /// ISO 4217 currency every checkout is charged in
    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "usd")]
    pub payment_currency: Currency,

    /// Timeout for a single gateway request, in seconds
    #[arg(long, env = "PAYMENT_TIMEOUT_SECONDS", default_value_t = 30)]
    pub payment_timeout_seconds: u64,
}
