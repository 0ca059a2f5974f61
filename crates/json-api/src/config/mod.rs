//! Server configuration module

use std::time::Duration;

use clap::Parser;

use brewhouse_app::{context::AppConfig, payments::StripeConfig};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

/// Brewhouse JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "brewhouse-json", about = "Brewhouse JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Bearer token verification settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings handed to the application context.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            database_max_connections: self.database.database_max_connections,
            jwt_secret: self.auth.jwt_secret.clone(),
            stripe: StripeConfig {
                api_base: self.payments.stripe_api_base.clone(),
                secret_key: self.payments.stripe_secret_key.clone(),
                currency: self.payments.payment_currency.clone(),
                timeout: Duration::from_secs(self.payments.payment_timeout_seconds),
            },
        }
    }
}
