//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, JwtAuthService},
    database::{self, Db},
    domain::orders::{CheckoutOrdersService, OrdersService, PgOrderStore},
    payments::{PaymentError, StripeClient, StripeConfig},
    secrets::Secret,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build payment gateway client")]
    Payments(#[source] PaymentError),

    #[error("{0} must not be empty")]
    MissingSecret(&'static str),
}

/// Everything needed to wire the application services together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: Secret,
    pub stripe: StripeConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a secret is blank, the payment client cannot be
    /// built or establishing a database connection fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        if config.jwt_secret.is_empty() {
            return Err(AppInitError::MissingSecret("JWT_SECRET"));
        }

        if config.stripe.secret_key.is_empty() {
            return Err(AppInitError::MissingSecret("STRIPE_SECRET_KEY"));
        }

        let currency = config.stripe.currency.clone();
        let gateway = StripeClient::new(config.stripe).map_err(AppInitError::Payments)?;

        let pool = database::connect(&config.database_url, config.database_max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let store = PgOrderStore::new(Db::new(pool));

        Ok(Self {
            orders: Arc::new(CheckoutOrdersService::new(
                Arc::new(store),
                Arc::new(gateway),
                currency,
            )),
            auth: Arc::new(JwtAuthService::new(config.jwt_secret)),
        })
    }
}
