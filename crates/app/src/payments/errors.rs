//! Payment errors.

use thiserror::Error;

/// Errors raised by a payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The gateway refused the charge (insufficient funds, expired card...).
    #[error("payment declined: {message}")]
    Declined {
        code: Option<String>,
        message: String,
    },

    /// The gateway rejected the request itself, e.g. an unknown source token.
    #[error("payment request rejected: {0}")]
    InvalidRequest(String),

    /// The gateway did not accept our credentials.
    #[error("payment gateway rejected credentials")]
    Authentication,

    /// The gateway is rate limiting, failing or did not answer in time.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),

    #[error("payment gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),
}
