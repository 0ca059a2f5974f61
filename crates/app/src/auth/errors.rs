//! Auth service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid bearer token")]
    InvalidToken,

    #[error("bearer token has expired")]
    Expired,

    #[error("token lifetime is out of range")]
    InvalidTtl,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
