//! Bearer token claims, signing and verification.

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use serde::{Deserialize, Serialize};

use crate::{auth::AuthServiceError, domain::users::UserId, secrets::Secret};

/// Claims carried by a storefront bearer token.
///
/// The identity provider puts the user id under `_id`; `id` is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "_id", alias = "id")]
    pub user: String,

    /// Expiry as Unix seconds.
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);

    validation.leeway = 0;

    validation
}

/// Verify an HS256 token and return the user it was issued to.
///
/// # Errors
///
/// Returns [`AuthServiceError::Expired`] for expired tokens and
/// [`AuthServiceError::InvalidToken`] for anything else that fails to verify.
pub fn verify_token(secret: &Secret, token: &str) -> Result<UserId, AuthServiceError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose().as_bytes()),
        &validation(),
    )
    .map_err(|error: JwtError| match error.kind() {
        ErrorKind::ExpiredSignature => AuthServiceError::Expired,
        _ => AuthServiceError::InvalidToken,
    })?;

    data.claims
        .user
        .parse()
        .map_err(|_| AuthServiceError::InvalidToken)
}

/// Sign a token for `user` that expires after `ttl`.
///
/// # Errors
///
/// Returns an error when the expiry overflows or signing fails.
pub fn issue_token(
    secret: &Secret,
    user: UserId,
    now: Timestamp,
    ttl: SignedDuration,
) -> Result<String, AuthServiceError> {
    let expires_at = now
        .checked_add(ttl)
        .map_err(|_| AuthServiceError::InvalidTtl)?;

    let claims = Claims {
        user: user.to_string(),
        exp: expires_at.as_second(),
        iat: Some(now.as_second()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose().as_bytes()),
    )
    .map_err(AuthServiceError::Signing)
}
