//! Auth service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::{AuthServiceError, verify_token},
    domain::users::UserId,
    secrets::Secret,
};

/// Verifies HS256 bearer tokens minted by the identity provider.
#[derive(Debug, Clone)]
pub struct JwtAuthService {
    secret: Secret,
}

impl JwtAuthService {
    #[must_use]
    pub fn new(secret: Secret) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl AuthService for JwtAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserId, AuthServiceError> {
        verify_token(&self.secret, bearer_token)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserId, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::auth::issue_token;

    use super::*;

    #[tokio::test]
    async fn authenticate_bearer_resolves_user() -> TestResult {
        let secret = Secret::new("test-jwt-secret".to_string());
        let user = UserId::generate();
        let token = issue_token(&secret, user, Timestamp::now(), SignedDuration::from_hours(1))?;

        let service = JwtAuthService::new(secret);

        assert_eq!(service.authenticate_bearer(&token).await?, user);

        Ok(())
    }

    #[tokio::test]
    async fn garbage_bearer_is_rejected() {
        let service = JwtAuthService::new(Secret::new("test-jwt-secret".to_string()));

        let result = service.authenticate_bearer("not-a-jwt").await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken, got {result:?}"
        );
    }
}
