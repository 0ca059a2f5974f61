//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use brewhouse_app::domain::users::UserId;

const USER_ID_DEPOT_KEY: &str = "user_id";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the caller resolved from the bearer token.
    fn insert_user_id(&mut self, user: UserId);

    /// The authenticated caller, or 401 when no auth middleware ran.
    fn user_id_or_401(&self) -> Result<UserId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_id(&mut self, user: UserId) {
        self.insert(USER_ID_DEPOT_KEY, user);
    }

    fn user_id_or_401(&self) -> Result<UserId, StatusError> {
        self.get::<UserId>(USER_ID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn inserted_user_is_returned() -> TestResult {
        let user = UserId::generate();
        let mut depot = Depot::new();

        depot.insert_user_id(user);

        assert_eq!(depot.user_id_or_401()?, user);

        Ok(())
    }

    #[test]
    fn missing_user_is_unauthorized() {
        let result = Depot::new().user_id_or_401();

        assert!(
            matches!(&result, Err(error) if error.code == salvo::http::StatusCode::UNAUTHORIZED),
            "expected 401, got {result:?}"
        );
    }
}
