//! App Router

use salvo::Router;

use crate::{auth, orders};

pub fn app_router() -> Router {
    Router::new().hoop(auth::middleware::handler).push(
        Router::with_path("orders")
            .get(orders::index::handler)
            .post(orders::create::handler)
            .push(Router::with_path("count").get(orders::count::handler))
            .push(
                Router::with_path("{id}")
                    .get(orders::get::handler)
                    .put(orders::update::handler)
                    .delete(orders::delete::handler),
            ),
    )
}

#[cfg(test)]
mod tests {
    use brewhouse_app::auth::MockAuthService;
    use salvo::{affix_state::inject, prelude::*, test::TestClient};

    use crate::test_helpers::state_with_auth;

    use super::*;

    #[tokio::test]
    async fn orders_require_a_bearer_token() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let service = Service::new(
            Router::new()
                .hoop(inject(state_with_auth(auth)))
                .push(app_router()),
        );

        for url in [
            "http://example.com/orders",
            "http://example.com/orders/count",
            "http://example.com/orders/5bf9a1c2d3e4f5a6b7c8d9e0",
        ] {
            let res = TestClient::get(url).send(&service).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "expected 401 for {url}"
            );
        }
    }
}
