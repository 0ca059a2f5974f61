//! Update Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{OrderResponse, UpdateOrderPayload},
        params,
    },
    state::State,
};

/// Update Order Handler
///
/// Changes shipping details or line items. Amount, owner and charge are
/// fixed once the order is paid. The id is checked before the body is read.
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    security(("bearer_auth" = [])),
    request_body = UpdateOrderPayload,
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(id, req, depot),
    fields(order = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = params::order_id(&id.into_inner())?;
    let update = req
        .parse_json::<UpdateOrderPayload>()
        .await
        .or_400("invalid order update")?;

    tracing::Span::current().record("order", tracing::field::display(order));

    let order = state
        .app
        .orders
        .update_order(order, update.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use brewhouse_app::domain::orders::{
        MockOrdersService, OrdersServiceError, ValidationError, data::OrderUpdate,
        records::OrderId,
    };

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{id}").put(handler))
    }

    #[tokio::test]
    async fn test_update_order_success() -> TestResult {
        let id = OrderId::generate();

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order()
            .once()
            .withf(move |order, update| {
                *order == id
                    && *update
                        == OrderUpdate {
                            city: Some("Salem".to_string()),
                            postal_code: Some("97301".to_string()),
                            ..OrderUpdate::default()
                        }
            })
            .return_once(move |_, _| {
                let mut order = make_order(id);

                order.city = "Salem".to_string();
                order.postal_code = "97301".to_string();

                Ok(order)
            });

        let mut res = TestClient::put(format!("http://example.com/orders/{id}"))
            .json(&json!({ "city": "Salem", "postalCode": "97301" }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.city, "Salem");
        assert_eq!(body.postal_code, "97301");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_empty_body_returns_400() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Validation(ValidationError::EmptyUpdate)));

        let res = TestClient::put(format!("http://example.com/orders/{}", OrderId::generate()))
            .json(&json!({}))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_update_missing_order_returns_404() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/orders/{}", OrderId::generate()))
            .json(&json!({ "address": "2 Malt Street" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_malformed_id_with_bad_body_returns_404() {
        let mut orders = MockOrdersService::new();

        orders.expect_update_order().never();

        let res = TestClient::put("http://example.com/orders/not-an-order")
            .raw_json("{ not json")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_bad_body_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_update_order().never();

        let res = TestClient::put(format!("http://example.com/orders/{}", OrderId::generate()))
            .raw_json("{ not json")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_update_malformed_id_returns_404() {
        let mut orders = MockOrdersService::new();

        orders.expect_update_order().never();

        let res = TestClient::put("http://example.com/orders/1234")
            .json(&json!({ "address": "2 Malt Street" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
