//! Create Order Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{CheckoutPayload, OrderResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// Charges the submitted card token, then records the order for the caller.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order charged and created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Payment declined"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway error"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutPayload>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_id_or_401()?;

    let order = state
        .app
        .orders
        .create_order(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
