//! Order Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse, params},
    state::State,
};

/// Order Index Handler
///
/// Lists orders matching the `user`, `city` and `postalCode` filters. With
/// `_q` the listing becomes a search over address, city and postal code.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    parameters(
        ("_q" = Option<String>, Query, description = "Full-text search term"),
        ("user" = Option<String>, Query, description = "Only orders owned by this user"),
        ("city" = Option<String>, Query, description = "Only orders shipped to this city"),
        ("postalCode" = Option<String>, Query, description = "Only orders shipped to this postal code"),
        ("_limit" = Option<u32>, Query, description = "Page size, at most 1000"),
        ("_start" = Option<u32>, Query, description = "Number of orders to skip"),
        ("_sort" = Option<String>, Query, description = "createdAt:ASC or createdAt:DESC"),
    ),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let query = params::order_query(req)?;

    let orders = match params::search_term(req) {
        Some(term) => state.app.orders.search_orders(term, query).await,
        None => state.app.orders.list_orders(query).await,
    }
    .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
