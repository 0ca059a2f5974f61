//! Order Count Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, params},
    state::State,
};

/// Order Count Handler
///
/// Counts orders matching the same filters as the index. Paging is ignored.
#[endpoint(
    tags("orders"),
    summary = "Count Orders",
    security(("bearer_auth" = [])),
    parameters(
        ("user" = Option<String>, Query, description = "Only orders owned by this user"),
        ("city" = Option<String>, Query, description = "Only orders shipped to this city"),
        ("postalCode" = Option<String>, Query, description = "Only orders shipped to this postal code"),
    ),
    responses(
        (status_code = StatusCode::OK, description = "Number of matching orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<u64>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let query = params::order_query(req)?;

    let count = state
        .app
        .orders
        .count_orders(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(count))
}
