//! Order request parameters

use std::{fmt::Display, str::FromStr};

use salvo::prelude::{Request, StatusError};

use brewhouse_app::domain::orders::{data::OrderQuery, records::OrderId};

use crate::extensions::*;

/// Parse an order id from the path. Malformed ids cannot name an order.
pub(crate) fn order_id(raw: &str) -> Result<OrderId, StatusError> {
    raw.parse()
        .map_err(|_ignored| StatusError::not_found().brief("Order not found"))
}

/// The `_q` full-text search term, if any.
pub(crate) fn search_term(req: &Request) -> Option<String> {
    req.query::<String>("_q")
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
}

/// Filters, paging and sort from the query string.
pub(crate) fn order_query(req: &Request) -> Result<OrderQuery, StatusError> {
    Ok(OrderQuery {
        user: parse(req, "user")?,
        city: req.query::<String>("city"),
        postal_code: req.query::<String>("postalCode"),
        limit: parse(req, "_limit")?,
        start: parse(req, "_start")?,
        sort: parse(req, "_sort")?.unwrap_or_default(),
    })
}

fn parse<T>(req: &Request, name: &str) -> Result<Option<T>, StatusError>
where
    T: FromStr,
    T::Err: Display,
{
    req.query::<String>(name)
        .map(|raw| raw.parse::<T>())
        .transpose()
        .or_400(name)
}
