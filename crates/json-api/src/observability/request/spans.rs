//! Route templates for span names and metric labels.

/// Label for paths no route serves.
pub(super) const UNMATCHED_ROUTE: &str = "unmatched";

/// Map a request path onto one of the served route templates.
///
/// Labels come from a fixed set so arbitrary paths cannot create new metric
/// series.
pub(super) fn route_template(path: &str) -> &'static str {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

    match segments.as_slice() {
        [] => "/",
        ["healthcheck"] => "/healthcheck",
        ["metrics"] => "/metrics",
        ["orders"] => "/orders",
        ["orders", "count"] => "/orders/count",
        ["orders", _] => "/orders/{id}",
        ["api-doc", "openapi.json"] => "/api-doc/openapi.json",
        ["docs", ..] => "/docs",
        _ => UNMATCHED_ROUTE,
    }
}
