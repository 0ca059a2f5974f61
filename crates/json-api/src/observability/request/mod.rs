//! Request-level logging, request IDs, and parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, field, info, info_span, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Wraps every request in a span, tags it with a request id and records
/// its outcome in the logs and the HTTP metrics.
#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;

        return;
    }

    let started = Instant::now();
    let _in_flight = metrics::InFlightRequestGuard::track();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let route = spans::route_template(req.uri().path());

    let span = info_span!(
        parent: None,
        "http.request",
        otel.name = %format!("{method} {route}"),
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        route = %route,
        remote_addr = %req.remote_addr(),
        status = field::Empty,
        duration_ms = field::Empty
    );

    if settings::parent_propagation_enabled()
        && let Some(parent) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);
    let duration_ms = elapsed.as_millis();
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    metrics::observe_request(&method, route, status.as_u16(), elapsed.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        if status.is_server_error() {
            error!(status = status.as_u16(), duration_ms, "request failed");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), duration_ms, "request rejected");
        } else {
            info!(status = status.as_u16(), duration_ms, "request completed");
        }

        if duration_ms > threshold_ms {
            warn!(duration_ms, threshold_ms, "slow request");
        }
    });
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn teapot(res: &mut Response) {
        res.status_code(StatusCode::IM_A_TEAPOT);
    }

    fn service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("brew").get(teapot))
                .push(Router::with_path("metrics").get(metrics::metrics_handler)),
        )
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let res = TestClient::get("http://example.com/brew")
            .add_header(request_ids::REQUEST_ID_HEADER, "req-42", true)
            .send(&service())
            .await;

        let echoed = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::IM_A_TEAPOT));
        assert_eq!(echoed, Some("req-42"));
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() {
        let res = TestClient::get("http://example.com/brew")
            .send(&service())
            .await;

        assert!(
            res.headers().contains_key(request_ids::REQUEST_ID_HEADER),
            "expected a generated request id header"
        );
    }

    #[tokio::test]
    async fn unknown_paths_share_one_metric_label() -> TestResult {
        let service = service();

        for path in ["/orders/aaaa", "/orders/bbbb", "/nope-1", "/nope-2"] {
            TestClient::get(format!("http://example.com{path}"))
                .send(&service)
                .await;
        }

        let body = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        assert!(!body.contains("/orders/aaaa"), "raw order path leaked into labels");
        assert!(!body.contains("/nope-1"), "raw unknown path leaked into labels");
        assert!(
            body.contains(r#"route="unmatched""#),
            "expected unknown paths under the unmatched label"
        );

        Ok(())
    }
}
