//! HTTP request metrics middleware

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Label used for requests that matched no route (404s on arbitrary URLs).
const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template of the request, e.g. `/service-orders/{id}/photos`.
///
/// Concrete ids never become label values.
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Records `fieldops_http_requests_total` (labels `method`, `path`, `status`)
/// and `fieldops_http_request_duration_seconds` (labels `method`, `path`).
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = route_label(&request);

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!("fieldops_http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("fieldops_http_request_duration_seconds", "method" => method, "path" => path)
        .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/service-orders/{id}",
                get(|request: Request<Body>| async move { route_label(&request) }),
            )
            .layer(axum::middleware::from_fn(http_metrics_middleware))
    }

    #[tokio::test]
    async fn label_is_the_route_template() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/service-orders/so-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"/service-orders/{id}");
    }

    #[test]
    fn unrouted_requests_share_one_label() {
        let request = Request::builder()
            .uri("/no/such/thing")
            .body(Body::empty())
            .unwrap();
        assert_eq!(route_label(&request), UNMATCHED_ROUTE);
    }
}
