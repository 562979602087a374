//! Request instrumentation layer for the middleware metrics mode.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};

use super::handlers::{metrics, AppState};
use crate::metrics::ServiceMetrics;

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Wrap every route registered so far with request tracking, then register
/// `/metrics`. The scrape route itself is not tracked.
pub fn instrument(router: Router<AppState>, metrics_registry: ServiceMetrics) -> Router<AppState> {
    router
        .layer(middleware::from_fn_with_state(metrics_registry, track_metrics))
        .route("/metrics", get(metrics))
}

/// Record count and latency of one request, labelled by method, route
/// template and response status.
pub async fn track_metrics(
    State(metrics): State<ServiceMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned());

    let response = next.run(req).await;

    metrics.record_http_request(&method, &path, response.status(), start.elapsed());
    response
}
