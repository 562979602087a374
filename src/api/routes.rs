//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health, home, metrics, AppState};
use super::middleware::instrument;
use crate::config::MetricsMode;

/// Create the API router. Exactly one mechanism registers `/metrics`,
/// depending on the state's metrics mode.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(home))
        .route("/health", get(health));

    let routes = match state.mode() {
        MetricsMode::Manual => routes.route("/metrics", get(metrics)),
        MetricsMode::Middleware => instrument(routes, state.metrics.clone()),
    };

    routes.layer(TraceLayer::new_for_http()).with_state(state)
}
