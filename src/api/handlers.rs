//! HTTP API handlers.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use tracing::debug;

use crate::config::MetricsMode;
use crate::metrics::{RequestCounter, ServiceMetrics, EXPOSITION_CONTENT_TYPE};

/// Greeting returned by the home route.
pub const GREETING: &str = "Hello from Debo's MicroK8s API!";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Home route invocation counter.
    pub requests: RequestCounter,
    /// Metrics registry backing `/metrics`.
    pub metrics: ServiceMetrics,
}

impl AppState {
    /// Create new app state with a fresh registry for the given mode.
    pub fn new(mode: MetricsMode) -> crate::Result<Self> {
        let metrics = ServiceMetrics::new(mode)?;
        let requests = metrics.request_counter();
        Ok(Self { requests, metrics })
    }

    /// Metrics mode selected at startup.
    pub fn mode(&self) -> MetricsMode {
        self.metrics.mode()
    }
}

/// Home response.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// Greeting message.
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
}

/// Home handler - counts the request, then greets.
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let total = state.requests.increment();
    debug!(total, "Home request counted");

    Json(HomeResponse { message: GREETING })
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

/// Metrics handler - Prometheus text exposition of the registry.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn responses_serialize_to_expected_json() {
        let home = serde_json::to_string(&HomeResponse { message: GREETING }).unwrap();
        let health = serde_json::to_string(&HealthResponse { status: "healthy" }).unwrap();

        assert_eq!(home, r#"{"message":"Hello from Debo's MicroK8s API!"}"#);
        assert_eq!(health, r#"{"status":"healthy"}"#);
    }

    #[tokio::test]
    async fn home_increments_counter() {
        let state = AppState::new(MetricsMode::Manual).unwrap();

        let _ = home(State(state.clone())).await;
        let _ = home(State(state.clone())).await;

        assert_eq!(state.requests.get(), 2);
    }
}
