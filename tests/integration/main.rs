//! Integration tests for the Hello API.
//!
//! Each test starts the real server on an ephemeral localhost port and talks
//! to it over HTTP.

use std::net::SocketAddr;

use hello_api::api::AppState;
use hello_api::server;
use hello_api::MetricsMode;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::oneshot;

/// A server running in the background; shuts down on drop.
struct TestServer {
    addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start(mode: MetricsMode) -> Self {
        let listener = server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(mode).unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            server::serve(listener, state, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        Self {
            addr,
            _shutdown: tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn counter(&self, client: &reqwest::Client) -> u64 {
        let body = client
            .get(self.url("/metrics"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        body.lines()
            .find_map(|l| l.strip_prefix("hello_api_requests_total "))
            .expect("counter line present")
            .trim()
            .parse()
            .unwrap()
    }
}

#[tokio::test]
async fn concurrent_home_requests_are_all_counted() {
    let server = TestServer::start(MetricsMode::Manual).await;
    let client = reqwest::Client::new();
    const N: usize = 200;

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let client = client.clone();
            let url = server.url("/");
            tokio::spawn(async move { client.get(url).send().await.unwrap().status() })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(server.counter(&client).await, N as u64);
}

#[tokio::test]
async fn home_returns_greeting() {
    let server = TestServer::start(MetricsMode::Manual).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({"message": "Hello from Debo's MicroK8s API!"})
    );
}

#[tokio::test]
async fn health_first_leaves_counter_at_zero() {
    let server = TestServer::start(MetricsMode::Manual).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"status": "healthy"}));

    assert_eq!(server.counter(&client).await, 0);
}

#[tokio::test]
async fn health_is_unaffected_by_history() {
    let server = TestServer::start(MetricsMode::Middleware).await;
    let client = reqwest::Client::new();

    for path in ["/", "/not-a-route", "/metrics", "/"] {
        client.get(server.url(path)).send().await.unwrap();
    }

    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), r#"{"status":"healthy"}"#);
}

#[tokio::test]
async fn three_home_requests_count_three() {
    for mode in [MetricsMode::Manual, MetricsMode::Middleware] {
        let server = TestServer::start(mode).await;
        let client = reqwest::Client::new();

        for _ in 0..3 {
            client.get(server.url("/")).send().await.unwrap();
        }

        assert_eq!(server.counter(&client).await, 3, "mode {mode}");
    }
}

#[tokio::test]
async fn middleware_mode_exposes_auto_collected_families() {
    let server = TestServer::start(MetricsMode::Middleware).await;
    let client = reqwest::Client::new();

    client.get(server.url("/health")).send().await.unwrap();

    let body = client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("# TYPE hello_api_requests_total counter"));
    assert!(body.contains("http_request_duration_seconds_bucket{"));
    assert!(body.contains(r#"status="200""#));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let server = TestServer::start(MetricsMode::Manual).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/not-a-route")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
