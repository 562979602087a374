//! Listener binding and the serve loop.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::api::{create_router, AppState};
use crate::error::{Result, ServiceError};

/// How often histogram buffers are drained between scrapes.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Bind the HTTP listener. Failure here is fatal for the service.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|source| {
        error!("Failed to bind {}: {}", addr, source);
        ServiceError::Bind { addr, source }
    })
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(mode = %state.mode(), "HTTP server listening on {}", addr);

    let upkeep = spawn_upkeep(&state);
    let router = create_router(state);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;

    upkeep.abort();
    info!("HTTP server stopped");
    result.map_err(ServiceError::from)
}

/// Periodically drain histogram buffers so memory stays bounded.
fn spawn_upkeep(state: &AppState) -> JoinHandle<()> {
    let handle = state.metrics.handle();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            handle.run_upkeep();
            debug!("Metrics upkeep done");
        }
    })
}
