//! HTTP API module for the greeting, health, and metrics endpoints.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
