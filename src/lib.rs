//! Hello API: a minimal greeting service for MicroK8s.
//!
//! Three routes:
//!
//! ```text
//! GET /         -> {"message": "Hello from Debo's MicroK8s API!"}   (counted)
//! GET /health   -> {"status": "healthy"}
//! GET /metrics  -> Prometheus text exposition
//! ```
//!
//! `/metrics` is provided either by an explicit route exposing only the
//! request counter ([`config::MetricsMode::Manual`]) or by an
//! instrumentation layer that also records per-route latency and status
//! codes ([`config::MetricsMode::Middleware`]).
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`metrics`]: Prometheus registry and the request counter
//! - [`api`]: HTTP handlers, routes, and instrumentation layer
//! - [`server`]: Listener binding and serve loop
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;

pub use config::{Config, MetricsMode};
pub use error::{Result, ServiceError};
