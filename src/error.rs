//! Unified error types for the service.

use std::net::SocketAddr;

use thiserror::Error;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// Metrics registry could not be built.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error while serving.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
