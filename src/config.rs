//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;
use strum::{Display, EnumString};

/// Environment variable prefix for every configuration key.
pub const ENV_PREFIX: &str = "HELLO_API_";

/// How the `/metrics` route is provided.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MetricsMode {
    /// Explicit `/metrics` route exposing only the request counter.
    #[default]
    Manual,
    /// Instrumentation layer around every route; it registers `/metrics` itself.
    Middleware,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bind address (IPv4 or IPv6 literal).
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Which metrics exposition mechanism to use.
    #[serde(default)]
    pub metrics_mode: MetricsMode,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_mode: MetricsMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(format!(
                "{ENV_PREFIX}HOST must be an IP address, got {:?}",
                self.host
            ));
        }

        if self.port == 0 {
            return Err(format!("{ENV_PREFIX}PORT must be non-zero"));
        }

        Ok(())
    }

    /// Socket address the listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        self.validate()?;
        let ip: IpAddr = self.host.parse().map_err(|e| format!("{e}"))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
