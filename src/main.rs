//! Hello API entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hello_api::api::AppState;
use hello_api::config::{Config, MetricsMode};
use hello_api::server;
use hello_api::utils::shutdown_signal;

/// Minimal greeting service with health and Prometheus metrics endpoints.
#[derive(Parser, Debug)]
#[command(name = "hello-api")]
#[command(about = "Hello API with health and Prometheus metrics endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    overrides: Overrides,
}

/// CLI overrides applied on top of the environment configuration.
#[derive(clap::Args, Debug, Clone, Default)]
struct Overrides {
    /// Bind address.
    #[arg(long, global = true)]
    host: Option<String>,

    /// HTTP server port.
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// How `/metrics` is provided.
    #[arg(long, value_enum, global = true)]
    metrics_mode: Option<MetricsMode>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Run,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration before logging so its level can seed the filter
    let config = Config::load().map(|c| apply_overrides(c, &args.overrides));

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("hello_api=debug,info")
    } else {
        let level = config
            .as_ref()
            .map(|c| c.log_level.clone())
            .unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Run) | None => cmd_run(config).await,
    }
}

fn apply_overrides(mut config: Config, overrides: &Overrides) -> Config {
    if let Some(host) = &overrides.host {
        config.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(mode) = overrides.metrics_mode {
        config.metrics_mode = mode;
    }
    config
}

/// Check configuration validity.
fn cmd_check_config(config: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("HELLO API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.bind_addr() {
        Ok(addr) => {
            println!("OK");
            println!("----------------------------------------------------------------------");
            println!("Configuration Summary:");
            println!("  Listen Address: {}", addr);
            println!("  Metrics Mode: {}", config.metrics_mode);
            println!("  Log Level: {}", config.log_level);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP service until shutdown.
async fn cmd_run(config: Result<Config, envy::Error>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(hello_api::ServiceError::InvalidConfig(e).into());
        }
    };

    info!("Configuration loaded successfully");
    info!("Metrics mode: {}", config.metrics_mode);

    let state = AppState::new(config.metrics_mode)?;
    let listener = server::bind(addr).await?;

    server::serve(listener, state, shutdown_signal()).await?;

    Ok(())
}
