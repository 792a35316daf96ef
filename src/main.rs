//! Nimbus Drive: terminal client for the Nimbus cloud file manager.
//!
//! Main entry point that wires all crates together and runs one command.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use nimbus_cli::Cli;
use nimbus_client::{DriveGateway, HttpGateway, MemoryGateway};
use nimbus_core::config::AppConfig;
use nimbus_core::error::AppError;
use nimbus_service::{ServiceContext, Services};
use nimbus_state::{DriveState, persist};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!(kind = %e.kind, "Command failed: {}", e.message);
        nimbus_cli::output::print_error(&e.message);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("NIMBUS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}

/// Initialize tracing/logging
///
/// Logs go to stderr so table and JSON output stay clean on stdout.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Build the client and execute the parsed command
async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    tracing::debug!("Starting Nimbus Drive v{}", env!("CARGO_PKG_VERSION"));

    let kv = persist::open(&config.local)?;
    let gateway: Arc<dyn DriveGateway> = if cli.offline {
        tracing::info!("Offline mode: using an in-process drive");
        Arc::new(MemoryGateway::with_quota(config.limits.default_quota_bytes))
    } else {
        Arc::new(HttpGateway::new(&config.api)?)
    };

    let state = DriveState::hydrate(kv)?;
    let services = Services::new(ServiceContext::new(gateway, state, config.limits.clone()));

    if let Err(e) = services.auth.restore().await {
        tracing::warn!(error = %e, "Could not confirm the stored session");
    }

    cli.execute(&services).await
}
