//! Cross-chain funding CLI.
//!
//! This binary looks up balances, generates deposit addresses and on-ramp
//! checkout URLs, reports funding transactions and tracks routing requests
//! until they complete.

mod commands;
mod config;
mod error;

use clap::Parser;
use fundkit_sdk::client::FundKitClient;
use std::process::exit;
use tracing::error;

use config::{CliConfig, EnvConfig};
use error::Error;

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    // Parse environment configuration
    let env_config = match EnvConfig::from_env().map_err(Error::from) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    // Parse CLI arguments
    let cli_config = CliConfig::parse();

    let poll_config = match env_config.poll_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    let base_url = match env_config.base_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    // Set up logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = match FundKitClient::with_base_url(env_config.api_key, base_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create funding API client: {}", e);
            exit(1);
        }
    };

    if let Err(e) = commands::run(cli_config.command, client, poll_config).await {
        error!(%e, "Command failed");
        exit(1);
    }
}
