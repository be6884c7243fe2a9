//! HTTP server command
//!
//! Builds the configured store and runs the product API until a
//! shutdown signal arrives.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Args;

use catalog_server::config::DEFAULT_MAX_BODY_BYTES;
use catalog_server::{open_store, run_server, Environment, ServerConfig};

use crate::args::StorageArgs;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// development exposes failure diagnostics in error responses
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub environment: Environment,

    /// Larger request bodies are rejected with 413
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    #[command(flatten)]
    pub storage: StorageArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let storage = args.storage.to_config();
    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        environment: args.environment,
        max_body_bytes: args.max_body_bytes,
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Starting product service on {}",
        config.bind_addr
    );

    let store = open_store(&storage)
        .await
        .context("Failed to initialise storage")?;

    // Blocks until shutdown; closes the store on the way out
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
