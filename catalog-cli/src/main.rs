//! catalog - product catalog service entry point
//!
//! - `serve`: run the HTTP API over the memory or PostgreSQL backend
//! - `check-db`: one diagnostic round-trip against PostgreSQL

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod args;
mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "catalog",
    author,
    version,
    about = "Product catalog HTTP service",
    long_about = "CRUD HTTP API for a product catalog, served from process memory \
                  or from PostgreSQL through a bounded connection pool."
)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Check database connectivity and report server details
    CheckDb(commands::check_db::CheckDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap's env fallbacks see .env values
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .context("Failed to initialise tracing")?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::CheckDb(args) => commands::run_check_db(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
