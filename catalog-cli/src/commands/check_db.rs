//! One diagnostic round-trip against PostgreSQL

use anyhow::{bail, Context, Result};
use clap::Args;

use catalog_server::{open_store, StorageConfig};

use crate::args::DatabaseArgs;

/// Arguments for the check-db command
#[derive(Args, Debug)]
pub struct CheckDbArgs {
    /// Create tables and indexes if missing
    #[arg(long, env = "DB_INIT_SCHEMA")]
    pub init_schema: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Connect once, print what the server reports, exit non-zero on failure.
pub async fn run_check_db(args: CheckDbArgs) -> Result<()> {
    let database = args.database.to_config();
    println!("Checking {}", database.describe());

    let store = open_store(&StorageConfig::Postgres {
        database,
        init_schema: args.init_schema,
    })
    .await
    .context("Failed to open database")?;

    let health = store.health().await;
    store.close().await;
    let health = health.context("storage reported no health")?;

    if !health.connected {
        bail!(
            "Database unreachable: {}",
            health.error.as_deref().unwrap_or("unknown error")
        );
    }

    if let Some(version) = &health.version {
        println!("Connected: {}", version);
    }
    if let Some(time) = health.server_time {
        println!("Server time: {}", time.to_rfc3339());
    }
    if let Some(pool) = health.pool {
        println!(
            "Pool: {} open, {} idle, {} waiting",
            pool.total, pool.idle, pool.waiting
        );
    }
    Ok(())
}
