//! Storage flags shared by `serve` and `check-db`
//!
//! Every flag falls back to an environment variable, so a `.env` file
//! or container environment configures the service without arguments.

use std::time::Duration;

use clap::{Args, ValueEnum};

use catalog_server::{DatabaseConfig, StorageConfig};

/// Storage backend selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Process-local, lost on restart
    Memory,
    /// PostgreSQL through a bounded pool
    Postgres,
}

/// PostgreSQL connection flags
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Full connection URL; overrides the individual --db-* parts
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    #[arg(long, env = "DB_NAME", default_value = "products")]
    pub db_name: String,

    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Ceiling on pooled connections
    #[arg(
        long,
        env = "DB_POOL_MAX",
        default_value_t = 20,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub db_pool_max: u32,

    /// Idle connections are closed after this many milliseconds
    #[arg(long, env = "DB_IDLE_TIMEOUT_MS", default_value_t = 30_000)]
    pub db_idle_timeout_ms: u64,

    /// How long a request waits for a pooled connection, in milliseconds
    #[arg(long, env = "DB_CONNECTION_TIMEOUT_MS", default_value_t = 2_000)]
    pub db_connection_timeout_ms: u64,
}

impl DatabaseArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            max_connections: self.db_pool_max,
            idle_timeout: Duration::from_millis(self.db_idle_timeout_ms),
            acquire_timeout: Duration::from_millis(self.db_connection_timeout_ms),
        }
    }
}

/// Backend choice plus its settings
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Storage backend
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = Backend::Postgres)]
    pub storage: Backend,

    /// Seed the in-memory store with sample products
    #[arg(long, env = "SEED_SAMPLE_DATA")]
    pub seed: bool,

    /// Create tables and indexes if missing before serving
    #[arg(long, env = "DB_INIT_SCHEMA")]
    pub init_schema: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl StorageArgs {
    pub fn to_config(&self) -> StorageConfig {
        match self.storage {
            Backend::Memory => {
                if self.init_schema {
                    tracing::warn!("--init-schema has no effect with the memory backend");
                }
                StorageConfig::Memory { seed: self.seed }
            }
            Backend::Postgres => {
                if self.seed {
                    tracing::warn!("--seed has no effect with the postgres backend");
                }
                StorageConfig::Postgres {
                    database: self.database.to_config(),
                    init_schema: self.init_schema,
                }
            }
        }
    }
}
