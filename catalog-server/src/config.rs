//! Service configuration
//!
//! Plain structs; the binary fills them from flags and environment
//! variables.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::db::DatabaseConfig;

/// Default request body cap (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Deployment environment.
///
/// Development exposes failure diagnostics in error envelopes;
/// production suppresses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Whether error envelopes carry the underlying diagnostic.
    pub fn exposes_diagnostics(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{}' (expected development or production)",
                other
            )),
        }
    }
}

/// Which storage backend serves the product repository
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Process-local store, optionally seeded with sample products
    Memory { seed: bool },
    /// PostgreSQL through a bounded pool
    Postgres {
        database: DatabaseConfig,
        init_schema: bool,
    },
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3001)
    pub bind_addr: SocketAddr,

    /// Controls diagnostic detail in error responses
    pub environment: Environment,

    /// Requests with larger bodies are rejected with 413
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            environment: Environment::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
