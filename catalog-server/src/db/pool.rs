//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and timeouts. The
//! pool connects lazily so the service can start while the database is
//! still unreachable.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Default time an idle connection is kept before eviction.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time a caller waits for a free connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// PostgreSQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; when set, the individual parts are ignored
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    /// Ceiling on concurrently checked-out connections
    pub max_connections: u32,
    /// Idle connections older than this are closed
    pub idle_timeout: Duration,
    /// How long `acquire` waits before failing
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            database: "products".to_string(),
            user: "postgres".to_string(),
            password: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    /// Build connection options from the URL or the individual parts.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url);
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .application_name("catalog-server");
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }

    /// Credential-free description for logs.
    pub fn describe(&self) -> String {
        match &self.url {
            Some(_) => "postgres (DATABASE_URL)".to_string(),
            None => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("target", &self.describe())
            .field("max_connections", &self.max_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish_non_exhaustive()
    }
}

/// Create a PostgreSQL connection pool without connecting.
///
/// # Errors
///
/// Returns an error only if the connection URL cannot be parsed.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::default())?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = config.connect_options()?;
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(Some(config.idle_timeout))
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(options))
}

/// Snapshot of pool occupancy for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Open connections, idle or checked out
    pub total: u32,
    pub idle: usize,
    /// Callers currently blocked in `acquire`
    pub waiting: usize,
}

/// Counts callers waiting for a connection.
///
/// sqlx does not expose its waiter queue, so every acquire goes through
/// this gauge.
#[derive(Debug, Clone, Default)]
pub struct PoolGauge {
    waiting: Arc<AtomicUsize>,
}

impl PoolGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callers currently waiting.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Relaxed)
    }

    /// Acquire a connection, counted as waiting until it resolves.
    ///
    /// The returned connection goes back to the pool when dropped.
    pub async fn acquire(&self, pool: &PgPool) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        let _waiting = WaitGuard::enter(&self.waiting);
        pool.acquire().await
    }

    /// Current pool occupancy.
    pub fn stats(&self, pool: &PgPool) -> PoolStats {
        PoolStats {
            total: pool.size(),
            idle: pool.num_idle(),
            waiting: self.waiting(),
        }
    }
}

/// Decrements the waiting count on drop, including when the acquiring
/// future is cancelled.
struct WaitGuard<'a>(&'a AtomicUsize);

impl<'a> WaitGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}
