/// PostgreSQL connection pool
///
/// Sessions are request-scoped: handlers borrow a connection from the
/// pool for each query and sqlx returns it on every exit path, normal or
/// not. Nothing else in the process holds a long-lived connection.
///
/// # Example
///
/// ```no_run
/// use curricula_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL").unwrap(),
///     ..Default::default()
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum pool size
    pub max_connections: u32,

    /// Idle connections kept warm
    pub min_connections: u32,

    /// Seconds to wait for a free connection before failing the request
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_seconds: 30,
        }
    }
}

/// Creates the pool and verifies connectivity with a ping.
///
/// # Errors
///
/// Returns an error when the URL is invalid, the database is unreachable,
/// or the ping fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect(&config.url)
        .await?;

    ping(&pool).await?;

    info!("database connection pool ready");
    Ok(pool)
}

/// Round-trips a trivial query to confirm the database responds.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("pinging database");
    let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Closes the pool, waiting for borrowed connections to be returned.
pub async fn close_pool(pool: PgPool) {
    info!("closing database connection pool");
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_seconds, 30);
        assert!(config.url.is_empty());
    }
}
