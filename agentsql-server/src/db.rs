//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is built
//! exactly once, in `main`/`serve`, and shared through `AppState`; request
//! handlers never construct connections themselves.

use agentsql_core::AlloyDbConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
/// Kept low to match the per-instance connection budget of the hosted runtime.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Errors building the pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("configuration error: {0}")]
    Config(#[from] agentsql_core::ConfigError),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Create a PostgreSQL connection pool from a URL.
///
/// Development/test override; production deployments go through
/// [`create_pool_from_config`].
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with a custom connection limit.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create a pool from typed AlloyDB configuration, dialing the auth proxy.
///
/// Credentials travel through `PgConnectOptions`, never through an
/// interpolated URL.
pub async fn create_pool_from_config(
    config: &AlloyDbConfig,
    max_connections: u32,
) -> Result<PgPool, PoolError> {
    let (host, port) = config.proxy_host_port()?;
    let options = PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    tracing::info!(
        instance = %config.instance_uri(),
        proxy = %config.proxy_addr,
        database = %config.database,
        "connecting AlloyDB pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p agentsql-server

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }
}
