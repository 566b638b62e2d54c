//! Database connection pool management.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DbConfig;
use error::DatabaseError;

/// Type alias for the PostgreSQL connection pool.
pub type DbPool = PgPool;

/// Create a new database connection pool.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, DatabaseError> {
    tracing::info!(
        "Creating database pool: {}:{}/{}",
        config.host,
        config.port,
        config.database
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(config.connect_options())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            DatabaseError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!("Database pool created successfully");
    Ok(pool)
}

/// Create a pool, retrying while the database is still starting up.
///
/// Makes `config.connect_attempts` attempts (at least one), pausing
/// `config.retry_delay()` between them. Each attempt must also answer a ping.
pub async fn connect_with_retry(config: &DbConfig) -> Result<DbPool, DatabaseError> {
    let attempts = config.connect_attempts.max(1);
    let mut last_error = DatabaseError::ConnectionFailed("no attempt made".to_string());

    for attempt in 1..=attempts {
        let result = match create_pool(config).await {
            Ok(pool) => health_check(&pool).await.map(|_| pool),
            Err(e) => Err(e),
        };

        match result {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                tracing::warn!(
                    attempt,
                    attempts,
                    "Database not ready, retrying in {}s: {}",
                    config.retry_delay_secs,
                    e
                );
                last_error = e;
            }
        }

        if attempt < attempts {
            tokio::time::sleep(config.retry_delay()).await;
        }
    }

    tracing::error!("Could not connect to the database after {} attempts", attempts);
    Err(last_error)
}

/// Check if the database connection is healthy.
pub async fn health_check(pool: &DbPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_with_retry_gives_up() {
        // Nothing listens on port 1; every attempt fails fast.
        let config = DbConfig::new("127.0.0.1", 1, "blog", "user", "pass")
            .with_connect_timeout(1)
            .with_retry(2, 0);

        let result = connect_with_retry(&config).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }
}
