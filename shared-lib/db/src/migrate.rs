//! Schema migration from a SQL script.

use std::path::Path;

use error::DatabaseError;

use crate::pool::DbPool;

/// Execute a (possibly multi-statement) SQL script.
pub async fn run_migration(pool: &DbPool, script: &str) -> Result<(), DatabaseError> {
    sqlx::raw_sql(script).execute(pool).await.map_err(|e| {
        tracing::error!("Migration failed: {}", e);
        DatabaseError::MigrationFailed(e.to_string())
    })?;
    Ok(())
}

/// Read a SQL script from disk and execute it.
pub async fn run_migration_file(pool: &DbPool, path: impl AsRef<Path>) -> Result<(), DatabaseError> {
    let path = path.as_ref();
    tracing::info!("Applying migration {}", path.display());

    let script = tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::error!("Cannot read migration {}: {}", path.display(), e);
        DatabaseError::MigrationFailed(format!("{}: {}", path.display(), e))
    })?;

    run_migration(pool, &script).await?;
    tracing::info!("Migration applied");
    Ok(())
}
