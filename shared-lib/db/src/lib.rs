//! Database utilities for the blog backend.
//!
//! This crate provides PostgreSQL connection pool management using sqlx,
//! including the startup retry loop and schema migration.

mod config;
mod migrate;
mod pool;

pub use config::DbConfig;
pub use migrate::{run_migration, run_migration_file};
pub use pool::{connect_with_retry, create_pool, health_check, DbPool};

// Re-export sqlx types for convenience
pub use sqlx::{self, Postgres, Row};
