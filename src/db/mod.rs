//! Database layer for SoulMap.
//!
//! Provides SQLite connection pooling and query modules
//! for moments, collections and memberships.

mod collections;
mod memberships;
mod moments;

// Re-export all query modules
pub use collections::*;
pub use memberships::*;
pub use moments::*;

use crate::Result;
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed. An in-memory database lives only
/// as long as its connection, so `:memory:` gets exactly one connection
/// that is never recycled.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    let in_memory = path == ":memory:" || path.starts_with("sqlite::memory:");

    // Create parent directories if they don't exist
    if !in_memory {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }

    let mut options = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30))
        // Membership rows cascade with their moment
        .foreign_keys(true)
        .pragma("temp_store", "memory");

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .min_connections(1)
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    info!("Initializing database schema");

    apply_schema(pool, include_str!("../../schema.sql")).await?;

    info!("Database schema initialized successfully");

    Ok(())
}

/// Run each `;`-separated statement, naming the one that failed.
async fn apply_schema(pool: &DbPool, schema: &str) -> Result<()> {
    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt)
            .execute(pool)
            .await
            .with_context(|| {
                let head = clean_stmt.lines().next().unwrap_or_default();
                format!("Failed to apply schema statement `{}`", head)
            })?;
    }

    Ok(())
}

/// Health check for the database connection.
pub async fn health_check(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        initialize_schema(&pool).await.unwrap();
        health_check(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_bad_schema_names_statement() {
        let pool = init_pool(":memory:").await.unwrap();
        let err = apply_schema(&pool, "CREATE TABLE ok (id TEXT);\nCREATE TABEL broken (id TEXT);")
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::Other(_)));
        assert!(err.to_string().contains("CREATE TABEL broken"));
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = init_pool(":memory:").await.unwrap();
        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
