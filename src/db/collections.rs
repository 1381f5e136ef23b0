//! Collection database queries.

use crate::models::{new_id, now_timestamp, Collection};
use crate::{Error, Result};

use super::DbPool;

/// Create a new collection.
pub async fn create_collection(
    pool: &DbPool,
    name: &str,
    description: Option<&str>,
) -> Result<Collection> {
    sqlx::query_as::<_, Collection>(
        r#"
        INSERT INTO collections (id, name, description, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(new_id())
    .bind(name)
    .bind(description.unwrap_or_default())
    .bind(now_timestamp())
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a collection by ID.
pub async fn get_collection(pool: &DbPool, id: &str) -> Result<Collection> {
    sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Collection not found: {}", id)))
}

/// List all collections, newest first.
pub async fn list_collections(pool: &DbPool) -> Result<Vec<Collection>> {
    sqlx::query_as::<_, Collection>(
        "SELECT * FROM collections ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Count all collections.
pub async fn count_collections(pool: &DbPool) -> Result<i64> {
    let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM collections")
        .fetch_one(pool)
        .await?;

    Ok(result.0)
}
