//! Moment/collection membership queries.
//!
//! Membership is set, never toggled: callers state whether the pair should
//! exist and the query converges on that, whatever the current row state.

use crate::models::{now_timestamp, Membership};
use crate::{Error, Result};

use super::DbPool;

/// Make the (moment, collection) pair present or absent.
pub async fn set_membership(
    pool: &DbPool,
    moment_id: &str,
    collection_id: &str,
    present: bool,
) -> Result<Membership> {
    if present {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO moment_collections (moment_id, collection_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(moment_id)
        .bind(collection_id)
        .bind(now_timestamp())
        .execute(pool)
        .await?;
    } else {
        sqlx::query("DELETE FROM moment_collections WHERE moment_id = ? AND collection_id = ?")
            .bind(moment_id)
            .bind(collection_id)
            .execute(pool)
            .await?;
    }

    Ok(Membership {
        moment_id: moment_id.to_string(),
        collection_id: collection_id.to_string(),
        present,
    })
}

/// Check if a moment is in a collection.
pub async fn is_member(pool: &DbPool, moment_id: &str, collection_id: &str) -> Result<bool> {
    let result = sqlx::query(
        "SELECT 1 FROM moment_collections WHERE moment_id = ? AND collection_id = ? LIMIT 1",
    )
    .bind(moment_id)
    .bind(collection_id)
    .fetch_optional(pool)
    .await?;

    Ok(result.is_some())
}

/// IDs of the collections a moment belongs to.
pub async fn list_collection_ids_for_moment(pool: &DbPool, moment_id: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT collection_id FROM moment_collections WHERE moment_id = ? ORDER BY created_at",
    )
    .bind(moment_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// IDs of the moments in a collection.
pub async fn list_moment_ids_for_collection(
    pool: &DbPool,
    collection_id: &str,
) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT moment_id FROM moment_collections WHERE collection_id = ? ORDER BY created_at",
    )
    .bind(collection_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}
