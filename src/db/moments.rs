//! Moment database queries.
//!
//! Moments are immutable once written; the only mutation after insert is
//! deletion, which takes the moment's membership rows with it.

use crate::models::{new_id, now_timestamp, CinematicStyle, Moment, MomentType, NewMoment};
use crate::{Error, Result};
use sqlx::FromRow;

use super::DbPool;

/// Moment row as stored. Tags are kept as a JSON array in a text column.
#[derive(Debug, FromRow)]
struct MomentRow {
    id: String,
    user_description: String,
    moment_type: MomentType,
    cinematic_style: CinematicStyle,
    image_url: String,
    tags: Option<String>,
    created_at: String,
}

impl From<MomentRow> for Moment {
    fn from(row: MomentRow) -> Self {
        Moment {
            id: row.id,
            user_description: row.user_description,
            moment_type: row.moment_type,
            cinematic_style: row.cinematic_style,
            image_url: row.image_url,
            created_at: row.created_at,
            tags: row
                .tags
                .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok()),
        }
    }
}

/// Insert a moment, assigning its id and creation timestamp.
pub async fn create_moment(pool: &DbPool, input: NewMoment) -> Result<Moment> {
    let tags = input.tags.as_ref().map(serde_json::to_string).transpose()?;

    let row = sqlx::query_as::<_, MomentRow>(
        r#"
        INSERT INTO moments (id, user_description, moment_type, cinematic_style, image_url, tags, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_description, moment_type, cinematic_style, image_url, tags, created_at
        "#,
    )
    .bind(new_id())
    .bind(&input.user_description)
    .bind(input.moment_type)
    .bind(input.cinematic_style)
    .bind(&input.image_url)
    .bind(tags)
    .bind(now_timestamp())
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Get a moment by ID.
pub async fn get_moment(pool: &DbPool, id: &str) -> Result<Moment> {
    sqlx::query_as::<_, MomentRow>("SELECT * FROM moments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Moment::from)
        .ok_or_else(|| Error::NotFound(format!("Moment not found: {}", id)))
}

/// List all moments, newest first.
pub async fn list_moments(pool: &DbPool) -> Result<Vec<Moment>> {
    let rows = sqlx::query_as::<_, MomentRow>(
        "SELECT * FROM moments ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Moment::from).collect())
}

/// Delete a moment together with its collection memberships.
pub async fn delete_moment(pool: &DbPool, id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM moment_collections WHERE moment_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM moments WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Moment not found: {}", id)));
    }

    tx.commit().await?;
    Ok(())
}
