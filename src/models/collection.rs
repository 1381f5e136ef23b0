//! Collections and moment membership.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user-named grouping of moments.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

/// Whether a moment belongs to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub moment_id: String,
    pub collection_id: String,
    pub present: bool,
}
