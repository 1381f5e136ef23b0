//! Data models for SoulMap.
//!
//! Moments, their categorical selectors, collections and memberships.

mod collection;
mod moment;

pub use collection::*;
pub use moment::*;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp as stored in the database.
///
/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
