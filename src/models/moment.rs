//! Moment model and its categorical selectors.
//!
//! A moment is one AI-illustrated timeline entry. Its type and style are
//! closed sets; the labels below are the wire format, the database format
//! and the lookup keys of the prompt composer.

use serde::{Deserialize, Serialize};

// ============================================================================
// Selectors
// ============================================================================

/// What kind of moment the user is describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
pub enum MomentType {
    #[default]
    Memory,
    #[serde(rename = "Future Goal")]
    #[sqlx(rename = "Future Goal")]
    FutureGoal,
    #[serde(rename = "Alternate Life")]
    #[sqlx(rename = "Alternate Life")]
    AlternateLife,
}

impl MomentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "Memory",
            Self::FutureGoal => "Future Goal",
            Self::AlternateLife => "Alternate Life",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Memory" => Some(Self::Memory),
            "Future Goal" => Some(Self::FutureGoal),
            "Alternate Life" => Some(Self::AlternateLife),
            _ => None,
        }
    }

    /// CSS class of the badge shown on cards and in the detail view.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Memory => "badge-memory",
            Self::FutureGoal => "badge-future",
            Self::AlternateLife => "badge-alternate",
        }
    }

    /// All types, in form order.
    pub fn all() -> &'static [Self] {
        &[Self::Memory, Self::FutureGoal, Self::AlternateLife]
    }
}

impl std::fmt::Display for MomentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual treatment applied to the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
pub enum CinematicStyle {
    #[default]
    Dramatic,
    Dreamy,
    Nostalgic,
    Epic,
    Intimate,
}

impl CinematicStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dramatic => "Dramatic",
            Self::Dreamy => "Dreamy",
            Self::Nostalgic => "Nostalgic",
            Self::Epic => "Epic",
            Self::Intimate => "Intimate",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Dramatic" => Some(Self::Dramatic),
            "Dreamy" => Some(Self::Dreamy),
            "Nostalgic" => Some(Self::Nostalgic),
            "Epic" => Some(Self::Epic),
            "Intimate" => Some(Self::Intimate),
            _ => None,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Dramatic => "badge-dramatic",
            Self::Dreamy => "badge-dreamy",
            Self::Nostalgic => "badge-nostalgic",
            Self::Epic => "badge-epic",
            Self::Intimate => "badge-intimate",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Dramatic,
            Self::Dreamy,
            Self::Nostalgic,
            Self::Epic,
            Self::Intimate,
        ]
    }
}

impl std::fmt::Display for CinematicStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A persisted moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    pub id: String,
    pub user_description: String,
    pub moment_type: MomentType,
    pub cinematic_style: CinematicStyle,
    /// Provider URL or inline `data:` URI.
    pub image_url: String,
    /// RFC 3339, UTC, millisecond precision.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Input for creating a moment. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMoment {
    pub user_description: String,
    pub moment_type: MomentType,
    pub cinematic_style: CinematicStyle,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
