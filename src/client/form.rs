//! Moment creation form model.

use crate::models::{CinematicStyle, MomentType};
use crate::services::GenerationRequest;

/// Longest description the form accepts, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Unsubmitted moment: what the user has typed and picked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MomentDraft {
    description: String,
    pub moment_type: MomentType,
    pub cinematic_style: CinematicStyle,
}

impl MomentDraft {
    pub fn new(
        description: &str,
        moment_type: MomentType,
        cinematic_style: CinematicStyle,
    ) -> Self {
        let mut draft = Self {
            description: String::new(),
            moment_type,
            cinematic_style,
        };
        draft.set_description(description);
        draft
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace the description, cutting it at the character limit.
    pub fn set_description(&mut self, text: &str) {
        self.description = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
    }

    pub fn clear_description(&mut self) {
        self.description.clear();
    }

    pub fn char_count(&self) -> usize {
        self.description.chars().count()
    }

    /// A draft can be sent once it has some non-whitespace text.
    pub fn is_submittable(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Gateway request for this draft, with the description trimmed.
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            description: self.description.trim().to_string(),
            moment_type: self.moment_type.as_str().to_string(),
            cinematic_style: self.cinematic_style.as_str().to_string(),
        }
    }
}
