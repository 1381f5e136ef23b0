//! Prompt composition for the image provider.
//!
//! Turns a user's description plus the selected moment type and cinematic
//! style into a single descriptive prompt. Selectors arrive as raw labels;
//! a label outside the lookup tables contributes an empty phrase.

use crate::models::{CinematicStyle, MomentType};

const PREAMBLE: &str = "A cinematic film still, award-winning photography, highly detailed, \
     photorealistic, deeply emotional atmosphere.";

const QUALITY_CLAUSE: &str = "Composed with expert cinematography, striking color grading, \
     professional lighting, 8K resolution, compelling artistic composition.";

const EXCLUSION_CLAUSE: &str = "No text, no watermarks.";

impl MomentType {
    /// Phrase describing the nature of the moment.
    pub fn prompt_phrase(&self) -> &'static str {
        match self {
            Self::Memory => {
                "a captured personal memory, a lived moment from the past, \
                 emotional resonance of lived experience"
            }
            Self::FutureGoal => {
                "an aspirational future vision, a dream realized, hopeful \
                 forward-looking optimism, possibility made tangible"
            }
            Self::AlternateLife => {
                "a parallel universe divergent path, an alternate timeline \
                 what-if scenario, roads not taken made visible"
            }
        }
    }
}

impl CinematicStyle {
    /// Phrase describing the visual treatment.
    pub fn prompt_phrase(&self) -> &'static str {
        match self {
            Self::Dramatic => {
                "dramatic lighting, high contrast shadows, intense atmosphere, \
                 cinematic tension, dark storm clouds, chiaroscuro lighting, \
                 powerful emotional weight"
            }
            Self::Dreamy => {
                "soft ethereal bokeh, pastel dreamlike hues, magical floating \
                 particles, gentle diffused light, otherworldly mist, enchanted \
                 atmosphere, fairytale quality"
            }
            Self::Nostalgic => {
                "warm sepia-tinged tones, vintage film grain texture, softly \
                 faded edges, golden hour amber light, timeless analog \
                 photography feel, hazy memory quality"
            }
            Self::Epic => {
                "sweeping wide-angle vista, majestic heroic scale, breathtaking \
                 grandeur, dramatic golden clouds, awe-inspiring panorama, \
                 cinematic scope, legendary framing"
            }
            Self::Intimate => {
                "close intimate framing, warm candlelight glow, soft gentle \
                 shadows, quiet personal moment, shallow depth of field, tender \
                 emotional warmth"
            }
        }
    }
}

/// Phrase for a moment type label, empty when the label is unknown.
pub fn type_phrase(label: &str) -> &'static str {
    MomentType::from_label(label)
        .map(|t| t.prompt_phrase())
        .unwrap_or("")
}

/// Phrase for a cinematic style label, empty when the label is unknown.
pub fn style_phrase(label: &str) -> &'static str {
    CinematicStyle::from_label(label)
        .map(|s| s.prompt_phrase())
        .unwrap_or("")
}

/// Build the enhanced prompt. The description is embedded verbatim.
pub fn compose_prompt(description: &str, moment_type: &str, cinematic_style: &str) -> String {
    format!(
        "{} Scene: {}. This is {}. Visual style: {}. {} {}",
        PREAMBLE,
        description,
        type_phrase(moment_type),
        style_phrase(cinematic_style),
        QUALITY_CLAUSE,
        EXCLUSION_CLAUSE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_exact_template() {
        let prompt = compose_prompt("my graduation day", "Memory", "Nostalgic");
        assert_eq!(
            prompt,
            "A cinematic film still, award-winning photography, highly detailed, photorealistic, \
             deeply emotional atmosphere. Scene: my graduation day. This is a captured personal \
             memory, a lived moment from the past, emotional resonance of lived experience. \
             Visual style: warm sepia-tinged tones, vintage film grain texture, softly faded \
             edges, golden hour amber light, timeless analog photography feel, hazy memory \
             quality. Composed with expert cinematography, striking color grading, professional \
             lighting, 8K resolution, compelling artistic composition. No text, no watermarks."
        );
    }

    #[rstest]
    fn test_every_pair_embeds_all_parts(
        #[values(MomentType::Memory, MomentType::FutureGoal, MomentType::AlternateLife)]
        moment_type: MomentType,
        #[values(
            CinematicStyle::Dramatic,
            CinematicStyle::Dreamy,
            CinematicStyle::Nostalgic,
            CinematicStyle::Epic,
            CinematicStyle::Intimate
        )]
        style: CinematicStyle,
    ) {
        let description = "a lighthouse at dusk, waves crashing";
        let first = compose_prompt(description, moment_type.as_str(), style.as_str());
        let second = compose_prompt(description, moment_type.as_str(), style.as_str());

        assert_eq!(first, second);
        assert!(first.contains(description));
        assert!(first.contains(moment_type.prompt_phrase()));
        assert!(first.contains(style.prompt_phrase()));
        assert!(first.ends_with("No text, no watermarks."));
    }

    #[rstest]
    #[case("Noir", "Memory")]
    #[case("Dramatic", "Someday")]
    #[case("", "")]
    fn test_unknown_labels_degrade_to_empty(#[case] style: &str, #[case] moment_type: &str) {
        let prompt = compose_prompt("rain on the window", moment_type, style);
        assert!(prompt.contains("Scene: rain on the window."));
        if MomentType::from_label(moment_type).is_none() {
            assert!(prompt.contains("This is . "));
        }
        if CinematicStyle::from_label(style).is_none() {
            assert!(prompt.contains("Visual style: . "));
        }
    }

    #[test]
    fn test_phrase_lookup_is_case_sensitive() {
        assert_eq!(style_phrase("epic"), "");
        assert!(!style_phrase("Epic").is_empty());
        assert_eq!(type_phrase("future goal"), "");
        assert!(!type_phrase("Future Goal").is_empty());
    }
}
