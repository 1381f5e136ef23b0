//! Moment generation endpoint.
//!
//! Routes:
//! - POST /api/generate-moment - Compose a prompt, generate an image, return it inline

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use crate::services::GenerationRequest;
use crate::{AppState, Error, Result};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Raw generation request. Every field is optional on the wire so that a
/// missing field is reported as a validation error rather than a parse error.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMomentRequest {
    pub description: Option<String>,
    pub moment_type: Option<String>,
    pub cinematic_style: Option<String>,
}

impl GenerateMomentRequest {
    /// Require all three fields to be present and non-blank.
    pub fn validate(self) -> Result<GenerationRequest> {
        match (
            non_blank(self.description),
            non_blank(self.moment_type),
            non_blank(self.cinematic_style),
        ) {
            (Some(description), Some(moment_type), Some(cinematic_style)) => {
                Ok(GenerationRequest {
                    description: description.trim().to_string(),
                    moment_type,
                    cinematic_style,
                })
            }
            _ => Err(Error::Validation("Missing required fields".to_string())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMomentResponse {
    /// `data:` URI holding the generated image.
    pub image_url: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route("/generate-moment", post(generate_moment))
}

// ============================================================================
// Handlers
// ============================================================================

/// Generate the illustration for a moment.
async fn generate_moment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateMomentRequest>, JsonRejection>,
) -> Result<Json<GenerateMomentResponse>> {
    let request = json_body(payload)?.validate()?;

    info!(
        moment_type = %request.moment_type,
        cinematic_style = %request.cinematic_style,
        "Generating moment image"
    );

    let image_url = state.images.generate(&request).await?;

    Ok(Json(GenerateMomentResponse { image_url }))
}
