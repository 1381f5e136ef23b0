//! API Routes for SoulMap
//!
//! This module combines all API routes into a single router.
//!
//! Route structure:
//! - /api/generate-moment - Image generation gateway
//! - /api/moments/* - Moment CRUD and membership
//! - /api/collections/* - Collection listing and creation
//! - /health - Health check

mod collections;
mod generate;
mod moments;
pub mod status;

pub use collections::CreateCollectionRequest;
pub use generate::{GenerateMomentRequest, GenerateMomentResponse};
pub use moments::SetMembershipRequest;

use axum::extract::rejection::JsonRejection;
use axum::extract::DefaultBodyLimit;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{AppState, Error, Result};

/// Build the API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generate::routes())
        .nest("/moments", moments::routes())
        .nest("/collections", collections::routes())
}

/// Build the complete application with middleware applied.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Unwrap a JSON body, reporting malformed input as a validation error.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::Validation(rejection.body_text()))
}
