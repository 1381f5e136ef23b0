//! Collection API endpoints.
//!
//! Routes:
//! - GET /api/collections - List collections, newest first
//! - POST /api/collections - Create a collection
//! - GET /api/collections/count - Number of collections
//! - GET /api/collections/:id/moments - Moment IDs in a collection

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::json_body;
use crate::db;
use crate::models::Collection;
use crate::{AppState, Error, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_collections).post(create_collection))
        .route("/count", get(count_collections))
        .route("/:id/moments", get(list_collection_moments))
}

async fn list_collections(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(db::list_collections(&state.db).await?))
}

async fn create_collection(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Collection>)> {
    let request = json_body(payload)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Collection name is required".to_string()));
    }

    let collection =
        db::create_collection(&state.db, name, request.description.as_deref()).await?;

    tracing::info!(id = %collection.id, name = %collection.name, "Collection created");

    Ok((StatusCode::CREATED, Json(collection)))
}

async fn count_collections(State(state): State<AppState>) -> Result<Json<Value>> {
    let count = db::count_collections(&state.db).await?;
    Ok(Json(json!({ "count": count })))
}

async fn list_collection_moments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(db::list_moment_ids_for_collection(&state.db, &id).await?))
}
