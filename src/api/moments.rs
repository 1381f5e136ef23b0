//! Moment API endpoints.
//!
//! Routes:
//! - GET /api/moments - List moments, newest first
//! - POST /api/moments - Store a generated moment
//! - GET /api/moments/:id - Get a moment
//! - DELETE /api/moments/:id - Delete a moment and its memberships
//! - GET /api/moments/:id/collections - Collection IDs the moment belongs to
//! - GET /api/moments/:id/collections/:collection_id - Membership of one pair
//! - PUT /api/moments/:id/collections/:collection_id - Set membership

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use crate::db;
use crate::models::{Membership, Moment, NewMoment};
use crate::{AppState, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct SetMembershipRequest {
    pub present: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_moments).post(create_moment))
        .route("/:id", get(get_moment).delete(delete_moment))
        .route("/:id/collections", get(list_moment_collections))
        .route(
            "/:id/collections/:collection_id",
            get(get_membership).put(set_membership),
        )
}

async fn list_moments(State(state): State<AppState>) -> Result<Json<Vec<Moment>>> {
    Ok(Json(db::list_moments(&state.db).await?))
}

async fn create_moment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewMoment>, JsonRejection>,
) -> Result<(StatusCode, Json<Moment>)> {
    let input = json_body(payload)?;
    let moment = db::create_moment(&state.db, input).await?;

    info!(id = %moment.id, moment_type = %moment.moment_type, "Moment created");

    Ok((StatusCode::CREATED, Json(moment)))
}

async fn get_moment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Moment>> {
    Ok(Json(db::get_moment(&state.db, &id).await?))
}

async fn delete_moment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    db::delete_moment(&state.db, &id).await?;
    info!(id = %id, "Moment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_moment_collections(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(
        db::list_collection_ids_for_moment(&state.db, &id).await?,
    ))
}

async fn get_membership(
    State(state): State<AppState>,
    Path((id, collection_id)): Path<(String, String)>,
) -> Result<Json<Membership>> {
    let present = db::is_member(&state.db, &id, &collection_id).await?;
    Ok(Json(Membership {
        moment_id: id,
        collection_id,
        present,
    }))
}

/// Add or remove a moment from a collection.
async fn set_membership(
    State(state): State<AppState>,
    Path((id, collection_id)): Path<(String, String)>,
    payload: std::result::Result<Json<SetMembershipRequest>, JsonRejection>,
) -> Result<Json<Membership>> {
    let request = json_body(payload)?;

    // Both ends must exist; the insert would otherwise fail on the foreign key
    db::get_moment(&state.db, &id).await?;
    db::get_collection(&state.db, &collection_id).await?;

    let membership =
        db::set_membership(&state.db, &id, &collection_id, request.present).await?;
    Ok(Json(membership))
}
