//! Backends the timeline store can talk to.
//!
//! The store only needs the gateway and the moment store operations; this
//! trait is the seam between it and wherever those live.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{self, DbPool};
use crate::models::{Collection, Membership, Moment, NewMoment};
use crate::services::{GenerationRequest, ImageGateway};
use crate::{AppState, Result};

#[async_trait]
pub trait TimelineBackend: Send + Sync {
    /// Generate an image and return it as a `data:` URI.
    async fn generate_image(&self, request: &GenerationRequest) -> Result<String>;

    async fn insert_moment(&self, moment: NewMoment) -> Result<Moment>;

    /// All moments, newest first.
    async fn list_moments(&self) -> Result<Vec<Moment>>;

    async fn delete_moment(&self, id: &str) -> Result<()>;

    /// All collections, newest first.
    async fn list_collections(&self) -> Result<Vec<Collection>>;

    async fn count_collections(&self) -> Result<i64>;

    async fn create_collection(&self, name: &str, description: Option<&str>)
        -> Result<Collection>;

    async fn list_moment_collection_ids(&self, moment_id: &str) -> Result<Vec<String>>;

    async fn list_collection_moment_ids(&self, collection_id: &str) -> Result<Vec<String>>;

    async fn is_member(&self, moment_id: &str, collection_id: &str) -> Result<bool>;

    async fn set_membership(
        &self,
        moment_id: &str,
        collection_id: &str,
        present: bool,
    ) -> Result<Membership>;
}

/// In-process backend calling the database and gateway directly.
#[derive(Clone)]
pub struct LocalBackend {
    db: DbPool,
    images: Arc<ImageGateway>,
}

impl LocalBackend {
    pub fn new(db: DbPool, images: Arc<ImageGateway>) -> Self {
        Self { db, images }
    }
}

impl From<&AppState> for LocalBackend {
    fn from(state: &AppState) -> Self {
        Self::new(state.db.clone(), state.images.clone())
    }
}

#[async_trait]
impl TimelineBackend for LocalBackend {
    async fn generate_image(&self, request: &GenerationRequest) -> Result<String> {
        self.images.generate(request).await
    }

    async fn insert_moment(&self, moment: NewMoment) -> Result<Moment> {
        db::create_moment(&self.db, moment).await
    }

    async fn list_moments(&self) -> Result<Vec<Moment>> {
        db::list_moments(&self.db).await
    }

    async fn delete_moment(&self, id: &str) -> Result<()> {
        db::delete_moment(&self.db, id).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        db::list_collections(&self.db).await
    }

    async fn count_collections(&self) -> Result<i64> {
        db::count_collections(&self.db).await
    }

    async fn create_collection(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Collection> {
        db::create_collection(&self.db, name, description).await
    }

    async fn list_moment_collection_ids(&self, moment_id: &str) -> Result<Vec<String>> {
        db::list_collection_ids_for_moment(&self.db, moment_id).await
    }

    async fn list_collection_moment_ids(&self, collection_id: &str) -> Result<Vec<String>> {
        db::list_moment_ids_for_collection(&self.db, collection_id).await
    }

    async fn is_member(&self, moment_id: &str, collection_id: &str) -> Result<bool> {
        db::is_member(&self.db, moment_id, collection_id).await
    }

    async fn set_membership(
        &self,
        moment_id: &str,
        collection_id: &str,
        present: bool,
    ) -> Result<Membership> {
        db::set_membership(&self.db, moment_id, collection_id, present).await
    }
}
