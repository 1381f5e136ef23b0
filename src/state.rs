//! Application state for SoulMap.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::ImageGateway;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Image provider gateway.
    pub images: Arc<ImageGateway>,
}

impl AppState {
    /// Create a new application state from the global configuration.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        // Initialize database
        let db = crate::db::init_pool(&config.database.path).await?;

        // Initialize database schema
        crate::db::initialize_schema(&db).await?;

        let images = ImageGateway::new(config.images.clone())?;
        if !images.is_configured() {
            tracing::warn!("OPENAI_API_KEY is not set; moment generation will be unavailable");
        }

        Ok(Self::from_parts(db, images))
    }

    /// Assemble state from already-initialized parts.
    pub fn from_parts(db: DbPool, images: ImageGateway) -> Self {
        Self {
            db,
            images: Arc::new(images),
        }
    }
}
