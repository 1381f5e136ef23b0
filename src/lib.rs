//! SoulMap - Visual Timeline
//!
//! Library exports for the server binary, client front-ends and tests.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
