//! Business logic services for SoulMap.
//!
//! - `prompt`: builds the enhanced image prompt
//! - `images`: image provider gateway

pub mod images;
pub mod prompt;

pub use images::{to_data_uri, GenerationRequest, ImageGateway};
pub use prompt::compose_prompt;
