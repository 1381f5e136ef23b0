//! Image generation gateway.
//!
//! Sends the composed prompt to an OpenAI-compatible image endpoint, then
//! downloads the returned image and inlines it as a `data:` URI so callers
//! can persist it without depending on the provider's short-lived URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::prompt::compose_prompt;
use crate::config::ImageProviderConfig;
use crate::error::{Error, Result};

/// MIME type used when the download does not name an image type.
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Fallback message when the provider's error body has none.
const PROVIDER_FAILURE_MESSAGE: &str = "Image provider request failed";

/// Validated generation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub description: String,
    pub moment_type: String,
    pub cinematic_style: String,
}

/// Provider response for `POST /images/generations`.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// Gateway to the external image provider.
#[derive(Clone)]
pub struct ImageGateway {
    client: Client,
    config: ImageProviderConfig,
}

impl ImageGateway {
    /// Create a gateway. The credential is checked per request, not here.
    pub fn new(config: ImageProviderConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Whether a provider credential is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Generate an image and return it as a `data:` URI.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::Configuration("Image provider API key not configured".to_string())
        })?;

        let prompt = compose_prompt(
            &request.description,
            &request.moment_type,
            &request.cinematic_style,
        );

        let image_url = self.request_image(api_key, &prompt).await?;
        self.download_as_data_uri(&image_url).await
    }

    /// Ask the provider for one image and return its URL.
    async fn request_image(&self, api_key: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/images/generations", self.config.base_url);

        debug!(
            model = %self.config.model,
            size = %self.config.size,
            quality = %self.config.quality,
            "Requesting image generation"
        );

        let body = json!({
            "model": self.config.model,
            "prompt": prompt,
            "n": 1,
            "size": self.config.size,
            "quality": self.config.quality,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or_else(|| PROVIDER_FAILURE_MESSAGE.to_string());

            info!(status = status.as_u16(), "Image provider rejected request: {}", message);

            return Err(Error::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ImagesResponse = serde_json::from_str(&text)?;
        parsed
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or(Error::MissingImage)
    }

    /// Fetch the generated image and inline it.
    async fn download_as_data_uri(&self, image_url: &str) -> Result<String> {
        let response = self.client.get(image_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Internal(format!(
                "Failed to download generated image: {}",
                status
            )));
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(image_mime)
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), mime = %mime, "Downloaded generated image");

        Ok(to_data_uri(&mime, &bytes))
    }
}

/// Bare MIME type from a `Content-Type` value, if it names an image.
fn image_mime(content_type: &str) -> Option<&str> {
    let mime = content_type.split(';').next()?.trim();
    mime.starts_with("image/").then_some(mime)
}

/// Encode bytes as a base64 `data:` URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
