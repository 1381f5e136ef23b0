//! Timeline backend over the SoulMap HTTP API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::backend::TimelineBackend;
use crate::api::{
    CreateCollectionRequest, GenerateMomentRequest, GenerateMomentResponse, SetMembershipRequest,
};
use crate::error::{Error, Result};
use crate::models::{Collection, Membership, Moment, NewMoment};
use crate::services::GenerationRequest;

/// Client for a running SoulMap server.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Turn an error response into `Error::Upstream`, keeping its message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    debug!(status = status.as_u16(), "SoulMap API error: {}", message);

    Err(Error::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TimelineBackend for HttpBackend {
    async fn generate_image(&self, request: &GenerationRequest) -> Result<String> {
        let body = GenerateMomentRequest {
            description: Some(request.description.clone()),
            moment_type: Some(request.moment_type.clone()),
            cinematic_style: Some(request.cinematic_style.clone()),
        };

        let response = self
            .client
            .post(self.url("/generate-moment"))
            .json(&body)
            .send()
            .await?;

        let generated: GenerateMomentResponse = check(response).await?.json().await?;
        Ok(generated.image_url)
    }

    async fn insert_moment(&self, moment: NewMoment) -> Result<Moment> {
        let response = self
            .client
            .post(self.url("/moments"))
            .json(&moment)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn list_moments(&self) -> Result<Vec<Moment>> {
        self.get_json("/moments").await
    }

    async fn delete_moment(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/moments/{}", id)))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.get_json("/collections").await
    }

    async fn count_collections(&self) -> Result<i64> {
        let body: Value = self.get_json("/collections/count").await?;
        body["count"]
            .as_i64()
            .ok_or_else(|| Error::Internal("Missing count in response".to_string()))
    }

    async fn create_collection(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Collection> {
        let body = CreateCollectionRequest {
            name: name.to_string(),
            description: description.map(String::from),
        };
        let response = self
            .client
            .post(self.url("/collections"))
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn list_moment_collection_ids(&self, moment_id: &str) -> Result<Vec<String>> {
        self.get_json(&format!("/moments/{}/collections", moment_id))
            .await
    }

    async fn list_collection_moment_ids(&self, collection_id: &str) -> Result<Vec<String>> {
        self.get_json(&format!("/collections/{}/moments", collection_id))
            .await
    }

    async fn is_member(&self, moment_id: &str, collection_id: &str) -> Result<bool> {
        let membership: Membership = self
            .get_json(&format!(
                "/moments/{}/collections/{}",
                moment_id, collection_id
            ))
            .await?;
        Ok(membership.present)
    }

    async fn set_membership(
        &self,
        moment_id: &str,
        collection_id: &str,
        present: bool,
    ) -> Result<Membership> {
        let response = self
            .client
            .put(self.url(&format!(
                "/moments/{}/collections/{}",
                moment_id, collection_id
            )))
            .json(&SetMembershipRequest { present })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}
