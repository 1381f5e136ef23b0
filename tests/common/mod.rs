//! Common test utilities and helpers.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::json;
use soulmap::api;
use soulmap::config::ImageProviderConfig;
use soulmap::db::{self, DbPool};
use soulmap::services::ImageGateway;
use soulmap::AppState;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// PNG signature; enough to stand in for an image body.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Base64 of `PNG_BYTES`.
pub const PNG_BASE64: &str = "iVBORw0KGgo=";

pub const TEST_API_KEY: &str = "sk-test-key";

/// Set up a fresh in-memory database with the schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to init pool");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

/// Provider settings pointing at a mock server.
pub fn provider_config(base_url: &str) -> ImageProviderConfig {
    ImageProviderConfig {
        api_key: Some(TEST_API_KEY.to_string()),
        base_url: base_url.to_string(),
        ..ImageProviderConfig::default()
    }
}

/// Application state backed by an in-memory database.
///
/// With `None` the image provider has no credential configured.
pub async fn build_test_state(provider: Option<&MockServer>) -> AppState {
    let config = match provider {
        Some(server) => provider_config(&server.uri()),
        None => ImageProviderConfig::default(),
    };
    let images = ImageGateway::new(config).expect("Failed to build gateway");
    AppState::from_parts(setup_test_db().await, images)
}

/// Mock a provider that generates one image and serves it.
pub async fn mount_image_provider(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1_700_000_000,
            "data": [{ "url": format!("{}/files/generated.png", server.uri()) }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/generated.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES.to_vec()))
        .mount(server)
        .await;
}

/// In-process test server for the full router.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(api::app(state, 25 * 1024 * 1024)).expect("Failed to start test server")
}

/// Serve the full router on an ephemeral port and return its base URL.
pub async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    let app = api::app(state, 25 * 1024 * 1024);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}
