//! Configuration management for SoulMap.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) covering the HTTP server, the SQLite database and the image
//! generation provider.

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub images: ImageProviderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body cap. Moments carry their image inline, so this is far
    /// above axum's 2 MiB default.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Image generation provider settings.
#[derive(Debug, Clone)]
pub struct ImageProviderConfig {
    /// Bearer credential. `None` keeps the server up but fails every
    /// generation request with a configuration error.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub timeout: Option<Duration>,
}

impl Default for ImageProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "hd".to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = ImageProviderConfig::default();

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_or("PORT", "3000").parse().unwrap_or(3000),
                max_body_bytes: env_or("MAX_BODY_BYTES", "26214400")
                    .parse()
                    .unwrap_or(25 * 1024 * 1024), // 25MB
            },
            database: DatabaseConfig {
                path: env_or("DATABASE_PATH", "./data/soulmap.db"),
            },
            images: ImageProviderConfig {
                api_key: env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                base_url: env_or("IMAGE_API_BASE_URL", &defaults.base_url)
                    .trim_end_matches('/')
                    .to_string(),
                model: env_or("IMAGE_MODEL", &defaults.model),
                size: env_or("IMAGE_SIZE", &defaults.size),
                quality: env_or("IMAGE_QUALITY", &defaults.quality),
                timeout: env::var("IMAGE_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|secs| secs.parse().ok())
                    .map(Duration::from_secs),
            },
            logging: LoggingConfig {
                format: env_or("LOG_FORMAT", "pretty")
                    .parse()
                    .unwrap_or(LogFormat::Pretty),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
