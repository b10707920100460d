//! Configuration management for Urzasight Server

use std::env;
use std::fmt;

/// Google Cloud Vision `images:annotate` endpoint
pub const DEFAULT_VISION_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
/// Google Cloud Translation v2 endpoint
pub const DEFAULT_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";
/// Anthropic Messages API endpoint
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub credentials: Credentials,
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Provider credentials, read once at startup
#[derive(Clone, Default)]
pub struct Credentials {
    /// Google Cloud key (Vision + Translate)
    pub google_api_key: Option<String>,
    /// Anthropic key
    pub anthropic_api_key: Option<String>,
}

impl Credentials {
    pub fn has_google(&self) -> bool {
        self.google_api_key.is_some()
    }

    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Credentials")
            .field("google_api_key", &redact(&self.google_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .finish()
    }
}

/// Upstream vendor endpoints
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub vision_url: String,
    pub translate_url: String,
    pub anthropic_url: String,
    /// Overrides the per-template Claude model when set
    pub anthropic_model: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            credentials: Credentials::default(),
            providers: ProviderConfig {
                vision_url: DEFAULT_VISION_URL.to_string(),
                translate_url: DEFAULT_TRANSLATE_URL.to_string(),
                anthropic_url: DEFAULT_ANTHROPIC_URL.to_string(),
                anthropic_model: None,
            },
        }
    }
}

impl Config {
    /// Build the config from the environment. An unparseable `SERVER_PORT`
    /// falls back to the default port; credentials are always read.
    pub fn from_env() -> Self {
        let port = match parse_port(env::var("SERVER_PORT").ok()) {
            Ok(port) => port,
            Err(e) => {
                tracing::warn!("{}, using port {}", e, DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            credentials: Credentials {
                google_api_key: non_empty_var("GOOGLE_CLOUD_API_KEY"),
                anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            },
            providers: ProviderConfig {
                vision_url: env::var("GOOGLE_VISION_URL")
                    .unwrap_or_else(|_| DEFAULT_VISION_URL.to_string()),
                translate_url: env::var("GOOGLE_TRANSLATE_URL")
                    .unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.to_string()),
                anthropic_url: env::var("ANTHROPIC_URL")
                    .unwrap_or_else(|_| DEFAULT_ANTHROPIC_URL.to_string()),
                anthropic_model: non_empty_var("ANTHROPIC_MODEL"),
            },
        }
    }
}

fn parse_port(value: Option<String>) -> Result<u16, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value,
            }),
        None => Ok(DEFAULT_PORT),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
