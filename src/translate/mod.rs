//! Machine translation
//!
//! Google Cloud Translation v2 client used by the integrated pipeline.

use async_trait::async_trait;
use serde::Deserialize;

/// Substituted by `text-enhance` when translation is unavailable
pub const TRANSLATION_UNAVAILABLE: &str = "Translation unavailable";

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Translate API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Translate API returned no translations")]
    Empty,

    #[error("Translation failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait TranslatorTrait: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, TranslationError>;
}

/// Google Cloud Translation provider
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslateProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: Option<TranslateData>,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl TranslateResponse {
    fn first_translation(self) -> Option<String> {
        self.data?
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
    }
}

#[async_trait]
impl TranslatorTrait for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let form = [
            ("q", text),
            ("source", source),
            ("target", target),
            ("format", "text"),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                TranslationError::Transport(format!("Failed to call Translate API: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Api { status, body });
        }

        let result: TranslateResponse = response.json().await.map_err(|e| {
            TranslationError::Transport(format!("Failed to parse Translate response: {}", e))
        })?;

        result.first_translation().ok_or(TranslationError::Empty)
    }
}
