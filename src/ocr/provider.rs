//! OCR Providers
//!
//! Defines the provider trait and implementations for the text-detection
//! backends.

use async_trait::async_trait;

use super::types::{AnnotateResponse, OcrBackend, OcrError};
use crate::image::ImagePayload;

/// Text returned by the mock backend regardless of the image
pub const MOCK_OCR_TEXT: &str = "こんにちは！元気ですか？";

/// Upper bound on annotations requested from Vision
const MAX_RESULTS: u32 = 10;

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the backend type
    fn backend(&self) -> OcrBackend;

    /// Detect text in an image, returning the primary block or `""`
    async fn recognize(&self, image: &ImagePayload) -> Result<String, OcrError>;
}

/// Google Cloud Vision provider
pub struct GoogleVisionProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleVisionProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for GoogleVisionProvider {
    fn backend(&self) -> OcrBackend {
        OcrBackend::Google
    }

    async fn recognize(&self, image: &ImagePayload) -> Result<String, OcrError> {
        let request = serde_json::json!({
            "requests": [{
                "image": {"content": image.encoded},
                "features": [{"type": "TEXT_DETECTION", "maxResults": MAX_RESULTS}]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Transport(format!("Failed to call Vision API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api { status, body });
        }

        let result: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Transport(format!("Failed to parse Vision response: {}", e)))?;

        result.primary_text()
    }
}

/// Mock provider for running the pipeline without credentials
pub struct MockOcrProvider;

#[async_trait]
impl OcrProviderTrait for MockOcrProvider {
    fn backend(&self) -> OcrBackend {
        OcrBackend::Mock
    }

    async fn recognize(&self, _image: &ImagePayload) -> Result<String, OcrError> {
        Ok(MOCK_OCR_TEXT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image;

    #[tokio::test]
    async fn test_mock_ignores_image() {
        let provider = MockOcrProvider;
        let a = provider.recognize(&image::decode("AAAA")).await.unwrap();
        let b = provider
            .recognize(&image::decode("data:image/png;base64,////"))
            .await
            .unwrap();
        assert_eq!(a, MOCK_OCR_TEXT);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_vision_transport_error() {
        // Nothing listens on the discard port
        let provider =
            GoogleVisionProvider::new(reqwest::Client::new(), "http://127.0.0.1:9/annotate", "key");
        let result = provider.recognize(&image::decode("AAAA")).await;
        assert!(matches!(result, Err(OcrError::Transport(_))));
    }
}
