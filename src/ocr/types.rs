//! OCR Types
//!
//! Service selectors, errors, and the Google Vision wire format.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// OCR backend selected per request via `ocr_service`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrBackend {
    /// Google Cloud Vision TEXT_DETECTION
    #[default]
    Google,
    /// Fixed text, no network call
    Mock,
}

impl OcrBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for OcrBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OcrBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            other => Err(format!("Unknown OCR service: {}", other)),
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// Non-2xx status from the vendor, with the raw body
    #[error("OCR failed: Vision API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Error object reported inside a 2xx response
    #[error("OCR failed: Vision API error: {0}")]
    Provider(String),

    #[error("OCR failed: {0}")]
    Transport(String),
}

/// `images:annotate` response body
#[derive(Debug, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageResponse {
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    /// Kept raw so the vendor payload can be surfaced verbatim
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextAnnotation {
    #[serde(default)]
    pub description: String,
}

impl AnnotateResponse {
    /// The first annotation covers the whole detected block
    pub fn primary_text(self) -> Result<String, OcrError> {
        let Some(first) = self.responses.into_iter().next() else {
            return Ok(String::new());
        };

        if let Some(error) = first.error {
            return Err(OcrError::Provider(error.to_string()));
        }

        Ok(first
            .text_annotations
            .into_iter()
            .next()
            .map(|a| a.description)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("google".parse::<OcrBackend>(), Ok(OcrBackend::Google));
        assert_eq!("mock".parse::<OcrBackend>(), Ok(OcrBackend::Mock));
        assert!("tesseract".parse::<OcrBackend>().is_err());
    }

    #[test]
    fn test_primary_text_takes_first_annotation() {
        let body = serde_json::json!({
            "responses": [{
                "textAnnotations": [
                    {"description": "おはよう\nございます"},
                    {"description": "おはよう"}
                ]
            }]
        });
        let response: AnnotateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.primary_text().unwrap(), "おはよう\nございます");
    }

    #[test]
    fn test_primary_text_empty_when_nothing_detected() {
        let response: AnnotateResponse =
            serde_json::from_value(serde_json::json!({"responses": [{}]})).unwrap();
        assert_eq!(response.primary_text().unwrap(), "");

        let response: AnnotateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(response.primary_text().unwrap(), "");
    }

    #[test]
    fn test_primary_text_surfaces_provider_error() {
        let body = serde_json::json!({
            "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
        });
        let response: AnnotateResponse = serde_json::from_value(body).unwrap();
        match response.primary_text() {
            Err(OcrError::Provider(payload)) => assert!(payload.contains("Bad image data.")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
