//! OCR Module
//!
//! Text detection for uploaded manga pages.
//!
//! Supports two backends:
//! - Google Cloud Vision (`TEXT_DETECTION`, key supplied per request)
//! - Mock (fixed Japanese greeting, no network)

mod provider;
mod types;

pub use provider::{GoogleVisionProvider, MockOcrProvider, OcrProviderTrait, MOCK_OCR_TEXT};
pub use types::{OcrBackend, OcrError};
