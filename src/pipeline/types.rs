//! Pipeline inputs, variants, and results

use serde::Serialize;

use crate::analysis::{AnalysisRecord, LlmBackend, PromptTemplate};
use crate::ocr::OcrBackend;

/// Which pipeline shape a request runs through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineVariant {
    /// OCR -> analysis
    Standard,
    /// OCR -> machine translation -> enhancement
    Integrated,
}

impl PipelineVariant {
    pub fn template(&self) -> PromptTemplate {
        match self {
            Self::Standard => PromptTemplate::Analysis,
            Self::Integrated => PromptTemplate::Enhancement,
        }
    }

    pub fn translates(&self) -> bool {
        matches!(self, Self::Integrated)
    }

    pub fn processing_method(&self) -> &'static str {
        match self {
            Self::Standard => "ocr + llm_analysis",
            Self::Integrated => "google_translate + claude_enhancement",
        }
    }
}

/// Input for the standard pipeline
#[derive(Debug, Clone)]
pub struct ProcessInput {
    pub image: Option<String>,
    /// Defaults to `google`
    pub ocr_service: Option<String>,
    /// Defaults to `claude`
    pub llm_service: Option<String>,
    /// Vision key supplied by the caller
    pub ocr_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicesUsed {
    pub ocr: String,
    pub llm: String,
}

impl ServicesUsed {
    pub fn new(ocr: OcrBackend, llm: LlmBackend) -> Self {
        Self {
            ocr: ocr.to_string(),
            llm: llm.to_string(),
        }
    }
}

/// Result of the standard pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub extracted_text: String,
    pub analysis: AnalysisRecord,
    pub services_used: ServicesUsed,
}

/// Result of the integrated image pipeline
#[derive(Debug, Clone, Serialize)]
pub struct IntegratedResult {
    pub japanese_text: String,
    pub google_translation: String,
    pub enhanced_analysis: AnalysisRecord,
    pub processing_method: String,
}

/// Result of enhancing text the caller already has
#[derive(Debug, Clone, Serialize)]
pub struct EnhancementResult {
    pub japanese_text: String,
    pub google_translation: String,
    pub enhanced_analysis: AnalysisRecord,
}
