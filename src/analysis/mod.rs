//! Structured Japanese analysis
//!
//! Prompts an LLM for an educational breakdown of extracted text and
//! recovers a well-formed [`AnalysisRecord`] from whatever it replies.

mod client;
mod prompt;
mod record;
pub mod recovery;

pub use client::{
    AnalysisError, AnthropicProvider, LlmBackend, LlmProviderTrait, MockLlmProvider,
};
pub use prompt::{AnalysisPrompt, PromptTemplate};
pub use record::{
    AnalysisRecord, EnhancedAnalysis, SpotlightEntry, StandardAnalysis, VocabularyEntry,
};
pub use recovery::{recover, recover_failure, RecoveryContext};
