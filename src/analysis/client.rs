//! LLM providers for structured analysis

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use super::prompt::{AnalysisPrompt, PromptTemplate};
use crate::config::ANTHROPIC_VERSION;

/// LLM backend selected per request via `llm_service`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    Claude,
    Mock,
}

impl LlmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Self::Claude),
            "mock" => Ok(Self::Mock),
            other => Err(format!("Unknown LLM service: {}", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Claude API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No content in Claude response")]
    EmptyReply,

    #[error("Claude request failed: {0}")]
    Transport(String),
}

/// Provider trait for the analysis model
#[async_trait]
pub trait LlmProviderTrait: Send + Sync {
    fn backend(&self) -> LlmBackend;

    /// Send the prompt and return the raw, unparsed reply text
    async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String, AnalysisError>;
}

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl LlmProviderTrait for AnthropicProvider {
    fn backend(&self) -> LlmBackend {
        LlmBackend::Claude
    }

    async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String, AnalysisError> {
        let request = serde_json::json!({
            "model": prompt.model,
            "max_tokens": prompt.max_tokens,
            "messages": [{"role": "user", "content": prompt.text}]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, body });
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Transport(format!("Failed to parse response: {}", e)))?;

        result
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AnalysisError::EmptyReply)
    }
}

/// Canned replies for running without an Anthropic key
pub struct MockLlmProvider;

const MOCK_ANALYSIS_REPLY: &str = r#"{
    "translation": "Hello! How are you?",
    "grammar_breakdown": "こんにちは is a fixed daytime greeting. 元気 (genki) is a na-adjective meaning healthy or energetic. です is the polite copula and か turns the sentence into a question.",
    "cultural_context": "A standard polite greeting between acquaintances; close friends in manga usually drop です for 元気？",
    "vocabulary": [
        {"word": "こんにちは", "reading": "こんにちは", "meaning": "hello, good afternoon", "notes": "Beginner greeting"},
        {"word": "元気", "reading": "げんき", "meaning": "healthy, energetic", "notes": "Common in greetings"}
    ],
    "difficulty_level": "Mock",
    "tone": "Friendly and polite"
}"#;

const MOCK_ENHANCEMENT_REPLY: &str = r#"{
    "improved_translation": "Hello! How are you?",
    "translation_notes": "Google's translation is accurate for this greeting.",
    "grammar_analysis": "こんにちは is a fixed greeting. 元気ですか uses the na-adjective 元気 with the polite copula です and the question particle か.",
    "vocabulary_spotlight": [
        {"word": "元気", "reading": "げんき", "meaning": "healthy, energetic", "usage_note": "Casual speech shortens 元気ですか to 元気？"}
    ],
    "cultural_context": "A standard polite greeting between acquaintances.",
    "learning_tips": "Learn 元気ですか as a set phrase alongside its casual form 元気？",
    "difficulty_assessment": "Mock"
}"#;

#[async_trait]
impl LlmProviderTrait for MockLlmProvider {
    fn backend(&self) -> LlmBackend {
        LlmBackend::Mock
    }

    async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String, AnalysisError> {
        Ok(match prompt.template {
            PromptTemplate::Analysis => MOCK_ANALYSIS_REPLY,
            PromptTemplate::Enhancement => MOCK_ENHANCEMENT_REPLY,
        }
        .to_string())
    }
}
