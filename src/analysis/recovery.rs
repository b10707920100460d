//! Response recovery
//!
//! The model is told to answer with pure JSON but often wraps it in prose or
//! Markdown fences, or puts raw newlines inside string values. Recovery runs
//! a fixed sequence of stages over the reply:
//!
//! 1. strip code-fence markers
//! 2. slice from the first `{` to the last `}`
//! 3. replace raw `\n` / `\r` with spaces
//! 4. deserialize into the template's record
//!
//! Any stage failure drops to a placeholder record built from the reply text.
//! A failed model call gets its own placeholder that carries the error
//! message. Every path yields a complete [`AnalysisRecord`].

use super::client::AnalysisError;
use super::prompt::PromptTemplate;
use super::record::{AnalysisRecord, EnhancedAnalysis, StandardAnalysis};

/// Prefix of the reply kept by the standard fallback
pub const STANDARD_PREFIX_CHARS: usize = 200;
/// Prefix of the reply kept by the enhanced fallback
pub const ENHANCED_PREFIX_CHARS: usize = 500;

const NOT_STRUCTURED: &str = "Could not parse structured analysis";
const AVAILABLE_NOT_STRUCTURED: &str = "Analysis available but not structured";
const UNKNOWN: &str = "Unknown";

/// Inputs recovery needs besides the reply itself
#[derive(Debug, Clone, Copy)]
pub struct RecoveryContext<'a> {
    pub template: PromptTemplate,
    /// Characters of reply text kept by the unstructured fallback
    pub prefix_chars: usize,
    /// Machine translation shown to the model, if any
    pub machine_translation: Option<&'a str>,
}

impl<'a> RecoveryContext<'a> {
    pub fn new(template: PromptTemplate, machine_translation: Option<&'a str>) -> Self {
        let prefix_chars = match template {
            PromptTemplate::Analysis => STANDARD_PREFIX_CHARS,
            PromptTemplate::Enhancement => ENHANCED_PREFIX_CHARS,
        };
        Self {
            template,
            prefix_chars,
            machine_translation,
        }
    }

    #[cfg(test)]
    fn with_prefix_chars(mut self, prefix_chars: usize) -> Self {
        self.prefix_chars = prefix_chars;
        self
    }
}

/// Why a reply could not be turned into a structured record
#[derive(Debug, thiserror::Error)]
pub enum RecoveryFailure {
    #[error("no JSON object boundaries in reply")]
    NoObject,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Recover a record from a raw model reply. Never fails.
pub fn recover(raw: &str, ctx: &RecoveryContext<'_>) -> AnalysisRecord {
    let stripped = strip_fences(raw);

    match try_structured(&stripped, ctx.template) {
        Ok(record) => {
            tracing::debug!(
                vocabulary = record.vocabulary_len(),
                "Recovered structured analysis"
            );
            record
        }
        Err(e) => {
            tracing::warn!(
                "Falling back to unstructured analysis: {}. Raw response: {}...",
                e,
                prefix(&stripped, STANDARD_PREFIX_CHARS)
            );
            unstructured_fallback(&stripped, ctx)
        }
    }
}

/// Placeholder for a model call that failed outright
pub fn recover_failure(error: &AnalysisError, ctx: &RecoveryContext<'_>) -> AnalysisRecord {
    tracing::warn!("Analysis call failed, using placeholder: {}", error);

    match ctx.template {
        PromptTemplate::Analysis => AnalysisRecord::Standard(StandardAnalysis {
            translation: "Translation analysis failed".to_string(),
            grammar_breakdown: format!("Error analyzing grammar: {}", error),
            cultural_context: "Unable to provide cultural context".to_string(),
            vocabulary: Vec::new(),
            difficulty_level: UNKNOWN.to_string(),
            tone: "Unable to determine tone".to_string(),
        }),
        PromptTemplate::Enhancement => AnalysisRecord::Enhanced(EnhancedAnalysis {
            improved_translation: ctx.machine_translation.unwrap_or_default().to_string(),
            translation_notes: format!("Enhancement failed: {}", error),
            grammar_analysis: "Could not generate grammar analysis".to_string(),
            vocabulary_spotlight: Vec::new(),
            cultural_context: "Could not provide cultural context".to_string(),
            learning_tips: "Try again or check API configuration".to_string(),
            difficulty_assessment: UNKNOWN.to_string(),
        }),
    }
}

fn try_structured(
    text: &str,
    template: PromptTemplate,
) -> Result<AnalysisRecord, RecoveryFailure> {
    let candidate = extract_object(text)?;
    let normalized = normalize_line_breaks(candidate);
    parse_record(&normalized, template)
}

fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Slice from the first `{` through the last `}`, inclusive
fn extract_object(text: &str) -> Result<&str, RecoveryFailure> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(RecoveryFailure::NoObject),
    }
}

fn normalize_line_breaks(candidate: &str) -> String {
    candidate.replace(['\n', '\r'], " ")
}

fn parse_record(
    candidate: &str,
    template: PromptTemplate,
) -> Result<AnalysisRecord, RecoveryFailure> {
    Ok(match template {
        PromptTemplate::Analysis => AnalysisRecord::Standard(serde_json::from_str(candidate)?),
        PromptTemplate::Enhancement => AnalysisRecord::Enhanced(serde_json::from_str(candidate)?),
    })
}

fn unstructured_fallback(text: &str, ctx: &RecoveryContext<'_>) -> AnalysisRecord {
    let excerpt = truncate_with_ellipsis(text, ctx.prefix_chars);

    match ctx.template {
        PromptTemplate::Analysis => AnalysisRecord::Standard(StandardAnalysis {
            translation: excerpt,
            grammar_breakdown: NOT_STRUCTURED.to_string(),
            cultural_context: AVAILABLE_NOT_STRUCTURED.to_string(),
            vocabulary: Vec::new(),
            difficulty_level: UNKNOWN.to_string(),
            tone: UNKNOWN.to_string(),
        }),
        PromptTemplate::Enhancement => AnalysisRecord::Enhanced(EnhancedAnalysis {
            improved_translation: ctx.machine_translation.unwrap_or_default().to_string(),
            translation_notes: NOT_STRUCTURED.to_string(),
            grammar_analysis: excerpt,
            vocabulary_spotlight: Vec::new(),
            cultural_context: AVAILABLE_NOT_STRUCTURED.to_string(),
            learning_tips: "Review the grammar analysis section for insights".to_string(),
            difficulty_assessment: UNKNOWN.to_string(),
        }),
    }
}

/// First `max_chars` characters, on a char boundary
fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let head = prefix(text, max_chars);
    if head.len() < text.len() {
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> RecoveryContext<'static> {
        RecoveryContext::new(PromptTemplate::Analysis, None)
    }

    fn enhanced(translation: &'static str) -> RecoveryContext<'static> {
        RecoveryContext::new(PromptTemplate::Enhancement, Some(translation))
    }

    const VALID_STANDARD: &str = r#"{"translation": "Stop right there!", "grammar_breakdown": "待て is the imperative of 待つ.", "cultural_context": "Typical shounen challenge.", "vocabulary": [{"word": "待つ", "reading": "まつ", "meaning": "to wait", "notes": "Godan verb"}, {"word": "そこ", "reading": "そこ", "meaning": "there", "notes": ""}], "difficulty_level": "Beginner", "tone": "Aggressive"}"#;

    #[test]
    fn test_valid_json_round_trips() {
        let record = recover(VALID_STANDARD, &standard());
        let expected: StandardAnalysis = serde_json::from_str(VALID_STANDARD).unwrap();

        assert_eq!(record, AnalysisRecord::Standard(expected.clone()));
        let AnalysisRecord::Standard(analysis) = record else {
            panic!("expected standard record");
        };
        assert_eq!(analysis.translation, "Stop right there!");
        assert_eq!(analysis.vocabulary[0].word, "待つ");
        assert_eq!(analysis.vocabulary[1].word, "そこ");
    }

    #[test]
    fn test_fenced_json_is_recovered() {
        let raw = format!("```json\n{}\n```", VALID_STANDARD);
        let record = recover(&raw, &standard());
        assert_eq!(record.difficulty(), "Beginner");
        assert_eq!(record.vocabulary_len(), 2);
    }

    #[test]
    fn test_recovery_is_idempotent_on_own_output() {
        let raw = format!(
            "Here is the analysis:\n```json\n{}\n```\nHope it helps!",
            VALID_STANDARD
        );
        let first = recover(&raw, &standard());
        let reserialized = serde_json::to_string_pretty(&first).unwrap();
        let second = recover(&reserialized, &standard());
        assert_eq!(first, second);
    }

    #[test]
    fn test_prose_around_object_is_ignored() {
        let raw = format!("Sure! {} Let me know if you need more.", VALID_STANDARD);
        assert_eq!(recover(&raw, &standard()).difficulty(), "Beginner");
    }

    #[test]
    fn test_raw_newlines_inside_strings_are_normalized() {
        let raw = concat!(
            "{\"improved_translation\": \"Line one\nline two\", ",
            "\"difficulty_assessment\": \"Advanced\"}"
        );
        let record = recover(raw, &enhanced("Google says hi"));

        let AnalysisRecord::Enhanced(analysis) = record else {
            panic!("expected enhanced record");
        };
        assert_eq!(analysis.improved_translation, "Line one line two");
        assert_eq!(analysis.difficulty_assessment, "Advanced");
        // Fields the model left out are present but empty
        assert_eq!(analysis.learning_tips, "");
    }

    #[test]
    fn test_no_braces_gives_placeholder() {
        let raw = "I'm sorry, I can't analyze this text.";
        let record = recover(raw, &standard());

        assert_eq!(
            record,
            AnalysisRecord::Standard(StandardAnalysis {
                translation: raw.to_string(),
                grammar_breakdown: NOT_STRUCTURED.to_string(),
                cultural_context: AVAILABLE_NOT_STRUCTURED.to_string(),
                vocabulary: Vec::new(),
                difficulty_level: "Unknown".to_string(),
                tone: "Unknown".to_string(),
            })
        );
    }

    #[test]
    fn test_reversed_braces_gives_placeholder() {
        let record = recover("} nothing here {", &standard());
        assert_eq!(record.difficulty(), "Unknown");
    }

    #[test]
    fn test_unparsable_object_gives_placeholder() {
        let record = recover(r#"{"translation": "unterminated}"#, &standard());
        assert_eq!(record.difficulty(), "Unknown");
    }

    #[test]
    fn test_standard_fallback_truncates_to_200_chars() {
        let raw = "あ".repeat(250);
        let AnalysisRecord::Standard(analysis) = recover(&raw, &standard()) else {
            panic!("expected standard record");
        };
        assert!(analysis.translation.ends_with("..."));
        assert_eq!(analysis.translation.chars().count(), 203);
    }

    #[test]
    fn test_enhanced_fallback_keeps_machine_translation() {
        let raw = "x".repeat(600);
        let AnalysisRecord::Enhanced(analysis) = recover(&raw, &enhanced("Hello")) else {
            panic!("expected enhanced record");
        };
        assert_eq!(analysis.improved_translation, "Hello");
        assert_eq!(analysis.translation_notes, NOT_STRUCTURED);
        assert_eq!(analysis.grammar_analysis.len(), 503);
        assert_eq!(
            analysis.learning_tips,
            "Review the grammar analysis section for insights"
        );
        assert_eq!(analysis.difficulty_assessment, "Unknown");
    }

    #[test]
    fn test_short_reply_has_no_ellipsis() {
        let AnalysisRecord::Enhanced(analysis) = recover("too short", &enhanced("Hi")) else {
            panic!("expected enhanced record");
        };
        assert_eq!(analysis.grammar_analysis, "too short");
    }

    #[test]
    fn test_custom_prefix_length() {
        let ctx = standard().with_prefix_chars(5);
        let AnalysisRecord::Standard(analysis) = recover("abcdefghij", &ctx) else {
            panic!("expected standard record");
        };
        assert_eq!(analysis.translation, "abcde...");
    }

    #[test]
    fn test_failure_placeholder_carries_error_message() {
        let error = AnalysisError::Api {
            status: 529,
            body: "overloaded".to_string(),
        };

        let AnalysisRecord::Standard(analysis) = recover_failure(&error, &standard()) else {
            panic!("expected standard record");
        };
        assert_eq!(analysis.translation, "Translation analysis failed");
        assert!(analysis.grammar_breakdown.starts_with("Error analyzing grammar: "));
        assert!(analysis.grammar_breakdown.contains("overloaded"));
        assert_eq!(analysis.tone, "Unable to determine tone");

        let record = recover_failure(&error, &enhanced("Hi there"));
        let AnalysisRecord::Enhanced(analysis) = record else {
            panic!("expected enhanced record");
        };
        assert_eq!(analysis.improved_translation, "Hi there");
        assert!(analysis.translation_notes.starts_with("Enhancement failed: "));
        assert_eq!(analysis.difficulty_assessment, "Unknown");
    }

    #[test]
    fn test_fallback_wording_differs_from_failure_wording() {
        let unparsable = recover("no json", &standard());
        let failed = recover_failure(&AnalysisError::EmptyReply, &standard());
        assert_ne!(unparsable, failed);
        assert_eq!(unparsable.template(), failed.template());
    }
}
