//! Analysis records
//!
//! Each prompt template asks the model for its own JSON shape, so there is
//! one concrete struct per template. Every field is always present: values
//! the model omitted or sent as `null` deserialize to empty.

use serde::{Deserialize, Deserializer, Serialize};

use super::prompt::PromptTemplate;

/// Structured educational analysis of a piece of Japanese text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    Standard(StandardAnalysis),
    Enhanced(EnhancedAnalysis),
}

impl AnalysisRecord {
    /// Template whose shape this record follows
    pub fn template(&self) -> PromptTemplate {
        match self {
            Self::Standard(_) => PromptTemplate::Analysis,
            Self::Enhanced(_) => PromptTemplate::Enhancement,
        }
    }

    pub fn difficulty(&self) -> &str {
        match self {
            Self::Standard(a) => &a.difficulty_level,
            Self::Enhanced(a) => &a.difficulty_assessment,
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        match self {
            Self::Standard(a) => a.vocabulary.len(),
            Self::Enhanced(a) => a.vocabulary_spotlight.len(),
        }
    }
}

/// Shape requested by the standard analysis prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub translation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grammar_breakdown: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cultural_context: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vocabulary: Vec<VocabularyEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub difficulty_level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub word: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reading: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meaning: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
}

/// Shape requested by the "improve Google's translation" prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub improved_translation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub translation_notes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grammar_analysis: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vocabulary_spotlight: Vec<SpotlightEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub cultural_context: String,
    #[serde(deserialize_with = "null_as_default")]
    pub learning_tips: String,
    #[serde(deserialize_with = "null_as_default")]
    pub difficulty_assessment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotlightEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub word: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reading: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meaning: String,
    #[serde(deserialize_with = "null_as_default")]
    pub usage_note: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_fields_become_empty() {
        let json = r#"{"translation": "Hi", "tone": null, "vocabulary": [{"word": "やあ"}]}"#;
        let analysis: StandardAnalysis = serde_json::from_str(json).unwrap();

        assert_eq!(analysis.translation, "Hi");
        assert_eq!(analysis.tone, "");
        assert_eq!(analysis.grammar_breakdown, "");
        assert_eq!(analysis.vocabulary.len(), 1);
        assert_eq!(analysis.vocabulary[0].word, "やあ");
        assert_eq!(analysis.vocabulary[0].reading, "");
    }

    #[test]
    fn test_vocabulary_null_is_empty_list() {
        let analysis: EnhancedAnalysis =
            serde_json::from_str(r#"{"vocabulary_spotlight": null}"#).unwrap();
        assert!(analysis.vocabulary_spotlight.is_empty());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result = serde_json::from_str::<StandardAnalysis>(r#"{"vocabulary": "none"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_serializes_without_tag() {
        let record = AnalysisRecord::Standard(StandardAnalysis {
            translation: "Hello".to_string(),
            difficulty_level: "Beginner".to_string(),
            ..Default::default()
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["translation"], "Hello");
        assert_eq!(value["difficulty_level"], "Beginner");
        assert_eq!(value["vocabulary"], serde_json::json!([]));
        assert!(value.get("Standard").is_none());
        assert_eq!(record.template(), PromptTemplate::Analysis);
        assert_eq!(record.difficulty(), "Beginner");
    }
}
