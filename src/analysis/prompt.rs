//! Prompt templates for the analysis model

/// Which analysis the model is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Full tutor-style analysis of OCR text
    Analysis,
    /// Educational layer on top of a machine translation
    Enhancement,
}

impl PromptTemplate {
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Analysis => "claude-3-sonnet-20240229",
            Self::Enhancement => "claude-3-5-sonnet-20240620",
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Analysis => 1500,
            Self::Enhancement => 2000,
        }
    }

    /// Render the prompt. `machine_translation` is only used by `Enhancement`.
    pub fn render(&self, japanese_text: &str, machine_translation: Option<&str>) -> String {
        match self {
            Self::Analysis => analysis_prompt(japanese_text),
            Self::Enhancement => {
                enhancement_prompt(japanese_text, machine_translation.unwrap_or(""))
            }
        }
    }
}

/// A fully built request for the analysis model
#[derive(Debug, Clone)]
pub struct AnalysisPrompt {
    pub template: PromptTemplate,
    pub model: String,
    pub max_tokens: u32,
    pub text: String,
}

impl AnalysisPrompt {
    pub fn new(
        template: PromptTemplate,
        japanese_text: &str,
        machine_translation: Option<&str>,
        model_override: Option<&str>,
    ) -> Self {
        Self {
            template,
            model: model_override
                .unwrap_or(template.default_model())
                .to_string(),
            max_tokens: template.max_tokens(),
            text: template.render(japanese_text, machine_translation),
        }
    }
}

fn analysis_prompt(japanese_text: &str) -> String {
    format!(
        r#"You are an expert Japanese language tutor helping someone read manga.

Japanese text extracted from manga: "{japanese_text}"

Please provide a comprehensive analysis in the following JSON format:

{{
    "translation": "Natural English translation that captures the tone and context",
    "grammar_breakdown": "Detailed breakdown of grammar patterns, particles, verb forms, etc. Explain each component clearly for a JLPT N4-N3 level student",
    "cultural_context": "Any cultural references, slang, manga-specific language, or contextual notes that would help understanding",
    "vocabulary": [
        {{
            "word": "Japanese word",
            "reading": "hiragana/katakana reading",
            "meaning": "English meaning",
            "notes": "Any usage notes or difficulty level"
        }}
    ],
    "difficulty_level": "Beginner/Intermediate/Advanced",
    "tone": "Description of the emotional tone or speaking style"
}}

Focus on being educational and helpful for manga readers learning Japanese."#
    )
}

fn enhancement_prompt(japanese_text: &str, machine_translation: &str) -> String {
    format!(
        r#"You are a Japanese language tutor. You have:

ORIGINAL JAPANESE TEXT: "{japanese_text}"
GOOGLE'S TRANSLATION: "{machine_translation}"

Your job is to enhance Google's translation with educational value for manga readers learning Japanese.

Provide analysis in this JSON format:

{{
    "improved_translation": "A more natural/contextual translation if needed, or confirm Google's is good",
    "translation_notes": "Brief explanation of why you kept Google's translation or how you improved it",
    "grammar_analysis": "Detailed breakdown of Japanese grammar patterns, particles, verb forms for JLPT N4-N3 level",
    "vocabulary_spotlight": [
        {{
            "word": "key Japanese word from text",
            "reading": "hiragana reading",
            "meaning": "definition",
            "usage_note": "how it's used in manga/casual speech"
        }}
    ],
    "cultural_context": "Manga-specific language, cultural references, or contextual notes",
    "learning_tips": "Specific tips for remembering or understanding this grammar/vocabulary",
    "difficulty_assessment": "Beginner/Intermediate/Advanced"
}}

Focus on adding educational value that Google Translate doesn't provide. Return only valid JSON."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_text() {
        let prompt = PromptTemplate::Analysis.render("やめろ！", None);
        assert!(prompt.contains(r#""やめろ！""#));
        assert!(prompt.contains(r#""grammar_breakdown""#));
        assert!(!prompt.contains("GOOGLE'S TRANSLATION"));
    }

    #[test]
    fn test_enhancement_prompt_embeds_both_texts() {
        let prompt = PromptTemplate::Enhancement.render("やめろ！", Some("Stop it!"));
        assert!(prompt.contains(r#"ORIGINAL JAPANESE TEXT: "やめろ！""#));
        assert!(prompt.contains(r#"GOOGLE'S TRANSLATION: "Stop it!""#));
        assert!(prompt.contains(r#""vocabulary_spotlight""#));
    }

    #[test]
    fn test_model_override() {
        let prompt = AnalysisPrompt::new(PromptTemplate::Enhancement, "text", None, None);
        assert_eq!(prompt.model, "claude-3-5-sonnet-20240620");
        assert_eq!(prompt.max_tokens, 2000);

        let prompt = AnalysisPrompt::new(
            PromptTemplate::Analysis,
            "text",
            None,
            Some("claude-3-haiku-20240307"),
        );
        assert_eq!(prompt.model, "claude-3-haiku-20240307");
        assert_eq!(prompt.max_tokens, 1500);
    }
}
