//! Pipeline orchestration
//!
//! Sequences decode -> OCR -> (translate) -> analysis -> recovery for a
//! single request. Configuration checks run before any provider is called.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::stage::{PipelineRun, Stage};
use super::types::{
    EnhancementResult, IntegratedResult, PipelineVariant, ProcessInput, ProcessingResult,
    ServicesUsed,
};
use crate::analysis::{
    self, AnalysisPrompt, AnalysisRecord, AnthropicProvider, LlmBackend, LlmProviderTrait,
    MockLlmProvider, RecoveryContext,
};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::image;
use crate::ocr::{GoogleVisionProvider, MockOcrProvider, OcrBackend, OcrProviderTrait};
use crate::translate::{GoogleTranslateProvider, TranslatorTrait, TRANSLATION_UNAVAILABLE};

const SOURCE_LANG: &str = "ja";
const TARGET_LANG: &str = "en";

/// Providers resolved for one image run
struct ImageProviders {
    ocr: Box<dyn OcrProviderTrait>,
    translator: Option<Box<dyn TranslatorTrait>>,
    llm: Box<dyn LlmProviderTrait>,
}

/// What an image run produced
struct ImageOutcome {
    text: String,
    translation: Option<String>,
    analysis: AnalysisRecord,
}

/// Runs the OCR and analysis pipeline
pub struct Orchestrator {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl Orchestrator {
    pub fn new(config: Arc<Config>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Standard pipeline: OCR with the selected service, then analysis
    pub async fn process(&self, input: ProcessInput) -> Result<ProcessingResult> {
        let variant = PipelineVariant::Standard;
        let span = pipeline_span(variant);

        async move {
            let mut run = PipelineRun::new();

            let image = require_image(input.image).map_err(|e| run.fail(e))?;

            let ocr_backend = parse_selector::<OcrBackend>(input.ocr_service.as_deref())
                .map_err(|e| run.fail(e))?;
            let llm_backend = parse_selector::<LlmBackend>(input.llm_service.as_deref())
                .map_err(|e| run.fail(e))?;

            let providers = ImageProviders {
                ocr: self
                    .ocr_provider(ocr_backend, input.ocr_api_key.as_deref())
                    .map_err(|e| run.fail(e))?,
                translator: None,
                llm: self.llm_provider(llm_backend).map_err(|e| run.fail(e))?,
            };

            tracing::info!(ocr = %ocr_backend, llm = %llm_backend, "Processing manga page");

            let outcome = self.run_image(&mut run, variant, &image, providers).await?;

            Ok(ProcessingResult {
                extracted_text: outcome.text,
                analysis: outcome.analysis,
                services_used: ServicesUsed::new(ocr_backend, llm_backend),
            })
        }
        .instrument(span)
        .await
    }

    /// Integrated pipeline: Vision OCR, Google translation, Claude enhancement
    pub async fn process_integrated(&self, image: Option<String>) -> Result<IntegratedResult> {
        let variant = PipelineVariant::Integrated;
        let span = pipeline_span(variant);

        async move {
            let mut run = PipelineRun::new();

            let image = require_image(image).map_err(|e| run.fail(e))?;

            let google_key = self
                .config
                .credentials
                .google_api_key
                .as_deref()
                .ok_or_else(|| {
                    run.fail(AppError::Configuration(
                        "Google Cloud API key not configured".to_string(),
                    ))
                })?;

            let providers = ImageProviders {
                ocr: Box::new(GoogleVisionProvider::new(
                    self.client.clone(),
                    &self.config.providers.vision_url,
                    google_key,
                )),
                translator: Some(Box::new(self.translator(google_key))),
                llm: self.llm_provider(LlmBackend::Claude).map_err(|e| run.fail(e))?,
            };

            tracing::info!("Starting integrated processing");

            let outcome = self.run_image(&mut run, variant, &image, providers).await?;

            Ok(IntegratedResult {
                japanese_text: outcome.text,
                google_translation: outcome.translation.unwrap_or_default(),
                enhanced_analysis: outcome.analysis,
                processing_method: variant.processing_method().to_string(),
            })
        }
        .instrument(span)
        .await
    }

    /// Enhance text the caller already extracted.
    ///
    /// A missing translation is fetched; if that fails for any reason the
    /// sentinel "Translation unavailable" is used and the run continues.
    pub async fn enhance_text(
        &self,
        japanese_text: Option<String>,
        google_translation: Option<String>,
    ) -> Result<EnhancementResult> {
        let variant = PipelineVariant::Integrated;
        let span = pipeline_span(variant);

        async move {
            let mut run = PipelineRun::new();

            let japanese_text = japanese_text
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    run.fail(AppError::Validation("No Japanese text provided".to_string()))
                })?;

            let llm = self.llm_provider(LlmBackend::Claude).map_err(|e| run.fail(e))?;

            let google_translation = match google_translation.filter(|t| !t.is_empty()) {
                Some(translation) => translation,
                None => {
                    run.advance(Stage::TranslatePending);
                    self.translate_or_sentinel(&japanese_text).await
                }
            };

            let analysis = self
                .analyze(
                    &mut run,
                    variant,
                    llm.as_ref(),
                    &japanese_text,
                    Some(google_translation.as_str()),
                )
                .await;

            Ok(EnhancementResult {
                japanese_text,
                google_translation,
                enhanced_analysis: analysis,
            })
        }
        .instrument(span)
        .await
    }

    async fn run_image(
        &self,
        run: &mut PipelineRun,
        variant: PipelineVariant,
        raw_image: &str,
        providers: ImageProviders,
    ) -> Result<ImageOutcome> {
        run.advance(Stage::Decoding);
        let payload = image::decode(raw_image);
        tracing::debug!(
            media_type = ?payload.media_type,
            approx_bytes = payload.decoded_len_estimate(),
            "Decoded image payload"
        );

        run.advance(Stage::OcrPending);
        let text = providers
            .ocr
            .recognize(&payload)
            .await
            .map_err(|e| run.fail(e.into()))?;

        if text.trim().is_empty() {
            return Err(run.fail(AppError::NoTextDetected));
        }
        tracing::info!(
            backend = %providers.ocr.backend(),
            "Extracted: {}...",
            preview(&text)
        );

        let translation = match (variant.translates(), providers.translator) {
            (true, Some(translator)) => {
                run.advance(Stage::TranslatePending);
                let translation = translator
                    .translate(&text, SOURCE_LANG, TARGET_LANG)
                    .await
                    .map_err(|e| run.fail(e.into()))?;
                tracing::info!("Google translated: {}...", preview(&translation));
                Some(translation)
            }
            _ => None,
        };

        let analysis = self
            .analyze(run, variant, providers.llm.as_ref(), &text, translation.as_deref())
            .await;

        Ok(ImageOutcome {
            text,
            translation,
            analysis,
        })
    }

    /// Call the model and recover a record. Never fails.
    async fn analyze(
        &self,
        run: &mut PipelineRun,
        variant: PipelineVariant,
        llm: &dyn LlmProviderTrait,
        japanese_text: &str,
        machine_translation: Option<&str>,
    ) -> AnalysisRecord {
        let template = variant.template();
        let prompt = AnalysisPrompt::new(
            template,
            japanese_text,
            machine_translation,
            self.config.providers.anthropic_model.as_deref(),
        );
        let ctx = RecoveryContext::new(template, machine_translation);

        run.advance(Stage::AnalysisPending);
        tracing::debug!(backend = %llm.backend(), model = %prompt.model, "Requesting analysis");
        let reply = llm.complete(&prompt).await;

        run.advance(Stage::Recovering);
        let record = match reply {
            Ok(raw) => analysis::recover(&raw, &ctx),
            Err(e) => analysis::recover_failure(&e, &ctx),
        };

        run.advance(Stage::Done);
        record
    }

    async fn translate_or_sentinel(&self, japanese_text: &str) -> String {
        let Some(key) = self.config.credentials.google_api_key.as_deref() else {
            tracing::warn!("Google Cloud API key not configured, skipping translation");
            return TRANSLATION_UNAVAILABLE.to_string();
        };

        match self
            .translator(key)
            .translate(japanese_text, SOURCE_LANG, TARGET_LANG)
            .await
        {
            Ok(translation) => translation,
            Err(e) => {
                tracing::warn!("Translation failed, continuing without it: {}", e);
                TRANSLATION_UNAVAILABLE.to_string()
            }
        }
    }

    fn ocr_provider(
        &self,
        backend: OcrBackend,
        api_key: Option<&str>,
    ) -> Result<Box<dyn OcrProviderTrait>> {
        match backend {
            OcrBackend::Mock => Ok(Box::new(MockOcrProvider)),
            OcrBackend::Google => {
                let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                    AppError::Configuration("OCR service configuration missing".to_string())
                })?;
                Ok(Box::new(GoogleVisionProvider::new(
                    self.client.clone(),
                    &self.config.providers.vision_url,
                    key,
                )))
            }
        }
    }

    fn llm_provider(&self, backend: LlmBackend) -> Result<Box<dyn LlmProviderTrait>> {
        match backend {
            LlmBackend::Mock => Ok(Box::new(MockLlmProvider)),
            LlmBackend::Claude => {
                let key = self
                    .config
                    .credentials
                    .anthropic_api_key
                    .as_deref()
                    .ok_or_else(|| {
                        AppError::Configuration("LLM service configuration missing".to_string())
                    })?;
                Ok(Box::new(AnthropicProvider::new(
                    self.client.clone(),
                    &self.config.providers.anthropic_url,
                    key,
                )))
            }
        }
    }

    fn translator(&self, api_key: &str) -> GoogleTranslateProvider {
        GoogleTranslateProvider::new(
            self.client.clone(),
            &self.config.providers.translate_url,
            api_key,
        )
    }
}

fn pipeline_span(variant: PipelineVariant) -> tracing::Span {
    tracing::info_span!(
        "pipeline",
        request_id = %Uuid::new_v4(),
        method = variant.processing_method()
    )
}

fn require_image(image: Option<String>) -> Result<String> {
    image
        .filter(|i| !i.is_empty())
        .ok_or_else(|| AppError::Validation("No image data provided".to_string()))
}

/// Parse an optional service selector, falling back to the default backend
fn parse_selector<T>(value: Option<&str>) -> Result<T>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(v) => v.parse().map_err(AppError::Configuration),
    }
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::MOCK_OCR_TEXT;

    fn orchestrator(config: Config) -> Orchestrator {
        Orchestrator::new(Arc::new(config), reqwest::Client::new())
    }

    fn mock_input() -> ProcessInput {
        ProcessInput {
            image: Some("data:image/png;base64,AAAA".to_string()),
            ocr_service: Some("mock".to_string()),
            llm_service: Some("mock".to_string()),
            ocr_api_key: None,
        }
    }

    #[tokio::test]
    async fn test_mock_pipeline() {
        let result = orchestrator(Config::default())
            .process(mock_input())
            .await
            .unwrap();

        assert_eq!(result.extracted_text, MOCK_OCR_TEXT);
        assert_eq!(result.analysis.difficulty(), "Mock");
        assert_eq!(result.services_used.ocr, "mock");
        assert_eq!(result.services_used.llm, "mock");
    }

    #[tokio::test]
    async fn test_missing_image() {
        let input = ProcessInput {
            image: None,
            ..mock_input()
        };
        let result = orchestrator(Config::default()).process(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_services() {
        let input = ProcessInput {
            ocr_service: Some("tesseract".to_string()),
            ..mock_input()
        };
        let result = orchestrator(Config::default()).process(input).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));

        let input = ProcessInput {
            llm_service: Some("gpt".to_string()),
            ..mock_input()
        };
        let result = orchestrator(Config::default()).process(input).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_google_ocr_requires_request_key() {
        let input = ProcessInput {
            ocr_service: None,
            ..mock_input()
        };
        match orchestrator(Config::default()).process(input).await {
            Err(AppError::Configuration(msg)) => {
                assert_eq!(msg, "OCR service configuration missing")
            }
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_claude_requires_credential() {
        let input = ProcessInput {
            llm_service: Some("claude".to_string()),
            ..mock_input()
        };
        match orchestrator(Config::default()).process(input).await {
            Err(AppError::Configuration(msg)) => {
                assert_eq!(msg, "LLM service configuration missing")
            }
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_integrated_requires_google_key() {
        let result = orchestrator(Config::default())
            .process_integrated(Some("AAAA".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_enhance_requires_text() {
        let result = orchestrator(Config::default())
            .enhance_text(Some("   ".to_string()), None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_enhance_without_google_key_uses_sentinel() {
        let mut config = Config::default();
        config.credentials.anthropic_api_key = Some("test-key".to_string());
        // Unreachable, so the analysis falls back to the failure placeholder
        config.providers.anthropic_url = "http://127.0.0.1:9/v1/messages".to_string();

        let result = orchestrator(config)
            .enhance_text(Some("こんにちは".to_string()), None)
            .await
            .unwrap();

        assert_eq!(result.google_translation, TRANSLATION_UNAVAILABLE);
        let AnalysisRecord::Enhanced(analysis) = result.enhanced_analysis else {
            panic!("expected enhanced record");
        };
        assert_eq!(analysis.improved_translation, TRANSLATION_UNAVAILABLE);
        assert!(analysis.translation_notes.starts_with("Enhancement failed: "));
    }

    #[test]
    fn test_parse_selector_defaults() {
        assert_eq!(parse_selector::<OcrBackend>(None).unwrap(), OcrBackend::Google);
        assert_eq!(parse_selector::<LlmBackend>(None).unwrap(), LlmBackend::Claude);
        assert_eq!(
            parse_selector::<LlmBackend>(Some("mock")).unwrap(),
            LlmBackend::Mock
        );
    }
}
