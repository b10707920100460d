//! Integrated pipeline routes
//!
//! Google Vision + Google Translate for the literal reading, Claude for the
//! educational layer on top.

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::pipeline::{EnhancementResult, IntegratedResult};
use crate::state::AppState;

/// Create the integrated router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process-integrated", post(process_integrated))
        .route("/text-enhance", post(enhance_text))
}

#[derive(Debug, Deserialize)]
pub struct IntegratedRequest {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextEnhanceRequest {
    #[serde(default)]
    pub japanese_text: Option<String>,
    /// Fetched from Google Translate when omitted
    #[serde(default)]
    pub google_translation: Option<String>,
}

/// POST /api/process-integrated
async fn process_integrated(
    State(state): State<AppState>,
    payload: std::result::Result<Json<IntegratedRequest>, JsonRejection>,
) -> Result<Json<IntegratedResult>> {
    let Json(request) = payload?;
    let result = state
        .orchestrator()
        .process_integrated(request.image)
        .await?;
    Ok(Json(result))
}

/// For when the caller already has the Japanese text
///
/// POST /api/text-enhance
async fn enhance_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TextEnhanceRequest>, JsonRejection>,
) -> Result<Json<EnhancementResult>> {
    let Json(request) = payload?;
    let result = state
        .orchestrator()
        .enhance_text(request.japanese_text, request.google_translation)
        .await?;
    Ok(Json(result))
}
