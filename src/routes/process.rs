//! Standard pipeline route

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::pipeline::{ProcessInput, ProcessingResult};
use crate::state::AppState;

/// Create the process router
pub fn router() -> Router<AppState> {
    Router::new().route("/process", post(process_manga_page))
}

/// Request body for `POST /api/process`
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Data URI or bare base64
    #[serde(default)]
    pub image: Option<String>,
    /// `google` (default) or `mock`
    #[serde(default)]
    pub ocr_service: Option<String>,
    /// `claude` (default) or `mock`
    #[serde(default)]
    pub llm_service: Option<String>,
    /// Vision key, required when `ocr_service` is `google`
    #[serde(default)]
    pub ocr_api_key: Option<String>,
}

impl From<ProcessRequest> for ProcessInput {
    fn from(request: ProcessRequest) -> Self {
        ProcessInput {
            image: request.image,
            ocr_service: request.ocr_service,
            llm_service: request.llm_service,
            ocr_api_key: request.ocr_api_key,
        }
    }
}

/// Complete pipeline: OCR + analysis
///
/// POST /api/process
async fn process_manga_page(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessingResult>> {
    let Json(request) = payload?;
    let result = state.orchestrator().process(request.into()).await?;
    Ok(Json(result))
}
