//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Google Cloud (Vision + Translate) key configured
    pub google_cloud: &'static str,
    /// Anthropic key configured
    pub claude: &'static str,
}

fn mark(available: bool) -> &'static str {
    if available {
        "✓"
    } else {
        "✗"
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let credentials = &state.config().credentials;

    Json(HealthResponse {
        status: "healthy",
        service: "urzasight-server",
        version: env!("CARGO_PKG_VERSION"),
        google_cloud: mark(credentials.has_google()),
        claude: mark(credentials.has_anthropic()),
    })
}
