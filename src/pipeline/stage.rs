//! Pipeline stage tracking

use std::fmt;

use crate::error::AppError;

/// Where a single request is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Decoding,
    OcrPending,
    TranslatePending,
    AnalysisPending,
    Recovering,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Decoding => "decoding",
            Self::OcrPending => "ocr_pending",
            Self::TranslatePending => "translate_pending",
            Self::AnalysisPending => "analysis_pending",
            Self::Recovering => "recovering",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Stage tracker for one request. `Done` and `Failed` are absorbing.
#[derive(Debug)]
pub struct PipelineRun {
    stage: Stage,
}

impl PipelineRun {
    pub fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, next: Stage) {
        if self.stage.is_terminal() {
            tracing::warn!("Ignoring transition {} -> {}", self.stage, next);
            return;
        }
        tracing::debug!("{} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Move to `Failed`, handing the error back for propagation
    pub fn fail(&mut self, error: AppError) -> AppError {
        tracing::info!(stage = %self.stage, "Pipeline failed: {}", error);
        self.stage = Stage::Failed;
        error
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}
