//! Request pipeline
//!
//! One [`Orchestrator`] serves every variant; [`PipelineVariant`] picks the
//! prompt template and whether machine translation runs.

mod orchestrator;
mod stage;
mod types;

pub use orchestrator::Orchestrator;
pub use stage::{PipelineRun, Stage};
pub use types::{
    EnhancementResult, IntegratedResult, PipelineVariant, ProcessInput, ProcessingResult,
    ServicesUsed,
};
