//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Orchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Arc<Config>,
    orchestrator: Orchestrator,
}

impl AppState {
    /// Create a new application state
    ///
    /// A single HTTP client is shared by every provider so connections are
    /// pooled across requests.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let client = reqwest::Client::new();

        Self {
            inner: Arc::new(AppStateInner {
                orchestrator: Orchestrator::new(config.clone(), client),
                config,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the pipeline orchestrator
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.inner.orchestrator
    }
}
