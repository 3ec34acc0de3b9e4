use std::sync::Arc;

use crate::config::Config;
use crate::llm::{LlmClient, TextGenerator};
use crate::matching::MatchPipeline;

/// Shared application state. Holds no per-request data; every handler call is
/// independent.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no credential is configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub pipeline: MatchPipeline,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let generator = if config.llm.is_configured() {
            let client: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(config.llm.clone())?);
            Some(client)
        } else {
            None
        };
        Ok(Self::with_generator(config, generator))
    }

    /// Build state around an explicit generator (or none).
    pub fn with_generator(config: Config, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let pipeline = MatchPipeline::new(generator.clone(), config.matching.clone());
        Self {
            config: Arc::new(config),
            generator,
            pipeline,
        }
    }

    pub fn generator(&self) -> Option<&dyn TextGenerator> {
        self.generator.as_deref()
    }
}
