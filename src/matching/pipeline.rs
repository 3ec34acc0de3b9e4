//! Match policy for "view similar cases": AI ranking first, keyword overlap on failure.

use std::sync::Arc;

use crate::config::MatchingConfig;
use crate::llm::TextGenerator;
use crate::models::{MatchMethod, MatchMode, MatchResult, SymptomReport};

use super::{match_fallback, match_with_ai};

/// A ranked match list plus where it came from.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    /// `None` when there was nothing to compare against.
    pub method: MatchMethod,
}

/// Entry point for "view similar cases".
///
/// The target is removed from the pool, then the AI matcher runs. Its `Ok`
/// answer is final, even when empty. Any `Err` (no credentials, transport
/// failure, unparseable answer) degrades to keyword overlap.
#[derive(Clone)]
pub struct MatchPipeline {
    generator: Option<Arc<dyn TextGenerator>>,
    config: MatchingConfig,
}

impl MatchPipeline {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: MatchingConfig) -> Self {
        Self { generator, config }
    }

    pub async fn find_similar(
        &self,
        target: &SymptomReport,
        pool: &[SymptomReport],
        mode: MatchMode,
    ) -> MatchOutcome {
        let candidates: Vec<SymptomReport> = pool.iter().filter(|c| c.id != target.id).cloned().collect();

        if candidates.is_empty() {
            return MatchOutcome {
                matches: Vec::new(),
                method: MatchMethod::None,
            };
        }

        if mode == MatchMode::Keyword {
            return self.keyword_outcome(target, &candidates);
        }

        match match_with_ai(self.generator.as_deref(), target, &candidates, &self.config).await {
            Ok(matches) => MatchOutcome {
                matches,
                method: MatchMethod::AiAdvanced,
            },
            Err(e) => {
                tracing::warn!("AI matching unavailable, falling back to keyword overlap: {e}");
                self.keyword_outcome(target, &candidates)
            }
        }
    }

    fn keyword_outcome(&self, target: &SymptomReport, candidates: &[SymptomReport]) -> MatchOutcome {
        MatchOutcome {
            matches: match_fallback(target, candidates, self.config.keyword_min_overlap),
            method: MatchMethod::Keyword,
        }
    }
}
