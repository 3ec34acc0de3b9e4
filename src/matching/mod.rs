//! Similar-case matching: LLM ranking with a deterministic keyword fallback.

pub mod ai;
pub mod fallback;
pub mod pipeline;

pub use ai::match_with_ai;
pub use fallback::{keyword_overlap, match_fallback, match_keywords};
pub use pipeline::{MatchOutcome, MatchPipeline};
