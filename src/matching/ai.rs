//! LLM similarity matcher.
//!
//! The candidate pool is split into batches of `max_candidates_per_call`. Each
//! batch becomes one prompt that carries a scoring rubric and asks for
//! `{"matches": [{"index", "similarity", "reasoning"}]}` with batch-local
//! indices. At most `max_concurrent_calls` batches are in flight at once; their
//! answers are validated, mapped back to pool positions, merged and re-sorted
//! by similarity.

use std::collections::HashSet;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;

use crate::config::MatchingConfig;
use crate::error::MatchError;
use crate::llm::{strip_code_fence, TextGenerator};
use crate::models::{MatchMethod, MatchResult, SymptomReport};

/// A validated match pointing into the slice the prompt was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub similarity: f64,
    pub reasoning: Option<String>,
}

#[derive(Deserialize)]
struct AiMatchResponse {
    matches: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct AiMatch {
    index: i64,
    similarity: f64,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Rank `pool` against `target` with the language model.
///
/// `Ok(vec![])` means the model saw the pool and found nothing similar. Every
/// `Err` means no trustworthy answer was produced.
pub async fn match_with_ai(
    generator: Option<&dyn TextGenerator>,
    target: &SymptomReport,
    pool: &[SymptomReport],
    config: &MatchingConfig,
) -> Result<Vec<MatchResult>, MatchError> {
    let generator = generator.ok_or(MatchError::NotConfigured)?;
    if pool.is_empty() {
        return Ok(Vec::new());
    }

    let batch_size = config.max_candidates_per_call.max(1);
    let min_similarity = config.ai_min_similarity;
    let concurrency = config.max_concurrent_calls.max(1);

    let requests: Vec<_> = pool.chunks(batch_size).enumerate().map(move |(batch, candidates)| async move {
        let prompt = build_match_prompt(target, candidates);
        let response = generator.generate(&prompt).await?;
        let scored = parse_match_response(&response, candidates.len(), min_similarity)?;
        Ok::<_, MatchError>(
            scored
                .into_iter()
                .map(|s| ScoredIndex {
                    index: s.index + batch * batch_size,
                    ..s
                })
                .collect::<Vec<_>>(),
        )
    }).collect();

    // `buffered` yields in batch order and stops at the first failed batch
    let batches: Vec<Vec<ScoredIndex>> = stream::iter(requests)
        .buffered(concurrency)
        .try_collect()
        .await?;
    let mut scored: Vec<ScoredIndex> = batches.into_iter().flatten().collect();

    // Never trust the model's own ordering
    sort_by_similarity(&mut scored);

    Ok(scored
        .into_iter()
        .map(|s| MatchResult {
            report: pool[s.index].clone(),
            similarity_score: s.similarity,
            match_reasoning: s.reasoning,
            match_method: MatchMethod::AiAdvanced,
            common_keywords: Vec::new(),
        })
        .collect())
}

/// Build the single-shot ranking prompt for one batch of candidates.
pub fn build_match_prompt(target: &SymptomReport, candidates: &[SymptomReport]) -> String {
    let listing: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "[{i}] Title: {}\nDescription: {}\nStatus: {}",
                c.title, c.description, c.status
            )
        })
        .collect();

    format!(
        "You are a medical symptom matching system. Compare the current symptom report with \
         each candidate report and decide how similar the underlying health problem is.\n\n\
         Current Symptom:\nTitle: \"{title}\"\nDescription: \"{description}\"\n\n\
         Candidates:\n{listing}\n\n\
         Scoring rubric for \"similarity\":\n\
         - 0.90 to 1.00: nearly identical symptoms in the same body location\n\
         - 0.70 to 0.89: same core symptom with different severity or duration\n\
         - 0.50 to 0.69: related symptoms or the same body system\n\
         - 0.30 to 0.49: weak but meaningful overlap\n\
         - below 0.30: not similar, leave it out\n\n\
         Respond with ONLY a JSON object, no markdown and no explanation:\n\
         {{\"matches\": [{{\"index\": <candidate number>, \"similarity\": <0.0-1.0>, \
         \"reasoning\": \"<one short sentence>\"}}]}}\n\
         Return {{\"matches\": []}} if nothing is similar.",
        title = target.title,
        description = target.description,
        listing = listing.join("\n\n"),
    )
}

/// Parse and validate one model answer.
///
/// Out-of-range indices, sub-threshold similarities and malformed entries are
/// dropped; a missing `matches` array or unparseable JSON is an error.
/// Similarities above 1.0 are clamped and repeated indices keep their best score.
pub fn parse_match_response(
    content: &str,
    candidate_count: usize,
    min_similarity: f64,
) -> Result<Vec<ScoredIndex>, MatchError> {
    let body = strip_code_fence(content);
    let json_str = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => {
            return Err(MatchError::MalformedResponse(
                "no JSON object in response".to_string(),
            ))
        }
    };

    let response: AiMatchResponse = serde_json::from_str(json_str)?;
    let entries = response
        .matches
        .ok_or_else(|| MatchError::MalformedResponse("missing `matches` array".to_string()))?;

    let mut scored: Vec<ScoredIndex> = entries
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<AiMatch>(v) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::debug!("Skipping malformed match entry: {e}");
                None
            }
        })
        .filter(|m| m.index >= 0 && (m.index as u64) < candidate_count as u64)
        .filter(|m| m.similarity.is_finite() && m.similarity >= min_similarity)
        .map(|m| ScoredIndex {
            index: m.index as usize,
            similarity: m.similarity.min(1.0),
            reasoning: m.reasoning.filter(|r| !r.trim().is_empty()),
        })
        .collect();

    sort_by_similarity(&mut scored);
    let mut seen = HashSet::new();
    scored.retain(|s| seen.insert(s.index));

    Ok(scored)
}

fn sort_by_similarity(scored: &mut [ScoredIndex]) {
    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
