//! Deterministic keyword-overlap matcher. No I/O; used directly in keyword mode
//! and as the degraded path when the AI matcher fails.

use crate::models::{MatchMethod, MatchResult, SymptomReport};

/// Result of comparing two keyword sets.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordOverlap {
    /// Matched target keywords divided by `max(target.len(), 1)`.
    pub score: f64,
    /// Target keywords that found a partner in the candidate.
    pub common: Vec<String>,
}

/// Two keywords are related when either contains the other, case-insensitively,
/// so "head" pairs with "headache". Empty keywords never relate.
pub fn keywords_related(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    a.contains(&b) || b.contains(&a)
}

/// Fraction of target keywords related to at least one candidate keyword.
pub fn keyword_overlap(target: &[String], candidate: &[String]) -> KeywordOverlap {
    let common: Vec<String> = target
        .iter()
        .filter(|k| candidate.iter().any(|ck| keywords_related(k, ck)))
        .cloned()
        .collect();

    KeywordOverlap {
        score: common.len() as f64 / target.len().max(1) as f64,
        common,
    }
}

/// Score `target` against every other report in `pool` by keyword overlap.
///
/// The target itself (same id) is skipped. Only overlaps strictly above
/// `min_overlap` survive; output is sorted by score, ties kept in pool order.
pub fn match_fallback(target: &SymptomReport, pool: &[SymptomReport], min_overlap: f64) -> Vec<MatchResult> {
    let candidates: Vec<SymptomReport> = pool.iter().filter(|c| c.id != target.id).cloned().collect();
    match_keywords(&target.keywords, &candidates, min_overlap)
}

/// Keyword-list variant of [`match_fallback`] for callers without a full target report.
pub fn match_keywords(keywords: &[String], pool: &[SymptomReport], min_overlap: f64) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = pool
        .iter()
        .filter_map(|candidate| {
            let overlap = keyword_overlap(keywords, &candidate.keywords);
            (overlap.score > min_overlap).then(|| MatchResult {
                report: candidate.clone(),
                similarity_score: overlap.score,
                match_reasoning: None,
                match_method: MatchMethod::Keyword,
                common_keywords: overlap.common,
            })
        })
        .collect();

    // Stable: equal scores keep pool order
    results.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}
