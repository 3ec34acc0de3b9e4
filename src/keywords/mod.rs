//! Keyword extraction: LLM-tagged when a model is available, vocabulary-based otherwise.

pub mod fallback;

use crate::llm::TextGenerator;

pub use fallback::extract_fallback_keywords;

/// Derive normalized keyword tags from a free-text description.
///
/// Never fails. Without a generator, on any model error, or when the model's
/// answer parses to nothing, the deterministic fallback is used.
pub async fn extract_keywords(generator: Option<&dyn TextGenerator>, description: &str) -> Vec<String> {
    let Some(generator) = generator else {
        return extract_fallback_keywords(description);
    };

    let prompt = build_keyword_prompt(description);
    match generator.generate(&prompt).await {
        Ok(text) => {
            let keywords = parse_keyword_list(&text);
            if keywords.is_empty() {
                tracing::warn!("LLM returned no keywords, using fallback extractor");
                extract_fallback_keywords(description)
            } else {
                keywords
            }
        }
        Err(e) => {
            tracing::warn!("Keyword extraction failed, using fallback extractor: {e:#}");
            extract_fallback_keywords(description)
        }
    }
}

fn build_keyword_prompt(description: &str) -> String {
    format!(
        "Extract the most important medical keywords and symptoms from this health description.\n\
         Return ONLY a comma-separated list of keywords (no explanations, no numbers, no filler \
         words, just the keywords).\n\
         Focus on: specific symptoms, body parts, pain types, duration, severity.\n\n\
         Description: \"{description}\"\n\n\
         Keywords:"
    )
}

/// Split a comma-separated model answer into trimmed, lowercase, unique keywords.
fn parse_keyword_list(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for part in text.split(',') {
        let keyword = part
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '.' | '*'))
            .to_lowercase();
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}
