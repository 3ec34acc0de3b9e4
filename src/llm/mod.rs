//! Language-model access: the [`TextGenerator`] seam, its HTTP implementation,
//! and the free-text suggestion generator.

pub mod client;
pub mod suggestions;

use anyhow::Result;
use async_trait::async_trait;

pub use client::LlmClient;

/// A single-shot text completion capability.
///
/// Every LLM-backed component takes one of these rather than a concrete client
/// so callers can swap providers, and tests can script responses.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````) if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n{\"matches\": []}\n```";
        assert_eq!(strip_code_fence(input), "{\"matches\": []}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let input = "```\n[1, 2]\n```\n";
        assert_eq!(strip_code_fence(input), "[1, 2]");
    }

    #[test]
    fn test_no_fence_is_trimmed_only() {
        assert_eq!(strip_code_fence("  {\"a\": 1} \n"), "{\"a\": 1}");
    }

    #[test]
    fn test_unterminated_fence_keeps_body() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }
}
