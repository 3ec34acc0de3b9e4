//! Free-text wellness suggestions grounded in similar resolved cases.

use super::TextGenerator;
use crate::models::SimilarCase;

/// Returned whenever the model cannot be asked or gives nothing back.
pub const FALLBACK_SUGGESTIONS: &str = "Unable to generate suggestions at this time. Please consult with a healthcare professional for personalized advice.";

/// Ask the model for 3-4 general wellness points plus a disclaimer.
///
/// Never fails: a missing generator, a transport error or an empty answer all
/// yield [`FALLBACK_SUGGESTIONS`].
pub async fn generate_suggestions(
    generator: Option<&dyn TextGenerator>,
    description: &str,
    similar_cases: &[SimilarCase],
    max_cases: usize,
) -> String {
    let Some(generator) = generator else {
        return FALLBACK_SUGGESTIONS.to_string();
    };

    let prompt = build_suggestion_prompt(description, similar_cases, max_cases);

    match generator.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("LLM returned empty suggestions");
            FALLBACK_SUGGESTIONS.to_string()
        }
        Err(e) => {
            tracing::warn!("Suggestion generation failed: {e:#}");
            FALLBACK_SUGGESTIONS.to_string()
        }
    }
}

fn build_suggestion_prompt(description: &str, similar_cases: &[SimilarCase], max_cases: usize) -> String {
    let mut prompt = format!("Based on these symptoms: \"{description}\"\n\n");

    if !similar_cases.is_empty() && max_cases > 0 {
        prompt.push_str("Here are some similar cases that were resolved:\n");
        for (i, case) in similar_cases.iter().take(max_cases).enumerate() {
            let solution = case.solution().unwrap_or("Consulted with specialist");
            prompt.push_str(&format!("{}. {}: {}\n", i + 1, case.title, solution));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Provide brief, general wellness suggestions (3-4 bullet points).\n\
         End with a note that this is not medical advice and that they should consult a \
         healthcare professional if symptoms persist or worsen.\n\
         Keep it concise and supportive.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    fn case(title: &str, solution: Option<&str>) -> SimilarCase {
        SimilarCase {
            title: title.to_string(),
            solution_text: solution.map(str::to_string),
            solutions: vec![],
        }
    }

    #[tokio::test]
    async fn test_no_generator_returns_fallback_text() {
        let text = generate_suggestions(None, "headache", &[], 3).await;
        assert_eq!(
            text,
            "Unable to generate suggestions at this time. Please consult with a healthcare professional for personalized advice."
        );
    }

    #[tokio::test]
    async fn test_error_and_empty_return_fallback_text() {
        let failing = Failing;
        let text = generate_suggestions(Some(&failing as &dyn TextGenerator), "headache", &[], 3).await;
        assert_eq!(text, FALLBACK_SUGGESTIONS);

        let blank = Fixed("   \n");
        let text = generate_suggestions(Some(&blank as &dyn TextGenerator), "headache", &[], 3).await;
        assert_eq!(text, FALLBACK_SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_model_text_is_returned_raw() {
        let gen = Fixed("- Rest\n- Hydrate\n\nThis is not medical advice.");
        let text = generate_suggestions(Some(&gen as &dyn TextGenerator), "headache", &[], 3).await;
        assert!(text.starts_with("- Rest"));
    }

    #[test]
    fn test_prompt_quotes_at_most_max_cases() {
        let cases = vec![
            case("One", Some("ice")),
            case("Two", None),
            case("Three", Some("sleep")),
            case("Four", Some("never shown")),
        ];
        let prompt = build_suggestion_prompt("sore knee", &cases, 3);
        assert!(prompt.contains("\"sore knee\""));
        assert!(prompt.contains("1. One: ice"));
        assert!(prompt.contains("2. Two: Consulted with specialist"));
        assert!(prompt.contains("3. Three: sleep"));
        assert!(!prompt.contains("Four"));
        assert!(prompt.contains("not medical advice"));
    }

    #[test]
    fn test_prompt_without_cases_skips_case_section() {
        let prompt = build_suggestion_prompt("cough", &[], 3);
        assert!(!prompt.contains("similar cases"));
    }
}
