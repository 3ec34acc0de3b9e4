use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Matching thresholds and batch sizes
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai" or "ollama"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for text generation
    pub chat_model: String,
    /// API key. Its absence disables every LLM path except a local ollama.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Knobs for the similarity pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// AI-sourced matches below this similarity are dropped.
    pub ai_min_similarity: f64,
    /// Keyword overlap must be strictly greater than this to count as a match.
    pub keyword_min_overlap: f64,
    /// Candidates sent to the model in a single prompt.
    pub max_candidates_per_call: usize,
    /// Batch prompts allowed in flight at once.
    pub max_concurrent_calls: usize,
    /// Resolved cases quoted in the suggestion prompt.
    pub max_suggestion_cases: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            llm: LlmConfig::default(),
            matching: MatchingConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            base_url: default_base_url("gemini").to_string(),
            chat_model: "gemini-1.5-flash".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            ai_min_similarity: 0.3,
            keyword_min_overlap: 0.2,
            max_candidates_per_call: 20,
            max_concurrent_calls: 4,
            max_suggestion_cases: 3,
        }
    }
}

impl LlmConfig {
    /// Whether the language-model path should be attempted at all.
    pub fn is_configured(&self) -> bool {
        let has_key = self
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        has_key || self.provider == "ollama"
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider {
        "openai" => "https://api.openai.com",
        "ollama" => "http://localhost:11434",
        _ => "https://generativelanguage.googleapis.com",
    }
}

fn parse_unit(val: &str) -> Option<f64> {
    val.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

/// Parse a count or duration that must never be zero.
fn parse_at_least_one<T>(val: &str) -> Option<T>
where
    T: FromStr + Ord + From<u8>,
{
    val.trim().parse::<T>().ok().map(|v| v.max(T::from(1)))
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("SYMPTOM_MATCH_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.base_url = default_base_url(&provider).to_string();
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        // GEMINI_API_KEY is accepted for deployments configured for the hosted Gemini API.
        if let Ok(key) = std::env::var("LLM_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY")) {
            if !key.trim().is_empty() {
                config.llm.api_key = Some(key);
            }
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Some(v) = parse_at_least_one(&val) {
                config.llm.timeout_secs = v;
            }
        }

        if let Ok(val) = std::env::var("MATCH_AI_MIN_SIMILARITY") {
            if let Some(v) = parse_unit(&val) {
                config.matching.ai_min_similarity = v;
            }
        }
        if let Ok(val) = std::env::var("MATCH_KEYWORD_MIN_OVERLAP") {
            if let Some(v) = parse_unit(&val) {
                config.matching.keyword_min_overlap = v;
            }
        }
        if let Ok(val) = std::env::var("MATCH_MAX_CANDIDATES_PER_CALL") {
            if let Some(v) = parse_at_least_one(&val) {
                config.matching.max_candidates_per_call = v;
            }
        }
        if let Ok(val) = std::env::var("MATCH_MAX_CONCURRENT_CALLS") {
            if let Some(v) = parse_at_least_one(&val) {
                config.matching.max_concurrent_calls = v;
            }
        }
        if let Ok(val) = std::env::var("MATCH_MAX_SUGGESTION_CASES") {
            if let Ok(v) = val.parse() {
                config.matching.max_suggestion_cases = v;
            }
        }

        config
    }
}
