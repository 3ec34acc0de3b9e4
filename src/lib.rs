//! # symptom-match
//!
//! Backend for a community symptom-sharing app: tags new reports with medical
//! keywords, finds similar historical cases with an LLM, and writes short
//! wellness suggestions from resolved cases. Every LLM step has a
//! deterministic degraded path, so callers never see a model failure.
//!
//! ## Matching pipeline
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │ target report + candidate pool│
//!            └──────────────┬───────────────┘
//!                           │ drop target id
//!                           ▼
//!            ┌──────────────────────────────┐
//!            │         AI matcher           │
//!            │  batches of N candidates     │
//!            │  rubric prompt → JSON        │
//!            │  validate index / ≥ 0.3      │
//!            │  merge + re-sort             │
//!            └───────┬──────────────┬───────┘
//!               Ok(list)        Err(reason)
//!                    │              │
//!                    │              ▼
//!                    │  ┌──────────────────────┐
//!                    │  │  keyword overlap     │
//!                    │  │  substring matching  │
//!                    │  │  score > 0.2, sorted │
//!                    │  └──────────┬───────────┘
//!                    ▼             ▼
//!            ┌──────────────────────────────┐
//!            │ MatchResult list + method     │
//!            └──────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server, LLM provider and matching thresholds
//! - [`models`] - Reports, solutions, votes, match results and request/response bodies
//! - [`error`] - HTTP boundary, matcher and data-model error types
//! - [`llm`] - The `TextGenerator` seam, the HTTP client for Gemini/OpenAI/Ollama, suggestion generation
//! - [`keywords`] - LLM keyword tagging with a vocabulary-based fallback
//! - [`matching::ai`] - Rubric prompt, batching and validation of LLM similarity answers
//! - [`matching::fallback`] - Keyword-overlap similarity and matcher
//! - [`matching::pipeline`] - `MatchPipeline`, which composes the two matchers
//! - [`api`] - Axum handlers for keyword extraction, matching and suggestions
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod keywords;
pub mod llm;
pub mod matching;
pub mod models;
pub mod state;
