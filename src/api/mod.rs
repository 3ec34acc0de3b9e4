//! Axum HTTP handlers for the matching pipeline boundary.

pub mod keywords;
pub mod matching;
pub mod suggestions;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::models::LlmStatus;
use crate::state::AppState;

/// All API routes, with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/extract-keywords", post(keywords::extract_keywords))
        .route("/api/match-symptoms", post(matching::match_symptoms))
        .route("/api/generate-suggestions", post(suggestions::generate_suggestions))
        .route("/api/config", get(get_config))
        .with_state(state)
}

/// GET /api/config - Provider and model in use, without the credential
pub async fn get_config(State(state): State<AppState>) -> Json<LlmStatus> {
    let llm = &state.config.llm;
    Json(LlmStatus {
        provider: llm.provider.clone(),
        chat_model: llm.chat_model.clone(),
        configured: state.generator.is_some(),
    })
}
