use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::models::{GenerateSuggestionsRequest, GenerateSuggestionsResponse};
use crate::state::AppState;

/// POST /api/generate-suggestions - Wellness suggestions for a description
pub async fn generate_suggestions(
    State(state): State<AppState>,
    payload: Result<Json<GenerateSuggestionsRequest>, JsonRejection>,
) -> Result<Json<GenerateSuggestionsResponse>, ApiError> {
    let Json(req) = payload?;

    let symptoms = req
        .symptoms
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Symptoms are required".to_string()))?;

    let suggestions = crate::llm::suggestions::generate_suggestions(
        state.generator(),
        symptoms,
        &req.similar_cases,
        state.config.matching.max_suggestion_cases,
    )
    .await;

    Ok(Json(GenerateSuggestionsResponse { suggestions }))
}
