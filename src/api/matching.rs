use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::models::{MatchSymptomsRequest, MatchSymptomsResponse};
use crate::state::AppState;

/// POST /api/match-symptoms - Rank similar cases for a report:
///   1. Drop the target from the candidate pool
///   2. LLM ranking with rubric scores and reasoning
///   3. Keyword overlap when the LLM path fails or keyword mode is requested
pub async fn match_symptoms(
    State(state): State<AppState>,
    payload: Result<Json<MatchSymptomsRequest>, JsonRejection>,
) -> Result<Json<MatchSymptomsResponse>, ApiError> {
    let Json(req) = payload?;

    let (Some(target), Some(pool)) = (req.current_symptom, req.all_symptoms) else {
        return Err(ApiError::BadRequest(
            "Missing required parameters".to_string(),
        ));
    };

    tracing::info!(
        "Matching symptom \"{}\" against {} other symptoms",
        target.title,
        pool.len()
    );

    let outcome = state.pipeline.find_similar(&target, &pool, req.method).await;

    tracing::info!(
        "Found {} matches (method: {:?})",
        outcome.matches.len(),
        outcome.method
    );

    Ok(Json(MatchSymptomsResponse {
        matches: outcome.matches,
        method: outcome.method,
    }))
}
