use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::models::{ExtractKeywordsRequest, ExtractKeywordsResponse};
use crate::state::AppState;

/// POST /api/extract-keywords - Tag a description with medical keywords
pub async fn extract_keywords(
    State(state): State<AppState>,
    payload: Result<Json<ExtractKeywordsRequest>, JsonRejection>,
) -> Result<Json<ExtractKeywordsResponse>, ApiError> {
    let Json(req) = payload?;

    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Description is required".to_string()))?;

    let keywords = crate::keywords::extract_keywords(state.generator(), description).await;
    tracing::debug!("Extracted {} keywords", keywords.len());

    Ok(Json(ExtractKeywordsResponse { keywords }))
}
