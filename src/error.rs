use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SymptomStatus;

/// Errors surfaced at the HTTP boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Detail is logged, never sent to the caller.
    #[error("Internal server error")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status().is_server_error() {
            ApiError::Internal(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Why the AI matcher produced no answer. An empty `Ok` list is a real answer;
/// any of these means the caller should degrade.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("LLM is not configured")]
    NotConfigured,

    #[error("LLM request failed: {0:#}")]
    Request(#[from] anyhow::Error),

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("LLM response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Violations of the report and solution invariants.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Cannot move a report from {from} to {to}")]
    InvalidTransition {
        from: SymptomStatus,
        to: SymptomStatus,
    },

    #[error("A solution needs a description")]
    EmptySolution,
}
