use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::ExtractedTerm;
use crate::presentation::state::AppState;

use super::results::RuleResponse;

#[derive(Serialize)]
pub struct ParseSyncResponse {
    pub results: Vec<RuleResponse>,
    pub definitions: Vec<TermResponse>,
}

#[derive(Serialize)]
pub struct TermResponse {
    pub term: String,
    pub definition: String,
    pub abbreviations: Vec<String>,
    pub section_xpath: String,
}

impl From<&ExtractedTerm> for TermResponse {
    fn from(term: &ExtractedTerm) -> Self {
        Self {
            term: term.term.clone(),
            definition: term.definition.clone(),
            abbreviations: term.abbreviations.clone(),
            section_xpath: term.section_path.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/v1/parse. Runs the same pipeline as the job path against the
/// request body, returns results directly and persists nothing.
#[tracing::instrument(skip(state, body))]
pub async fn parse_sync_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing document content".to_string(),
            }),
        )
            .into_response();
    }

    match state.pipeline.run(&body).await {
        Ok(output) => {
            let response = ParseSyncResponse {
                results: output.rules.iter().map(RuleResponse::from).collect(),
                definitions: output.terms.iter().map(TermResponse::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Synchronous parse failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
