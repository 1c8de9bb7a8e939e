use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ExtractedRule, JobId};
use crate::presentation::state::AppState;

/// Wire shape of one extracted rule; offsets are section-relative character
/// positions, absent when the fragment could not be located.
#[derive(Serialize)]
pub struct RuleResponse {
    pub requirement_text: String,
    pub classification: String,
    pub section_xpath: String,
    pub section_relative_start: Option<usize>,
    pub section_relative_end: Option<usize>,
}

impl From<&ExtractedRule> for RuleResponse {
    fn from(rule: &ExtractedRule) -> Self {
        Self {
            requirement_text: rule.text.clone(),
            classification: rule.category.as_str().to_string(),
            section_xpath: rule.section_path.clone(),
            section_relative_start: rule.span.map(|span| span.start),
            section_relative_end: rule.span.map(|span| span.end),
        }
    }
}

#[derive(Serialize)]
pub struct JobResultsResponse {
    pub job_id: String,
    pub status: String,
    pub results: Vec<RuleResponse>,
    pub error: Option<String>,
    pub created_at: String,
    pub processed_at: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /api/v1/jobs/{job_id}/results. Pure read: a job that has not
/// completed yet reports its current status with empty results.
#[tracing::instrument(skip(state))]
pub async fn job_results_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    match state.job_repository.get_by_id(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => {
            let response = JobResultsResponse {
                job_id: job.id.as_uuid().to_string(),
                status: job.status.as_str().to_string(),
                results: job.results.iter().map(RuleResponse::from).collect(),
                error: job.error_message,
                created_at: job.created_at.to_rfc3339(),
                processed_at: job.processed_at.map(|ts| ts.to_rfc3339()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", uuid),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job results");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
