use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::write_rules_csv;
use crate::domain::{JobId, JobStatus};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /api/v1/jobs/{job_id}/export. Returns the completed job's rules as
/// CSV.
#[tracing::instrument(skip(state))]
pub async fn export_rules_handler(
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

    let job = match state.job_repository.get_by_id(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job not found: {}", uuid),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job for export");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response();
        }
    };

    if job.status != JobStatus::Complete {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Job is {}; only complete jobs can be exported", job.status),
            }),
        )
            .into_response();
    }

    let mut csv = Vec::new();
    if let Err(e) = write_rules_csv(&job.results, &mut csv) {
        tracing::error!(error = %e, "Failed to serialize CSV export");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to serialize export".to_string(),
            }),
        )
            .into_response();
    }

    ([(header::CONTENT_TYPE, "text/csv")], csv).into_response()
}
