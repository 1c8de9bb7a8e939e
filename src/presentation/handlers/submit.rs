use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::Job;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/v1/jobs. Stages the raw document under a job-derived key and
/// creates the job record in Pending. Parsing is triggered separately.
#[tracing::instrument(skip(state, body))]
pub async fn submit_job_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing document content".to_string(),
            }),
        )
            .into_response();
    }

    let job = Job::new();

    if let Err(e) = state.staging_store.store(&job.storage_path, body).await {
        tracing::error!(error = %e, "Failed to stage document");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store document: {}", e),
            }),
        )
            .into_response();
    }

    if let Err(e) = state.job_repository.create(&job).await {
        tracing::error!(error = %e, "Failed to create job record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create job: {}", e),
            }),
        )
            .into_response();
    }

    tracing::info!(job_id = %job.id.as_uuid(), "Document submitted");

    (
        StatusCode::CREATED,
        Json(SubmitResponse {
            job_id: job.id.as_uuid().to_string(),
            status: job.status.as_str().to_string(),
        }),
    )
        .into_response()
}
