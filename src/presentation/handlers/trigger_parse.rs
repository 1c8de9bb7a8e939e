use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::ParseMessage;
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct TriggerParseResponse {
    pub job_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/v1/jobs/{job_id}/parse. Queues the job for the parse worker.
/// Repeated triggers are accepted; the worker skips anything that already
/// left Pending.
#[tracing::instrument(skip(state))]
pub async fn trigger_parse_handler(
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
    let job_id = JobId::from_uuid(uuid);

    let job = match state.job_repository.get_by_id(job_id).await {
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
            tracing::error!(error = %e, "Failed to fetch job");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response();
        }
    };

    let msg = ParseMessage {
        job_id,
        storage_path: job.storage_path.clone(),
    };

    if let Err(e) = state.parse_sender.send(msg).await {
        tracing::error!(error = %e, "Failed to enqueue parse job");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Parse queue full or worker unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(job_id = %uuid, "Parse queued");

    (
        StatusCode::ACCEPTED,
        Json(TriggerParseResponse {
            job_id: uuid.to_string(),
            message: "Parse started".to_string(),
        }),
    )
        .into_response()
}
