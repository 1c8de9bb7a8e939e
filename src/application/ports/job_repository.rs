use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ExtractedRule, Job, JobId, JobStatus};

use super::RepositoryError;

/// Durable job store. Every method is an atomic single-record operation;
/// `complete` writes status, results and the processing timestamp in one
/// update so readers never observe a half-finished record.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn complete(
        &self,
        id: JobId,
        results: &[ExtractedRule],
        processed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}
