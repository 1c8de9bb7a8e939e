use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{ExtractedRule, Job, JobId, JobStatus};

/// In-memory job store for tests and ephemeral runs. Updates mutate one
/// record under a write lock, mirroring the atomic-single-record contract
/// of the durable store.
#[derive(Default)]
pub struct MemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;
        job.status = status;
        job.error_message = error_message.map(String::from);
        Ok(())
    }

    async fn complete(
        &self,
        id: JobId,
        results: &[ExtractedRule],
        processed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;
        job.status = JobStatus::Complete;
        job.results = results.to_vec();
        job.processed_at = Some(processed_at);
        job.error_message = None;
        Ok(())
    }
}
