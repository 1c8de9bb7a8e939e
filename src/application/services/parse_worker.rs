use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::application::ports::{
    JobRepository, RepositoryError, StagingStore, StagingStoreError,
};
use crate::domain::{JobId, JobStatus, StoragePath};

use super::extraction_pipeline::{ExtractionPipeline, PipelineError};

pub struct ParseMessage {
    pub job_id: JobId,
    pub storage_path: StoragePath,
}

/// Drives the persisted job state machine: Pending → Processing →
/// Complete | Failed. Jobs arrive over an mpsc channel from the trigger
/// handler; each is fetched from the staging store and run through the
/// extraction pipeline. Duplicate triggers are tolerated: only a Pending
/// job is eligible to run, anything else is a logged no-op.
pub struct ParseWorker {
    receiver: mpsc::Receiver<ParseMessage>,
    pipeline: Arc<ExtractionPipeline>,
    job_repository: Arc<dyn JobRepository>,
    staging_store: Arc<dyn StagingStore>,
}

impl ParseWorker {
    pub fn new(
        receiver: mpsc::Receiver<ParseMessage>,
        pipeline: Arc<ExtractionPipeline>,
        job_repository: Arc<dyn JobRepository>,
        staging_store: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            receiver,
            pipeline,
            job_repository,
            staging_store,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Parse worker started");
        while let Some(msg) = self.receiver.recv().await {
            let span = tracing::info_span!("parse_job", job_id = %msg.job_id.as_uuid());
            let _guard = span.enter();

            if let Err(e) = self.process_job(&msg).await {
                tracing::error!(error = %e, "Parse job failed");
            }
        }
        tracing::info!("Parse worker stopped: channel closed");
    }

    async fn process_job(&self, msg: &ParseMessage) -> Result<(), ParseWorkerError> {
        let job = self
            .job_repository
            .get_by_id(msg.job_id)
            .await
            .map_err(ParseWorkerError::Repository)?;

        let Some(job) = job else {
            tracing::warn!("Parse triggered for unknown job");
            return Ok(());
        };

        // Idempotency guard for at-least-once delivery: a job that already
        // left Pending is never reprocessed.
        if job.status != JobStatus::Pending {
            tracing::info!(status = %job.status, "Job is not pending; skipping");
            return Ok(());
        }

        self.update_status(msg.job_id, JobStatus::Processing, None)
            .await?;

        let data = match self.staging_store.fetch(&msg.storage_path).await {
            Ok(data) => data,
            Err(e) => {
                let error_msg = e.to_string();
                self.update_status(msg.job_id, JobStatus::Failed, Some(&error_msg))
                    .await?;
                return Err(ParseWorkerError::Staging(e));
            }
        };

        match self.pipeline.run(&data).await {
            Ok(output) => {
                self.job_repository
                    .complete(msg.job_id, &output.rules, Utc::now())
                    .await
                    .map_err(ParseWorkerError::Repository)?;
                tracing::info!(
                    rules = output.rules.len(),
                    terms = output.terms.len(),
                    "Parse completed"
                );
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                self.update_status(msg.job_id, JobStatus::Failed, Some(&error_msg))
                    .await?;
                Err(ParseWorkerError::Pipeline(e))
            }
        }
    }

    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), ParseWorkerError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_repository
            .update_status(job_id, status, error_message)
            .await
            .map_err(ParseWorkerError::Repository)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseWorkerError {
    #[error("repository: {0}")]
    Repository(RepositoryError),
    #[error("staging store: {0}")]
    Staging(StagingStoreError),
    #[error("pipeline: {0}")]
    Pipeline(PipelineError),
}
