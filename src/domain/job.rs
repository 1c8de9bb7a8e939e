use chrono::{DateTime, Utc};

use super::{ExtractedRule, JobId, JobStatus, StoragePath};

/// The durable unit of work tracking one document's processing lifecycle.
/// Extracted rules are attached when the job reaches `Complete`; until then
/// `results` is empty.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub storage_path: StoragePath,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub results: Vec<ExtractedRule>,
}

impl Job {
    pub fn new() -> Self {
        let id = JobId::new();
        Self {
            id,
            status: JobStatus::Pending,
            storage_path: StoragePath::for_job(&id),
            error_message: None,
            created_at: Utc::now(),
            processed_at: None,
            results: Vec::new(),
        }
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}
