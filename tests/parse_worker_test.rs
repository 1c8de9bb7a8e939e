use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use klaksvik::application::ports::{
    Annotator, AnnotatorError, JobRepository, RuleCandidate, StagingStore, TermCandidate,
};
use klaksvik::application::services::{ExtractionPipeline, ParseMessage, ParseWorker};
use klaksvik::domain::{Job, JobStatus, RuleCategory, SectionClass};
use klaksvik::infrastructure::persistence::MemoryJobRepository;
use klaksvik::infrastructure::storage::MemoryStagingStore;
use klaksvik::infrastructure::text_processing::XmlSectionSource;

const NORMATIVE_XML: &str =
    "<doc><section><p>Systems MUST validate input. Systems SHOULD log errors.</p></section></doc>";

struct RuleAnnotator;

#[async_trait::async_trait]
impl Annotator for RuleAnnotator {
    async fn classify_section(
        &self,
        _text: &str,
        _title: &str,
    ) -> Result<SectionClass, AnnotatorError> {
        Ok(SectionClass::Normative)
    }

    async fn extract_rules(&self, _text: &str) -> Result<Vec<RuleCandidate>, AnnotatorError> {
        Ok(vec![RuleCandidate {
            text: "Systems MUST validate input.".to_string(),
            category: RuleCategory::Requirement,
        }])
    }

    async fn extract_terms(&self, _text: &str) -> Result<Vec<TermCandidate>, AnnotatorError> {
        Ok(vec![])
    }
}

struct FailingAnnotator;

#[async_trait::async_trait]
impl Annotator for FailingAnnotator {
    async fn classify_section(
        &self,
        _text: &str,
        _title: &str,
    ) -> Result<SectionClass, AnnotatorError> {
        Err(AnnotatorError::Timeout)
    }

    async fn extract_rules(&self, _text: &str) -> Result<Vec<RuleCandidate>, AnnotatorError> {
        Err(AnnotatorError::Timeout)
    }

    async fn extract_terms(&self, _text: &str) -> Result<Vec<TermCandidate>, AnnotatorError> {
        Err(AnnotatorError::Timeout)
    }
}

struct Harness {
    repository: Arc<MemoryJobRepository>,
    store: Arc<MemoryStagingStore>,
    pipeline: Arc<ExtractionPipeline>,
}

fn harness(annotator: impl Annotator + 'static) -> Harness {
    Harness {
        repository: Arc::new(MemoryJobRepository::new()),
        store: Arc::new(MemoryStagingStore::new()),
        pipeline: Arc::new(ExtractionPipeline::new(
            Arc::new(XmlSectionSource),
            Arc::new(annotator),
        )),
    }
}

/// Runs the worker over the given messages until the queue is drained.
async fn run_worker(h: &Harness, messages: Vec<ParseMessage>) {
    let (sender, receiver) = mpsc::channel(messages.len().max(1));
    for msg in messages {
        sender.send(msg).await.unwrap();
    }
    drop(sender);

    let worker = ParseWorker::new(
        receiver,
        Arc::clone(&h.pipeline),
        h.repository.clone() as Arc<dyn JobRepository>,
        h.store.clone() as Arc<dyn StagingStore>,
    );
    worker.run().await;
}

async fn submit(h: &Harness, content: &[u8]) -> Job {
    let job = Job::new();
    h.store
        .store(&job.storage_path, Bytes::copy_from_slice(content))
        .await
        .unwrap();
    h.repository.create(&job).await.unwrap();
    job
}

#[tokio::test]
async fn given_pending_job_when_processed_then_job_completes_with_results() {
    let h = harness(RuleAnnotator);
    let job = submit(&h, NORMATIVE_XML.as_bytes()).await;

    run_worker(
        &h,
        vec![ParseMessage {
            job_id: job.id,
            storage_path: job.storage_path.clone(),
        }],
    )
    .await;

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Complete);
    assert_eq!(stored.results.len(), 1);
    assert_eq!(stored.results[0].text, "Systems MUST validate input.");
    assert!(stored.processed_at.is_some());
    assert!(stored.error_message.is_none());
}

#[tokio::test]
async fn given_failing_annotator_when_processed_then_job_still_completes_empty() {
    let h = harness(FailingAnnotator);
    let job = submit(&h, NORMATIVE_XML.as_bytes()).await;

    run_worker(
        &h,
        vec![ParseMessage {
            job_id: job.id,
            storage_path: job.storage_path.clone(),
        }],
    )
    .await;

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Complete);
    assert!(stored.results.is_empty());
}

#[tokio::test]
async fn given_unparseable_document_when_processed_then_job_fails_with_reason() {
    let h = harness(RuleAnnotator);
    let job = submit(&h, b"definitely not markup").await;

    run_worker(
        &h,
        vec![ParseMessage {
            job_id: job.id,
            storage_path: job.storage_path.clone(),
        }],
    )
    .await;

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.error_message.is_some());
    assert!(stored.results.is_empty());
}

#[tokio::test]
async fn given_missing_staged_document_when_processed_then_job_fails() {
    let h = harness(RuleAnnotator);
    let job = Job::new();
    h.repository.create(&job).await.unwrap();

    run_worker(
        &h,
        vec![ParseMessage {
            job_id: job.id,
            storage_path: job.storage_path.clone(),
        }],
    )
    .await;

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.error_message.is_some());
}

#[tokio::test]
async fn given_completed_job_when_triggered_again_then_nothing_changes() {
    let h = harness(RuleAnnotator);
    let job = submit(&h, NORMATIVE_XML.as_bytes()).await;
    let msg = || ParseMessage {
        job_id: job.id,
        storage_path: job.storage_path.clone(),
    };

    run_worker(&h, vec![msg()]).await;
    let first = h.repository.get_by_id(job.id).await.unwrap().unwrap();

    run_worker(&h, vec![msg()]).await;
    let second = h.repository.get_by_id(job.id).await.unwrap().unwrap();

    assert_eq!(second.status, JobStatus::Complete);
    assert_eq!(second.processed_at, first.processed_at);
    assert_eq!(second.results, first.results);
}

#[tokio::test]
async fn given_unknown_job_id_when_triggered_then_worker_skips_quietly() {
    let h = harness(RuleAnnotator);
    let ghost = Job::new();

    run_worker(
        &h,
        vec![ParseMessage {
            job_id: ghost.id,
            storage_path: ghost.storage_path.clone(),
        }],
    )
    .await;

    assert!(h.repository.get_by_id(ghost.id).await.unwrap().is_none());
}

#[tokio::test]
async fn given_duplicate_messages_in_one_batch_when_processed_then_job_runs_once() {
    let h = harness(RuleAnnotator);
    let job = submit(&h, NORMATIVE_XML.as_bytes()).await;
    let msg = || ParseMessage {
        job_id: job.id,
        storage_path: job.storage_path.clone(),
    };

    run_worker(&h, vec![msg(), msg(), msg()]).await;

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Complete);
    assert_eq!(stored.results.len(), 1);
}
