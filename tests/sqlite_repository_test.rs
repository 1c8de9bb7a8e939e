use chrono::Utc;
use tempfile::TempDir;

use klaksvik::application::ports::JobRepository;
use klaksvik::domain::{ExtractedRule, Job, JobStatus, RuleCategory, TextSpan};
use klaksvik::infrastructure::persistence::SqliteJobRepository;

async fn repository(dir: &TempDir) -> SqliteJobRepository {
    SqliteJobRepository::connect(&dir.path().join("jobs.db"))
        .await
        .unwrap()
}

#[tokio::test]
async fn given_created_job_when_fetching_then_all_fields_round_trip() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir).await;
    let job = Job::new();

    repo.create(&job).await.unwrap();
    let stored = repo.get_by_id(job.id).await.unwrap().unwrap();

    assert_eq!(stored.id, job.id);
    assert_eq!(stored.status, JobStatus::Pending);
    assert_eq!(stored.storage_path, job.storage_path);
    assert_eq!(stored.created_at, job.created_at);
    assert!(stored.processed_at.is_none());
    assert!(stored.error_message.is_none());
    assert!(stored.results.is_empty());
}

#[tokio::test]
async fn given_unknown_id_when_fetching_then_returns_none() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir).await;

    let result = repo.get_by_id(Job::new().id).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn given_status_update_when_fetching_then_new_status_is_visible() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir).await;
    let job = Job::new();
    repo.create(&job).await.unwrap();

    repo.update_status(job.id, JobStatus::Processing, None)
        .await
        .unwrap();

    let stored = repo.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Processing);
}

#[tokio::test]
async fn given_failed_transition_when_fetching_then_error_message_is_persisted() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir).await;
    let job = Job::new();
    repo.create(&job).await.unwrap();

    repo.update_status(job.id, JobStatus::Failed, Some("document parse: document is empty"))
        .await
        .unwrap();

    let stored = repo.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert_eq!(
        stored.error_message.as_deref(),
        Some("document parse: document is empty")
    );
}

#[tokio::test]
async fn given_completion_when_fetching_then_results_and_timestamp_round_trip() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir).await;
    let job = Job::new();
    repo.create(&job).await.unwrap();

    let rules = vec![ExtractedRule {
        text: "Systems MUST validate input.".to_string(),
        category: RuleCategory::Requirement,
        section_path: "/doc/section[1]".to_string(),
        span: Some(TextSpan { start: 0, end: 28 }),
    }];
    let processed_at = Utc::now();

    repo.complete(job.id, &rules, processed_at).await.unwrap();

    let stored = repo.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Complete);
    assert_eq!(stored.results, rules);
    assert_eq!(stored.processed_at, Some(processed_at));
    assert!(stored.error_message.is_none());
}
