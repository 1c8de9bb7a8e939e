use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{ExtractedRule, Job, JobId, JobStatus, StoragePath};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id            TEXT PRIMARY KEY,
    status        TEXT NOT NULL,
    storage_path  TEXT NOT NULL,
    error_message TEXT,
    created_at    TEXT NOT NULL,
    processed_at  TEXT,
    results       TEXT
)
"#;

/// Durable job store backed by sqlite. Extracted rules live in a JSON
/// column; the `complete` transition writes status, results and the
/// processing timestamp in a single statement.
pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub async fn connect(db_path: &Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let results = serde_json::to_string(&job.results)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO jobs (id, status, storage_path, error_message, created_at, processed_at, results)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(job.id.as_uuid().to_string())
        .bind(job.status.as_str())
        .bind(job.storage_path.as_str())
        .bind(job.error_message.as_deref())
        .bind(job.created_at.to_rfc3339())
        .bind(job.processed_at.map(|ts| ts.to_rfc3339()))
        .bind(results)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, status, storage_path, error_message, created_at, processed_at, results
            FROM jobs
            WHERE id = ?1
            "#,
        )
        .bind(id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(job_from_row).transpose()
    }

    #[instrument(skip(self, error_message), fields(job_id = %id.as_uuid(), status = %status))]
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = ?1, error_message = ?2
            WHERE id = ?3
            "#,
        )
        .bind(status.as_str())
        .bind(error_message)
        .bind(id.as_uuid().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, results), fields(job_id = %id.as_uuid(), rules = results.len()))]
    async fn complete(
        &self,
        id: JobId,
        results: &[ExtractedRule],
        processed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let results = serde_json::to_string(results)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = ?1, results = ?2, processed_at = ?3, error_message = NULL
            WHERE id = ?4
            "#,
        )
        .bind(JobStatus::Complete.as_str())
        .bind(results)
        .bind(processed_at.to_rfc3339())
        .bind(id.as_uuid().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

fn job_from_row(row: SqliteRow) -> Result<Job, RepositoryError> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    let status: String = row.get("status");
    let status = status
        .parse::<JobStatus>()
        .map_err(RepositoryError::QueryFailed)?;

    let storage_path: String = row.get("storage_path");

    let created_at: String = row.get("created_at");
    let created_at = parse_timestamp(&created_at)?;

    let processed_at: Option<String> = row.get("processed_at");
    let processed_at = processed_at
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    let results: Option<String> = row.get("results");
    let results = match results {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        None => Vec::new(),
    };

    Ok(Job {
        id: JobId::from_uuid(id),
        status,
        storage_path: StoragePath::from_raw(storage_path),
        error_message: row.get("error_message"),
        created_at,
        processed_at,
        results,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
}
