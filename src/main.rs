use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use klaksvik::application::ports::{Annotator, JobRepository, StagingStore};
use klaksvik::application::services::{ExtractionPipeline, ParseWorker};
use klaksvik::infrastructure::llm::{MockAnnotator, OpenAiAnnotator, TokenBucket};
use klaksvik::infrastructure::observability::{init_tracing, TracingConfig};
use klaksvik::infrastructure::persistence::SqliteJobRepository;
use klaksvik::infrastructure::storage::LocalStagingStore;
use klaksvik::infrastructure::text_processing::XmlSectionSource;
use klaksvik::presentation::{create_router, AnnotatorProvider, AppState, Settings};

const PARSE_QUEUE_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "klaksvik.toml".to_string());
    let settings = Settings::load(&PathBuf::from(config_path))?;

    init_tracing(TracingConfig {
        level: settings.logging.level.clone(),
        json_format: settings.logging.json,
    });

    let job_repository: Arc<dyn JobRepository> =
        Arc::new(SqliteJobRepository::connect(&settings.database.path).await?);
    let staging_store: Arc<dyn StagingStore> =
        Arc::new(LocalStagingStore::new(settings.storage.root_dir.clone())?);

    let annotator: Arc<dyn Annotator> = match settings.llm.provider {
        AnnotatorProvider::OpenAi if !settings.llm.api_key.is_empty() => {
            Arc::new(OpenAiAnnotator::new(
                settings.llm.api_key.clone(),
                settings.llm.model.clone(),
                Duration::from_secs(settings.llm.request_timeout_secs),
                TokenBucket::new(settings.llm.burst, settings.llm.requests_per_minute),
            ))
        }
        AnnotatorProvider::OpenAi => {
            tracing::warn!("OPENAI_API_KEY is not set; falling back to the mock annotator");
            Arc::new(MockAnnotator)
        }
        AnnotatorProvider::Mock => Arc::new(MockAnnotator),
    };

    let pipeline = Arc::new(ExtractionPipeline::new(
        Arc::new(XmlSectionSource),
        annotator,
    ));

    let (parse_sender, parse_receiver) = mpsc::channel(PARSE_QUEUE_CAPACITY);
    let worker = ParseWorker::new(
        parse_receiver,
        Arc::clone(&pipeline),
        Arc::clone(&job_repository),
        Arc::clone(&staging_store),
    );
    tokio::spawn(worker.run());

    let state = AppState {
        pipeline,
        job_repository,
        staging_store,
        parse_sender,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
