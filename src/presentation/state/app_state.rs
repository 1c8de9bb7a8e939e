use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, StagingStore};
use crate::application::services::{ExtractionPipeline, ParseMessage};

pub struct AppState {
    pub pipeline: Arc<ExtractionPipeline>,
    pub job_repository: Arc<dyn JobRepository>,
    pub staging_store: Arc<dyn StagingStore>,
    pub parse_sender: mpsc::Sender<ParseMessage>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            job_repository: Arc::clone(&self.job_repository),
            staging_store: Arc::clone(&self.staging_store),
            parse_sender: self.parse_sender.clone(),
        }
    }
}
