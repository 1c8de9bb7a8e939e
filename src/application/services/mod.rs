mod export;
mod extraction_pipeline;
mod offset;
mod parse_worker;

pub use export::{write_rules_csv, write_terms_csv};
pub use extraction_pipeline::{ExtractionPipeline, PipelineError, PipelineOutput};
pub use offset::locate_span;
pub use parse_worker::{ParseMessage, ParseWorker, ParseWorkerError};
