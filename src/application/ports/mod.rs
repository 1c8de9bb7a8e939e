mod annotator;
mod job_repository;
mod repository_error;
mod section_source;
mod staging_store;

pub use annotator::{Annotator, AnnotatorError, RuleCandidate, TermCandidate};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
pub use section_source::{DocumentParseError, SectionSource};
pub use staging_store::{StagingStore, StagingStoreError};
