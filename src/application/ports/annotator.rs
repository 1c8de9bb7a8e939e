use async_trait::async_trait;

use crate::domain::{RuleCategory, SectionClass};

/// The external annotation capability: classifies sections and extracts
/// rules or term definitions from their text. Implementations are expected
/// to request deterministic output and return text verbatim; callers treat
/// every error as a per-section degradation, never a pipeline failure.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn classify_section(
        &self,
        text: &str,
        title: &str,
    ) -> Result<SectionClass, AnnotatorError>;

    async fn extract_rules(&self, text: &str) -> Result<Vec<RuleCandidate>, AnnotatorError>;

    async fn extract_terms(&self, text: &str) -> Result<Vec<TermCandidate>, AnnotatorError>;
}

/// A rule as returned by the capability, before offset reconciliation
/// anchors it to its owning section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCandidate {
    pub text: String,
    pub category: RuleCategory,
}

/// A term-definition pair as returned by the capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCandidate {
    pub term: String,
    pub definition: String,
    pub abbreviations: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnnotatorError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
