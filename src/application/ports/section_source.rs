use async_trait::async_trait;

use crate::domain::Section;

/// Turns raw document bytes into the ordered list of sections to annotate.
/// Implementations parse tolerantly: malformed markup is recovered from as
/// far as possible, and only input with no recognizable structure at all is
/// an error.
#[async_trait]
pub trait SectionSource: Send + Sync {
    async fn sections(&self, data: &[u8]) -> Result<Vec<Section>, DocumentParseError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentParseError {
    #[error("document is empty")]
    Empty,
    #[error("document contains no parseable markup: {0}")]
    Unparseable(String),
}
