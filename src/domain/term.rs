use serde::{Deserialize, Serialize};

/// A term-definition pair extracted from a terminology section. Definitions
/// are reported as returned by the capability, without positional anchoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTerm {
    pub term: String,
    pub definition: String,
    pub abbreviations: Vec<String>,
    pub section_path: String,
}
