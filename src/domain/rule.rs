use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A normative rule extracted verbatim from a section. `span` anchors the
/// rule back to its section text, or is `None` when the capability altered
/// the text and the fragment could not be located (the rule is retained
/// positionless).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRule {
    pub text: String,
    pub category: RuleCategory,
    pub section_path: String,
    pub span: Option<TextSpan>,
}

/// Character span `[start, end)` into the owning section's normalized text.
/// Offsets count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Requirement,
    Recommendation,
    Permission,
    Possibility,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Requirement => "requirement",
            RuleCategory::Recommendation => "recommendation",
            RuleCategory::Permission => "permission",
            RuleCategory::Possibility => "possibility",
        }
    }
}

impl FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requirement" => Ok(RuleCategory::Requirement),
            "recommendation" => Ok(RuleCategory::Recommendation),
            "permission" => Ok(RuleCategory::Permission),
            "possibility" => Ok(RuleCategory::Possibility),
            _ => Err(format!("Invalid rule category: {}", s)),
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
