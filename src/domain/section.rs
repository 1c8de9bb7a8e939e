use std::fmt;
use std::str::FromStr;

/// One titled content unit of a structured document, located by its
/// structural path in the document tree. `text` is the whitespace-collapsed
/// concatenation of all descendant text nodes; it is the exact string sent
/// to the annotation capability, so extraction offsets are relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub text: String,
    pub path: String,
}

/// Purpose of a section, assigned once by the annotation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionClass {
    Terminology,
    Normative,
    Other,
}

impl SectionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionClass::Terminology => "terminology",
            SectionClass::Normative => "normative_content",
            SectionClass::Other => "other",
        }
    }
}

impl FromStr for SectionClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terminology" => Ok(SectionClass::Terminology),
            "normative_content" => Ok(SectionClass::Normative),
            "other" => Ok(SectionClass::Other),
            _ => Err(format!("Invalid section class: {}", s)),
        }
    }
}

impl fmt::Display for SectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
