use async_trait::async_trait;

use crate::application::ports::{Annotator, AnnotatorError, RuleCandidate, TermCandidate};
use crate::domain::{RuleCategory, SectionClass};

/// Deterministic keyword-driven annotator for offline runs and wiring
/// tests. Classification and extraction follow the modal-verb conventions
/// of standards prose; nothing leaves the process.
pub struct MockAnnotator;

const REQUIREMENT_WORDS: &[&str] = &["MUST", "SHALL", "REQUIRED"];
const RECOMMENDATION_WORDS: &[&str] = &["SHOULD", "RECOMMENDED"];
const PERMISSION_WORDS: &[&str] = &["MAY", "OPTIONAL", "PERMITTED"];
const POSSIBILITY_WORDS: &[&str] = &["CAN", "MIGHT"];

const TERMINOLOGY_HINTS: &[&str] = &["definition", "terminolog", "glossary", "abbreviation"];

#[async_trait]
impl Annotator for MockAnnotator {
    async fn classify_section(
        &self,
        text: &str,
        title: &str,
    ) -> Result<SectionClass, AnnotatorError> {
        let title_lower = title.to_lowercase();
        if TERMINOLOGY_HINTS.iter().any(|hint| title_lower.contains(hint)) {
            return Ok(SectionClass::Terminology);
        }

        if text.split_whitespace().any(is_rule_keyword) {
            return Ok(SectionClass::Normative);
        }

        Ok(SectionClass::Other)
    }

    async fn extract_rules(&self, text: &str) -> Result<Vec<RuleCandidate>, AnnotatorError> {
        let candidates = text
            .split_inclusive('.')
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .filter_map(|sentence| {
                category_of(sentence).map(|category| RuleCandidate {
                    text: sentence.to_string(),
                    category,
                })
            })
            .collect();

        Ok(candidates)
    }

    async fn extract_terms(&self, text: &str) -> Result<Vec<TermCandidate>, AnnotatorError> {
        // One pair per "TERM — definition" segment; an all-caps term is its
        // own abbreviation.
        let candidates = text
            .split(&['\u{2014}', '\u{2013}'][..])
            .collect::<Vec<_>>()
            .windows(2)
            .filter_map(|pair| {
                let term = pair[0].split_whitespace().last()?.trim_matches(',');
                let definition = pair[1].trim();
                if term.is_empty() || definition.is_empty() {
                    return None;
                }
                let abbreviations = if term.len() > 1
                    && term.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                {
                    vec![term.to_string()]
                } else {
                    Vec::new()
                };
                Some(TermCandidate {
                    term: term.to_string(),
                    definition: definition.to_string(),
                    abbreviations,
                })
            })
            .collect();

        Ok(candidates)
    }
}

fn is_rule_keyword(word: &str) -> bool {
    let word = word.trim_matches(|c: char| !c.is_ascii_alphabetic());
    REQUIREMENT_WORDS.contains(&word)
        || RECOMMENDATION_WORDS.contains(&word)
        || PERMISSION_WORDS.contains(&word)
}

fn category_of(sentence: &str) -> Option<RuleCategory> {
    let words: Vec<&str> = sentence
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_ascii_alphabetic()))
        .collect();

    if words.iter().any(|w| REQUIREMENT_WORDS.contains(w)) {
        Some(RuleCategory::Requirement)
    } else if words.iter().any(|w| RECOMMENDATION_WORDS.contains(w)) {
        Some(RuleCategory::Recommendation)
    } else if words.iter().any(|w| PERMISSION_WORDS.contains(w)) {
        Some(RuleCategory::Permission)
    } else if words.iter().any(|w| POSSIBILITY_WORDS.contains(w)) {
        Some(RuleCategory::Possibility)
    } else {
        None
    }
}
