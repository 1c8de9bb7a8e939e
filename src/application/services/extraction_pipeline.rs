use std::sync::Arc;

use crate::application::ports::{Annotator, DocumentParseError, SectionSource};
use crate::domain::{ExtractedRule, ExtractedTerm, Section, SectionClass};

use super::offset::locate_span;

/// The classification → targeted-extraction → offset-reconciliation
/// pipeline. Sections are processed sequentially in document order; every
/// annotation failure degrades to an empty contribution for that section
/// only, so a single bad section never aborts the document. Only a total
/// document-parse failure is fatal.
pub struct ExtractionPipeline {
    section_source: Arc<dyn SectionSource>,
    annotator: Arc<dyn Annotator>,
}

/// Aggregated results, preserving section order and intra-section
/// extraction order. No deduplication across sections: a term defined in
/// two sections yields two entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    pub rules: Vec<ExtractedRule>,
    pub terms: Vec<ExtractedTerm>,
}

impl ExtractionPipeline {
    pub fn new(section_source: Arc<dyn SectionSource>, annotator: Arc<dyn Annotator>) -> Self {
        Self {
            section_source,
            annotator,
        }
    }

    pub async fn run(&self, document: &[u8]) -> Result<PipelineOutput, PipelineError> {
        let sections = self.section_source.sections(document).await?;

        if sections.is_empty() {
            tracing::info!("No section elements found");
            return Ok(PipelineOutput::default());
        }

        let mut output = PipelineOutput::default();

        for section in &sections {
            let class = self.classify(section).await;
            tracing::debug!(path = %section.path, class = %class, "Section classified");

            match class {
                SectionClass::Normative => {
                    output.rules.extend(self.rules_for(section).await);
                }
                SectionClass::Terminology => {
                    output.terms.extend(self.terms_for(section).await);
                }
                SectionClass::Other => {
                    tracing::debug!(path = %section.path, title = %section.title, "Skipping section");
                }
            }
        }

        Ok(output)
    }

    /// Fail-open: any annotator error yields `Other`, which skips the
    /// section instead of aborting the document.
    async fn classify(&self, section: &Section) -> SectionClass {
        match self
            .annotator
            .classify_section(&section.text, &section.title)
            .await
        {
            Ok(class) => class,
            Err(e) => {
                tracing::warn!(
                    path = %section.path,
                    error = %e,
                    "Classification failed; treating section as other"
                );
                SectionClass::Other
            }
        }
    }

    async fn rules_for(&self, section: &Section) -> Vec<ExtractedRule> {
        let candidates = match self.annotator.extract_rules(&section.text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    path = %section.path,
                    error = %e,
                    "Rule extraction failed; section contributes no rules"
                );
                return Vec::new();
            }
        };

        candidates
            .into_iter()
            .map(|candidate| {
                let span = locate_span(&section.text, &candidate.text);
                if span.is_none() {
                    tracing::warn!(
                        path = %section.path,
                        rule = %candidate.text,
                        "Extracted rule not found in section text; keeping it without offsets"
                    );
                }
                ExtractedRule {
                    text: candidate.text,
                    category: candidate.category,
                    section_path: section.path.clone(),
                    span,
                }
            })
            .collect()
    }

    async fn terms_for(&self, section: &Section) -> Vec<ExtractedTerm> {
        let candidates = match self.annotator.extract_terms(&section.text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    path = %section.path,
                    error = %e,
                    "Term extraction failed; section contributes no definitions"
                );
                return Vec::new();
            }
        };

        candidates
            .into_iter()
            .map(|candidate| ExtractedTerm {
                term: candidate.term,
                definition: candidate.definition,
                abbreviations: candidate.abbreviations,
                section_path: section.path.clone(),
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("document parse: {0}")]
    Parse(#[from] DocumentParseError),
}
