use async_trait::async_trait;

use crate::application::ports::{DocumentParseError, SectionSource};
use crate::domain::Section;

use super::document_tree::DocumentTree;

const SECTION_TAG: &str = "section";
const TITLE_TAG: &str = "title";

/// Locates `<section>` elements in XML documents. Each section's body is
/// the whitespace-collapsed concatenation of its descendant text; this one
/// normalized string is what gets classified, extracted from, and searched
/// for offsets, so the three always agree.
pub struct XmlSectionSource;

#[async_trait]
impl SectionSource for XmlSectionSource {
    async fn sections(&self, data: &[u8]) -> Result<Vec<Section>, DocumentParseError> {
        let tree = DocumentTree::parse(data)?;
        Ok(locate_sections(&tree))
    }
}

/// Every section of the tree, in document order. Title falls back to the
/// empty string when the section has no `<title>` descendant.
pub fn locate_sections(tree: &DocumentTree) -> Vec<Section> {
    tree.elements_in_document_order()
        .into_iter()
        .filter(|node| tree.tag(*node) == SECTION_TAG)
        .map(|node| {
            let title = tree
                .first_descendant(node, TITLE_TAG)
                .map(|title_node| normalize_whitespace(&tree.descendant_text(title_node)))
                .unwrap_or_default();

            Section {
                title,
                text: normalize_whitespace(&tree.descendant_text(node)),
                path: tree.path(node),
            }
        })
        .collect()
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_was_space = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }

    out
}
