mod document_tree;
mod xml_section_source;

pub use document_tree::{DocumentTree, NodeId};
pub use xml_section_source::{locate_sections, normalize_whitespace, XmlSectionSource};
