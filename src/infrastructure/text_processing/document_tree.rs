use quick_xml::events::Event;
use quick_xml::Reader;

use crate::application::ports::DocumentParseError;

/// In-memory element tree built once from raw document bytes, immutable
/// after construction. Parsing runs in recovery mode: end-tag name checks
/// are disabled and a hard reader error keeps whatever was built so far,
/// so a truncated document still exposes every element that precedes the
/// damage. Only input yielding no elements at all is rejected.
///
/// Nodes are arena-allocated and addressed by [`NodeId`]; each element
/// keeps its text and child elements interleaved in document order.
pub struct DocumentTree {
    nodes: Vec<Node>,
}

/// Opaque handle to an element of a [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

struct Node {
    tag: String,
    parent: Option<usize>,
    content: Vec<NodeContent>,
}

enum NodeContent {
    Text(String),
    Element(usize),
}

const ROOT: usize = 0;

impl DocumentTree {
    pub fn parse(data: &[u8]) -> Result<Self, DocumentParseError> {
        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(DocumentParseError::Empty);
        }

        let mut reader = Reader::from_reader(data);
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;

        let mut nodes = vec![Node {
            tag: String::new(),
            parent: None,
            content: Vec::new(),
        }];
        let mut stack = vec![ROOT];
        let mut element_count = 0usize;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let idx = push_element(&mut nodes, &mut stack, tag_of(e.local_name().as_ref()));
                    stack.push(idx);
                    element_count += 1;
                }
                Ok(Event::Empty(e)) => {
                    push_element(&mut nodes, &mut stack, tag_of(e.local_name().as_ref()));
                    element_count += 1;
                }
                Ok(Event::End(_)) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(_) => String::from_utf8_lossy(&e).into_owned(),
                    };
                    push_text(&mut nodes, &stack, text);
                }
                Ok(Event::CData(e)) => {
                    push_text(&mut nodes, &stack, String::from_utf8_lossy(&e).into_owned());
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    if element_count == 0 {
                        return Err(DocumentParseError::Unparseable(e.to_string()));
                    }
                    // Recovery mode: keep the partial tree built before the
                    // damage instead of failing the whole document.
                    tracing::warn!(
                        error = %e,
                        position = reader.buffer_position(),
                        "Malformed markup; keeping partial document tree"
                    );
                    break;
                }
            }
            buf.clear();
        }

        if element_count == 0 {
            return Err(DocumentParseError::Unparseable(
                "no element content".to_string(),
            ));
        }

        Ok(Self { nodes })
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    /// All elements, first-to-last by position in the document.
    pub fn elements_in_document_order(&self) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        self.collect_elements(ROOT, &mut ordered);
        ordered
    }

    /// First descendant with the given tag, in document order; the node
    /// itself is not considered.
    pub fn first_descendant(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut descendants = Vec::new();
        self.collect_elements(id.0, &mut descendants);
        descendants
            .into_iter()
            .find(|node| self.nodes[node.0].tag == tag)
    }

    /// Concatenation of all descendant text, in document order, exactly as
    /// it appeared in the markup.
    pub fn descendant_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(id.0, &mut text);
        text
    }

    /// Canonical structural path from the root, one step per ancestor. The
    /// position index is omitted when the element has no sibling of the
    /// same tag, e.g. `/standard/section[2]/title`.
    pub fn path(&self, id: NodeId) -> String {
        let mut steps = Vec::new();
        let mut current = id.0;

        while let Some(parent) = self.nodes[current].parent {
            let tag = &self.nodes[current].tag;
            let same_tag: Vec<usize> = self.nodes[parent]
                .content
                .iter()
                .filter_map(|content| match content {
                    NodeContent::Element(idx) if self.nodes[*idx].tag == *tag => Some(*idx),
                    _ => None,
                })
                .collect();

            if same_tag.len() == 1 {
                steps.push(tag.clone());
            } else {
                let position = same_tag.iter().position(|idx| *idx == current).unwrap_or(0) + 1;
                steps.push(format!("{}[{}]", tag, position));
            }

            current = parent;
        }

        steps.reverse();
        format!("/{}", steps.join("/"))
    }

    fn collect_elements(&self, idx: usize, out: &mut Vec<NodeId>) {
        for content in &self.nodes[idx].content {
            if let NodeContent::Element(child) = content {
                out.push(NodeId(*child));
                self.collect_elements(*child, out);
            }
        }
    }

    fn collect_text(&self, idx: usize, out: &mut String) {
        for content in &self.nodes[idx].content {
            match content {
                NodeContent::Text(text) => out.push_str(text),
                NodeContent::Element(child) => self.collect_text(*child, out),
            }
        }
    }
}

fn tag_of(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn push_element(nodes: &mut Vec<Node>, stack: &mut [usize], tag: String) -> usize {
    let parent = *stack.last().unwrap_or(&ROOT);
    let idx = nodes.len();
    nodes.push(Node {
        tag,
        parent: Some(parent),
        content: Vec::new(),
    });
    nodes[parent].content.push(NodeContent::Element(idx));
    idx
}

fn push_text(nodes: &mut [Node], stack: &[usize], text: String) {
    if text.is_empty() {
        return;
    }
    let current = *stack.last().unwrap_or(&ROOT);
    nodes[current].content.push(NodeContent::Text(text));
}
