use klaksvik::application::ports::{DocumentParseError, SectionSource};
use klaksvik::infrastructure::text_processing::{
    locate_sections, normalize_whitespace, DocumentTree, XmlSectionSource,
};

const TWO_SECTIONS: &str = r#"<standard>
  <section>
    <title>Scope</title>
    <p>This document applies to network services.</p>
  </section>
  <section>
    <title>Terms</title>
    <p>API means Application Programming Interface.</p>
  </section>
</standard>"#;

#[test]
fn given_two_sections_when_locating_then_returns_document_order() {
    let tree = DocumentTree::parse(TWO_SECTIONS.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Scope");
    assert_eq!(sections[1].title, "Terms");
    assert_eq!(sections[0].path, "/standard/section[1]");
    assert_eq!(sections[1].path, "/standard/section[2]");
}

#[test]
fn given_section_text_when_locating_then_whitespace_is_collapsed() {
    let xml = "<doc>\n  <section>\n    <title>T</title>\n    <p>Systems MUST\n       validate input.</p>\n    <p>Systems SHOULD log errors.</p>\n  </section>\n</doc>";
    let tree = DocumentTree::parse(xml.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert_eq!(
        sections[0].text,
        "T Systems MUST validate input. Systems SHOULD log errors."
    );
}

#[test]
fn given_unique_tags_when_computing_path_then_position_index_is_omitted() {
    let xml = "<doc><intro>Hi</intro><section><title>T</title></section></doc>";
    let tree = DocumentTree::parse(xml.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].path, "/doc/section");
}

#[test]
fn given_nested_sections_when_locating_then_outer_precedes_inner() {
    let xml = "<doc><section><title>Outer</title><section><title>Inner</title></section></section></doc>";
    let tree = DocumentTree::parse(xml.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Outer");
    assert_eq!(sections[1].title, "Inner");
    assert_eq!(sections[0].path, "/doc/section");
    assert_eq!(sections[1].path, "/doc/section/section");
}

#[test]
fn given_untitled_section_when_locating_then_title_is_empty() {
    let xml = "<doc><section><p>Body only.</p></section></doc>";
    let tree = DocumentTree::parse(xml.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert_eq!(sections[0].title, "");
    assert_eq!(sections[0].text, "Body only.");
}

#[test]
fn given_truncated_markup_when_parsing_then_preceding_sections_survive() {
    let xml = "<doc><section><title>A</title><p>Body text here.</p></section><section><title>B</title><p attr=";
    let tree = DocumentTree::parse(xml.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert!(!sections.is_empty());
    assert_eq!(sections[0].title, "A");
    assert!(sections[0].text.contains("Body text here."));
}

#[test]
fn given_mismatched_end_tags_when_parsing_then_tree_is_still_built() {
    let xml = "<doc><section><title>A</title><p>Text</q></section></doc>";
    let tree = DocumentTree::parse(xml.as_bytes()).unwrap();

    let sections = locate_sections(&tree);

    assert_eq!(sections.len(), 1);
    assert!(sections[0].text.contains("Text"));
}

#[test]
fn given_empty_input_when_parsing_then_fails_with_empty_error() {
    let result = DocumentTree::parse(b"");

    assert!(matches!(result, Err(DocumentParseError::Empty)));
}

#[test]
fn given_whitespace_only_input_when_parsing_then_fails_with_empty_error() {
    let result = DocumentTree::parse(b"   \n\t  ");

    assert!(matches!(result, Err(DocumentParseError::Empty)));
}

#[test]
fn given_binary_junk_when_parsing_then_fails_with_unparseable_error() {
    let result = DocumentTree::parse(&[0x00, 0x01, 0x02, 0xFF, 0x42]);

    assert!(matches!(result, Err(DocumentParseError::Unparseable(_))));
}

#[tokio::test]
async fn given_document_without_sections_when_sourcing_then_returns_empty_list() {
    let source = XmlSectionSource;

    let sections = source
        .sections(b"<doc><preface>No sections here.</preface></doc>")
        .await
        .unwrap();

    assert!(sections.is_empty());
}

#[test]
fn given_repeated_location_when_computing_paths_then_paths_are_stable() {
    let tree = DocumentTree::parse(TWO_SECTIONS.as_bytes()).unwrap();

    let first = locate_sections(&tree);
    let second = locate_sections(&tree);

    assert_eq!(first, second);
}

#[test]
fn given_padded_text_when_normalizing_then_runs_collapse_to_single_spaces() {
    assert_eq!(
        normalize_whitespace("  a\t\tb\n\nc  "),
        "a b c".to_string()
    );
    assert_eq!(normalize_whitespace(""), "");
}
