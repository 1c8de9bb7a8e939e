use crate::domain::TextSpan;

/// Locates `fragment` inside `section_text` and returns its character span,
/// or `None` when the fragment is not a literal substring (the capability
/// altered the text despite instructions). Ties are broken by the leftmost
/// occurrence. Offsets count characters so they line up with what a reader
/// of the section text sees, independent of UTF-8 encoding width.
pub fn locate_span(section_text: &str, fragment: &str) -> Option<TextSpan> {
    if fragment.is_empty() {
        return None;
    }

    let byte_start = section_text.find(fragment)?;
    let start = section_text[..byte_start].chars().count();
    let end = start + fragment.chars().count();

    Some(TextSpan { start, end })
}
