use std::borrow::Cow;
use std::io::{self, Write};

use crate::domain::{ExtractedRule, ExtractedTerm};

const RULES_HEADER: &str =
    "requirement_text,classification,section_xpath,section_relative_start,section_relative_end";
const TERMS_HEADER: &str = "term,definition,abbreviations";

/// Writes extracted rules as CSV with one row per rule. Unresolved offsets
/// serialize as empty cells.
pub fn write_rules_csv<W: Write>(rules: &[ExtractedRule], out: &mut W) -> io::Result<()> {
    write!(out, "{}\r\n", RULES_HEADER)?;

    for rule in rules {
        let (start, end) = match rule.span {
            Some(span) => (span.start.to_string(), span.end.to_string()),
            None => (String::new(), String::new()),
        };
        write!(
            out,
            "{},{},{},{},{}\r\n",
            escape(&rule.text),
            rule.category.as_str(),
            escape(&rule.section_path),
            start,
            end
        )?;
    }

    Ok(())
}

/// Writes term definitions as CSV; abbreviations are comma-joined into one
/// cell.
pub fn write_terms_csv<W: Write>(terms: &[ExtractedTerm], out: &mut W) -> io::Result<()> {
    write!(out, "{}\r\n", TERMS_HEADER)?;

    for term in terms {
        let abbreviations = term.abbreviations.join(", ");
        write!(
            out,
            "{},{},{}\r\n",
            escape(&term.term),
            escape(&term.definition),
            escape(&abbreviations)
        )?;
    }

    Ok(())
}

/// RFC 4180 field quoting: fields containing separators, quotes or line
/// breaks are wrapped in double quotes, with embedded quotes doubled.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
