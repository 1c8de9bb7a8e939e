use klaksvik::application::services::{write_rules_csv, write_terms_csv};
use klaksvik::domain::{ExtractedRule, ExtractedTerm, RuleCategory, TextSpan};

#[test]
fn given_rules_when_exporting_then_rows_match_fixed_columns() {
    let rules = vec![
        ExtractedRule {
            text: "Systems MUST validate input.".to_string(),
            category: RuleCategory::Requirement,
            section_path: "/doc/section[1]".to_string(),
            span: Some(TextSpan { start: 0, end: 28 }),
        },
        ExtractedRule {
            text: "Operators MAY disable logging.".to_string(),
            category: RuleCategory::Permission,
            section_path: "/doc/section[2]".to_string(),
            span: None,
        },
    ];

    let mut out = Vec::new();
    write_rules_csv(&rules, &mut out).unwrap();

    let csv = String::from_utf8(out).unwrap();
    assert_eq!(
        csv,
        "requirement_text,classification,section_xpath,section_relative_start,section_relative_end\r\n\
         Systems MUST validate input.,requirement,/doc/section[1],0,28\r\n\
         Operators MAY disable logging.,permission,/doc/section[2],,\r\n"
    );
}

#[test]
fn given_fields_with_separators_when_exporting_then_fields_are_quoted() {
    let rules = vec![ExtractedRule {
        text: "Values \"a\", \"b\" MUST match.".to_string(),
        category: RuleCategory::Requirement,
        section_path: "/doc/section".to_string(),
        span: None,
    }];

    let mut out = Vec::new();
    write_rules_csv(&rules, &mut out).unwrap();

    let csv = String::from_utf8(out).unwrap();
    assert!(csv.contains("\"Values \"\"a\"\", \"\"b\"\" MUST match.\""));
}

#[test]
fn given_terms_when_exporting_then_abbreviations_are_comma_joined() {
    let terms = vec![ExtractedTerm {
        term: "API".to_string(),
        definition: "A set of protocols.".to_string(),
        abbreviations: vec!["API".to_string(), "IF".to_string()],
        section_path: "/doc/section".to_string(),
    }];

    let mut out = Vec::new();
    write_terms_csv(&terms, &mut out).unwrap();

    let csv = String::from_utf8(out).unwrap();
    assert_eq!(
        csv,
        "term,definition,abbreviations\r\nAPI,A set of protocols.,\"API, IF\"\r\n"
    );
}

#[test]
fn given_term_without_abbreviations_when_exporting_then_cell_is_empty() {
    let terms = vec![ExtractedTerm {
        term: "Section".to_string(),
        definition: "A titled content unit.".to_string(),
        abbreviations: vec![],
        section_path: "/doc/section".to_string(),
    }];

    let mut out = Vec::new();
    write_terms_csv(&terms, &mut out).unwrap();

    let csv = String::from_utf8(out).unwrap();
    assert_eq!(
        csv,
        "term,definition,abbreviations\r\nSection,A titled content unit.,\r\n"
    );
}
