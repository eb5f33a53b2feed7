//! Abbreviation definitions: collected on parse, marked in text, re-emitted
//! at the end of the document on serialize.

use marklight_core::model::{Block, Inline, Mark, MarkSet};
use marklight_core::{parse, serialize};

#[test]
fn test_definitions_are_removed_from_content() {
    let doc = parse("The HTML spec.\n\n*[HTML]: HyperText Markup Language\n");
    assert_eq!(doc.content.len(), 1);
    assert_eq!(
        doc.abbreviations.get("HTML"),
        Some("HyperText Markup Language")
    );
}

#[test]
fn test_occurrences_carry_abbreviation_mark() {
    let doc = parse("The HTML spec.\n\n*[HTML]: HyperText Markup Language\n");
    let Block::Paragraph { content } = &doc.content[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(
        content,
        &vec![
            Inline::plain("The "),
            Inline::text(
                "HTML",
                MarkSet::from_marks([Mark::Abbreviation {
                    title: "HyperText Markup Language".into()
                }])
            ),
            Inline::plain(" spec."),
        ]
    );
}

#[test]
fn test_partial_words_are_not_marked() {
    let doc = parse("HTMLX and xHTML\n\n*[HTML]: HyperText Markup Language\n");
    let Block::Paragraph { content } = &doc.content[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(content, &vec![Inline::plain("HTMLX and xHTML")]);
}

#[test]
fn test_code_is_not_scanned() {
    let doc = parse("`HTML` HTML\n\n*[HTML]: HyperText Markup Language\n");
    let Block::Paragraph { content } = &doc.content[0] else {
        panic!("expected paragraph");
    };
    assert!(content[0].marks.has_type(marklight_core::model::MarkType::Code));
    assert!(!content[0]
        .marks
        .has_type(marklight_core::model::MarkType::Abbreviation));
}

#[test]
fn test_definitions_are_reemitted_at_document_end() {
    let source = "*[CSS]: Cascading Style Sheets\n\n# CSS guide\n\nWrite CSS.\n";
    let markdown = serialize(&parse(source));
    assert_eq!(
        markdown,
        "# CSS guide\n\nWrite CSS.\n\n*[CSS]: Cascading Style Sheets\n"
    );
}

#[test]
fn test_document_of_only_definitions() {
    let doc = parse("*[A]: Alpha\n");
    assert_eq!(doc.abbreviations.len(), 1);
    assert_eq!(serialize(&doc), "*[A]: Alpha\n");
}

#[test]
fn test_definition_lines_in_code_stay_code() {
    let doc = parse("```\n*[A]: b\n```\n");
    assert!(doc.abbreviations.is_empty());
    assert_eq!(
        doc.content[0],
        Block::CodeBlock {
            params: String::new(),
            text: "*[A]: b".to_string()
        }
    );
    assert_eq!(serialize(&doc), "```\n*[A]: b\n```\n");
}
