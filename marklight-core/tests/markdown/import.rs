//! Import tests for Markdown (Markdown → tree)

use marklight_core::formats::markdown::tokenizer::ParseOptions;
use marklight_core::model::{Block, Inline, InlineNode, Mark, MarkSet};
use marklight_core::{parse, try_parse, MarkdownParser};

fn paragraph(source: &str) -> Vec<Inline> {
    let doc = parse(source);
    match doc.content.into_iter().next() {
        Some(Block::Paragraph { content }) => content,
        other => panic!("expected paragraph, got {other:?}"),
    }
}

fn marked(text: &str, marks: Vec<Mark>) -> Inline {
    Inline::text(text, MarkSet::from_marks(marks))
}

#[test]
fn test_empty_source_is_single_empty_paragraph() {
    let doc = parse("");
    assert_eq!(doc.content, vec![Block::paragraph(Vec::new())]);
}

#[test]
fn test_tight_list_detection() {
    assert!(matches!(
        parse("- a\n- b").content[0],
        Block::BulletList { tight: true, .. }
    ));
    assert!(matches!(
        parse("- a\n\n- b").content[0],
        Block::BulletList { tight: false, .. }
    ));
}

#[test]
fn test_strikethrough_highlight_subscript() {
    assert_eq!(
        paragraph("~~gone~~ ==lit== H~2~O\n"),
        vec![
            marked("gone", vec![Mark::Strikethrough]),
            Inline::plain(" "),
            marked("lit", vec![Mark::Highlight]),
            Inline::plain(" H"),
            marked("2", vec![Mark::Subscript]),
            Inline::plain("O"),
        ]
    );
}

#[test]
fn test_subscript_rejects_whitespace() {
    assert_eq!(paragraph("a ~b c~ d\n"), vec![Inline::plain("a ~b c~ d")]);
}

#[test]
fn test_unmatched_highlight_stays_text() {
    assert_eq!(paragraph("a == b\n"), vec![Inline::plain("a == b")]);
}

#[test]
fn test_escaped_delimiters_are_text() {
    assert_eq!(paragraph("\\=\\=no\\=\\=\n"), vec![Inline::plain("==no==")]);
}

#[test]
fn test_link_mark_carries_href_and_title() {
    assert_eq!(
        paragraph("[x](https://a.io \"T\")\n"),
        vec![marked(
            "x",
            vec![Mark::Link {
                href: "https://a.io".into(),
                title: Some("T".into())
            }]
        )]
    );
}

#[test]
fn test_image_is_an_atom() {
    let content = paragraph("![alt text](img.png)\n");
    assert_eq!(
        content,
        vec![Inline::atom(
            InlineNode::Image {
                src: "img.png".into(),
                alt: "alt text".into(),
                title: None
            },
            MarkSet::new()
        )]
    );
}

#[test]
fn test_display_math_alone_is_a_block() {
    let doc = parse("$$a + b$$\n");
    assert_eq!(
        doc.content,
        vec![Block::MathBlock {
            latex: "a + b".into()
        }]
    );
}

#[test]
fn test_display_math_with_text_is_inline() {
    let content = paragraph("see $$x$$ here\n");
    assert_eq!(
        content[1].node,
        InlineNode::MathInline {
            latex: "x".into(),
            display: true
        }
    );
}

#[test]
fn test_footnote_ids_follow_first_reference() {
    let doc = parse("A[^b] and B[^a].\n\n[^a]: first def\n[^b]: second def\n");
    let Block::Paragraph { content } = &doc.content[0] else {
        panic!("expected paragraph");
    };
    let refs: Vec<(u32, &str)> = content
        .iter()
        .filter_map(|run| match &run.node {
            InlineNode::FootnoteRef { id, label } => Some((*id, label.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(refs, vec![(0, "b"), (1, "a")]);
    assert!(matches!(doc.content[1], Block::FootnoteBlock { .. }));
}

#[test]
fn test_heading_levels() {
    let doc = parse("# One\n\n###### Six\n");
    assert!(matches!(doc.content[0], Block::Heading { level: 1, .. }));
    assert!(matches!(doc.content[1], Block::Heading { level: 6, .. }));
}

#[test]
fn test_table_structure() {
    let doc = parse("| h1 | h2 |\n| --- | --- |\n| c1 | c2 |\n");
    let Block::Table { rows } = &doc.content[0] else {
        panic!("expected table");
    };
    assert_eq!(rows.len(), 2);
    let Block::TableRow { cells } = &rows[0] else {
        panic!("expected row");
    };
    assert!(matches!(cells[0], Block::TableHeader { .. }));
    let Block::TableRow { cells } = &rows[1] else {
        panic!("expected row");
    };
    assert_eq!(
        cells[1],
        Block::TableCell {
            content: vec![Inline::plain("c2")]
        }
    );
}

#[test]
fn test_definition_list() {
    let doc = parse("Term\n\n: Details here\n");
    let Block::DefinitionList { items } = &doc.content[0] else {
        panic!("expected definition list, got {:?}", doc.content[0]);
    };
    assert_eq!(
        items[0],
        Block::DefinitionTerm {
            content: vec![Inline::plain("Term")]
        }
    );
    assert!(matches!(items[1], Block::DefinitionDescription { .. }));
}

#[test]
fn test_html_is_dropped() {
    let doc = parse("<div>raw</div>\n\ntext <b>x</b>\n");
    assert_eq!(doc.content.len(), 1);
}

#[test]
fn test_disabled_extension_keeps_text() {
    let options = ParseOptions {
        highlight: false,
        ..ParseOptions::default()
    };
    let doc = MarkdownParser::new(options).parse("==x==\n");
    assert_eq!(doc.content, vec![Block::paragraph(vec![Inline::plain("==x==")])]);
}

#[test]
fn test_try_parse_succeeds_on_valid_input() {
    assert!(try_parse("# ok\n").is_ok());
}
