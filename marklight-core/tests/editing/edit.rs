//! Source-level deletes: remove one character of the rebuilt markdown and
//! re-parse the block.

use marklight_core::editing::delete_at_virtual_offset;
use marklight_core::editing::edit::structural_backspace;
use marklight_core::editing::Cursor;
use marklight_core::model::{Block, BlockPath, Inline, InlineNode, Mark, MarkSet};
use marklight_core::{parse, serialize, EditError};

fn first_paragraph(doc: &marklight_core::Document) -> &Vec<Inline> {
    match &doc.content[0] {
        Block::Paragraph { content } => content,
        other => panic!("expected paragraph, got {other:?}"),
    }
}

#[test]
fn test_deleting_last_closing_star_leaves_literal_star_and_emphasis() {
    let mut doc = parse("**hi**\n");
    let outcome = delete_at_virtual_offset(&mut doc, &BlockPath::new([0]), 5).unwrap();
    assert_eq!(outcome.source, "**hi*");
    assert_eq!(
        first_paragraph(&doc),
        &vec![
            Inline::plain("*"),
            Inline::text("hi", MarkSet::from_marks([Mark::Em])),
        ]
    );
    assert_eq!(outcome.cursor, 3);
}

#[test]
fn test_deleting_text_character() {
    let mut doc = parse("a **bc** d\n");
    let outcome = delete_at_virtual_offset(&mut doc, &BlockPath::new([0]), 4).unwrap();
    assert_eq!(outcome.source, "a **c** d");
    assert_eq!(serialize(&doc), "a **c** d\n");
    assert_eq!(outcome.cursor, 2);
}

#[test]
fn test_deleting_link_bracket_unlinks() {
    let mut doc = parse("[x](u)\n");
    let outcome = delete_at_virtual_offset(&mut doc, &BlockPath::new([0]), 0).unwrap();
    assert_eq!(outcome.source, "x](u)");
    assert_eq!(first_paragraph(&doc), &vec![Inline::plain("x](u)")]);
}

#[test]
fn test_abbreviations_survive_the_reparse() {
    let mut doc = parse("HTML!\n\n*[HTML]: HyperText Markup Language\n");
    delete_at_virtual_offset(&mut doc, &BlockPath::new([0]), 4).unwrap();
    let content = first_paragraph(&doc);
    assert_eq!(content.len(), 1);
    assert_eq!(
        content[0].marks,
        MarkSet::from_marks([Mark::Abbreviation {
            title: "HyperText Markup Language".into()
        }])
    );
}

#[test]
fn test_invalid_path_is_rejected() {
    let mut doc = parse("text\n");
    let result = delete_at_virtual_offset(&mut doc, &BlockPath::new([3]), 0);
    assert!(matches!(result, Err(EditError::InvalidPath(_))));
}

#[test]
fn test_edit_inside_list_item() {
    let mut doc = parse("- ==ab==\n");
    let outcome = delete_at_virtual_offset(&mut doc, &BlockPath::new([0, 0, 0]), 1).unwrap();
    assert_eq!(outcome.source, "=ab==");
    assert_eq!(serialize(&doc), "- \\=ab\\=\\=\n");
}

#[test]
fn test_task_item_backspace_lifts_to_paragraph() {
    let mut doc = parse("- [ ] one\n- [x] two\n");
    let cursor = structural_backspace(&mut doc, &Cursor::at_start(BlockPath::new([0, 0])));
    assert_eq!(cursor, Some(Cursor::at_start(BlockPath::new([0]))));
    assert_eq!(doc.content[0], Block::paragraph(vec![Inline::plain("one")]));
    assert!(matches!(doc.content[1], Block::TaskList { .. }));
}

#[test]
fn test_lifting_only_item_removes_the_list() {
    let mut doc = parse("- only\n");
    let cursor = structural_backspace(&mut doc, &Cursor::at_start(BlockPath::new([0, 0, 0])));
    assert_eq!(cursor, Some(Cursor::at_start(BlockPath::new([0]))));
    assert_eq!(doc.content, vec![Block::paragraph(vec![Inline::plain("only")])]);
}

#[test]
fn test_footnote_reference_survives_edit_beside_strong() {
    let mut doc = parse("**ab** note[^1]\n\n[^1]: The note.\n");
    delete_at_virtual_offset(&mut doc, &BlockPath::new([0]), 2).unwrap();
    assert_eq!(serialize(&doc), "**b** note[^1]\n\n[^1]: The note.\n");

    let mut doc = parse("**a** note[^1]\n\n[^1]: The note.\n");
    delete_at_virtual_offset(&mut doc, &BlockPath::new([0]), 2).unwrap();
    let content = first_paragraph(&doc);
    assert_eq!(
        content.last().map(|run| &run.node),
        Some(&InlineNode::FootnoteRef {
            id: 0,
            label: "1".to_string()
        })
    );
    assert!(serialize(&doc).ends_with(" note[^1]\n\n[^1]: The note.\n"));
}
