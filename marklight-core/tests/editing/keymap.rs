//! Key sequences through the keymap.

use marklight_core::editing::{handle_key, Cursor, EditorState, Key};
use marklight_core::model::{Block, BlockPath};
use marklight_core::{parse, serialize};

fn state(source: &str, block: &[usize], offset: usize) -> EditorState {
    EditorState::at(parse(source), Cursor::new(BlockPath::new(block.to_vec()), offset))
}

fn press(state: EditorState, keys: &[&str]) -> EditorState {
    keys.iter()
        .map(|name| Key::from_name(name))
        .fold(state, |state, key| handle_key(state, &key))
}

#[test]
fn test_typing_into_empty_document() {
    let next = press(EditorState::new(parse("")), &["h", "i", "Space", "!"]);
    assert_eq!(serialize(&next.doc), "hi !\n");
    assert_eq!(next.cursor().offset, 4);
}

#[test]
fn test_backspace_through_closing_delimiter() {
    let next = press(
        state("**bold** text\n", &[0], 4),
        &["ArrowRight", "ArrowRight", "Backspace"],
    );
    assert_eq!(serialize(&next.doc), "\\**bold* text\n");
    assert_eq!(next.cursor().offset, 5);
    assert_eq!(next.nav, None);
}

#[test]
fn test_arrow_right_leaves_delimiter_then_moves() {
    let next = press(
        state("**ab** c\n", &[0], 2),
        &["ArrowRight", "ArrowRight", "ArrowRight"],
    );
    assert_eq!(next.nav, None);
    assert_eq!(next.cursor().offset, 3);
}

#[test]
fn test_arrows_cross_block_boundaries() {
    let next = press(state("ab\n\ncd\n", &[0], 2), &["ArrowRight"]);
    assert_eq!(next.cursor(), &Cursor::at_start(BlockPath::new([1])));
    let back = press(next, &["ArrowLeft"]);
    assert_eq!(back.cursor(), &Cursor::new(BlockPath::new([0]), 2));
}

#[test]
fn test_backspace_at_heading_start_demotes() {
    let next = press(state("# Title\n", &[0], 0), &["Backspace"]);
    assert_eq!(serialize(&next.doc), "Title\n");
}

#[test]
fn test_backspace_at_marked_heading_start_demotes_before_touching_delimiters() {
    let next = press(state("# **Bold** title\n", &[0], 0), &["Backspace"]);
    assert_eq!(serialize(&next.doc), "**Bold** title\n");
    assert_eq!(next.cursor(), &Cursor::at_start(BlockPath::new([0])));
}

#[test]
fn test_backspace_inside_opening_delimiter_edits_the_heading_source() {
    let next = press(state("# **Bold** title\n", &[0], 0), &["ArrowLeft", "Backspace"]);
    assert!(matches!(next.doc.content[0], Block::Heading { level: 1, .. }));
    assert_eq!(serialize(&next.doc), "# *Bold*\\* title\n");
    assert_eq!(next.nav, None);
}

#[test]
fn test_backspace_at_item_start_lifts_it() {
    let next = press(state("- a\n- b\n", &[0, 1, 0], 0), &["Backspace"]);
    assert_eq!(serialize(&next.doc), "- a\n\nb\n");
    assert_eq!(next.cursor(), &Cursor::at_start(BlockPath::new([1])));
}

#[test]
fn test_backspace_at_document_start_is_a_no_op() {
    let before = parse("text\n");
    let next = press(EditorState::at(before.clone(), Cursor::at_start(BlockPath::new([0]))), &["Backspace"]);
    assert_eq!(next.doc, before);
}

#[test]
fn test_delete_forward_at_end_is_a_no_op() {
    let next = press(state("ab\n", &[0], 2), &["Delete"]);
    assert_eq!(serialize(&next.doc), "ab\n");
}

#[test]
fn test_typed_text_is_escaped_on_serialize() {
    let next = press(state("ab\n", &[0], 2), &["*"]);
    assert_eq!(serialize(&next.doc), "ab\\*\n");
}
