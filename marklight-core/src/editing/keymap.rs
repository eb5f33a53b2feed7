//! Key handling
//!
//! Threads the editor state (tree, selection, delimiter navigation) through
//! one key event and returns the next state. Delimiter navigation and
//! source-level deletes get the first chance at a key, except that Backspace
//! at the start of a heading or list item unwraps the block first. Plain
//! cursor movement and text editing on the structural content handle the
//! rest.
//!
//! Any change to the document leaves navigation idle.

use super::cursor::{Cursor, Selection};
use super::edit::{self, EditOutcome};
use super::navigation::{active, handle_arrow, Arrow, DelimiterNav};
use super::paste::{parse_paste, single_paragraph, PasteContent};
use super::source_map::runs_around;
use crate::error::EditError;
use crate::formats::markdown::parser::MarkdownParser;
use crate::model::{content_size, normalize, Block, BlockPath, Document, Inline, InlineNode, MarkSet};

/// A key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
    Char(char),
    Paste(String),
    /// Any other key. Only resets navigation.
    Other(String),
}

impl Key {
    /// Parses a key name as used by DOM key events (`ArrowLeft`, `a`,
    /// `Space`, ...).
    pub fn from_name(name: &str) -> Key {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "Space" => Key::Char(' '),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

/// Everything a key event reads and produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub doc: Document,
    pub selection: Selection,
    pub nav: Option<DelimiterNav>,
}

impl EditorState {
    /// A state with the cursor at the start of the first text block.
    pub fn new(doc: Document) -> Self {
        let block = doc
            .textblock_paths()
            .into_iter()
            .next()
            .unwrap_or_else(|| BlockPath::new([0]));
        EditorState::at(doc, Cursor::at_start(block))
    }

    pub fn at(doc: Document, cursor: Cursor) -> Self {
        EditorState {
            doc,
            selection: Selection::collapsed(cursor),
            nav: None,
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.selection.head
    }

    fn moved(self, cursor: Cursor) -> Self {
        EditorState {
            selection: Selection::collapsed(cursor),
            nav: None,
            ..self
        }
    }
}

/// Key handling with a configured parser for re-parsing edited blocks.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    parser: MarkdownParser,
}

impl Keymap {
    pub fn new(parser: MarkdownParser) -> Self {
        Keymap { parser }
    }

    pub fn handle_key(&self, state: EditorState, key: &Key) -> EditorState {
        if !state.selection.is_empty() {
            return self.handle_range(state, key);
        }
        let cursor = state.cursor().clamp(&state.doc);

        match key {
            Key::ArrowLeft | Key::ArrowRight => {
                let arrow = if *key == Key::ArrowLeft {
                    Arrow::Left
                } else {
                    Arrow::Right
                };
                let Some(content) = cursor.content(&state.doc) else {
                    return state.moved(cursor);
                };
                let outcome = handle_arrow(state.nav.as_ref(), content, &cursor, arrow);
                if outcome.handled {
                    return EditorState {
                        nav: outcome.nav,
                        ..state
                    };
                }
                let next = step_cursor(&state.doc, &cursor, arrow);
                state.moved(next)
            }
            Key::Backspace => self.backspace(state, cursor),
            Key::Delete => self.delete(state, cursor),
            Key::Char(c) => insert_text(state, cursor, &c.to_string()),
            Key::Paste(text) => self.paste(state, cursor, text),
            Key::Other(_) => EditorState { nav: None, ..state },
        }
    }

    /// Outside delimiter navigation, a heading or list item start is
    /// unwrapped before any hidden opening delimiter is touched.
    fn backspace(&self, mut state: EditorState, cursor: Cursor) -> EditorState {
        let nav = state.nav.take();
        if active(nav.as_ref(), &cursor).is_none() {
            if let Some(next) = edit::structural_backspace(&mut state.doc, &cursor) {
                return state.moved(next);
            }
        }
        let source_edit = edit::backspace(&self.parser, &mut state.doc, &cursor, nav.as_ref());
        if let Some(result) = source_edit {
            return committed(state, &cursor, result);
        }
        if cursor.offset == 0 {
            return state.moved(cursor);
        }
        let from = cursor.offset - 1;
        remove_range(&mut state.doc, &cursor.block, from, cursor.offset);
        state.moved(cursor.with_offset(from))
    }

    fn delete(&self, mut state: EditorState, cursor: Cursor) -> EditorState {
        let nav = state.nav.take();
        let source_edit = edit::delete_forward(&self.parser, &mut state.doc, &cursor, nav.as_ref());
        if let Some(result) = source_edit {
            return committed(state, &cursor, result);
        }
        let size = cursor.content(&state.doc).map_or(0, content_size);
        if cursor.offset < size {
            remove_range(&mut state.doc, &cursor.block, cursor.offset, cursor.offset + 1);
        }
        state.moved(cursor)
    }

    fn handle_range(&self, mut state: EditorState, key: &Key) -> EditorState {
        let Some((from, to)) = state.selection.same_block_range() else {
            let head = state.selection.head.clone();
            return state.moved(head);
        };
        let block = state.selection.head.block.clone();
        let start = Cursor::new(block.clone(), from);
        match key {
            Key::ArrowLeft => state.moved(start),
            Key::ArrowRight => state.moved(Cursor::new(block, to)),
            Key::Backspace | Key::Delete => {
                remove_range(&mut state.doc, &block, from, to);
                state.moved(start)
            }
            Key::Char(_) | Key::Paste(_) => {
                remove_range(&mut state.doc, &block, from, to);
                let state = state.moved(start);
                self.handle_key(state, key)
            }
            Key::Other(_) => EditorState { nav: None, ..state },
        }
    }

    fn paste(&self, mut state: EditorState, cursor: Cursor, text: &str) -> EditorState {
        let Some(content) = parse_paste(&self.parser, text) else {
            return state;
        };
        if let Some(inlines) = single_paragraph(&content) {
            return insert_inlines(state, cursor, inlines.to_vec());
        }
        match content {
            PasteContent::Text(text) => insert_text(state, cursor, &text),
            PasteContent::Blocks(blocks) => match insert_blocks(&mut state.doc, &cursor, blocks) {
                Some(next) => state.moved(next),
                None => {
                    log::warn!("No place to insert pasted blocks at {cursor}");
                    state.moved(cursor)
                }
            },
        }
    }
}

/// Handles one key with the default parser.
pub fn handle_key(state: EditorState, key: &Key) -> EditorState {
    Keymap::default().handle_key(state, key)
}

fn committed(state: EditorState, cursor: &Cursor, result: Result<EditOutcome, EditError>) -> EditorState {
    match result {
        Ok(outcome) => state.moved(cursor.with_offset(outcome.cursor)),
        Err(err) => {
            log::warn!("Source edit at {cursor} rejected: {err}");
            state.moved(cursor.clone())
        }
    }
}

/// Moves one structural unit, crossing into the neighbouring text block at
/// either end.
fn step_cursor(doc: &Document, cursor: &Cursor, arrow: Arrow) -> Cursor {
    let size = cursor.content(doc).map_or(0, content_size);
    match arrow {
        Arrow::Left if cursor.offset > 0 => return cursor.with_offset(cursor.offset - 1),
        Arrow::Right if cursor.offset < size => return cursor.with_offset(cursor.offset + 1),
        _ => {}
    }
    let paths = doc.textblock_paths();
    let Some(index) = paths.iter().position(|path| *path == cursor.block) else {
        return cursor.clone();
    };
    let neighbour = match arrow {
        Arrow::Left => index.checked_sub(1).and_then(|i| paths.get(i)),
        Arrow::Right => paths.get(index + 1),
    };
    match (neighbour, arrow) {
        (Some(path), Arrow::Left) => {
            let end = Cursor::at_start(path.clone());
            let size = end.content(doc).map_or(0, content_size);
            end.with_offset(size)
        }
        (Some(path), Arrow::Right) => Cursor::at_start(path.clone()),
        (None, _) => cursor.clone(),
    }
}

/// Splits inline content at a structural offset.
fn split_at(content: &[Inline], offset: usize) -> (Vec<Inline>, Vec<Inline>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut start = 0;
    for run in content {
        let end = start + run.size();
        if end <= offset {
            left.push(run.clone());
        } else if start >= offset {
            right.push(run.clone());
        } else if let InlineNode::Text { text } = &run.node {
            let at = text
                .char_indices()
                .nth(offset - start)
                .map_or(text.len(), |(i, _)| i);
            left.push(Inline::text(&text[..at], run.marks.clone()));
            right.push(Inline::text(&text[at..], run.marks.clone()));
        }
        start = end;
    }
    (left, right)
}

fn remove_range(doc: &mut Document, block: &BlockPath, from: usize, to: usize) {
    let Some(content) = doc.block_mut(block).and_then(Block::inline_content_mut) else {
        return;
    };
    let (left, _) = split_at(content, from);
    let (_, right) = split_at(content, to);
    *content = normalize(left.into_iter().chain(right).collect());
}

/// Marks a typed character picks up: those of the run before the cursor,
/// or of the run after it at the start of the block.
fn marks_at(content: &[Inline], offset: usize) -> MarkSet {
    match runs_around(content, offset) {
        (Some(before), _) => before.marks.clone(),
        (None, Some(after)) => after.marks.clone(),
        (None, None) => MarkSet::new(),
    }
}

fn insert_text(state: EditorState, cursor: Cursor, text: &str) -> EditorState {
    let marks = cursor
        .content(&state.doc)
        .map(|content| marks_at(content, cursor.offset))
        .unwrap_or_default();
    insert_inlines(state, cursor, vec![Inline::text(text, marks)])
}

fn insert_inlines(mut state: EditorState, cursor: Cursor, inlines: Vec<Inline>) -> EditorState {
    let Some(content) = state
        .doc
        .block_mut(&cursor.block)
        .and_then(Block::inline_content_mut)
    else {
        return state.moved(cursor);
    };
    let inserted = content_size(&inlines);
    let (left, right) = split_at(content, cursor.offset);
    *content = normalize(left.into_iter().chain(inlines).chain(right).collect());
    state.moved(cursor.with_offset(cursor.offset + inserted))
}

/// Inserts flow blocks after the nearest flow ancestor of the cursor,
/// replacing it when it is an empty paragraph. Returns the cursor at the end
/// of the last inserted text block.
fn insert_blocks(doc: &mut Document, cursor: &Cursor, blocks: Vec<Block>) -> Option<Cursor> {
    let mut target = cursor.block.clone();
    loop {
        let block = doc.block(&target)?;
        let parent = target.parent()?;
        let parent_accepts = parent.depth() == 0
            || doc
                .block(&parent)
                .is_some_and(|p| p.node_type().allows_child(block.node_type()));
        if block.node_type().is_flow() && parent_accepts {
            break;
        }
        target = parent;
        if target.depth() == 0 {
            return None;
        }
    }

    let replace = matches!(doc.block(&target)?, Block::Paragraph { content } if content.is_empty());
    let index = target.last()?;
    let parent = target.parent()?;
    let count = blocks.len();
    let siblings = doc.siblings_mut(&target)?;
    let at = if replace { index } else { index + 1 };
    siblings.splice(at..at + usize::from(replace), blocks);

    let last = parent.child(at + count.checked_sub(1)?);
    let path = doc
        .textblock_paths()
        .into_iter()
        .filter(|path| path.0.starts_with(&last.0))
        .last()?;
    let end = Cursor::at_start(path);
    let size = end.content(doc).map_or(0, content_size);
    Some(end.with_offset(size))
}
