//! Source-level edits
//!
//! Deleting a character that only exists in the markdown source (a delimiter
//! character) cannot be expressed on the tree directly. The edit goes through
//! the source instead: rebuild the block's source, drop one character,
//! re-parse the result as an inline fragment and swap the block's whole
//! inline content for it.
//!
//! Unterminated delimiters get no special treatment. Whatever the parser
//! makes of the mutated string is the result, so removing the last `*` of
//! `**hi**` leaves `**hi*`, which reads back as a literal `*` followed by
//! emphasised `hi`.

use super::cursor::Cursor;
use super::navigation::{active, virtual_offset, DelimiterNav};
use super::source_map::{mark_boundaries, mark_range, ParagraphMap};
use crate::error::EditError;
use crate::formats::markdown::parser::MarkdownParser;
use crate::model::{Block, BlockPath, Document, Inline};

/// Result of a committed source-level edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Structural cursor offset in the edited block.
    pub cursor: usize,
    /// The block's source after the edit.
    pub source: String,
}

fn inline_content<'a>(doc: &'a Document, path: &BlockPath) -> Result<&'a [Inline], EditError> {
    let block = doc
        .block(path)
        .ok_or_else(|| EditError::InvalidPath(path.to_string()))?;
    block
        .inline_content()
        .map(Vec::as_slice)
        .ok_or_else(|| EditError::NotInlineContainer(block.node_type().name().to_string()))
}

/// Deletes the source character at `virtual_offset` of the block at `path`
/// using the default parser.
pub fn delete_at_virtual_offset(
    doc: &mut Document,
    path: &BlockPath,
    virtual_offset: usize,
) -> Result<EditOutcome, EditError> {
    delete_with(&MarkdownParser::default(), doc, path, virtual_offset)
}

/// Deletes the source character at `virtual_offset`, re-parsing with `parser`.
///
/// Nothing is changed when the offset is outside the source or the path does
/// not address an inline container.
pub fn delete_with(
    parser: &MarkdownParser,
    doc: &mut Document,
    path: &BlockPath,
    virtual_offset: usize,
) -> Result<EditOutcome, EditError> {
    let map = ParagraphMap::build(inline_content(doc, path)?);
    let len = map.source_len();
    if virtual_offset >= len {
        return Err(EditError::OffsetOutOfRange {
            offset: virtual_offset,
            len,
        });
    }

    let source = map.source_without(virtual_offset);
    let replacement =
        parser.parse_inline_fragment(&source, &doc.abbreviations, &doc.footnotes());
    log::debug!(
        "Source edit at {path}:{virtual_offset}: {:?} -> {:?} ({} runs)",
        map.source,
        source,
        replacement.len()
    );

    let content = doc
        .block_mut(path)
        .and_then(Block::inline_content_mut)
        .ok_or_else(|| EditError::InvalidPath(path.to_string()))?;
    *content = replacement;

    let cursor = ParagraphMap::build(content).structural_offset_for(virtual_offset);
    Ok(EditOutcome { cursor, source })
}

/// Backspace through delimiters.
///
/// While navigating, deletes the source character before the virtual
/// position. Otherwise, at the start of a delimited mark, deletes the last
/// character of its opening delimiter. Returns `None` when the key does not
/// apply here.
pub fn backspace(
    parser: &MarkdownParser,
    doc: &mut Document,
    cursor: &Cursor,
    nav: Option<&DelimiterNav>,
) -> Option<Result<EditOutcome, EditError>> {
    let content = cursor.content(doc)?;
    let map = ParagraphMap::build(content);

    let target = match active(nav, cursor) {
        Some(nav) => {
            let range = mark_range(content, cursor.offset, nav.mark)?;
            virtual_offset(nav, &map, range)?.checked_sub(1)?
        }
        None => {
            let boundaries = mark_boundaries(content, cursor.offset);
            let range = boundaries
                .starting
                .iter()
                .find_map(|mark| mark_range(content, cursor.offset, mark.mark_type()))?;
            map.after_open.get(range.from)?.checked_sub(1)?
        }
    };
    Some(delete_with(parser, doc, &cursor.block, target))
}

/// Forward delete through delimiters; the mirror of [`backspace`].
pub fn delete_forward(
    parser: &MarkdownParser,
    doc: &mut Document,
    cursor: &Cursor,
    nav: Option<&DelimiterNav>,
) -> Option<Result<EditOutcome, EditError>> {
    let content = cursor.content(doc)?;
    let map = ParagraphMap::build(content);

    let target = match active(nav, cursor) {
        Some(nav) => {
            let range = mark_range(content, cursor.offset, nav.mark)?;
            virtual_offset(nav, &map, range)?
        }
        None => {
            let boundaries = mark_boundaries(content, cursor.offset);
            let range = boundaries
                .ending
                .iter()
                .find_map(|mark| mark_range(content, cursor.offset, mark.mark_type()))?;
            *map.before_close.get(range.to)?
        }
    };
    Some(delete_with(parser, doc, &cursor.block, target))
}

/// Backspace at the very start of a list item or heading.
///
/// A list item is lifted out of its list and becomes a paragraph (the list
/// is split around it); a task item becomes a paragraph with its inline
/// content; a heading turns into a paragraph. Returns the cursor in the
/// rewritten document, or `None` when the cursor is not at such a start.
pub fn structural_backspace(doc: &mut Document, cursor: &Cursor) -> Option<Cursor> {
    if cursor.offset != 0 {
        return None;
    }
    let block = doc.block(&cursor.block)?;

    if let Block::Heading { content, .. } = block {
        let paragraph = Block::paragraph(content.clone());
        *doc.block_mut(&cursor.block)? = paragraph;
        log::debug!("Heading at {} turned into a paragraph", cursor.block);
        return Some(cursor.clone());
    }

    if let Block::TaskItem { content, .. } = block {
        let lifted = vec![Block::paragraph(content.clone())];
        return lift_item(doc, &cursor.block, lifted);
    }

    // A paragraph that is the first child of a list item.
    let item_path = cursor.block.parent()?;
    if cursor.block.last()? != 0 || item_path.depth() == 0 {
        return None;
    }
    let Block::ListItem { content } = doc.block(&item_path)? else {
        return None;
    };
    let lifted = content.clone();
    lift_item(doc, &item_path, lifted)
}

/// Replaces the item at `item_path` with `lifted` blocks placed between the
/// two halves of its list. Empty halves are dropped.
fn lift_item(doc: &mut Document, item_path: &BlockPath, lifted: Vec<Block>) -> Option<Cursor> {
    let list_path = item_path.parent()?;
    let index = item_path.last()?;
    let list = doc.block(&list_path)?.clone();
    let items = list.children()?;

    let mut head = list.clone();
    let mut tail = list.clone();
    *head.children_mut()? = items[..index].to_vec();
    *tail.children_mut()? = items[index + 1..].to_vec();
    if let Block::OrderedList { order, .. } = &mut tail {
        *order += index as u64 + 1;
    }

    let mut replacement = Vec::new();
    let mut first_lifted = list_path.last()?;
    if head.children().is_some_and(|c| !c.is_empty()) {
        replacement.push(head);
        first_lifted += 1;
    }
    let lifted = if lifted.is_empty() {
        vec![Block::paragraph(Vec::new())]
    } else {
        lifted
    };
    replacement.extend(lifted);
    if tail.children().is_some_and(|c| !c.is_empty()) {
        replacement.push(tail);
    }

    let list_index = list_path.last()?;
    let siblings = doc.siblings_mut(&list_path)?;
    siblings.splice(list_index..=list_index, replacement);
    log::debug!("Lifted list item {item_path} out of its list");

    let parent = list_path.parent()?;
    Some(Cursor::at_start(parent.child(first_lifted)))
}
