//! Decoration hints for the rendering side
//!
//! The editor shows markdown syntax only around the cursor: the delimiters
//! of marks that start or end at the cursor, the `#`/`>`/list marker of the
//! block the cursor starts, and an "active" highlight on the heading or
//! quote being edited. This module computes those hints as plain values; it
//! does not render anything.

use super::cursor::{Cursor, Selection};
use super::navigation::{active, DelimiterNav, Side};
use super::source_map::{mark_boundaries, mark_range};
use crate::model::{delimiter, BlockPath, Document, Mark, MarkType, NodeType};
use serde::Serialize;

/// Which side of the position a widget sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetSide {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoration {
    /// Delimiter text drawn at a structural offset of the cursor's block.
    Delimiter {
        offset: usize,
        text: String,
        side: WidgetSide,
    },
    /// The heading or blockquote being edited.
    ActiveBlock { block: BlockPath, node: NodeType },
    /// Show the block's own markdown marker (`#`, `>`, `-`, `- [ ]`).
    ShowMarker { block: BlockPath },
}

fn widget(offset: usize, text: impl Into<String>, side: WidgetSide) -> Decoration {
    Decoration::Delimiter {
        offset,
        text: text.into(),
        side,
    }
}

/// Decorations for a collapsed selection; none for a range.
pub fn decorations(doc: &Document, selection: &Selection, nav: Option<&DelimiterNav>) -> Vec<Decoration> {
    let Some(cursor) = selection.cursor() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    block_hints(doc, cursor, &mut out);
    delimiter_hints(doc, cursor, nav, &mut out);
    out
}

fn block_hints(doc: &Document, cursor: &Cursor, out: &mut Vec<Decoration>) {
    let Some(block) = doc.block(&cursor.block) else {
        return;
    };
    let at_start = cursor.offset == 0;

    if block.node_type() == NodeType::Heading {
        out.push(Decoration::ActiveBlock {
            block: cursor.block.clone(),
            node: NodeType::Heading,
        });
        if at_start {
            out.push(Decoration::ShowMarker {
                block: cursor.block.clone(),
            });
        }
    }
    if block.node_type() == NodeType::TaskItem && at_start {
        out.push(Decoration::ShowMarker {
            block: cursor.block.clone(),
        });
    }

    let parent = cursor.block.parent();
    if let Some(parent) = parent.filter(|p| p.depth() > 0) {
        if doc.block(&parent).map(|b| b.node_type()) == Some(NodeType::Blockquote) {
            out.push(Decoration::ActiveBlock {
                block: parent,
                node: NodeType::Blockquote,
            });
        }
    }

    // Innermost quote and list item: show their marker when the cursor is at
    // the start of their first child.
    for kind in [NodeType::Blockquote, NodeType::ListItem] {
        let mut path = cursor.block.clone();
        while let Some(parent) = path.parent().filter(|p| p.depth() > 0) {
            if doc.block(&parent).map(|b| b.node_type()) == Some(kind) {
                if at_start && path.last() == Some(0) {
                    out.push(Decoration::ShowMarker { block: parent });
                }
                break;
            }
            path = parent;
        }
    }
}

fn delimiter_hints(
    doc: &Document,
    cursor: &Cursor,
    nav: Option<&DelimiterNav>,
    out: &mut Vec<Decoration>,
) {
    let Some(content) = cursor.content(doc) else {
        return;
    };
    let nav = active(nav, cursor);
    let boundaries = mark_boundaries(content, cursor.offset);

    let mut seen: Vec<MarkType> = Vec::new();
    for mark in boundaries.starting.iter().chain(&boundaries.ending) {
        let ty = mark.mark_type();
        if seen.contains(&ty) {
            continue;
        }
        seen.push(ty);
        let (Some(range), Some(delim)) = (mark_range(content, cursor.offset, ty), delimiter(ty))
        else {
            continue;
        };

        match nav.filter(|nav| nav.mark == ty) {
            Some(nav) => {
                let split = delim
                    .char_indices()
                    .nth(nav.step)
                    .map_or(delim.len(), |(i, _)| i);
                let (left, right) = delim.split_at(split);
                match nav.side {
                    Side::Start => {
                        out.push(widget(range.from, left, WidgetSide::Before));
                        if !right.is_empty() {
                            out.push(widget(range.from, right, WidgetSide::After));
                        }
                        out.push(widget(range.to, delim, WidgetSide::After));
                    }
                    Side::End => {
                        out.push(widget(range.from, delim, WidgetSide::Before));
                        out.push(widget(range.to, left, WidgetSide::Before));
                        if !right.is_empty() {
                            out.push(widget(range.to, right, WidgetSide::After));
                        }
                    }
                }
            }
            None => {
                out.push(widget(range.from, delim, WidgetSide::Before));
                out.push(widget(range.to, delim, WidgetSide::After));
            }
        }
    }

    // Links: `[` before the text, `](href "title")` after it.
    let link_before = boundaries.before.get(MarkType::Link);
    let link_after = boundaries.after.get(MarkType::Link);
    if let (Some(link), None) | (None, Some(link)) = (link_before, link_after) {
        if let Some(range) = mark_range(content, cursor.offset, MarkType::Link) {
            let (open, close) = Mark::source_delimiters(link);
            out.push(widget(range.from, open, WidgetSide::Before));
            out.push(widget(range.to, close, WidgetSide::After));
        }
    }
}
