//! Checkbox post-pass
//!
//! Lists whose every item starts with `[ ] ` or `[x] ` become task lists. The
//! rewrite is all-or-nothing per list: a single plain item keeps the whole
//! list as it was parsed. A checkbox item holding more than one block cannot
//! become an inline-only task item, so the pass gives up and the tree is left
//! exactly as parsed.

use crate::error::ParseError;
use crate::model::{normalize, Block, Document, Inline, InlineNode};
use once_cell::sync::Lazy;
use regex::Regex;

static CHECKBOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([ xX])\]\s").expect("checkbox pattern is valid"));

/// Rewrites checkbox lists into task lists, or returns `doc` unchanged when
/// the rewrite fails.
pub fn promote_task_lists(doc: Document) -> Document {
    match rewrite_blocks(doc.content.clone()) {
        Ok(content) => Document {
            content,
            abbreviations: doc.abbreviations,
        },
        Err(err) => {
            log::warn!("Task list conversion skipped: {err}");
            doc
        }
    }
}

fn rewrite_blocks(blocks: Vec<Block>) -> Result<Vec<Block>, ParseError> {
    blocks.into_iter().map(rewrite_block).collect()
}

fn rewrite_block(block: Block) -> Result<Block, ParseError> {
    match block {
        Block::BulletList { tight, items } => {
            let items = rewrite_blocks(items)?;
            Ok(match task_items(&items)? {
                Some(items) => Block::TaskList { items },
                None => Block::BulletList { tight, items },
            })
        }
        Block::OrderedList {
            order,
            tight,
            items,
        } => {
            let items = rewrite_blocks(items)?;
            Ok(match task_items(&items)? {
                Some(items) => Block::TaskList { items },
                None => Block::OrderedList {
                    order,
                    tight,
                    items,
                },
            })
        }
        mut other => {
            if let Some(children) = other.children_mut() {
                let rewritten = rewrite_blocks(std::mem::take(children))?;
                *children = rewritten;
            }
            Ok(other)
        }
    }
}

/// The checkbox state and marker length of an item, if it starts with one.
fn checkbox(item: &Block) -> Option<(bool, usize)> {
    let Block::ListItem { content } = item else {
        return None;
    };
    let Some(Block::Paragraph { content: inlines }) = content.first() else {
        return None;
    };
    let text = inlines.first()?.as_text()?;
    let caps = CHECKBOX.captures(text)?;
    let checked = caps.get(1).is_some_and(|m| m.as_str() != " ");
    Some((checked, caps.get(0)?.end()))
}

fn task_items(items: &[Block]) -> Result<Option<Vec<Block>>, ParseError> {
    if items.is_empty() {
        return Ok(None);
    }
    let mut markers = Vec::with_capacity(items.len());
    for item in items {
        match checkbox(item) {
            Some(marker) => markers.push(marker),
            None => return Ok(None),
        }
    }

    items
        .iter()
        .zip(markers)
        .map(|(item, (checked, marker_len))| {
            let Block::ListItem { content } = item else {
                return Err(ParseError::Postprocess("expected a list item".to_string()));
            };
            if content.len() != 1 {
                return Err(ParseError::Postprocess(format!(
                    "checkbox item holds {} blocks",
                    content.len()
                )));
            }
            let mut inlines: Vec<Inline> = content[0]
                .inline_content()
                .cloned()
                .unwrap_or_default();
            if let Some(Inline {
                node: InlineNode::Text { text },
                ..
            }) = inlines.first_mut()
            {
                text.replace_range(..marker_len, "");
            }
            Ok(Block::TaskItem {
                checked,
                content: normalize(inlines),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
