//! Smart paste detection
//!
//! Plain-text clipboard content that looks like markdown is parsed and
//! inserted as blocks; anything else is inserted as text.

use crate::formats::markdown::parser::MarkdownParser;
use crate::model::{Block, Inline};
use once_cell::sync::Lazy;
use regex::Regex;

/// A line starting with a block marker, a table pipe or a code fence.
static BLOCK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*([#*>-]|\||```)").expect("block marker pattern is valid"));

/// Strong/emphasis delimiters or an inline link.
static INLINE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\*\*|__|_|\[.*\]\(.*\))").expect("inline marker pattern is valid")
});

pub fn looks_like_markdown(text: &str) -> bool {
    BLOCK_MARKER.is_match(text) || INLINE_MARKER.is_match(text)
}

/// What a paste should insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteContent {
    Blocks(Vec<Block>),
    Text(String),
}

/// Classifies pasted text and parses it when it looks like markdown.
pub fn parse_paste(parser: &MarkdownParser, text: &str) -> Option<PasteContent> {
    if text.is_empty() {
        return None;
    }
    if !looks_like_markdown(text) {
        return Some(PasteContent::Text(text.to_string()));
    }
    let doc = parser.parse(text);
    let blocks: Vec<Block> = doc
        .content
        .into_iter()
        .filter(|block| !matches!(block, Block::Paragraph { content } if content.is_empty()))
        .collect();
    if blocks.is_empty() {
        log::debug!("Pasted markdown produced no blocks, inserting as text");
        return Some(PasteContent::Text(text.to_string()));
    }
    Some(PasteContent::Blocks(blocks))
}

/// Inline content of a single pasted paragraph, if the paste is just that.
pub fn single_paragraph(content: &PasteContent) -> Option<&[Inline]> {
    match content {
        PasteContent::Blocks(blocks) => match blocks.as_slice() {
            [Block::Paragraph { content }] => Some(content),
            _ => None,
        },
        PasteContent::Text(_) => None,
    }
}
