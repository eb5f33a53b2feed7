//! Cursor positions inside inline containers

use crate::model::{content_size, BlockPath, Document, Inline};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structural offset inside the inline content of the block at `block`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub block: BlockPath,
    pub offset: usize,
}

impl Cursor {
    pub fn new(block: BlockPath, offset: usize) -> Self {
        Cursor { block, offset }
    }

    pub fn at_start(block: BlockPath) -> Self {
        Cursor::new(block, 0)
    }

    pub fn with_offset(&self, offset: usize) -> Self {
        Cursor::new(self.block.clone(), offset)
    }

    /// The inline content the cursor points into, if the path addresses an
    /// inline container.
    pub fn content<'a>(&self, doc: &'a Document) -> Option<&'a [Inline]> {
        doc.block(&self.block)
            .and_then(|block| block.inline_content())
            .map(Vec::as_slice)
    }

    /// Moves the offset into `[0, size]` of its block.
    pub fn clamp(&self, doc: &Document) -> Cursor {
        let size = self.content(doc).map_or(0, content_size);
        self.with_offset(self.offset.min(size))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.block, self.offset)
    }
}

/// Anchor and head of a selection; collapsed when both are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Cursor,
    pub head: Cursor,
}

impl Selection {
    pub fn collapsed(cursor: Cursor) -> Self {
        Selection {
            anchor: cursor.clone(),
            head: cursor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The cursor of a collapsed selection.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.is_empty().then_some(&self.head)
    }

    /// Start and end offsets when both ends sit in the same block.
    pub fn same_block_range(&self) -> Option<(usize, usize)> {
        (self.anchor.block == self.head.block).then(|| {
            let (a, b) = (self.anchor.offset, self.head.offset);
            (a.min(b), a.max(b))
        })
    }
}
