//! Paragraph source map
//!
//! Inline content stores styled text without its delimiters. The map rebuilds
//! the markdown source of one inline container and records, for every
//! structural offset, where it lands in that source. Each offset has two
//! readings at a style boundary:
//!
//! - `before_close[off]`: source offset before the delimiters that close at
//!   `off` (the view from the end of the preceding range);
//! - `after_open[off]`: source offset after the delimiters that open at `off`
//!   (the view from the start of the following range).
//!
//! Inside a run both readings are equal. Source offsets count `char`s.
//!
//! ```text
//!   structural  a b c d        (b..c strong)
//!   source      a * * b c * * d
//!   before_close  0 1   4 5 8
//!   after_open    0 3   4 7 8
//! ```

use crate::formats::markdown::serializer::atom_source;
use crate::model::{delimiter, content_size, Inline, InlineNode, Mark, MarkSet, MarkType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphMap {
    pub source: String,
    pub before_close: Vec<usize>,
    pub after_open: Vec<usize>,
}

impl ParagraphMap {
    pub fn build(content: &[Inline]) -> Self {
        let size = content_size(content);
        let mut before_close = vec![0; size + 1];
        let mut after_open = vec![0; size + 1];
        let mut source = String::new();
        let mut pos = 0usize;
        let mut offset = 0usize;
        let mut previous: Vec<&Mark> = Vec::new();

        for run in content {
            let current: Vec<&Mark> = run.marks.iter().collect();

            before_close[offset] = pos;
            for mark in previous.iter().rev().filter(|m| !current.contains(m)) {
                push(&mut source, &mut pos, &mark.source_delimiters().1);
            }
            for mark in current.iter().filter(|m| !previous.contains(m)) {
                push(&mut source, &mut pos, &mark.source_delimiters().0);
            }
            after_open[offset] = pos;

            match &run.node {
                InlineNode::Text { text } => {
                    for i in 1..text.chars().count() {
                        before_close[offset + i] = pos + i;
                        after_open[offset + i] = pos + i;
                    }
                    push(&mut source, &mut pos, text);
                }
                atom => push(&mut source, &mut pos, &atom_source(atom)),
            }
            offset += run.size();
            previous = current;
        }

        before_close[size] = pos;
        for mark in previous.iter().rev() {
            push(&mut source, &mut pos, &mark.source_delimiters().1);
        }
        after_open[size] = pos;

        ParagraphMap {
            source,
            before_close,
            after_open,
        }
    }

    /// Number of `char`s in the rebuilt source.
    pub fn source_len(&self) -> usize {
        self.source.chars().count()
    }

    /// Structural size of the mapped content.
    pub fn size(&self) -> usize {
        self.before_close.len() - 1
    }

    /// The largest structural offset whose `before_close` does not exceed
    /// `virtual_offset`, or 0.
    pub fn structural_offset_for(&self, virtual_offset: usize) -> usize {
        self.before_close
            .iter()
            .rposition(|&pos| pos <= virtual_offset)
            .unwrap_or(0)
    }

    /// The source with the `char` at `virtual_offset` removed.
    pub fn source_without(&self, virtual_offset: usize) -> String {
        self.source
            .chars()
            .enumerate()
            .filter(|(i, _)| *i != virtual_offset)
            .map(|(_, c)| c)
            .collect()
    }
}

fn push(source: &mut String, pos: &mut usize, text: &str) {
    source.push_str(text);
    *pos += text.chars().count();
}

/// A structural `[from, to)` range inside one inline container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkRange {
    pub from: usize,
    pub to: usize,
}

/// The maximal contiguous range of runs carrying a mark of type `mark` that
/// contains `offset` (ends included).
pub fn mark_range(content: &[Inline], offset: usize, mark: MarkType) -> Option<MarkRange> {
    let mut current: Option<MarkRange> = None;
    let mut start = 0;

    for run in content {
        let end = start + run.size();
        if run.marks.has_type(mark) {
            current = Some(match current {
                Some(range) => MarkRange { to: end, ..range },
                None => MarkRange { from: start, to: end },
            });
        } else if let Some(range) = current.take() {
            if (range.from..=range.to).contains(&offset) {
                return Some(range);
            }
        }
        start = end;
    }
    current.filter(|range| (range.from..=range.to).contains(&offset))
}

/// Marks on either side of a structural offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkBoundaries {
    /// Delimited marks that begin at the offset.
    pub starting: Vec<Mark>,
    /// Delimited marks that end at the offset.
    pub ending: Vec<Mark>,
    /// Marks of the run before the offset.
    pub before: MarkSet,
    /// Marks of the run after the offset.
    pub after: MarkSet,
}

/// The run covering `offset - 1` and the run covering `offset`.
pub fn runs_around(content: &[Inline], offset: usize) -> (Option<&Inline>, Option<&Inline>) {
    let mut start = 0;
    let mut before = None;
    for run in content {
        let end = start + run.size();
        if offset > start && offset <= end {
            before = Some(run);
        }
        if offset >= start && offset < end {
            return (before, Some(run));
        }
        start = end;
    }
    (before, None)
}

/// Which delimited marks start and end at `offset`.
pub fn mark_boundaries(content: &[Inline], offset: usize) -> MarkBoundaries {
    let (before, after) = runs_around(content, offset);
    let before = before.map(|run| run.marks.clone()).unwrap_or_default();
    let after = after.map(|run| run.marks.clone()).unwrap_or_default();

    let delimited = |mark: &&Mark| delimiter(mark.mark_type()).is_some();
    let starting = after
        .iter()
        .filter(delimited)
        .filter(|m| !before.has_type(m.mark_type()))
        .cloned()
        .collect();
    let ending = before
        .iter()
        .filter(delimited)
        .filter(|m| !after.has_type(m.mark_type()))
        .cloned()
        .collect();

    MarkBoundaries {
        starting,
        ending,
        before,
        after,
    }
}
