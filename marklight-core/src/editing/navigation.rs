//! Delimiter navigation
//!
//! Multi-character delimiters (`**`, `~~`, `==`) are not present in the
//! structural text, so a plain arrow key jumps over them. The navigation
//! state lets the cursor step through them one source character at a time
//! without moving structurally:
//!
//! ```text
//!   Idle ──ArrowLeft at mark start──▶ InDelimiter{Start, step 1}
//!   InDelimiter{Start, n} ──ArrowLeft──▶ step n+1   (n < len)
//!                         ──ArrowLeft──▶ Idle, key falls through (n == len)
//!                         ──ArrowRight / other key / edit──▶ Idle
//! ```
//!
//! and symmetrically with ArrowRight at a mark end. The machine never touches
//! the document.

use super::cursor::Cursor;
use super::source_map::{mark_boundaries, MarkRange, ParagraphMap};
use crate::model::{delimiter, Inline, MarkType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Left,
    Right,
}

/// The cursor sits inside the delimiter of `mark`, `step` characters away
/// from the structural position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelimiterNav {
    pub position: Cursor,
    pub mark: MarkType,
    pub side: Side,
    pub step: usize,
}

/// The next navigation state and whether the key was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavOutcome {
    pub nav: Option<DelimiterNav>,
    pub handled: bool,
}

impl NavOutcome {
    fn idle(handled: bool) -> Self {
        NavOutcome { nav: None, handled }
    }

    fn enter(nav: DelimiterNav) -> Self {
        NavOutcome {
            nav: Some(nav),
            handled: true,
        }
    }
}

/// Delimiter length in `char`s, 0 for marks without a literal delimiter.
pub fn delimiter_len(mark: MarkType) -> usize {
    delimiter(mark).map_or(0, |d| d.chars().count())
}

/// The navigation state if it still applies to `cursor`.
pub fn active<'a>(nav: Option<&'a DelimiterNav>, cursor: &Cursor) -> Option<&'a DelimiterNav> {
    nav.filter(|nav| nav.position == *cursor)
}

/// Steps through delimiters on an arrow key with a collapsed cursor.
///
/// `content` is the inline content of the block holding `cursor`.
pub fn handle_arrow(
    nav: Option<&DelimiterNav>,
    content: &[Inline],
    cursor: &Cursor,
    arrow: Arrow,
) -> NavOutcome {
    let (forward, backward) = match arrow {
        Arrow::Left => (Side::Start, Side::End),
        Arrow::Right => (Side::End, Side::Start),
    };

    if let Some(nav) = active(nav, cursor) {
        if nav.side == forward {
            if nav.step >= delimiter_len(nav.mark) {
                log::trace!("Leaving {} delimiter at {}", nav.mark, cursor);
                return NavOutcome::idle(false);
            }
            return NavOutcome::enter(DelimiterNav {
                step: nav.step + 1,
                ..nav.clone()
            });
        }
        if nav.side == backward {
            return NavOutcome::idle(false);
        }
    }

    let boundaries = mark_boundaries(content, cursor.offset);
    let candidates = match arrow {
        Arrow::Left => &boundaries.starting,
        Arrow::Right => &boundaries.ending,
    };
    match candidates
        .iter()
        .map(|mark| mark.mark_type())
        .find(|&mark| delimiter_len(mark) > 1)
    {
        Some(mark) => {
            log::trace!("Entering {mark} delimiter at {cursor}");
            NavOutcome::enter(DelimiterNav {
                position: cursor.clone(),
                mark,
                side: forward,
                step: 1,
            })
        }
        None => NavOutcome::idle(false),
    }
}

/// The source offset the navigation state points at: `step` characters
/// before the content of `range` (start side) or after it (end side).
pub fn virtual_offset(nav: &DelimiterNav, map: &ParagraphMap, range: MarkRange) -> Option<usize> {
    match nav.side {
        Side::Start => map.after_open.get(range.from)?.checked_sub(nav.step),
        Side::End => map.before_close.get(range.to).map(|pos| pos + nav.step),
    }
}
