//! Delimiter navigation through whole arrow sequences.

use marklight_core::editing::{handle_arrow, Arrow, Cursor, DelimiterNav, Side};
use marklight_core::model::{Block, BlockPath, Inline, Mark, MarkSet, MarkType};
use marklight_core::parse;

fn content_of(source: &str) -> Vec<Inline> {
    match parse(source).content.into_iter().next() {
        Some(Block::Paragraph { content }) => content,
        other => panic!("expected paragraph, got {other:?}"),
    }
}

fn at(offset: usize) -> Cursor {
    Cursor::new(BlockPath::new([0]), offset)
}

/// Presses `arrow` `times` times without moving the cursor, collecting the
/// navigation state after each press.
fn sequence(content: &[Inline], cursor: &Cursor, arrow: Arrow, times: usize) -> Vec<Option<(Side, usize)>> {
    let mut nav: Option<DelimiterNav> = None;
    let mut seen = Vec::new();
    for _ in 0..times {
        let outcome = handle_arrow(nav.as_ref(), content, cursor, arrow);
        nav = outcome.nav;
        seen.push(nav.as_ref().map(|n| (n.side, n.step)));
        if !outcome.handled {
            break;
        }
    }
    seen
}

#[test]
fn test_right_steps_through_closing_strong() {
    let content = content_of("a **bc** d\n");
    let steps = sequence(&content, &at(4), Arrow::Right, 4);
    assert_eq!(
        steps,
        vec![Some((Side::End, 1)), Some((Side::End, 2)), None]
    );
}

#[test]
fn test_left_steps_through_opening_strikethrough() {
    let content = content_of("x ~~gone~~\n");
    let steps = sequence(&content, &at(2), Arrow::Left, 4);
    assert_eq!(
        steps,
        vec![Some((Side::Start, 1)), Some((Side::Start, 2)), None]
    );
}

#[test]
fn test_single_char_delimiters_are_skipped() {
    let content = content_of("a *b* c\n");
    let outcome = handle_arrow(None, &content, &at(2), Arrow::Left);
    assert_eq!(outcome.nav, None);
    assert!(!outcome.handled);
}

#[test]
fn test_links_have_no_delimiter_navigation() {
    let content = content_of("a [b](u) c\n");
    let outcome = handle_arrow(None, &content, &at(2), Arrow::Left);
    assert!(!outcome.handled);
}

#[test]
fn test_reverse_arrow_leaves_navigation() {
    let content = vec![
        Inline::plain("a"),
        Inline::text("bc", MarkSet::from_marks([Mark::Highlight])),
    ];
    let entered = handle_arrow(None, &content, &at(1), Arrow::Left);
    assert_eq!(entered.nav.as_ref().map(|n| n.mark), Some(MarkType::Highlight));
    let back = handle_arrow(entered.nav.as_ref(), &content, &at(1), Arrow::Right);
    assert_eq!(back.nav, None);
    assert!(!back.handled);
}

#[test]
fn test_stale_navigation_is_ignored() {
    let content = content_of("a **bc** d\n");
    let stale = DelimiterNav {
        position: at(7),
        mark: MarkType::Strong,
        side: Side::End,
        step: 2,
    };
    let outcome = handle_arrow(Some(&stale), &content, &at(4), Arrow::Right);
    assert_eq!(outcome.nav.map(|n| n.step), Some(1));
}
