//! Task list detection: a list becomes a task list only when every item
//! starts with a checkbox.

use marklight_core::model::{Block, Inline};
use marklight_core::parse;

#[test]
fn test_all_checkbox_items_promote() {
    let doc = parse("- [ ] a\n- [x] b\n- [X] c\n");
    let Block::TaskList { items } = &doc.content[0] else {
        panic!("expected task list, got {:?}", doc.content[0]);
    };
    let checked: Vec<bool> = items
        .iter()
        .map(|item| matches!(item, Block::TaskItem { checked: true, .. }))
        .collect();
    assert_eq!(checked, vec![false, true, true]);
}

#[test]
fn test_one_plain_item_keeps_bullet_list() {
    let doc = parse("- [ ] a\n- [x] b\n- [ ] c\n- d\n");
    let Block::BulletList { items, .. } = &doc.content[0] else {
        panic!("expected bullet list, got {:?}", doc.content[0]);
    };
    assert_eq!(items.len(), 4);
    let Block::ListItem { content } = &items[0] else {
        panic!("expected list item");
    };
    assert_eq!(content[0], Block::paragraph(vec![Inline::plain("[ ] a")]));
}

#[test]
fn test_ordered_checkbox_list_promotes() {
    let doc = parse("1. [ ] first\n2. [x] second\n");
    assert!(matches!(doc.content[0], Block::TaskList { .. }));
}

#[test]
fn test_checkbox_requires_whitespace_after_marker() {
    let doc = parse("- [x]done\n- [ ] b\n");
    assert!(matches!(doc.content[0], Block::BulletList { .. }));
}

#[test]
fn test_multi_block_checkbox_item_leaves_tree_unchanged() {
    let doc = parse("- [ ] a\n\n  more\n- [ ] b\n");
    let Block::BulletList { tight, items } = &doc.content[0] else {
        panic!("expected bullet list, got {:?}", doc.content[0]);
    };
    assert!(!tight);
    assert_eq!(items.len(), 2);
}

#[test]
fn test_marks_after_checkbox_survive() {
    let doc = parse("- [ ] **bold** task\n");
    let Block::TaskList { items } = &doc.content[0] else {
        panic!("expected task list");
    };
    let Block::TaskItem { content, .. } = &items[0] else {
        panic!("expected task item");
    };
    assert_eq!(content[0].as_text(), Some("bold"));
    assert_eq!(content[1], Inline::plain(" task"));
}
