//! Source map invariants over generated inline content.

use marklight_core::editing::ParagraphMap;
use marklight_core::model::{
    content_size, normalize, Abbreviations, Inline, InlineNode, Mark, MarkSet,
};
use marklight_core::MarkdownParser;
use proptest::prelude::*;
use std::collections::BTreeMap;

const FOOTNOTE_LABELS: &[&str] = &["1", "2", "note"];

fn mark_strategy() -> impl Strategy<Value = Mark> {
    prop_oneof![
        Just(Mark::Em),
        Just(Mark::Strong),
        Just(Mark::Strikethrough),
        Just(Mark::Highlight),
        Just(Mark::Code),
        "[a-z]{1,6}".prop_map(|href| Mark::Link { href, title: None }),
    ]
}

fn footnote_ref(index: usize) -> InlineNode {
    InlineNode::FootnoteRef {
        id: index as u32,
        label: FOOTNOTE_LABELS[index].to_string(),
    }
}

fn atom_strategy() -> impl Strategy<Value = InlineNode> {
    prop_oneof![
        ("[a-z]{1,5}", "[a-z]{1,6}").prop_map(|(alt, src)| InlineNode::Image {
            src,
            alt,
            title: None,
        }),
        "[a-z]{1,4}".prop_map(|latex| InlineNode::MathInline {
            latex,
            display: false,
        }),
        (0..FOOTNOTE_LABELS.len()).prop_map(footnote_ref),
    ]
}

fn run_strategy() -> impl Strategy<Value = Inline> {
    let marks = || proptest::collection::vec(mark_strategy(), 0..3);
    prop_oneof![
        3 => ("[a-zA-Z ]{1,8}", marks())
            .prop_map(|(text, marks)| Inline::text(text, MarkSet::from_marks(marks))),
        1 => (atom_strategy(), marks())
            .prop_map(|(node, marks)| Inline::atom(node, MarkSet::from_marks(marks))),
        1 => marks()
            .prop_map(|marks| Inline::atom(InlineNode::HardBreak, MarkSet::from_marks(marks))),
    ]
}

fn content_strategy() -> impl Strategy<Value = Vec<Inline>> {
    proptest::collection::vec(run_strategy(), 0..6)
}

/// Words with at most one delimited mark, or unmarked atoms, separated by
/// single spaces: content whose map source reads back unchanged.
fn readable_content_strategy() -> impl Strategy<Value = Vec<Inline>> {
    let element = prop_oneof![
        (
            "[a-z]{1,6}",
            proptest::option::of(prop_oneof![
                Just(Mark::Strong),
                Just(Mark::Strikethrough),
                Just(Mark::Highlight),
            ])
        )
            .prop_map(|(word, mark)| Inline::text(word, MarkSet::from_marks(mark))),
        atom_strategy().prop_map(|node| Inline::atom(node, MarkSet::new())),
    ];
    proptest::collection::vec(element, 1..6).prop_map(|elements| {
        let mut content = Vec::new();
        for (index, element) in elements.into_iter().enumerate() {
            if index > 0 {
                content.push(Inline::plain(" "));
            }
            content.push(element);
        }
        normalize(content)
    })
}

fn document_footnotes() -> BTreeMap<String, (u32, String)> {
    FOOTNOTE_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| (label.to_string(), (index as u32, label.to_string())))
        .collect()
}

proptest! {
    #[test]
    fn offsets_cover_every_position(content in content_strategy()) {
        let map = ParagraphMap::build(&content);
        let size = content_size(&content);
        prop_assert_eq!(map.before_close.len(), size + 1);
        prop_assert_eq!(map.after_open.len(), size + 1);
        prop_assert_eq!(map.size(), size);
    }

    #[test]
    fn offsets_never_decrease(content in content_strategy()) {
        let map = ParagraphMap::build(&content);
        for pair in map.before_close.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        for pair in map.after_open.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        for (close, open) in map.before_close.iter().zip(&map.after_open) {
            prop_assert!(close <= open);
        }
        prop_assert!(map.after_open.last().copied().unwrap_or(0) <= map.source_len());
    }

    #[test]
    fn readings_agree_inside_runs(content in content_strategy()) {
        let map = ParagraphMap::build(&content);
        let mut start = 0;
        for run in &content {
            let end = start + run.size();
            for offset in start + 1..end {
                prop_assert_eq!(map.before_close[offset], map.after_open[offset]);
            }
            start = end;
        }
    }

    #[test]
    fn text_lands_at_its_source_position(content in content_strategy()) {
        let map = ParagraphMap::build(&content);
        let source: Vec<char> = map.source.chars().collect();
        let mut start = 0;
        for run in &content {
            let text: Vec<char> = run.as_text().unwrap_or_default().chars().collect();
            for (i, c) in text.iter().enumerate() {
                prop_assert_eq!(source[map.after_open[start + i]], *c);
            }
            start += run.size();
        }
    }

    #[test]
    fn source_reads_back_as_the_same_content(content in readable_content_strategy()) {
        let map = ParagraphMap::build(&content);
        let reparsed = MarkdownParser::default().parse_inline_fragment(
            &map.source,
            &Abbreviations::new(),
            &document_footnotes(),
        );
        prop_assert_eq!(reparsed, content, "source: {:?}", map.source);
    }
}

#[test]
fn test_atoms_take_one_offset_and_their_markdown() {
    let content = vec![
        Inline::plain("a"),
        Inline::atom(InlineNode::HardBreak, MarkSet::new()),
        Inline::plain("b "),
        Inline::atom(footnote_ref(2), MarkSet::new().with(Mark::Strong)),
    ];
    let map = ParagraphMap::build(&content);
    assert_eq!(map.source, "a\\\nb **[^note]**");
    assert_eq!(map.before_close, vec![0, 1, 3, 4, 5, 14]);
    assert_eq!(map.after_open, vec![0, 1, 3, 4, 7, 16]);

    let reparsed = MarkdownParser::default().parse_inline_fragment(
        &map.source,
        &Abbreviations::new(),
        &document_footnotes(),
    );
    assert_eq!(reparsed, content);
}

#[test]
fn test_unmarked_text_maps_one_to_one() {
    let map = ParagraphMap::build(&[Inline::plain("abc")]);
    assert_eq!(map.source, "abc");
    assert_eq!(map.before_close, vec![0, 1, 2, 3]);
    assert_eq!(map.after_open, map.before_close);
}

#[test]
fn test_adjacent_links_close_and_reopen() {
    let link = |href: &str| Mark::Link {
        href: href.into(),
        title: None,
    };
    let content = vec![
        Inline::text("a", MarkSet::from_marks([link("x")])),
        Inline::text("b", MarkSet::from_marks([link("y")])),
    ];
    let map = ParagraphMap::build(&content);
    assert_eq!(map.source, "[a](x)[b](y)");
    assert_eq!(map.before_close[1], 2);
    assert_eq!(map.after_open[1], 7);
}
