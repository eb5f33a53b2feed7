//! Round-trip tests: `parse(serialize(parse(x)))` must equal `parse(x)`.

use marklight_core::{parse, serialize, Document};

fn assert_round_trip(source: &str) {
    let first: Document = parse(source);
    let markdown = serialize(&first);
    let second = parse(&markdown);
    assert_eq!(
        second, first,
        "round trip changed the tree\nsource:\n{source}\nserialized:\n{markdown}"
    );
}

#[test]
fn test_headings_and_inline_marks() {
    assert_round_trip("# Heading\n\nParagraph with **bold**, *em* and `code`.\n");
    assert_round_trip("### Deep *heading*\n");
}

#[test]
fn test_multi_line_setext_headings() {
    assert_round_trip("Title\nsecond\n=====\n");
    assert_round_trip("Sub *title*\nspans lines\n---\n\nBody\n");
}

#[test]
fn test_heading_ending_in_hash() {
    assert_round_trip("# a \\#\n");
    assert_round_trip("## Learn C\\#\n");
}

#[test]
fn test_nested_marks() {
    assert_round_trip("Some ***strong em*** and **bold *inner* bold**\n");
}

#[test]
fn test_extension_marks() {
    assert_round_trip("Text with ~~strike~~, ==mark==, H~2~O and x^2^.\n");
}

#[test]
fn test_escaped_characters() {
    assert_round_trip("Literal \\*stars\\*, \\_under\\_, \\=\\= and a \\| pipe\n");
    assert_round_trip("1\\. not a list\n");
}

#[test]
fn test_lists() {
    assert_round_trip("- a\n- b\n- c\n");
    assert_round_trip("- a\n\n- b\n");
    assert_round_trip("3. three\n4. four\n");
    assert_round_trip("- outer\n  - inner\n  - inner two\n- back\n");
}

#[test]
fn test_adjacent_lists_stay_separate() {
    let doc = parse("- a\n\n* b\n");
    assert_eq!(doc.content.len(), 2);
    assert_round_trip("- a\n\n* b\n");
}

#[test]
fn test_blockquote() {
    assert_round_trip("> quote\n>\n> second paragraph\n");
    assert_round_trip("> - quoted list\n> - item\n");
}

#[test]
fn test_code_blocks() {
    assert_round_trip("```rust\nfn main() {}\n```\n");
    assert_round_trip("````\n```\nnested fence\n```\n````\n");
    assert_round_trip("Use `` a`b `` inline\n");
}

#[test]
fn test_table() {
    assert_round_trip("| a | b |\n| --- | --- |\n| 1 | 2 |\n| *x* | `y` |\n");
}

#[test]
fn test_task_list() {
    assert_round_trip("- [ ] todo\n- [x] done\n");
}

#[test]
fn test_math() {
    assert_round_trip("Inline $x^2$ math\n");
    assert_round_trip("$$E = mc^2$$\n");
}

#[test]
fn test_footnotes() {
    assert_round_trip("Footnote[^1] here.\n\n[^1]: The note.\n");
}

#[test]
fn test_definition_list() {
    assert_round_trip("Term\n\n: Definition\n");
}

#[test]
fn test_links_and_images() {
    assert_round_trip("[link](https://example.com \"Title\") and ![alt](a.png)\n");
    assert_round_trip("[**bold link**](https://example.com)\n");
}

#[test]
fn test_horizontal_rule_and_hard_break() {
    assert_round_trip("a\n\n---\n\nb\n");
    assert_round_trip("line one\\\nline two\n");
}

#[test]
fn test_abbreviations() {
    assert_round_trip("HTML is great\n\n*[HTML]: Hyper Text Markup Language\n");
}
