//! Export tests for Markdown (tree → Markdown)
//!
//! Snapshots pin the exact text the serializer writes for parsed input.

use insta::assert_snapshot;
use marklight_core::formats::markdown::serializer::SerializerOptions;
use marklight_core::{parse, serialize, serialize_with};

fn normalize(source: &str) -> String {
    serialize(&parse(source))
}

#[test]
fn test_underscore_emphasis_becomes_stars() {
    assert_snapshot!(normalize("_em_ and __strong__\n"), @"*em* and **strong**");
}

#[test]
fn test_setext_heading_becomes_atx() {
    assert_snapshot!(normalize("Title\n=====\n\nSub\n---\n"), @r"
    # Title

    ## Sub
    ");
}

#[test]
fn test_multi_line_setext_heading_keeps_its_lines() {
    assert_snapshot!(normalize("Title\nsecond\n=====\n"), @r"
    Title
    second
    ===
    ");
}

#[test]
fn test_marks_reopen_in_rank_order() {
    assert_snapshot!(normalize("**bold _em_**\n"), @"**bold *em***");
}

#[test]
fn test_whitespace_leaves_delimiters() {
    assert_snapshot!(normalize("a** b **c\n"), @r"a\*\* b \*\*c");
}

#[test]
fn test_link_with_marks() {
    assert_snapshot!(
        normalize("[**x** y](https://e.com \"t\")\n"),
        @r#"[**x** y](https://e.com "t")"#
    );
}

#[test]
fn test_ordered_list_keeps_start() {
    assert_snapshot!(normalize("3) a\n4) b\n"), @r"
    3. a
    4. b
    ");
}

#[test]
fn test_nested_list_indentation() {
    assert_snapshot!(normalize("* a\n    * b\n"), @r"
    - a
      - b
    ");
}

#[test]
fn test_task_list() {
    assert_snapshot!(normalize("- [x] done\n- [ ] todo\n"), @r"
    - [x] done
    - [ ] todo
    ");
}

#[test]
fn test_table_rows() {
    assert_snapshot!(normalize("a|b\n-|-\n1|2\n"), @r"
    | a | b |
    | --- | --- |
    | 1 | 2 |
    ");
}

#[test]
fn test_tilde_fence_becomes_backticks() {
    assert_snapshot!(normalize("~~~rust\nlet x = 1;\n~~~\n"), @r"
    ```rust
    let x = 1;
    ```
    ");
}

#[test]
fn test_custom_bullet_marker() {
    let options = SerializerOptions { bullet_marker: '*' };
    assert_snapshot!(serialize_with(&parse("- a\n- b\n"), &options), @r"
    * a
    * b
    ");
}
