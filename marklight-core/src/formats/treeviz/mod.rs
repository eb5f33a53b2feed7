//! Treeviz formatter for document trees
//!
//! A line per node, drawn with box connectors:
//!
//!     <prefix><connector> <icon> <label>
//!
//! Labels are truncated to 30 characters. Example:
//!
//! ⧉ Document (3 blocks, 0 abbreviations)
//! ├─ § h1 Title
//! ├─ ¶ Some bold text
//! └─ ☰ 2 items (tight)
//!   ├─ • 1 block
//!   │ └─ ¶ a
//!   └─ • 1 block
//!     └─ ¶ b
//!
//! With `ast-full=true` every inline run of a text block is listed as well,
//! together with its marks.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::Format;
use crate::model::{text_content, Block, Document, Inline, InlineNode};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

fn truncate(label: &str) -> String {
    let flat = label.replace('\n', "↵");
    if flat.chars().count() > LABEL_WIDTH {
        let cut: String = flat.chars().take(LABEL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        flat
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn block_label(block: &Block) -> String {
    match block {
        Block::Heading { level, content } => format!("h{level} {}", text_content(content)),
        Block::CodeBlock { params, text } => {
            let lines = count(text.lines().count(), "line");
            if params.is_empty() {
                lines
            } else {
                format!("{params} ({lines})")
            }
        }
        Block::HorizontalRule => "---".to_string(),
        Block::BulletList { tight, items } | Block::OrderedList { tight, items, .. } => {
            let kind = if *tight { "tight" } else { "loose" };
            format!("{} ({kind})", count(items.len(), "item"))
        }
        Block::TaskItem { checked, content } => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            format!("{mark} {}", text_content(content))
        }
        Block::MathBlock { latex } => latex.clone(),
        Block::FootnoteItem { id, label, .. } => format!("[^{label}] #{id}"),
        other => match (other.inline_content(), other.children()) {
            (Some(content), _) => text_content(content),
            (None, Some(children)) => count(children.len(), "block"),
            (None, None) => String::new(),
        },
    }
}

fn run_label(run: &Inline) -> String {
    let node = match &run.node {
        InlineNode::Text { text } => format!("\"{text}\""),
        InlineNode::Image { src, .. } => format!("image {src}"),
        InlineNode::HardBreak => "hard break".to_string(),
        InlineNode::MathInline { latex, .. } => format!("math {latex}"),
        InlineNode::FootnoteRef { label, .. } => format!("[^{label}]"),
    };
    if run.marks.is_empty() {
        node
    } else {
        let marks: Vec<&str> = run.marks.iter().map(|m| m.mark_type().name()).collect();
        format!("{node} [{}]", marks.join(", "))
    }
}

fn run_icon(run: &Inline) -> &'static str {
    match &run.node {
        InlineNode::Text { .. } => get_icon("text"),
        InlineNode::Image { .. } => get_icon("image"),
        InlineNode::HardBreak => get_icon("hard_break"),
        InlineNode::MathInline { .. } => get_icon("math_inline"),
        InlineNode::FootnoteRef { .. } => get_icon("footnote_ref"),
    }
}

fn connector(is_last: bool) -> (&'static str, &'static str) {
    if is_last {
        ("└─", "  ")
    } else {
        ("├─", "│ ")
    }
}

fn format_block(block: &Block, prefix: &str, is_last: bool, include_all: bool) -> String {
    let (branch, indent) = connector(is_last);
    let icon = get_icon(block.node_type().name());
    let mut output = format!("{prefix}{branch} {icon} {}\n", truncate(&block_label(block)));
    let child_prefix = format!("{prefix}{indent}");

    if let Some(children) = block.children() {
        output.push_str(&format_children(children, &child_prefix, include_all));
    } else if let (true, Some(content)) = (include_all, block.inline_content()) {
        for (i, run) in content.iter().enumerate() {
            let (branch, _) = connector(i + 1 == content.len());
            output.push_str(&format!(
                "{child_prefix}{branch} {} {}\n",
                run_icon(run),
                truncate(&run_label(run))
            ));
        }
    }
    output
}

fn format_children(children: &[Block], prefix: &str, include_all: bool) -> String {
    children
        .iter()
        .enumerate()
        .map(|(i, child)| format_block(child, prefix, i + 1 == children.len(), include_all))
        .collect()
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_params(doc, &HashMap::new())
}

/// Convert a document to treeviz string with optional parameters
///
/// - `"ast-full"`: when `"true"`, inline runs and their marks are listed
///   under every text block.
pub fn to_treeviz_str_with_params(doc: &Document, params: &HashMap<String, String>) -> String {
    let include_all = params
        .get("ast-full")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    let mut output = format!(
        "{} Document ({}, {})\n",
        get_icon("document"),
        count(doc.content.len(), "block"),
        count(doc.abbreviations.len(), "abbreviation")
    );
    output.push_str(&format_children(&doc.content, "", include_all));
    output
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        Ok(to_treeviz_str_with_params(doc, options))
    }
}
