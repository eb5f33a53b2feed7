//! Markdown serialization (document tree → Markdown)
//!
//! One writer per block type, each returning its markdown without a trailing
//! newline. Containers render their children first and then prefix the lines
//! (`> ` for quotes, marker plus hanging indent for list items, four spaces
//! for footnote continuations). Sibling blocks are separated by a blank line,
//! items of a tight list by a single newline.
//!
//! Inline content is written with a stack of open marks so that delimiters
//! always nest. Whitespace at the edge of a marked run is moved outside the
//! delimiters, otherwise `**a **` would not parse back as strong.
//!
//! Abbreviation definitions stored on the document are appended after the
//! body.

use super::abbreviations;
use crate::model::marks::link_destination;
use crate::model::{Block, Document, Inline, InlineNode, Mark, MarkType, NodeType};

/// Output knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Marker for bullet and task lists. Adjacent lists alternate with `*`
    /// (or `-` when this is already `*`).
    pub bullet_marker: char,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        SerializerOptions { bullet_marker: '-' }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer {
    options: SerializerOptions,
}

impl MarkdownSerializer {
    pub fn new(options: SerializerOptions) -> Self {
        MarkdownSerializer { options }
    }

    pub fn serialize(&self, doc: &Document) -> String {
        let body = self.blocks(&doc.content, "\n\n");
        let body = if body.is_empty() {
            body
        } else {
            format!("{body}\n")
        };
        abbreviations::append_definitions(&body, &doc.abbreviations)
    }

    fn bullet(&self, alternate: bool) -> char {
        let base = match self.options.bullet_marker {
            '*' | '+' | '-' => self.options.bullet_marker,
            _ => '-',
        };
        match (alternate, base) {
            (false, marker) => marker,
            (true, '*') => '-',
            (true, _) => '*',
        }
    }

    fn blocks(&self, blocks: &[Block], separator: &str) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(blocks.len());
        let mut previous: Option<NodeType> = None;
        let mut alternate = false;

        for block in blocks {
            let kind = block.node_type();
            alternate = match (previous.and_then(list_family), list_family(kind)) {
                (Some(a), Some(b)) if a == b => !alternate,
                _ => false,
            };
            let rendered = self.block(block, alternate);
            if rendered.is_empty() && kind == NodeType::Paragraph {
                continue;
            }
            parts.push(rendered);
            previous = Some(kind);
        }
        parts.join(separator)
    }

    fn block(&self, block: &Block, alternate: bool) -> String {
        match block {
            Block::Paragraph { content } => self.inline(content),
            Block::Heading { level, content } => {
                let text = self.inline(content);
                if *level <= 2 && text.contains('\n') {
                    let underline = if *level == 1 { "===" } else { "---" };
                    return format!("{text}\n{underline}");
                }
                let text = escape_closing_hash(text.replace('\n', " "));
                let hashes = "#".repeat((*level).clamp(1, 6) as usize);
                if text.is_empty() {
                    hashes
                } else {
                    format!("{hashes} {text}")
                }
            }
            Block::Blockquote { content } => {
                prefix_lines(&self.blocks(content, "\n\n"), "> ", "> ")
            }
            Block::CodeBlock { params, text } => code_fence(params, text),
            Block::HorizontalRule => "---".to_string(),
            Block::BulletList { tight, items } => {
                let marker = format!("{} ", self.bullet(alternate));
                self.list(items, *tight, |_| marker.clone())
            }
            Block::OrderedList {
                order,
                tight,
                items,
            } => {
                let delimiter = if alternate { ')' } else { '.' };
                let widest = (order + items.len().saturating_sub(1) as u64).to_string().len();
                self.list(items, *tight, |index| {
                    let number = (order + index as u64).to_string();
                    let marker = format!("{number}{delimiter} ");
                    format!("{marker:<width$}", width = widest + 2)
                })
            }
            Block::ListItem { content } => self.blocks(content, "\n\n"),
            Block::TaskList { items } => {
                let bullet = self.bullet(alternate);
                items
                    .iter()
                    .map(|item| self.task_item(item, bullet))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Block::TaskItem { .. } => self.task_item(block, self.bullet(alternate)),
            Block::Table { rows } => self.table(rows),
            Block::TableRow { cells } => self.table_row(cells),
            Block::TableHeader { content } | Block::TableCell { content } => {
                self.table_cell(content)
            }
            Block::MathBlock { latex } => format!("$${latex}$$"),
            Block::FootnoteBlock { items } => self.blocks(items, "\n\n"),
            Block::FootnoteItem { label, content, .. } => {
                let body = self.blocks(content, "\n\n");
                prefix_lines(&body, &format!("[^{label}]: "), "    ")
            }
            Block::DefinitionList { items } => self.blocks(items, "\n\n"),
            Block::DefinitionTerm { content } => self.inline(content).replace('\n', " "),
            Block::DefinitionDescription { content } => {
                prefix_lines(&self.blocks(content, "\n\n"), ": ", "  ")
            }
        }
    }

    fn list(&self, items: &[Block], tight: bool, marker: impl Fn(usize) -> String) -> String {
        let inner_separator = if tight { "\n" } else { "\n\n" };
        let rendered: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let marker = marker(index);
                let body = match item {
                    Block::ListItem { content } => self.blocks(content, inner_separator),
                    other => self.block(other, false),
                };
                if body.is_empty() {
                    marker.trim_end().to_string()
                } else {
                    let indent = " ".repeat(marker.chars().count());
                    prefix_lines(&body, &marker, &indent)
                }
            })
            .collect();
        rendered.join(if tight { "\n" } else { "\n\n" })
    }

    fn task_item(&self, item: &Block, bullet: char) -> String {
        let (checked, content) = match item {
            Block::TaskItem { checked, content } => (*checked, content),
            other => return self.block(other, false),
        };
        let marker = format!("{bullet} [{}] ", if checked { 'x' } else { ' ' });
        prefix_lines(&self.inline(content), &marker, "  ")
    }

    fn table(&self, rows: &[Block]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (index, row) in rows.iter().enumerate() {
            lines.push(self.block(row, false));
            if index == 0 {
                let columns = row.children().map_or(1, |cells| cells.len().max(1));
                lines.push(format!("{}|", "| --- ".repeat(columns)));
            }
        }
        lines.join("\n")
    }

    fn table_row(&self, cells: &[Block]) -> String {
        let cells: Vec<String> = cells.iter().map(|cell| self.block(cell, false)).collect();
        format!("| {} |", cells.join(" | "))
    }

    fn table_cell(&self, content: &[Inline]) -> String {
        self.inline(content).replace('\n', " ")
    }

    /// Writes inline content with properly nested mark delimiters.
    pub fn inline(&self, content: &[Inline]) -> String {
        let plan = plan_marks(content);
        let mut out = String::new();
        // Trailing whitespace of the previous run, written after its closings.
        let mut pending = String::new();

        for (index, run) in content.iter().enumerate() {
            let boundary = &plan[index];
            for mark in &boundary.close {
                out.push_str(&mark.source_delimiters().1);
            }
            out.push_str(&pending);
            pending.clear();

            let code = run.marks.has_type(MarkType::Code);
            match &run.node {
                InlineNode::Text { text } if !code => {
                    let closes_next = !plan[index + 1].close.is_empty();
                    let (lead, core, trail) =
                        split_edges(text, !boundary.open.is_empty(), closes_next);
                    out.push_str(lead);
                    for mark in &boundary.open {
                        out.push_str(&mark.source_delimiters().0);
                    }
                    push_escaped(&mut out, core);
                    pending.push_str(trail);
                }
                _ => {
                    for mark in &boundary.open {
                        out.push_str(&mark.source_delimiters().0);
                    }
                    out.push_str(&render_run(run, code));
                }
            }
        }

        if let Some(end) = plan.last() {
            for mark in &end.close {
                out.push_str(&mark.source_delimiters().1);
            }
        }
        out.push_str(&pending);
        out
    }
}

#[derive(Debug, Default, Clone)]
struct Boundary {
    close: Vec<Mark>,
    open: Vec<Mark>,
}

/// For each run boundary (and the end), which marks close and which open.
fn plan_marks(content: &[Inline]) -> Vec<Boundary> {
    let mut stack: Vec<Mark> = Vec::new();
    let mut plan = Vec::with_capacity(content.len() + 1);

    for run in content {
        let target: Vec<&Mark> = run
            .marks
            .iter()
            .filter(|m| m.mark_type() != MarkType::Code)
            .collect();
        let keep = stack
            .iter()
            .take_while(|open| target.contains(open))
            .count();
        let close: Vec<Mark> = stack.drain(keep..).rev().collect();
        let open: Vec<Mark> = target
            .into_iter()
            .filter(|t| !stack.contains(t))
            .cloned()
            .collect();
        stack.extend(open.iter().cloned());
        plan.push(Boundary { close, open });
    }
    plan.push(Boundary {
        close: stack.into_iter().rev().collect(),
        open: Vec::new(),
    });
    plan
}

fn list_family(kind: NodeType) -> Option<u8> {
    match kind {
        NodeType::BulletList | NodeType::TaskList => Some(0),
        NodeType::OrderedList => Some(1),
        _ => None,
    }
}

/// Splits leading/trailing whitespace off a run when delimiters touch it.
fn split_edges(text: &str, opens: bool, closes: bool) -> (&str, &str, &str) {
    let lead_len = if opens {
        text.len() - text.trim_start().len()
    } else {
        0
    };
    let rest = &text[lead_len..];
    let trail_len = if closes {
        rest.len() - rest.trim_end().len()
    } else {
        0
    };
    (
        &text[..lead_len],
        &rest[..rest.len() - trail_len],
        &rest[rest.len() - trail_len..],
    )
}

fn render_run(run: &Inline, code: bool) -> String {
    match &run.node {
        InlineNode::Text { text } if code => code_span(text),
        InlineNode::Text { text } => text.clone(),
        atom => atom_source(atom),
    }
}

/// The markdown of a single inline node, unescaped for text.
pub(crate) fn atom_source(node: &InlineNode) -> String {
    match node {
        InlineNode::Text { text } => text.clone(),
        InlineNode::Image { src, alt, title } => {
            let mut alt_escaped = String::new();
            push_escaped(&mut alt_escaped, alt);
            format!("![{alt_escaped}]({})", link_destination(src, title.as_deref()))
        }
        InlineNode::HardBreak => "\\\n".to_string(),
        InlineNode::MathInline { latex, display } => {
            if *display {
                format!("$${latex}$$")
            } else {
                format!("${latex}$")
            }
        }
        InlineNode::FootnoteRef { label, .. } => format!("[^{label}]"),
    }
}

fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// A code span whose fence is longer than any backtick run inside.
pub(crate) fn code_span(text: &str) -> String {
    let fence = "`".repeat(longest_run(text, '`') + 1);
    let needs_padding = text.starts_with('`')
        || text.ends_with('`')
        || (text.starts_with(' ') && text.ends_with(' ') && !text.trim().is_empty());
    if needs_padding {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

fn code_fence(params: &str, text: &str) -> String {
    let fence = "`".repeat(longest_run(text, '`').max(2) + 1);
    format!("{fence}{params}\n{text}\n{fence}")
}

/// Prefixes the first line with `first` and every other line with `rest`.
/// Blank lines get the prefix without trailing spaces.
pub(crate) fn prefix_lines(text: &str, first: &str, rest: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            let prefix = if index == 0 { first } else { rest };
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escapes text so it parses back as the same characters.
fn push_escaped(out: &mut String, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    for (index, &ch) in chars.iter().enumerate() {
        let line_start = if index == 0 {
            out.is_empty() || out.ends_with('\n')
        } else {
            chars[index - 1] == '\n'
        };
        let prev = if index == 0 {
            out.chars().last()
        } else {
            Some(chars[index - 1])
        };
        let next = chars.get(index + 1).copied();

        let escape = match ch {
            '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '^' | '~' | '$' | '|' => true,
            '=' => prev == Some('=') || next == Some('=') || line_start,
            '&' => next.is_some_and(|c| c == '#' || c.is_alphanumeric()),
            '#' | '>' | '-' | '+' => line_start,
            ':' => line_start && next.map_or(true, char::is_whitespace),
            '.' | ')' => {
                next.map_or(true, char::is_whitespace) && digits_from_line_start(&chars, index)
            }
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Escapes an unescaped `#` ending ATX heading text, which would otherwise
/// read back as part of the closing sequence.
fn escape_closing_hash(mut text: String) -> String {
    if let Some(rest) = text.strip_suffix('#') {
        let backslashes = rest.chars().rev().take_while(|&c| c == '\\').count();
        if backslashes % 2 == 0 {
            text.insert(text.len() - 1, '\\');
        }
    }
    text
}

/// Whether `chars[..index]` is a non-empty run of digits starting a line.
fn digits_from_line_start(chars: &[char], index: usize) -> bool {
    let mut start = index;
    while start > 0 && chars[start - 1].is_ascii_digit() {
        start -= 1;
    }
    start < index && (start == 0 || chars[start - 1] == '\n')
}

/// Serializes with default options.
pub fn serialize_to_markdown(doc: &Document) -> String {
    MarkdownSerializer::default().serialize(doc)
}
