//! Document tree nodes
//!
//! The tree is a closed set of block variants. Each variant fixes what it may
//! hold: inline containers hold a flat list of [`Inline`] runs, block
//! containers hold other blocks, and leaves hold plain attributes.
//!
//! Inline content is a list of runs. A run is either text or an atom, plus the
//! set of marks applied to it. Text contributes one structural unit per `char`,
//! an atom contributes exactly one unit.

use super::attrs::Attrs;
use super::marks::MarkSet;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The type name of a node, used by the token table and by content validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Paragraph,
    Heading,
    Blockquote,
    CodeBlock,
    HorizontalRule,
    BulletList,
    OrderedList,
    ListItem,
    TaskList,
    TaskItem,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    MathBlock,
    FootnoteBlock,
    FootnoteItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Image,
    HardBreak,
    MathInline,
    FootnoteRef,
}

/// What a node type accepts as content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Inline,
    Blocks,
    Leaf,
    Atom,
}

impl NodeType {
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::CodeBlock => "code_block",
            NodeType::HorizontalRule => "horizontal_rule",
            NodeType::BulletList => "bullet_list",
            NodeType::OrderedList => "ordered_list",
            NodeType::ListItem => "list_item",
            NodeType::TaskList => "task_list",
            NodeType::TaskItem => "task_item",
            NodeType::Table => "table",
            NodeType::TableRow => "table_row",
            NodeType::TableHeader => "table_header",
            NodeType::TableCell => "table_cell",
            NodeType::MathBlock => "math_block",
            NodeType::FootnoteBlock => "footnote_block",
            NodeType::FootnoteItem => "footnote_item",
            NodeType::DefinitionList => "definition_list",
            NodeType::DefinitionTerm => "definition_term",
            NodeType::DefinitionDescription => "definition_description",
            NodeType::Image => "image",
            NodeType::HardBreak => "hard_break",
            NodeType::MathInline => "math_inline",
            NodeType::FootnoteRef => "footnote_ref",
        }
    }

    pub fn content_kind(&self) -> ContentKind {
        match self {
            NodeType::Paragraph
            | NodeType::Heading
            | NodeType::TaskItem
            | NodeType::TableHeader
            | NodeType::TableCell
            | NodeType::DefinitionTerm => ContentKind::Inline,
            NodeType::CodeBlock | NodeType::HorizontalRule | NodeType::MathBlock => {
                ContentKind::Leaf
            }
            NodeType::Image | NodeType::HardBreak | NodeType::MathInline | NodeType::FootnoteRef => {
                ContentKind::Atom
            }
            _ => ContentKind::Blocks,
        }
    }

    /// Whether a block of type `child` may appear directly inside this node.
    pub fn allows_child(&self, child: NodeType) -> bool {
        match self {
            NodeType::BulletList | NodeType::OrderedList => child == NodeType::ListItem,
            NodeType::TaskList => child == NodeType::TaskItem,
            NodeType::Table => child == NodeType::TableRow,
            NodeType::TableRow => matches!(child, NodeType::TableHeader | NodeType::TableCell),
            NodeType::DefinitionList => matches!(
                child,
                NodeType::DefinitionTerm | NodeType::DefinitionDescription
            ),
            NodeType::FootnoteBlock => child == NodeType::FootnoteItem,
            NodeType::Blockquote
            | NodeType::ListItem
            | NodeType::FootnoteItem
            | NodeType::DefinitionDescription => child.is_flow(),
            _ => false,
        }
    }

    /// Blocks that may appear at document level or inside a generic block container.
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            NodeType::Paragraph
                | NodeType::Heading
                | NodeType::Blockquote
                | NodeType::CodeBlock
                | NodeType::HorizontalRule
                | NodeType::BulletList
                | NodeType::OrderedList
                | NodeType::TaskList
                | NodeType::Table
                | NodeType::MathBlock
                | NodeType::FootnoteBlock
                | NodeType::DefinitionList
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An inline atom or a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineNode {
    Text {
        text: String,
    },
    Image {
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    HardBreak,
    MathInline {
        latex: String,
        #[serde(default)]
        display: bool,
    },
    FootnoteRef {
        id: u32,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inline {
    #[serde(flatten)]
    pub node: InlineNode,
    #[serde(default, skip_serializing_if = "MarkSet::is_empty")]
    pub marks: MarkSet,
}

impl Inline {
    pub fn text(text: impl Into<String>, marks: MarkSet) -> Self {
        Inline {
            node: InlineNode::Text { text: text.into() },
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Inline::text(text, MarkSet::new())
    }

    pub fn atom(node: InlineNode, marks: MarkSet) -> Self {
        Inline { node, marks }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.node {
            InlineNode::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_atom(&self) -> bool {
        self.as_text().is_none()
    }

    /// Structural size of the run.
    pub fn size(&self) -> usize {
        match &self.node {
            InlineNode::Text { text } => text.chars().count(),
            _ => 1,
        }
    }
}

/// Total structural size of an inline content list.
pub fn content_size(content: &[Inline]) -> usize {
    content.iter().map(Inline::size).sum()
}

/// Concatenated text of the content, atoms excluded.
pub fn text_content(content: &[Inline]) -> String {
    content.iter().filter_map(Inline::as_text).collect()
}

/// Merges adjacent text runs with equal marks and drops empty text runs.
pub fn normalize(runs: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(runs.len());
    for run in runs {
        if let InlineNode::Text { text } = &run.node {
            if text.is_empty() {
                continue;
            }
            if let Some(Inline {
                node: InlineNode::Text { text: prev },
                marks,
            }) = out.last_mut()
            {
                if *marks == run.marks {
                    prev.push_str(text);
                    continue;
                }
            }
        }
        out.push(run);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        content: Vec<Inline>,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Blockquote {
        content: Vec<Block>,
    },
    CodeBlock {
        params: String,
        text: String,
    },
    HorizontalRule,
    BulletList {
        tight: bool,
        items: Vec<Block>,
    },
    OrderedList {
        order: u64,
        tight: bool,
        items: Vec<Block>,
    },
    ListItem {
        content: Vec<Block>,
    },
    TaskList {
        items: Vec<Block>,
    },
    TaskItem {
        checked: bool,
        content: Vec<Inline>,
    },
    Table {
        rows: Vec<Block>,
    },
    TableRow {
        cells: Vec<Block>,
    },
    TableHeader {
        content: Vec<Inline>,
    },
    TableCell {
        content: Vec<Inline>,
    },
    MathBlock {
        latex: String,
    },
    FootnoteBlock {
        items: Vec<Block>,
    },
    FootnoteItem {
        id: u32,
        label: String,
        content: Vec<Block>,
    },
    DefinitionList {
        items: Vec<Block>,
    },
    DefinitionTerm {
        content: Vec<Inline>,
    },
    DefinitionDescription {
        content: Vec<Block>,
    },
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph { content }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Block::Paragraph { .. } => NodeType::Paragraph,
            Block::Heading { .. } => NodeType::Heading,
            Block::Blockquote { .. } => NodeType::Blockquote,
            Block::CodeBlock { .. } => NodeType::CodeBlock,
            Block::HorizontalRule => NodeType::HorizontalRule,
            Block::BulletList { .. } => NodeType::BulletList,
            Block::OrderedList { .. } => NodeType::OrderedList,
            Block::ListItem { .. } => NodeType::ListItem,
            Block::TaskList { .. } => NodeType::TaskList,
            Block::TaskItem { .. } => NodeType::TaskItem,
            Block::Table { .. } => NodeType::Table,
            Block::TableRow { .. } => NodeType::TableRow,
            Block::TableHeader { .. } => NodeType::TableHeader,
            Block::TableCell { .. } => NodeType::TableCell,
            Block::MathBlock { .. } => NodeType::MathBlock,
            Block::FootnoteBlock { .. } => NodeType::FootnoteBlock,
            Block::FootnoteItem { .. } => NodeType::FootnoteItem,
            Block::DefinitionList { .. } => NodeType::DefinitionList,
            Block::DefinitionTerm { .. } => NodeType::DefinitionTerm,
            Block::DefinitionDescription { .. } => NodeType::DefinitionDescription,
        }
    }

    /// Inline content of an inline container, `None` for every other block.
    pub fn inline_content(&self) -> Option<&Vec<Inline>> {
        match self {
            Block::Paragraph { content }
            | Block::Heading { content, .. }
            | Block::TaskItem { content, .. }
            | Block::TableHeader { content }
            | Block::TableCell { content }
            | Block::DefinitionTerm { content } => Some(content),
            _ => None,
        }
    }

    pub fn inline_content_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Block::Paragraph { content }
            | Block::Heading { content, .. }
            | Block::TaskItem { content, .. }
            | Block::TableHeader { content }
            | Block::TableCell { content }
            | Block::DefinitionTerm { content } => Some(content),
            _ => None,
        }
    }

    /// Child blocks of a block container, `None` for inline containers and leaves.
    pub fn children(&self) -> Option<&Vec<Block>> {
        match self {
            Block::Blockquote { content }
            | Block::ListItem { content }
            | Block::FootnoteItem { content, .. }
            | Block::DefinitionDescription { content } => Some(content),
            Block::BulletList { items, .. }
            | Block::OrderedList { items, .. }
            | Block::TaskList { items }
            | Block::FootnoteBlock { items }
            | Block::DefinitionList { items } => Some(items),
            Block::Table { rows } => Some(rows),
            Block::TableRow { cells } => Some(cells),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::Blockquote { content }
            | Block::ListItem { content }
            | Block::FootnoteItem { content, .. }
            | Block::DefinitionDescription { content } => Some(content),
            Block::BulletList { items, .. }
            | Block::OrderedList { items, .. }
            | Block::TaskList { items }
            | Block::FootnoteBlock { items }
            | Block::DefinitionList { items } => Some(items),
            Block::Table { rows } => Some(rows),
            Block::TableRow { cells } => Some(cells),
            _ => None,
        }
    }

    /// Builds a block from its type, extracted attributes and collected content.
    ///
    /// Content that the type does not accept is rejected.
    pub fn build(
        node: NodeType,
        attrs: &Attrs,
        blocks: Vec<Block>,
        inlines: Vec<Inline>,
    ) -> Result<Block, ParseError> {
        match node.content_kind() {
            ContentKind::Inline => {
                if let Some(block) = blocks.first() {
                    return Err(ParseError::InvalidContent {
                        node: node.name(),
                        found: block.node_type().name().to_string(),
                    });
                }
            }
            ContentKind::Blocks => {
                if let Some(inline) = inlines.iter().find(|run| {
                    !matches!(&run.node, InlineNode::Text { text } if text.trim().is_empty())
                }) {
                    return Err(ParseError::InvalidContent {
                        node: node.name(),
                        found: format!("inline {:?}", inline.node),
                    });
                }
                if let Some(child) = blocks.iter().find(|b| !node.allows_child(b.node_type())) {
                    return Err(ParseError::InvalidContent {
                        node: node.name(),
                        found: child.node_type().name().to_string(),
                    });
                }
            }
            ContentKind::Leaf | ContentKind::Atom => {
                if !blocks.is_empty() || !inlines.is_empty() {
                    return Err(ParseError::InvalidContent {
                        node: node.name(),
                        found: "content".to_string(),
                    });
                }
            }
        }

        let inlines = normalize(inlines);
        let text = |name: &str| attrs.text(name).unwrap_or_default().to_string();
        Ok(match node {
            NodeType::Paragraph => Block::Paragraph { content: inlines },
            NodeType::Heading => Block::Heading {
                level: attrs.int("level").unwrap_or(1).clamp(1, 6) as u8,
                content: inlines,
            },
            NodeType::Blockquote => Block::Blockquote { content: blocks },
            NodeType::CodeBlock => Block::CodeBlock {
                params: text("params"),
                text: text("text"),
            },
            NodeType::HorizontalRule => Block::HorizontalRule,
            NodeType::BulletList => Block::BulletList {
                tight: attrs.bool("tight").unwrap_or(false),
                items: blocks,
            },
            NodeType::OrderedList => Block::OrderedList {
                order: attrs.int("order").unwrap_or(1).max(0) as u64,
                tight: attrs.bool("tight").unwrap_or(false),
                items: blocks,
            },
            NodeType::ListItem => Block::ListItem { content: blocks },
            NodeType::TaskList => Block::TaskList { items: blocks },
            NodeType::TaskItem => Block::TaskItem {
                checked: attrs.bool("checked").unwrap_or(false),
                content: inlines,
            },
            NodeType::Table => Block::Table { rows: blocks },
            NodeType::TableRow => Block::TableRow { cells: blocks },
            NodeType::TableHeader => Block::TableHeader { content: inlines },
            NodeType::TableCell => Block::TableCell { content: inlines },
            NodeType::MathBlock => Block::MathBlock {
                latex: text("latex"),
            },
            NodeType::FootnoteBlock => Block::FootnoteBlock { items: blocks },
            NodeType::FootnoteItem => Block::FootnoteItem {
                id: attrs.int("id").unwrap_or(0).max(0) as u32,
                label: text("label"),
                content: blocks,
            },
            NodeType::DefinitionList => Block::DefinitionList { items: blocks },
            NodeType::DefinitionTerm => Block::DefinitionTerm { content: inlines },
            NodeType::DefinitionDescription => Block::DefinitionDescription { content: blocks },
            NodeType::Image | NodeType::HardBreak | NodeType::MathInline | NodeType::FootnoteRef => {
                return Err(ParseError::InvalidContent {
                    node: node.name(),
                    found: "block position".to_string(),
                })
            }
        })
    }
}

impl InlineNode {
    /// Builds an inline atom from its type and attributes.
    pub fn build_atom(node: NodeType, attrs: &Attrs) -> Result<InlineNode, ParseError> {
        let text = |name: &str| attrs.text(name).unwrap_or_default().to_string();
        Ok(match node {
            NodeType::Image => InlineNode::Image {
                src: text("src"),
                alt: text("alt"),
                title: attrs.text("title").map(str::to_string),
            },
            NodeType::HardBreak => InlineNode::HardBreak,
            NodeType::MathInline => InlineNode::MathInline {
                latex: text("latex"),
                display: attrs.bool("display").unwrap_or(false),
            },
            NodeType::FootnoteRef => InlineNode::FootnoteRef {
                id: attrs.int("id").unwrap_or(0).max(0) as u32,
                label: text("label"),
            },
            other => {
                return Err(ParseError::InvalidContent {
                    node: other.name(),
                    found: "inline position".to_string(),
                })
            }
        })
    }
}

/// Abbreviation definitions collected from `*[label]: definition` lines.
///
/// Labels keep the position of their first definition; a later definition of
/// the same label replaces the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abbreviations(Vec<(String, String)>);

impl Abbreviations {
    pub fn new() -> Self {
        Abbreviations(Vec::new())
    }

    pub fn insert(&mut self, label: impl Into<String>, definition: impl Into<String>) {
        let label = label.into();
        let definition = definition.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = definition,
            None => self.0.push((label, definition)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, definition)| definition.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, d)| (l.as_str(), d.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Child-index path from the document root to a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPath(pub Vec<usize>);

impl BlockPath {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        BlockPath(indices.into())
    }

    pub fn parent(&self) -> Option<BlockPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(BlockPath(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn child(&self, index: usize) -> BlockPath {
        let mut indices = self.0.clone();
        indices.push(index);
        BlockPath(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// The root of the tree. Always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: Vec<Block>,
    #[serde(default, skip_serializing_if = "Abbreviations::is_empty")]
    pub abbreviations: Abbreviations,
}

impl Document {
    /// The minimal valid document: one empty paragraph.
    pub fn empty() -> Self {
        Document {
            content: vec![Block::paragraph(Vec::new())],
            abbreviations: Abbreviations::new(),
        }
    }

    pub fn new(content: Vec<Block>) -> Self {
        Document::with_abbreviations(content, Abbreviations::new())
    }

    pub fn with_abbreviations(content: Vec<Block>, abbreviations: Abbreviations) -> Self {
        let content = if content.is_empty() {
            vec![Block::paragraph(Vec::new())]
        } else {
            content
        };
        Document {
            content,
            abbreviations,
        }
    }

    pub fn block(&self, path: &BlockPath) -> Option<&Block> {
        let (first, rest) = path.0.split_first()?;
        let mut block = self.content.get(*first)?;
        for index in rest {
            block = block.children()?.get(*index)?;
        }
        Some(block)
    }

    pub fn block_mut(&mut self, path: &BlockPath) -> Option<&mut Block> {
        let (first, rest) = path.0.split_first()?;
        let mut block = self.content.get_mut(*first)?;
        for index in rest {
            block = block.children_mut()?.get_mut(*index)?;
        }
        Some(block)
    }

    /// The sibling list that holds the block at `path`.
    pub fn siblings_mut(&mut self, path: &BlockPath) -> Option<&mut Vec<Block>> {
        match path.parent() {
            Some(parent) if parent.depth() > 0 => self.block_mut(&parent)?.children_mut(),
            Some(_) => Some(&mut self.content),
            None => None,
        }
    }

    /// Paths of every inline container, in document order.
    pub fn textblock_paths(&self) -> Vec<BlockPath> {
        fn walk(blocks: &[Block], prefix: &BlockPath, out: &mut Vec<BlockPath>) {
            for (index, block) in blocks.iter().enumerate() {
                let path = prefix.child(index);
                if block.inline_content().is_some() {
                    out.push(path.clone());
                }
                if let Some(children) = block.children() {
                    walk(children, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.content, &BlockPath::default(), &mut out);
        out
    }

    /// Footnote number and label keyed by lowercased label, from definitions
    /// and references alike. The first occurrence of a label wins.
    pub fn footnotes(&self) -> BTreeMap<String, (u32, String)> {
        fn record(out: &mut BTreeMap<String, (u32, String)>, id: u32, label: &str) {
            out.entry(label.to_lowercase())
                .or_insert_with(|| (id, label.to_string()));
        }
        fn walk(blocks: &[Block], out: &mut BTreeMap<String, (u32, String)>) {
            for block in blocks {
                if let Block::FootnoteItem { id, label, .. } = block {
                    record(out, *id, label);
                }
                for run in block.inline_content().into_iter().flatten() {
                    if let InlineNode::FootnoteRef { id, label } = &run.node {
                        record(out, *id, label);
                    }
                }
                if let Some(children) = block.children() {
                    walk(children, out);
                }
            }
        }
        let mut out = BTreeMap::new();
        walk(&self.content, &mut out);
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::marks::Mark;

    #[test]
    fn normalize_merges_equal_runs_and_drops_empty_text() {
        let strong = MarkSet::new().with(Mark::Strong);
        let runs = vec![
            Inline::plain("a"),
            Inline::plain(""),
            Inline::plain("b"),
            Inline::text("c", strong.clone()),
            Inline::text("d", strong.clone()),
            Inline::atom(InlineNode::HardBreak, MarkSet::new()),
            Inline::plain("e"),
        ];
        let merged = normalize(runs);
        assert_eq!(
            merged,
            vec![
                Inline::plain("ab"),
                Inline::text("cd", strong),
                Inline::atom(InlineNode::HardBreak, MarkSet::new()),
                Inline::plain("e"),
            ]
        );
    }

    #[test]
    fn content_size_counts_chars_and_atoms() {
        let content = vec![
            Inline::plain("héllo"),
            Inline::atom(InlineNode::HardBreak, MarkSet::new()),
        ];
        assert_eq!(content_size(&content), 6);
    }

    #[test]
    fn empty_document_has_one_empty_paragraph() {
        let doc = Document::new(Vec::new());
        assert_eq!(doc.content, vec![Block::paragraph(Vec::new())]);
    }

    #[test]
    fn build_rejects_blocks_in_inline_container() {
        let result = Block::build(
            NodeType::Paragraph,
            &Attrs::new(),
            vec![Block::HorizontalRule],
            Vec::new(),
        );
        assert!(matches!(result, Err(ParseError::InvalidContent { .. })));
    }

    #[test]
    fn build_rejects_foreign_list_children() {
        let result = Block::build(
            NodeType::BulletList,
            &Attrs::new(),
            vec![Block::paragraph(Vec::new())],
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn abbreviations_keep_first_position_and_last_definition() {
        let mut abbr = Abbreviations::new();
        abbr.insert("HTML", "first");
        abbr.insert("CSS", "Cascading Style Sheets");
        abbr.insert("HTML", "HyperText Markup Language");
        let entries: Vec<_> = abbr.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("HTML", "HyperText Markup Language"),
                ("CSS", "Cascading Style Sheets")
            ]
        );
    }

    #[test]
    fn block_lookup_follows_paths() {
        let doc = Document::new(vec![Block::BulletList {
            tight: true,
            items: vec![Block::ListItem {
                content: vec![Block::paragraph(vec![Inline::plain("x")])],
            }],
        }]);
        let path = BlockPath::new(vec![0, 0, 0]);
        assert_eq!(
            doc.block(&path),
            Some(&Block::paragraph(vec![Inline::plain("x")]))
        );
        assert_eq!(doc.textblock_paths(), vec![path]);
        assert!(doc.block(&BlockPath::new(vec![1])).is_none());
    }
}
