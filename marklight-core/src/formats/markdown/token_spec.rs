//! Token-mapping table
//!
//! Maps token type names to what the parser builds for them. The parser walk
//! never names a token type itself: everything it knows about `heading` or
//! `bullet_list` comes from a [`TokenRule`] looked up here.
//!
//! | token                      | rule                                  |
//! |----------------------------|---------------------------------------|
//! | paragraph, blockquote      | block                                 |
//! | heading                    | block, `level` from the tag           |
//! | fence, code_block          | leaf code_block, `params`/`text`      |
//! | hr                         | leaf horizontal_rule                  |
//! | bullet_list, ordered_list  | block, `tight` (+ `order`)            |
//! | list_item                  | block                                 |
//! | table, tr, th, td          | block (thead/tbody ignored)           |
//! | image, hardbreak           | inline atom                           |
//! | em, strong, s, mark, sub, sup | mark                               |
//! | link, abbr                 | mark with attributes                  |
//! | code_inline                | mark wrapping the token's own content |
//! | footnote_ref               | inline atom with id/label             |
//! | footnote_block, footnote   | block (footnote with id/label)        |
//! | dl, dt, dd                 | block                                 |
//! | math_inline(_double)       | inline atom                           |
//! | math_block                 | leaf math_block                       |
//! | html_inline, html_block    | ignored                               |

use super::token::{Nesting, Token};
use crate::model::{AttrValue, Attrs, Mark, MarkType, NodeType};
use std::collections::HashMap;

/// Computes node or mark attributes from a token and its surroundings.
pub type AttrExtractor = fn(&Token, &[Token], usize) -> Attrs;

#[derive(Clone, Copy)]
pub enum TokenRule {
    /// `_open` pushes a node, the matching `_close` finishes it.
    OpenClose {
        node: NodeType,
        attrs: Option<AttrExtractor>,
    },
    /// A single token builds a complete node.
    OpenOnly {
        node: NodeType,
        attrs: Option<AttrExtractor>,
    },
    /// `_open`/`_close` toggle a mark; `no_close_token` marks wrap the token content.
    Mark {
        mark: MarkType,
        attrs: Option<AttrExtractor>,
        no_close_token: bool,
    },
    Ignore,
}

impl TokenRule {
    fn block(node: NodeType) -> Self {
        TokenRule::OpenClose { node, attrs: None }
    }

    fn block_with(node: NodeType, attrs: AttrExtractor) -> Self {
        TokenRule::OpenClose {
            node,
            attrs: Some(attrs),
        }
    }

    fn leaf(node: NodeType, attrs: Option<AttrExtractor>) -> Self {
        TokenRule::OpenOnly { node, attrs }
    }

    fn mark(mark: MarkType) -> Self {
        TokenRule::Mark {
            mark,
            attrs: None,
            no_close_token: false,
        }
    }
}

impl std::fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenRule::OpenClose { node, attrs } => f
                .debug_struct("OpenClose")
                .field("node", node)
                .field("attrs", &attrs.is_some())
                .finish(),
            TokenRule::OpenOnly { node, attrs } => f
                .debug_struct("OpenOnly")
                .field("node", node)
                .field("attrs", &attrs.is_some())
                .finish(),
            TokenRule::Mark {
                mark,
                attrs,
                no_close_token,
            } => f
                .debug_struct("Mark")
                .field("mark", mark)
                .field("attrs", &attrs.is_some())
                .field("no_close_token", no_close_token)
                .finish(),
            TokenRule::Ignore => f.write_str("Ignore"),
        }
    }
}

/// Token type name → rule.
#[derive(Debug, Clone)]
pub struct TokenSpec {
    rules: HashMap<&'static str, TokenRule>,
}

impl TokenSpec {
    pub fn empty() -> Self {
        TokenSpec {
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces the rule for a token type (without `_open`/`_close`).
    pub fn insert(&mut self, name: &'static str, rule: TokenRule) {
        self.rules.insert(name, rule);
    }

    /// Looks up the rule for a token, ignoring its nesting suffix.
    pub fn rule_for(&self, token: &Token) -> Option<&TokenRule> {
        self.rules.get(token.base_kind())
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.rules.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for TokenSpec {
    fn default() -> Self {
        let mut spec = TokenSpec::empty();

        spec.insert("paragraph", TokenRule::block(NodeType::Paragraph));
        spec.insert("heading", TokenRule::block_with(NodeType::Heading, heading_attrs));
        spec.insert("blockquote", TokenRule::block(NodeType::Blockquote));
        spec.insert("code_block", TokenRule::leaf(NodeType::CodeBlock, Some(code_attrs)));
        spec.insert("fence", TokenRule::leaf(NodeType::CodeBlock, Some(code_attrs)));
        spec.insert("hr", TokenRule::leaf(NodeType::HorizontalRule, None));

        spec.insert("list_item", TokenRule::block(NodeType::ListItem));
        spec.insert(
            "bullet_list",
            TokenRule::block_with(NodeType::BulletList, bullet_list_attrs),
        );
        spec.insert(
            "ordered_list",
            TokenRule::block_with(NodeType::OrderedList, ordered_list_attrs),
        );

        spec.insert("table", TokenRule::block(NodeType::Table));
        spec.insert("thead", TokenRule::Ignore);
        spec.insert("tbody", TokenRule::Ignore);
        spec.insert("tr", TokenRule::block(NodeType::TableRow));
        spec.insert("th", TokenRule::block(NodeType::TableHeader));
        spec.insert("td", TokenRule::block(NodeType::TableCell));

        spec.insert("image", TokenRule::leaf(NodeType::Image, Some(image_attrs)));
        spec.insert("hardbreak", TokenRule::leaf(NodeType::HardBreak, None));
        spec.insert("em", TokenRule::mark(MarkType::Em));
        spec.insert("strong", TokenRule::mark(MarkType::Strong));
        spec.insert(
            "link",
            TokenRule::Mark {
                mark: MarkType::Link,
                attrs: Some(link_attrs),
                no_close_token: false,
            },
        );
        spec.insert(
            "code_inline",
            TokenRule::Mark {
                mark: MarkType::Code,
                attrs: None,
                no_close_token: true,
            },
        );

        spec.insert("s", TokenRule::mark(MarkType::Strikethrough));
        spec.insert("mark", TokenRule::mark(MarkType::Highlight));
        spec.insert("sub", TokenRule::mark(MarkType::Subscript));
        spec.insert("sup", TokenRule::mark(MarkType::Superscript));
        spec.insert(
            "abbr",
            TokenRule::Mark {
                mark: MarkType::Abbreviation,
                attrs: Some(abbr_attrs),
                no_close_token: false,
            },
        );

        spec.insert(
            "footnote_ref",
            TokenRule::leaf(NodeType::FootnoteRef, Some(footnote_attrs)),
        );
        spec.insert("footnote_block", TokenRule::block(NodeType::FootnoteBlock));
        spec.insert(
            "footnote",
            TokenRule::block_with(NodeType::FootnoteItem, footnote_attrs),
        );

        spec.insert("dl", TokenRule::block(NodeType::DefinitionList));
        spec.insert("dt", TokenRule::block(NodeType::DefinitionTerm));
        spec.insert("dd", TokenRule::block(NodeType::DefinitionDescription));

        spec.insert("html_inline", TokenRule::Ignore);
        spec.insert("html_block", TokenRule::Ignore);

        spec.insert("math_inline", TokenRule::leaf(NodeType::MathInline, Some(math_attrs)));
        spec.insert(
            "math_inline_double",
            TokenRule::leaf(NodeType::MathInline, Some(display_math_attrs)),
        );
        spec.insert("math_block", TokenRule::leaf(NodeType::MathBlock, Some(math_attrs)));

        spec
    }
}

/// Builds a mark instance from its type and extracted attributes.
pub fn build_mark(mark: MarkType, attrs: &Attrs) -> Mark {
    match mark {
        MarkType::Link => Mark::Link {
            href: attrs.text("href").unwrap_or_default().to_string(),
            title: attrs.text("title").map(str::to_string),
        },
        MarkType::Em => Mark::Em,
        MarkType::Strong => Mark::Strong,
        MarkType::Strikethrough => Mark::Strikethrough,
        MarkType::Highlight => Mark::Highlight,
        MarkType::Subscript => Mark::Subscript,
        MarkType::Superscript => Mark::Superscript,
        MarkType::Abbreviation => Mark::Abbreviation {
            title: attrs.text("title").unwrap_or_default().to_string(),
        },
        MarkType::Code => Mark::Code,
    }
}

fn heading_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    let level = token
        .tag
        .strip_prefix('h')
        .and_then(|n| n.parse::<i64>().ok())
        .unwrap_or(1);
    Attrs::new().with("level", AttrValue::Int(level))
}

fn code_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    let text = token.content.strip_suffix('\n').unwrap_or(&token.content);
    Attrs::new()
        .with_text("params", token.info.as_str())
        .with_text("text", text)
}

/// A list is tight when every paragraph directly inside its items is hidden.
fn list_is_tight(tokens: &[Token], index: usize) -> bool {
    let mut depth = 0usize;
    for token in &tokens[index..] {
        match token.nesting {
            Nesting::Open => {
                // The list itself is depth 1, its items 2.
                if depth == 2 && token.kind == "paragraph_open" && !token.hidden {
                    return false;
                }
                depth += 1;
            }
            Nesting::Close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return true;
                }
            }
            Nesting::SelfClosing => {}
        }
    }
    true
}

fn bullet_list_attrs(_: &Token, tokens: &[Token], index: usize) -> Attrs {
    Attrs::new().with("tight", AttrValue::Bool(list_is_tight(tokens, index)))
}

fn ordered_list_attrs(token: &Token, tokens: &[Token], index: usize) -> Attrs {
    let order = token
        .attr("start")
        .and_then(|start| start.parse::<i64>().ok())
        .unwrap_or(1);
    Attrs::new()
        .with("order", AttrValue::Int(order))
        .with("tight", AttrValue::Bool(list_is_tight(tokens, index)))
}

fn image_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    let alt = token
        .children
        .first()
        .map(|child| child.content.as_str())
        .unwrap_or(token.content.as_str());
    Attrs::new()
        .with_text("src", token.attr("src").unwrap_or_default())
        .with_text("alt", alt)
        .with_opt_text("title", token.attr("title").map(str::to_string))
}

fn link_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    let href = token
        .attr("href")
        .or_else(|| token.attr("src"))
        .unwrap_or_default();
    Attrs::new()
        .with_text("href", href)
        .with_opt_text("title", token.attr("title").map(str::to_string))
}

fn abbr_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    Attrs::new().with_text("title", token.attr("title").unwrap_or_default())
}

fn footnote_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    match &token.meta {
        Some(meta) => Attrs::new()
            .with("id", AttrValue::Int(meta.id as i64))
            .with_text("label", meta.label.as_str()),
        None => Attrs::new()
            .with("id", AttrValue::Int(0))
            .with_text("label", ""),
    }
}

fn math_attrs(token: &Token, _: &[Token], _: usize) -> Attrs {
    Attrs::new().with_text("latex", token.content.as_str())
}

fn display_math_attrs(token: &Token, tokens: &[Token], index: usize) -> Attrs {
    math_attrs(token, tokens, index).with("display", AttrValue::Bool(true))
}
