//! Markdown tokenizer
//!
//! Drives comrak and flattens its AST into a linear, markdown-it style token
//! stream. Block structure becomes `_open`/`_close` pairs; each inline
//! container gets a single `inline` token whose children hold the inline
//! stream after the extension rules in [`super::inline_rules`] have run.
//!
//! Paragraphs directly inside the items of a tight list are marked `hidden`,
//! which is what the list tightness extractor looks for.
//!
//! Escaped `\=` and `\~` are swapped for private-use placeholders before comrak
//! runs so the extension rules never see them as delimiters.

use super::abbreviations::AbbreviationMatcher;
use super::inline_rules;
use super::token::{FootnoteMeta, Token};
use crate::model::Abbreviations;
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use std::collections::HashMap;

const ESCAPED_EQUALS: char = '\u{E000}';
const ESCAPED_TILDE: char = '\u{E001}';

/// Extension toggles for tokenizing and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub math: bool,
    pub definition_lists: bool,
    pub superscript: bool,
    pub strikethrough: bool,
    pub highlight: bool,
    pub subscript: bool,
    pub abbreviations: bool,
    pub task_lists: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            tables: true,
            footnotes: true,
            math: true,
            definition_lists: true,
            superscript: true,
            strikethrough: true,
            highlight: true,
            subscript: true,
            abbreviations: true,
            task_lists: true,
        }
    }
}

fn comrak_options(options: &ParseOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = options.tables;
    comrak.extension.footnotes = options.footnotes;
    comrak.extension.math_dollars = options.math;
    comrak.extension.description_lists = options.definition_lists;
    comrak.extension.superscript = options.superscript;
    // Tildes are handled by the inline rules.
    comrak.extension.strikethrough = false;
    comrak.extension.tasklist = false;
    comrak
}

/// Tokenizes `source`. Abbreviation labels in `abbreviations` are wrapped in
/// `abbr` tokens wherever they occur as whole words in text.
pub fn tokenize(source: &str, options: &ParseOptions, abbreviations: &Abbreviations) -> Vec<Token> {
    let protected = protect_escapes(source);
    let arena = Arena::new();
    let root = parse_document(&arena, &protected, &comrak_options(options));

    let matcher = if options.abbreviations {
        AbbreviationMatcher::new(abbreviations)
    } else {
        None
    };
    let mut walker = Walker {
        tokens: Vec::new(),
        footnote_ids: HashMap::new(),
        options,
        abbreviations: matcher,
    };
    walker.block_children(root, false);

    log::debug!("Tokenized {} chars into {} tokens", source.chars().count(), walker.tokens.len());
    walker.tokens
}

/// Swaps escaped `=` and `~` for placeholders. `\\` is kept as a pair.
fn protect_escapes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                out.push_str("\\\\");
                chars.next();
            }
            Some('=') => {
                out.push(ESCAPED_EQUALS);
                chars.next();
            }
            Some('~') => {
                out.push(ESCAPED_TILDE);
                chars.next();
            }
            _ => out.push('\\'),
        }
    }
    out
}

/// Placeholders back to the characters they stand for, as plain text.
pub(crate) fn restore_literal(text: &str) -> String {
    text.replace(ESCAPED_EQUALS, "=").replace(ESCAPED_TILDE, "~")
}

/// Placeholders back to the escape sequences the author typed. Used where
/// comrak does not process escapes (code, math).
fn restore_verbatim(text: &str) -> String {
    text.replace(ESCAPED_EQUALS, "\\=")
        .replace(ESCAPED_TILDE, "\\~")
}

struct Walker<'o> {
    tokens: Vec<Token>,
    footnote_ids: HashMap<String, u32>,
    options: &'o ParseOptions,
    abbreviations: Option<AbbreviationMatcher>,
}

impl<'o> Walker<'o> {
    fn footnote_meta(&mut self, name: &str) -> FootnoteMeta {
        let next = self.footnote_ids.len() as u32;
        let id = *self.footnote_ids.entry(name.to_lowercase()).or_insert(next);
        FootnoteMeta {
            id,
            label: name.to_string(),
        }
    }

    /// Emits the children of a block container. Runs of footnote definitions
    /// are grouped into one `footnote_block`.
    fn block_children<'a>(&mut self, node: &'a AstNode<'a>, tight: bool) {
        let mut in_footnotes = false;
        for child in node.children() {
            let is_footnote = matches!(
                child.data.borrow().value,
                NodeValue::FootnoteDefinition(_)
            );
            if is_footnote && !in_footnotes {
                self.tokens.push(Token::open("footnote_block_open", ""));
            } else if !is_footnote && in_footnotes {
                self.tokens.push(Token::close("footnote_block_close", ""));
            }
            in_footnotes = is_footnote;
            self.block(child, tight);
        }
        if in_footnotes {
            self.tokens.push(Token::close("footnote_block_close", ""));
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, tight: bool) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Document => self.block_children(node, false),
            NodeValue::Paragraph => {
                if let Some(latex) = display_math_only(node) {
                    self.tokens.push(
                        Token::leaf("math_block", "math")
                            .with_content(latex.trim_matches('\n'))
                            .with_markup("$$"),
                    );
                    return;
                }
                let mut open = Token::open("paragraph_open", "p");
                open.hidden = tight;
                let mut close = Token::close("paragraph_close", "p");
                close.hidden = tight;
                self.tokens.push(open);
                self.inline_token(node);
                self.tokens.push(close);
            }
            NodeValue::Heading(heading) => {
                let tag = format!("h{}", heading.level);
                self.tokens.push(
                    Token::open("heading_open", tag.clone())
                        .with_markup("#".repeat(heading.level as usize)),
                );
                self.inline_token(node);
                self.tokens.push(Token::close("heading_close", tag));
            }
            NodeValue::BlockQuote => {
                self.tokens.push(Token::open("blockquote_open", "blockquote").with_markup(">"));
                self.block_children(node, false);
                self.tokens.push(Token::close("blockquote_close", "blockquote"));
            }
            NodeValue::List(list) => {
                let (open, close, tag) = match list.list_type {
                    ListType::Bullet => ("bullet_list_open", "bullet_list_close", "ul"),
                    ListType::Ordered => ("ordered_list_open", "ordered_list_close", "ol"),
                };
                let markup = match list.list_type {
                    ListType::Bullet => (list.bullet_char as char).to_string(),
                    ListType::Ordered => match list.delimiter {
                        ListDelimType::Paren => ")".to_string(),
                        _ => ".".to_string(),
                    },
                };
                let mut token = Token::open(open, tag).with_markup(markup);
                if list.list_type == ListType::Ordered {
                    token = token.with_attr("start", list.start.to_string());
                }
                self.tokens.push(token);
                for item in node.children() {
                    self.tokens.push(Token::open("list_item_open", "li"));
                    self.block_children(item, list.tight);
                    self.tokens.push(Token::close("list_item_close", "li"));
                }
                self.tokens.push(Token::close(close, tag));
            }
            NodeValue::Item(_) => {
                // Items are emitted by their list.
                self.block_children(node, tight);
            }
            NodeValue::CodeBlock(code) => {
                let content = restore_verbatim(&code.literal);
                let token = if code.fenced {
                    let mut token = Token::leaf("fence", "code")
                        .with_content(content)
                        .with_markup((code.fence_char as char).to_string().repeat(code.fence_length.max(3)));
                    token.info = restore_literal(code.info.trim());
                    token
                } else {
                    Token::leaf("code_block", "code").with_content(content)
                };
                self.tokens.push(token);
            }
            NodeValue::HtmlBlock(html) => {
                self.tokens.push(Token::leaf("html_block", "").with_content(html.literal));
            }
            NodeValue::ThematicBreak => {
                self.tokens.push(Token::leaf("hr", "hr").with_markup("---"));
            }
            NodeValue::Table(_) => self.table(node),
            NodeValue::FootnoteDefinition(definition) => {
                let meta = self.footnote_meta(&definition.name);
                let mut open = Token::open("footnote_open", "");
                open.meta = Some(meta.clone());
                self.tokens.push(open);
                self.block_children(node, false);
                let mut close = Token::close("footnote_close", "");
                close.meta = Some(meta);
                self.tokens.push(close);
            }
            NodeValue::DescriptionList => {
                self.tokens.push(Token::open("dl_open", "dl"));
                for item in node.children() {
                    self.description_item(item);
                }
                self.tokens.push(Token::close("dl_close", "dl"));
            }
            NodeValue::DescriptionItem(_) => self.description_item(node),
            _ => {
                log::trace!("Skipping unsupported block node");
            }
        }
    }

    fn description_item<'a>(&mut self, item: &'a AstNode<'a>) {
        for part in item.children() {
            let value = part.data.borrow().value.clone();
            match value {
                NodeValue::DescriptionTerm => {
                    self.tokens.push(Token::open("dt_open", "dt"));
                    let mut children = Vec::new();
                    for (index, paragraph) in part.children().enumerate() {
                        if index > 0 {
                            children.push(Token::leaf("softbreak", "br"));
                        }
                        children.extend(self.inline_children(paragraph));
                    }
                    self.push_inline(children);
                    self.tokens.push(Token::close("dt_close", "dt"));
                }
                NodeValue::DescriptionDetails => {
                    self.tokens.push(Token::open("dd_open", "dd").with_markup(":"));
                    self.block_children(part, false);
                    self.tokens.push(Token::close("dd_close", "dd"));
                }
                _ => {}
            }
        }
    }

    fn table<'a>(&mut self, node: &'a AstNode<'a>) {
        self.tokens.push(Token::open("table_open", "table"));
        let mut section: Option<bool> = None;
        for row in node.children() {
            let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
            if section != Some(header) {
                match section {
                    Some(true) => self.tokens.push(Token::close("thead_close", "thead")),
                    Some(false) => self.tokens.push(Token::close("tbody_close", "tbody")),
                    None => {}
                }
                self.tokens.push(if header {
                    Token::open("thead_open", "thead")
                } else {
                    Token::open("tbody_open", "tbody")
                });
                section = Some(header);
            }
            self.tokens.push(Token::open("tr_open", "tr"));
            for cell in row.children() {
                let (open, close, tag) = if header {
                    ("th_open", "th_close", "th")
                } else {
                    ("td_open", "td_close", "td")
                };
                self.tokens.push(Token::open(open, tag));
                self.inline_token(cell);
                self.tokens.push(Token::close(close, tag));
            }
            self.tokens.push(Token::close("tr_close", "tr"));
        }
        match section {
            Some(true) => self.tokens.push(Token::close("thead_close", "thead")),
            Some(false) => self.tokens.push(Token::close("tbody_close", "tbody")),
            None => {}
        }
        self.tokens.push(Token::close("table_close", "table"));
    }

    fn inline_token<'a>(&mut self, node: &'a AstNode<'a>) {
        let children = self.inline_children(node);
        self.push_inline(children);
    }

    fn push_inline(&mut self, children: Vec<Token>) {
        let children = inline_rules::apply(children, self.options, self.abbreviations.as_ref());
        let mut token = Token::leaf("inline", "");
        token.content = children
            .iter()
            .filter(|t| t.kind == "text")
            .map(|t| t.content.as_str())
            .collect();
        token.children = children;
        self.tokens.push(token);
    }

    fn inline_children<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<Token> {
        let mut out = Vec::new();
        for child in node.children() {
            self.inline(child, &mut out);
        }
        out
    }

    fn wrapped<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        open: Token,
        close: Token,
        out: &mut Vec<Token>,
    ) {
        out.push(open);
        for child in node.children() {
            self.inline(child, out);
        }
        out.push(close);
    }

    fn inline<'a>(&mut self, node: &'a AstNode<'a>, out: &mut Vec<Token>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Text(text) => out.push(Token::text(text)),
            NodeValue::SoftBreak => out.push(Token::leaf("softbreak", "br")),
            NodeValue::LineBreak => out.push(Token::leaf("hardbreak", "br")),
            NodeValue::Code(code) => out.push(
                Token::leaf("code_inline", "code")
                    .with_content(restore_verbatim(&code.literal))
                    .with_markup("`"),
            ),
            NodeValue::HtmlInline(html) => out.push(Token::leaf("html_inline", "").with_content(html)),
            NodeValue::Emph => self.wrapped(
                node,
                Token::open("em_open", "em").with_markup("*"),
                Token::close("em_close", "em").with_markup("*"),
                out,
            ),
            NodeValue::Strong => self.wrapped(
                node,
                Token::open("strong_open", "strong").with_markup("**"),
                Token::close("strong_close", "strong").with_markup("**"),
                out,
            ),
            NodeValue::Superscript => self.wrapped(
                node,
                Token::open("sup_open", "sup").with_markup("^"),
                Token::close("sup_close", "sup").with_markup("^"),
                out,
            ),
            NodeValue::Link(link) => {
                let mut open = Token::open("link_open", "a").with_attr("href", restore_literal(&link.url));
                if !link.title.is_empty() {
                    open = open.with_attr("title", restore_literal(&link.title));
                }
                self.wrapped(node, open, Token::close("link_close", "a"), out);
            }
            NodeValue::Image(link) => {
                let alt = restore_literal(&collect_text(node));
                let mut token = Token::leaf("image", "img")
                    .with_attr("src", restore_literal(&link.url))
                    .with_content(alt.clone());
                if !link.title.is_empty() {
                    token = token.with_attr("title", restore_literal(&link.title));
                }
                token.children.push(Token::text(alt));
                out.push(token);
            }
            NodeValue::FootnoteReference(reference) => {
                let mut token = Token::leaf("footnote_ref", "");
                token.meta = Some(self.footnote_meta(&reference.name));
                out.push(token);
            }
            NodeValue::Math(math) => {
                let kind = if math.display_math {
                    "math_inline_double"
                } else {
                    "math_inline"
                };
                let markup = if math.display_math { "$$" } else { "$" };
                out.push(
                    Token::leaf(kind, "math")
                        .with_content(restore_verbatim(&math.literal))
                        .with_markup(markup),
                );
            }
            _ => {
                for child in node.children() {
                    self.inline(child, out);
                }
            }
        }
    }
}

/// The literal of a paragraph that holds nothing but one display-math span.
fn display_math_only<'a>(paragraph: &'a AstNode<'a>) -> Option<String> {
    let mut children = paragraph.children();
    let first = children.next()?;
    if children.next().is_some() {
        return None;
    }
    let data = first.data.borrow();
    let latex = match &data.value {
        NodeValue::Math(math) if math.display_math => Some(restore_verbatim(&math.literal)),
        _ => None,
    };
    latex
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => out.push_str(&collect_text(child)),
        }
    }
    out
}
