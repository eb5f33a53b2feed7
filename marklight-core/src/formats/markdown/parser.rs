//! Markdown parsing (Markdown → document tree)
//!
//! Pipeline: source → abbreviation side channel → tokens → table-driven walk
//! → checkbox post-pass.
//!
//! The walk keeps a stack of open block frames and a running mark set. Every
//! token is looked up in the [`TokenSpec`]; `text`, `softbreak` and `inline`
//! are the only token types handled directly. Unknown types are skipped.

use super::abbreviations;
use super::postprocess;
use super::token::{Nesting, Token};
use super::token_spec::{build_mark, TokenRule, TokenSpec};
use super::tokenizer::{tokenize, ParseOptions};
use crate::error::ParseError;
use crate::model::{
    Abbreviations, Attrs, Block, ContentKind, Document, Inline, InlineNode, MarkSet, NodeType,
};
use std::collections::BTreeMap;

/// Table-driven markdown parser.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    spec: TokenSpec,
    options: ParseOptions,
}

struct Frame {
    node: Option<NodeType>,
    kind: &'static str,
    attrs: Attrs,
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
}

impl Frame {
    fn root() -> Self {
        Frame {
            node: None,
            kind: "document",
            attrs: Attrs::new(),
            blocks: Vec::new(),
            inlines: Vec::new(),
        }
    }
}

struct WalkState {
    frames: Vec<Frame>,
    marks: MarkSet,
}

impl WalkState {
    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl MarkdownParser {
    pub fn new(options: ParseOptions) -> Self {
        MarkdownParser {
            spec: TokenSpec::default(),
            options,
        }
    }

    pub fn with_spec(spec: TokenSpec, options: ParseOptions) -> Self {
        MarkdownParser { spec, options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses `source`, falling back to an empty document on failure.
    pub fn parse(&self, source: &str) -> Document {
        match self.try_parse(source) {
            Ok(doc) => doc,
            Err(err) => {
                log::error!("Markdown parse failed, using empty document: {err}");
                Document::empty()
            }
        }
    }

    pub fn try_parse(&self, source: &str) -> Result<Document, ParseError> {
        let (body, abbreviations) = if self.options.abbreviations {
            abbreviations::extract(source)
        } else {
            (source.to_string(), Abbreviations::new())
        };

        let tokens = tokenize(&body, &self.options, &abbreviations);
        let content = self.build(&tokens)?;
        let doc = Document::with_abbreviations(content, abbreviations);
        log::debug!(
            "Parsed {} top-level blocks, {} abbreviations",
            doc.content.len(),
            doc.abbreviations.len()
        );

        if self.options.task_lists {
            Ok(postprocess::promote_task_lists(doc))
        } else {
            Ok(doc)
        }
    }

    /// Parses `source` as an isolated inline fragment: the inline content of
    /// the first paragraph, or `source` as plain text when there is none.
    ///
    /// `footnotes` holds the footnotes of the surrounding document (see
    /// [`Document::footnotes`]). Stub definitions for them are appended to the
    /// fragment so references still resolve, and the references that come
    /// back carry the document's numbers.
    pub fn parse_inline_fragment(
        &self,
        source: &str,
        abbreviations: &Abbreviations,
        footnotes: &BTreeMap<String, (u32, String)>,
    ) -> Vec<Inline> {
        let mut fragment = source.trim().to_string();
        if self.options.footnotes && !footnotes.is_empty() {
            fragment.push_str("\n\n");
            for (_, label) in footnotes.values() {
                fragment.push_str(&format!("[^{label}]: x\n"));
            }
        }

        let tokens = tokenize(&fragment, &self.options, abbreviations);
        match self.build(&tokens) {
            Ok(blocks) => {
                if let Some(Block::Paragraph { mut content }) = blocks.into_iter().next() {
                    for run in &mut content {
                        if let InlineNode::FootnoteRef { id, label } = &mut run.node {
                            if let Some((number, _)) = footnotes.get(&label.to_lowercase()) {
                                *id = *number;
                            }
                        }
                    }
                    return content;
                }
            }
            Err(err) => log::debug!("Inline fragment did not parse: {err}"),
        }
        if source.is_empty() {
            Vec::new()
        } else {
            vec![Inline::plain(source)]
        }
    }

    /// Walks a token stream into top-level blocks.
    pub fn build(&self, tokens: &[Token]) -> Result<Vec<Block>, ParseError> {
        let mut state = WalkState {
            frames: vec![Frame::root()],
            marks: MarkSet::new(),
        };
        self.walk(tokens, &mut state)?;

        if state.frames.len() > 1 {
            let top = state.top();
            return Err(ParseError::Unclosed(top.kind.to_string()));
        }
        let root = state.top();
        if let Some(stray) = root.inlines.iter().find(|run| {
            !matches!(&run.node, InlineNode::Text { text } if text.trim().is_empty())
        }) {
            return Err(ParseError::InvalidContent {
                node: "document",
                found: format!("inline {:?}", stray.node),
            });
        }
        Ok(std::mem::take(&mut root.blocks))
    }

    fn walk(&self, tokens: &[Token], state: &mut WalkState) -> Result<(), ParseError> {
        for (index, token) in tokens.iter().enumerate() {
            match token.kind {
                "inline" => {
                    self.walk(&token.children, state)?;
                    continue;
                }
                "text" => {
                    let marks = state.marks.clone();
                    state.top().inlines.push(Inline::text(token.content.as_str(), marks));
                    continue;
                }
                "softbreak" => {
                    let marks = state.marks.clone();
                    state.top().inlines.push(Inline::text("\n", marks));
                    continue;
                }
                _ => {}
            }

            let Some(rule) = self.spec.rule_for(token) else {
                log::trace!("No rule for token '{}', skipping", token.kind);
                continue;
            };
            log::trace!("Token '{}' → {:?}", token.kind, rule);

            match *rule {
                TokenRule::Ignore => {}
                TokenRule::OpenClose { node, attrs } => match token.nesting {
                    Nesting::Open => state.frames.push(Frame {
                        node: Some(node),
                        kind: token.base_kind(),
                        attrs: extract(attrs, token, tokens, index),
                        blocks: Vec::new(),
                        inlines: Vec::new(),
                    }),
                    Nesting::Close => {
                        let frame = match state.frames.pop() {
                            Some(frame) if frame.node.is_some() => frame,
                            _ => {
                                return Err(ParseError::UnexpectedClose {
                                    expected: "document".to_string(),
                                    found: token.kind.to_string(),
                                })
                            }
                        };
                        if frame.kind != token.base_kind() {
                            return Err(ParseError::UnexpectedClose {
                                expected: frame.kind.to_string(),
                                found: token.kind.to_string(),
                            });
                        }
                        let block = Block::build(node, &frame.attrs, frame.blocks, frame.inlines)?;
                        state.top().blocks.push(block);
                    }
                    Nesting::SelfClosing => {
                        let attrs = extract(attrs, token, tokens, index);
                        let block = Block::build(node, &attrs, Vec::new(), Vec::new())?;
                        state.top().blocks.push(block);
                    }
                },
                TokenRule::OpenOnly { node, attrs } => {
                    let attrs = extract(attrs, token, tokens, index);
                    if node.content_kind() == ContentKind::Atom {
                        let atom = InlineNode::build_atom(node, &attrs)?;
                        let marks = state.marks.clone();
                        state.top().inlines.push(Inline::atom(atom, marks));
                    } else {
                        let block = Block::build(node, &attrs, Vec::new(), Vec::new())?;
                        state.top().blocks.push(block);
                    }
                }
                TokenRule::Mark {
                    mark,
                    attrs,
                    no_close_token,
                } => {
                    let attrs = extract(attrs, token, tokens, index);
                    if no_close_token {
                        let marks = state.marks.clone().with(build_mark(mark, &attrs));
                        state
                            .top()
                            .inlines
                            .push(Inline::text(token.content.as_str(), marks));
                    } else if token.nesting == Nesting::Close {
                        state.marks.remove(mark);
                    } else {
                        state.marks.insert(build_mark(mark, &attrs));
                    }
                }
            }
        }
        Ok(())
    }
}

fn extract(
    extractor: Option<super::token_spec::AttrExtractor>,
    token: &Token,
    tokens: &[Token],
    index: usize,
) -> Attrs {
    extractor
        .map(|f| f(token, tokens, index))
        .unwrap_or_default()
}

/// Parses markdown with default options.
pub fn parse_from_markdown(source: &str) -> Document {
    MarkdownParser::default().parse(source)
}
