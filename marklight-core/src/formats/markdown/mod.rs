//! Markdown format implementation
//!
//! Markdown → tree goes through a markdown-it style token stream:
//!
//!     source ─ abbreviations::extract ─▶ tokenizer ─▶ parser (TokenSpec) ─▶ postprocess
//!
//! The tokenizer drives `comrak` and flattens its AST into open/close tokens,
//! then runs the inline rules comrak has no extension for (`==highlight==`,
//! `~subscript~`, abbreviation wrapping). The parser never looks at token
//! names itself: every token type is resolved through the [`TokenSpec`]
//! table, so supporting a new token means adding a row.
//!
//! Tree → markdown is hand written (see [`serializer`]) because the tree
//! carries marks comrak cannot emit.
//!
//! # Element Mapping Table
//!
//! | Tree node                | Markdown                   | Token(s)                         |
//! |--------------------------|----------------------------|----------------------------------|
//! | paragraph                | text block                 | `paragraph_open/close`           |
//! | heading{level}           | `#`..`######`              | `heading_open/close`             |
//! | blockquote               | `> `                       | `blockquote_open/close`          |
//! | bullet_list / list_item  | `- item`                   | `bullet_list_*`, `list_item_*`   |
//! | ordered_list{order}      | `1. item`                  | `ordered_list_*`                 |
//! | task_list / task_item    | `- [ ] item`               | rewritten after parsing          |
//! | code_block{params}       | fenced or indented code    | `fence`, `code_block`            |
//! | horizontal_rule          | `---`                      | `hr`                             |
//! | table / row / cells      | pipe table                 | `table_*`, `tr_*`, `th_*`, `td_*`|
//! | math_block               | `$$...$$` alone            | `math_block`                     |
//! | footnote_block / item    | `[^label]: text`           | `footnote_block_*`, `footnote_*` |
//! | definition_list          | term + `: details`         | `dl_*`, `dt_*`, `dd_*`           |
//! | Marks:                   |                            |                                  |
//! |   em / strong            | `*x*` / `**x**`            | `em_*`, `strong_*`               |
//! |   code                   | `` `x` ``                  | `code_inline`                    |
//! |   strikethrough          | `~~x~~`                    | `s_*`                            |
//! |   highlight              | `==x==`                    | `mark_*`                         |
//! |   subscript/superscript  | `~x~` / `^x^`              | `sub_*`, `sup_*`                 |
//! |   link                   | `[x](href "title")`        | `link_*`                         |
//! |   abbreviation           | `*[x]: title` definition   | `abbr_*`                         |
//!
//! # Lossy Conversions
//!
//! - Raw HTML blocks and inline HTML are dropped.
//! - Setext headings, `*`/`+` bullets and `_` emphasis come back in the
//!   canonical spelling.
//! - Table column alignment is not kept.

pub mod abbreviations;
pub mod inline_rules;
pub mod parser;
pub mod postprocess;
pub mod serializer;
pub mod token;
pub mod token_spec;
pub mod tokenizer;

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Document;
use parser::MarkdownParser;
use serializer::{MarkdownSerializer, SerializerOptions};
use std::collections::HashMap;
use tokenizer::ParseOptions;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    parser: MarkdownParser,
    serializer: SerializerOptions,
}

impl MarkdownFormat {
    pub fn new(parse: ParseOptions, serialize: SerializerOptions) -> Self {
        MarkdownFormat {
            parser: MarkdownParser::new(parse),
            serializer: serialize,
        }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown with tables, footnotes, math, task lists and abbreviations"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(self.parser.try_parse(source)?)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(MarkdownSerializer::new(self.serializer.clone()).serialize(doc))
    }

    /// Accepts `bullet-marker=<char>`.
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut settings = self.serializer.clone();
        for (key, value) in options {
            match key.as_str() {
                "bullet-marker" => {
                    settings.bullet_marker = match value.as_str() {
                        "-" | "*" | "+" => value.chars().next().unwrap_or('-'),
                        other => {
                            return Err(FormatError::SerializationError(format!(
                                "Invalid bullet marker '{other}'"
                            )))
                        }
                    }
                }
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Markdown does not support parameter '{other}'"
                    )))
                }
            }
        }
        Ok(MarkdownSerializer::new(settings).serialize(doc))
    }
}
