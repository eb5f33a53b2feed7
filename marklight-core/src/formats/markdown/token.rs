//! Linear token stream
//!
//! Tokens are the flat, markdown-it style view of a parsed document: block
//! structure is expressed with `_open`/`_close` pairs, and each inline
//! container holds one `inline` token whose children carry the inline stream.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nesting {
    Open,
    Close,
    #[serde(rename = "self")]
    SelfClosing,
}

/// Footnote identity carried by `footnote_ref` and `footnote_open` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootnoteMeta {
    pub id: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub nesting: Nesting,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub markup: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FootnoteMeta>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl Token {
    pub fn new(kind: &'static str, tag: impl Into<String>, nesting: Nesting) -> Self {
        Token {
            kind,
            nesting,
            tag: tag.into(),
            attrs: Vec::new(),
            markup: String::new(),
            content: String::new(),
            info: String::new(),
            children: Vec::new(),
            meta: None,
            hidden: false,
        }
    }

    pub fn open(kind: &'static str, tag: impl Into<String>) -> Self {
        Token::new(kind, tag, Nesting::Open)
    }

    pub fn close(kind: &'static str, tag: impl Into<String>) -> Self {
        Token::new(kind, tag, Nesting::Close)
    }

    pub fn leaf(kind: &'static str, tag: impl Into<String>) -> Self {
        Token::new(kind, tag, Nesting::SelfClosing)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Token::leaf("text", "").with_content(content)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Type name with any `_open`/`_close` suffix removed.
    pub fn base_kind(&self) -> &'static str {
        let kind: &'static str = self.kind;
        kind.strip_suffix("_open")
            .or_else(|| kind.strip_suffix("_close"))
            .unwrap_or(kind)
    }
}
