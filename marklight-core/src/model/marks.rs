//! Inline marks and the delimiter table.
//!
//! A mark is a named inline style applied to a run of text. Mark sets are kept
//! sorted by [`MarkType`] rank and hold at most one mark per type, so two runs
//! with the same styling always compare equal.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The style name of a mark. Variant order is the nesting rank: lower ranks
/// are opened first (outermost) when marks are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkType {
    Link,
    Em,
    Strong,
    Strikethrough,
    Highlight,
    Subscript,
    Superscript,
    Abbreviation,
    Code,
}

/// Inline style name → literal markdown delimiter.
///
/// Only symmetric delimiters live here. Links have computed delimiters and
/// abbreviations have none.
const DELIMITERS: &[(MarkType, &str)] = &[
    (MarkType::Strong, "**"),
    (MarkType::Em, "*"),
    (MarkType::Code, "`"),
    (MarkType::Strikethrough, "~~"),
    (MarkType::Highlight, "=="),
    (MarkType::Subscript, "~"),
    (MarkType::Superscript, "^"),
];

/// Looks up the literal delimiter of a symmetric inline style.
pub fn delimiter(mark: MarkType) -> Option<&'static str> {
    DELIMITERS
        .iter()
        .find(|(ty, _)| *ty == mark)
        .map(|(_, delim)| *delim)
}

impl MarkType {
    pub fn name(&self) -> &'static str {
        match self {
            MarkType::Link => "link",
            MarkType::Em => "em",
            MarkType::Strong => "strong",
            MarkType::Strikethrough => "strikethrough",
            MarkType::Highlight => "highlight",
            MarkType::Subscript => "subscript",
            MarkType::Superscript => "superscript",
            MarkType::Abbreviation => "abbreviation",
            MarkType::Code => "code",
        }
    }

    pub fn from_name(name: &str) -> Option<MarkType> {
        Some(match name {
            "link" => MarkType::Link,
            "em" => MarkType::Em,
            "strong" => MarkType::Strong,
            "strikethrough" => MarkType::Strikethrough,
            "highlight" => MarkType::Highlight,
            "subscript" => MarkType::Subscript,
            "superscript" => MarkType::Superscript,
            "abbreviation" => MarkType::Abbreviation,
            "code" => MarkType::Code,
            _ => return None,
        })
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mark instance, carrying the attributes of its style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mark {
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Em,
    Strong,
    Strikethrough,
    Highlight,
    Subscript,
    Superscript,
    Abbreviation {
        title: String,
    },
    Code,
}

impl Mark {
    pub fn mark_type(&self) -> MarkType {
        match self {
            Mark::Link { .. } => MarkType::Link,
            Mark::Em => MarkType::Em,
            Mark::Strong => MarkType::Strong,
            Mark::Strikethrough => MarkType::Strikethrough,
            Mark::Highlight => MarkType::Highlight,
            Mark::Subscript => MarkType::Subscript,
            Mark::Superscript => MarkType::Superscript,
            Mark::Abbreviation { .. } => MarkType::Abbreviation,
            Mark::Code => MarkType::Code,
        }
    }

    pub fn name(&self) -> &'static str {
        self.mark_type().name()
    }

    /// Opening and closing source text of this mark.
    pub fn source_delimiters(&self) -> (Cow<'static, str>, Cow<'static, str>) {
        match self {
            Mark::Link { href, title } => (
                Cow::Borrowed("["),
                Cow::Owned(format!("]({})", link_destination(href, title.as_deref()))),
            ),
            Mark::Abbreviation { .. } => (Cow::Borrowed(""), Cow::Borrowed("")),
            other => {
                let delim = delimiter(other.mark_type()).unwrap_or("");
                (Cow::Borrowed(delim), Cow::Borrowed(delim))
            }
        }
    }
}

/// Formats the `(...)` part of a link or image.
pub(crate) fn link_destination(href: &str, title: Option<&str>) -> String {
    let needs_brackets =
        href.is_empty() || href.chars().any(|c| c.is_whitespace() || c == '(' || c == ')');
    let mut out = if needs_brackets {
        format!("<{}>", href.replace('<', "\\<").replace('>', "\\>"))
    } else {
        href.to_string()
    };
    if let Some(title) = title {
        out.push_str(" \"");
        out.push_str(&title.replace('\\', "\\\\").replace('"', "\\\""));
        out.push('"');
    }
    out
}

/// A set of marks, unique by [`MarkType`] and sorted by rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkSet(Vec<Mark>);

impl MarkSet {
    pub fn new() -> Self {
        MarkSet(Vec::new())
    }

    /// Builds a set from arbitrary marks; later marks replace earlier ones of the same type.
    pub fn from_marks(marks: impl IntoIterator<Item = Mark>) -> Self {
        marks.into_iter().fold(MarkSet::new(), |set, mark| set.with(mark))
    }

    /// Returns a copy of the set with `mark` added, replacing a mark of the same type.
    pub fn with(mut self, mark: Mark) -> Self {
        self.insert(mark);
        self
    }

    pub fn insert(&mut self, mark: Mark) {
        let ty = mark.mark_type();
        match self.0.binary_search_by_key(&ty, Mark::mark_type) {
            Ok(index) => self.0[index] = mark,
            Err(index) => self.0.insert(index, mark),
        }
    }

    pub fn remove(&mut self, ty: MarkType) -> Option<Mark> {
        self.0
            .binary_search_by_key(&ty, Mark::mark_type)
            .ok()
            .map(|index| self.0.remove(index))
    }

    pub fn without(mut self, ty: MarkType) -> Self {
        self.remove(ty);
        self
    }

    pub fn get(&self, ty: MarkType) -> Option<&Mark> {
        self.0
            .binary_search_by_key(&ty, Mark::mark_type)
            .ok()
            .map(|index| &self.0[index])
    }

    pub fn has_type(&self, ty: MarkType) -> bool {
        self.get(ty).is_some()
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.get(mark.mark_type()) == Some(mark)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Mark> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        MarkSet::from_marks(iter)
    }
}
