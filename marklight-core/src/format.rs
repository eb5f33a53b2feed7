//! Format trait definition
//!
//! Every textual representation of a [`Document`] (markdown, JSON, the tree
//! view) implements [`Format`], so the CLI can select one by name or file
//! extension without knowing its type.

use crate::error::FormatError;
use crate::model::Document;
use std::collections::HashMap;

/// Trait for document formats
///
/// A format converts between its text and a [`Document`]. It may support
/// parsing, serialization, or both; the registry checks the `supports_*`
/// flags before calling into it.
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "json")
    fn name(&self) -> &str;

    /// One-line summary shown by `--list-transforms`
    fn description(&self) -> &str {
        ""
    }

    /// File extensions without the leading dot, used for detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether [`Format::parse`] is implemented (text → Document)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether [`Format::serialize`] is implemented (Document → text)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Document
    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document into source text
    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize with extra `key=value` parameters.
    ///
    /// The default accepts no parameters and delegates to [`Format::serialize`].
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(doc)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
