//! JSON format
//!
//! The tree's serde representation: blocks are tagged with `"type"`, inline
//! runs flatten their node next to a `marks` array. Useful for inspecting a
//! parse and for feeding trees to other tools.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Document;
use std::collections::HashMap;

/// Format implementation for the JSON tree
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl JsonFormat {
    fn write(doc: &Document, pretty: bool) -> Result<String, FormatError> {
        let result = if pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        };
        result.map_err(|err| FormatError::SerializationError(err.to_string()))
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Document tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let doc: Document = serde_json::from_str(source)
            .map_err(|err| FormatError::ParseError(err.to_string()))?;
        Ok(Document::with_abbreviations(doc.content, doc.abbreviations))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        JsonFormat::write(doc, true)
    }

    /// Accepts `pretty=true|false`.
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut pretty = true;
        for (key, value) in options {
            match key.as_str() {
                "pretty" => pretty = value != "false",
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "JSON does not support parameter '{other}'"
                    )))
                }
            }
        }
        JsonFormat::write(doc, pretty)
    }
}
