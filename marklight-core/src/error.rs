//! Error types for parsing, formats and edits

use std::fmt;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during parsing
    ParseError(String),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support the operation
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<ParseError> for FormatError {
    fn from(err: ParseError) -> Self {
        FormatError::ParseError(err.to_string())
    }
}

/// Errors raised while turning a token stream into a tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A close token did not match the innermost open node
    UnexpectedClose { expected: String, found: String },
    /// The token stream ended with nodes still open
    Unclosed(String),
    /// A node received content its type does not accept
    InvalidContent { node: &'static str, found: String },
    /// The checkbox rewrite could not be applied
    Postprocess(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedClose { expected, found } => {
                write!(f, "Unexpected close token '{found}', expected close of '{expected}'")
            }
            ParseError::Unclosed(node) => write!(f, "Unclosed node '{node}' at end of input"),
            ParseError::InvalidContent { node, found } => {
                write!(f, "Node '{node}' cannot contain {found}")
            }
            ParseError::Postprocess(msg) => write!(f, "Post-processing failed: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised by edits on the tree
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// The virtual offset lies outside the block's source
    OffsetOutOfRange { offset: usize, len: usize },
    /// The path does not address a block
    InvalidPath(String),
    /// The addressed block does not hold inline content
    NotInlineContainer(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::OffsetOutOfRange { offset, len } => {
                write!(f, "Offset {offset} out of range for source of length {len}")
            }
            EditError::InvalidPath(path) => write!(f, "No block at path {path}"),
            EditError::NotInlineContainer(node) => {
                write!(f, "Block '{node}' does not hold inline content")
            }
        }
    }
}

impl std::error::Error for EditError {}
