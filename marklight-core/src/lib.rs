//! Markdown ↔ document-tree correspondence engine
//!
//!     The editor works on a structured tree (blocks, inline runs, marks) and keeps it in
//!     step with markdown source. This crate is that correspondence, with no UI and no I/O:
//!
//!         - markdown → tree: a token stream mapped through a declarative table
//!         - tree → markdown: per node and per mark writers
//!         - inside one text block: a character-level map between structural offsets and
//!           markdown source offsets, used to step through and delete delimiters that do
//!           not exist in the tree's text.
//!
//!     This is a pure lib: it powers marklight-cli but never prints, reads env vars or
//!     touches files.
//!
//! The file structure:
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── model                   # Blocks, inline runs, marks, attributes
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── tokenizer.rs    # comrak AST → markdown-it style tokens
//!     │   │   ├── token_spec.rs   # token type → rule table
//!     │   │   ├── parser.rs       # table-driven walk
//!     │   │   ├── postprocess.rs  # checkbox lists → task lists
//!     │   │   └── serializer.rs
//!     │   ├── json
//!     │   └── treeviz
//!     └── editing                 # source map, navigation, edits, keymap, decorations
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── markdown
//!     └── editing
//!
//!     Rust does not discover tests in subdirectories by itself, so tests/lib.rs includes
//!     them as modules.
//!
//! Offsets
//!
//!     Structural offsets count `char`s of text plus one per inline atom. Source offsets
//!     count `char`s of the rebuilt markdown. Both are `usize`.
//!
//! Failure
//!
//!     `parse` never fails: a broken token stream logs an error and yields the minimal
//!     document (one empty paragraph). Use `try_parse` to see the error.

pub mod editing;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod registry;

pub use error::{EditError, FormatError, ParseError};
pub use format::Format;
pub use formats::markdown::parser::MarkdownParser;
pub use formats::markdown::serializer::{MarkdownSerializer, SerializerOptions};
pub use formats::markdown::tokenizer::ParseOptions;
pub use model::Document;
pub use registry::FormatRegistry;

/// Parses markdown with every extension enabled.
pub fn parse(source: &str) -> Document {
    MarkdownParser::default().parse(source)
}

/// Parses markdown, reporting token stream errors instead of falling back.
pub fn try_parse(source: &str) -> Result<Document, ParseError> {
    MarkdownParser::default().try_parse(source)
}

/// Serializes with the default options.
pub fn serialize(doc: &Document) -> String {
    MarkdownSerializer::default().serialize(doc)
}

pub fn serialize_with(doc: &Document, options: &SerializerOptions) -> String {
    MarkdownSerializer::new(options.clone()).serialize(doc)
}
