//! Document model
//!
//! The tree the editor works on: blocks, inline runs and the marks that style
//! them. Everything here is plain owned data; parsing and serialization live in
//! [`crate::formats::markdown`], offset mapping in [`crate::editing`].

pub mod attrs;
pub mod marks;
pub mod nodes;

pub use attrs::{AttrValue, Attrs};
pub use marks::{delimiter, Mark, MarkSet, MarkType};
pub use nodes::{
    content_size, normalize, text_content, Abbreviations, Block, BlockPath, ContentKind,
    Document, Inline, InlineNode, NodeType,
};
