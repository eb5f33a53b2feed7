//! Editing core
//!
//! The inner round-trip on the block holding the cursor:
//!
//! - [`source_map`] rebuilds a block's markdown and maps structural offsets
//!   to source offsets;
//! - [`navigation`] lets the cursor step through multi-character delimiters;
//! - [`edit`] deletes single source characters and re-parses the block;
//! - [`keymap`] threads all of it through one key event;
//! - [`decorations`] tells the renderer which markers to show.
//!
//! All state is passed in and returned by value.

pub mod cursor;
pub mod decorations;
pub mod edit;
pub mod keymap;
pub mod navigation;
pub mod paste;
pub mod source_map;

pub use cursor::{Cursor, Selection};
pub use edit::{delete_at_virtual_offset, EditOutcome};
pub use keymap::{handle_key, EditorState, Key, Keymap};
pub use navigation::{handle_arrow, Arrow, DelimiterNav, NavOutcome, Side};
pub use source_map::{mark_boundaries, mark_range, MarkRange, ParagraphMap};
