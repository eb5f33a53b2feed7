//! Editing tests
//!
//! Source map invariants, delimiter navigation, source-level deletes and
//! whole key sequences through the keymap.

mod edit;
mod keymap;
mod navigation;
mod source_map;
