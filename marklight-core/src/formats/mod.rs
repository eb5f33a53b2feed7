//! Format implementations
//!
//! Each format converts between the document tree and a text representation.

pub mod icons;
pub mod json;
pub mod markdown;
pub mod treeviz;
