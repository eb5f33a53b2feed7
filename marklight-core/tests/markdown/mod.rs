//! Markdown format tests
//!
//! Parsing, serialization and the parse → serialize → parse round trip.

mod abbreviations;
mod checkbox;
mod export;
mod import;
mod roundtrip;
