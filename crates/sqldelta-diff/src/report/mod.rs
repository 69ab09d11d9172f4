//! Diff report serialization
//!
//! Turns a `SchemaComparison` into the ordered, indented XML document that
//! downstream DDL generators parse.

mod xml;


pub use xml::*;
