//! sqldelta diff engine - schema comparison and diff report generation
//!
//! This crate provides functionality for:
//! - Comparing two schema snapshots (reference vs. target)
//! - Building minimal, structured change sets per object type
//! - Serializing the result as an ordered, indented XML document

pub mod compare;
pub mod report;

pub use compare::*;
pub use report::*;
