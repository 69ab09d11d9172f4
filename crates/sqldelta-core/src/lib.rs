//! sqldelta core - object model and source abstractions for schema diffing
//!
//! This crate provides the types the diff engine operates on:
//!
//! - `TableDefinition`, `ViewDefinition`, `SequenceDefinition`, ... - read-only
//!   descriptions of comparable database objects
//! - `ObjectName` / `TableIdentifier` - identifier quoting and case rules
//! - `SchemaSource` / `SchemaSnapshot` - the metadata collaborator seam
//! - `CancellationFlag` - cooperative cancellation
//! - `SqlDeltaError` - core error type

mod error;
mod ident;
mod schema;
mod snapshot;

pub use error::*;
pub use ident::*;
pub use schema::*;
pub use snapshot::*;
