//! Schema sources and snapshots
//!
//! The diff engine never talks to a live database. It consumes two
//! `SchemaSource` collaborators: cheap inventory listings plus a fallible
//! per-object detail fetch. `SchemaSnapshot` is the canonical in-memory
//! implementation; tests and callers build snapshots and hand them to the
//! comparator.

use crate::error::{Result, SqlDeltaError};
use crate::ident::{IdentifierCase, TableIdentifier};
use crate::schema::{
    DbObject, ObjectKind, PackageDefinition, ProcedureDefinition, SequenceDefinition,
    TableDefinition, TypeDefinition, ViewDefinition,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Connection metadata echoed into the report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub url: String,
    pub username: Option<String>,
    pub database_product: Option<String>,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    /// Case the engine applies to unquoted identifiers
    pub default_case: IdentifierCase,
    pub captured_at: Option<DateTime<Utc>>,
}

impl ConnectionInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            database_product: None,
            schema: None,
            catalog: None,
            default_case: IdentifierCase::default(),
            captured_at: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_default_case(mut self, case: IdentifierCase) -> Self {
        self.default_case = case;
        self
    }
}

impl Default for ConnectionInfo {
    fn default() -> Self {
        Self::new("")
    }
}

/// Lightweight inventory entry: identity plus kind tag. Matching operates on
/// handles; full definitions are fetched per object so a retrieval failure
/// can be skipped without aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHandle {
    pub identifier: TableIdentifier,
    pub kind: ObjectKind,
}

impl TableHandle {
    pub fn table(identifier: TableIdentifier) -> Self {
        Self {
            identifier,
            kind: ObjectKind::Table,
        }
    }

    pub fn view(identifier: TableIdentifier) -> Self {
        Self {
            identifier,
            kind: ObjectKind::View,
        }
    }
}

/// Metadata collaborator supplying one side of a comparison
///
/// Implementations are read-only snapshots or adapters over cached metadata.
/// The engine assumes exclusive, non-reentrant access for the duration of a
/// run; callers serialize runs against the same source.
pub trait SchemaSource {
    fn connection(&self) -> &ConnectionInfo;

    /// Table inventory (views included when they are surfaced as tables)
    fn list_tables(&self) -> Vec<TableHandle>;

    /// Full table detail. Failures are treated as retrieval failures: the
    /// engine logs and skips the object rather than aborting.
    fn get_table(&self, handle: &TableHandle) -> Result<TableDefinition>;

    fn list_views(&self) -> Vec<TableHandle>;

    fn get_view(&self, handle: &TableHandle) -> Result<ViewDefinition>;

    fn sequences(&self) -> Vec<SequenceDefinition>;

    fn procedures(&self) -> Vec<ProcedureDefinition>;

    fn packages(&self) -> Vec<PackageDefinition>;

    /// Vendor-specific extra object types (enums, domains, composites)
    fn extra_types(&self) -> Vec<TypeDefinition>;
}

/// Fully materialized, read-only schema snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub connection: ConnectionInfo,
    pub tables: Vec<TableDefinition>,
    pub views: Vec<ViewDefinition>,
    pub sequences: Vec<SequenceDefinition>,
    pub procedures: Vec<ProcedureDefinition>,
    pub packages: Vec<PackageDefinition>,
    pub types: Vec<TypeDefinition>,
}

impl SchemaSnapshot {
    pub fn new(connection: ConnectionInfo) -> Self {
        Self {
            connection,
            tables: Vec::new(),
            views: Vec::new(),
            sequences: Vec::new(),
            procedures: Vec::new(),
            packages: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn with_tables(mut self, tables: Vec<TableDefinition>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_views(mut self, views: Vec<ViewDefinition>) -> Self {
        self.views = views;
        self
    }

    /// Builds a snapshot from one mixed object list. The match is
    /// exhaustive, so a new `DbObject` variant cannot be forgotten here.
    pub fn from_objects(connection: ConnectionInfo, objects: Vec<DbObject>) -> Self {
        let mut snapshot = Self::new(connection);
        for object in objects {
            match object {
                DbObject::Table(table) => snapshot.tables.push(table),
                DbObject::View(view) => snapshot.views.push(view),
                DbObject::Sequence(sequence) => snapshot.sequences.push(sequence),
                DbObject::Procedure(procedure) => snapshot.procedures.push(procedure),
                DbObject::Package(package) => snapshot.packages.push(package),
                DbObject::Type(custom_type) => snapshot.types.push(custom_type),
            }
        }
        snapshot
    }
}

impl SchemaSource for SchemaSnapshot {
    fn connection(&self) -> &ConnectionInfo {
        &self.connection
    }

    fn list_tables(&self) -> Vec<TableHandle> {
        self.tables
            .iter()
            .map(|t| TableHandle::table(t.identifier.clone()))
            .collect()
    }

    fn get_table(&self, handle: &TableHandle) -> Result<TableDefinition> {
        self.tables
            .iter()
            .find(|t| t.identifier == handle.identifier)
            .cloned()
            .ok_or_else(|| SqlDeltaError::NotFound(handle.identifier.qualified_name()))
    }

    fn list_views(&self) -> Vec<TableHandle> {
        self.views
            .iter()
            .map(|v| TableHandle {
                identifier: v.identifier.clone(),
                kind: if v.materialized {
                    ObjectKind::MaterializedView
                } else {
                    ObjectKind::View
                },
            })
            .collect()
    }

    fn get_view(&self, handle: &TableHandle) -> Result<ViewDefinition> {
        self.views
            .iter()
            .find(|v| v.identifier == handle.identifier)
            .cloned()
            .ok_or_else(|| SqlDeltaError::NotFound(handle.identifier.qualified_name()))
    }

    fn sequences(&self) -> Vec<SequenceDefinition> {
        self.sequences.clone()
    }

    fn procedures(&self) -> Vec<ProcedureDefinition> {
        self.procedures.clone()
    }

    fn packages(&self) -> Vec<PackageDefinition> {
        self.packages.clone()
    }

    fn extra_types(&self) -> Vec<TypeDefinition> {
        self.types.clone()
    }
}

/// Cooperative cancellation flag, polled between objects
///
/// Cancellation is not an error: the run stops starting new fragments and
/// returns a valid, incomplete document with a distinct cancelled status.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
