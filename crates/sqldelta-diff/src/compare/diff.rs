//! Schema diff data structures
//!
//! Every diff component returns an immutable change value; a change that
//! would be empty is represented as `None` or an empty list, never as a
//! populated-but-equal fragment. The report writer walks these structures in
//! a fixed order, so ordering inside the vectors is significant: added
//! objects keep reference inventory order, dropped objects keep target
//! inventory order.

use serde::{Deserialize, Serialize};
use sqldelta_core::{
    ColumnDefinition, ConnectionInfo, ForeignKeyDefinition, ForeignKeyRef, GrantDefinition,
    IndexDefinition, PackageDefinition, PrimaryKeyDefinition, ProcedureDefinition,
    SequenceDefinition, TableConstraint, TableDefinition, TableIdentifier, TableOption,
    TriggerDefinition, TypeDefinition, ViewDefinition,
};

use super::settings::CompareSettings;

/// Old/new value pair. `old` is always the target-side value, `new` the
/// reference-side value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange<T> {
    pub old: T,
    pub new: T,
}

impl<T> ValueChange<T> {
    pub fn new(old: T, new: T) -> Self {
        Self { old, new }
    }
}

/// Rename: old/new name pair
pub type NameChange = ValueChange<String>;

/// Default-value change. Removal is explicit so downstream DDL generators
/// can distinguish "set default" from "drop default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultChange {
    /// Target has a default, reference has none
    Removed { old: String },
    /// Reference default differs from the (possibly absent) target default
    Changed { old: Option<String>, new: String },
}

/// Change to the single foreign key hanging off one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnFkChange {
    Added(ForeignKeyRef),
    Dropped(ForeignKeyRef),
    /// Same reference target, different constraint name
    Renamed(NameChange),
    /// Different reference target: drop the old, add the new
    Replaced {
        old: ForeignKeyRef,
        new: ForeignKeyRef,
    },
}

/// Changes to a single column; only changed facets are populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnChange {
    pub column_name: String,
    pub type_change: Option<ValueChange<String>>,
    pub nullable_change: Option<ValueChange<bool>>,
    pub default_change: Option<DefaultChange>,
    pub comment_change: Option<ValueChange<Option<String>>>,
    pub expression_change: Option<ValueChange<Option<String>>>,
    pub collation_change: Option<ValueChange<Option<String>>>,
    pub foreign_key_change: Option<ColumnFkChange>,
}

impl ColumnChange {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            type_change: None,
            nullable_change: None,
            default_change: None,
            comment_change: None,
            expression_change: None,
            collation_change: None,
            foreign_key_change: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.type_change.is_none()
            && self.nullable_change.is_none()
            && self.default_change.is_none()
            && self.comment_change.is_none()
            && self.expression_change.is_none()
            && self.collation_change.is_none()
            && self.foreign_key_change.is_none()
    }
}

/// Facet changes for one structurally matched index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexChange {
    /// Name of the target index the change applies to
    pub index_name: String,
    pub name_change: Option<NameChange>,
    pub unique_change: Option<ValueChange<bool>>,
    pub primary_change: Option<ValueChange<bool>>,
    pub type_change: Option<ValueChange<String>>,
    pub filter_change: Option<ValueChange<Option<String>>>,
}

impl IndexChange {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            name_change: None,
            unique_change: None,
            primary_change: None,
            type_change: None,
            filter_change: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name_change.is_none()
            && self.unique_change.is_none()
            && self.primary_change.is_none()
            && self.type_change.is_none()
            && self.filter_change.is_none()
    }
}

/// Index reconciliation result for one table or view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexListChange {
    /// Full definitions, present only in the reference
    pub added: Vec<IndexDefinition>,
    /// Names of indexes present only in the target
    pub dropped: Vec<String>,
    pub modified: Vec<IndexChange>,
}

impl IndexListChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty() && self.modified.is_empty()
    }
}

/// Grant reconciliation: plain set difference over grant tuples
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrantListChange {
    pub added: Vec<GrantDefinition>,
    pub revoked: Vec<GrantDefinition>,
}

impl GrantListChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.revoked.is_empty()
    }
}

/// Trigger reconciliation for one table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerListChange {
    /// Full reference definitions for triggers missing from the target
    pub create: Vec<TriggerDefinition>,
    /// Full reference definitions for triggers whose source or attributes
    /// differ
    pub update: Vec<TriggerDefinition>,
    /// Names of triggers present only in the target
    pub drop: Vec<String>,
}

impl TriggerListChange {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.drop.is_empty()
    }
}

/// Primary key change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimaryKeyChange {
    /// Reference has a primary key, target has none
    Added(PrimaryKeyDefinition),
    /// Target has a primary key, reference has none
    Removed(PrimaryKeyDefinition),
    Modified {
        old: PrimaryKeyDefinition,
        new: PrimaryKeyDefinition,
    },
}

/// A constraint matched by name whose expression changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintChange {
    pub name: String,
    pub expression_change: ValueChange<String>,
}

/// Constraint reconciliation for one table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstraintListChange {
    pub added: Vec<TableConstraint>,
    pub dropped: Vec<TableConstraint>,
    pub modified: Vec<ConstraintChange>,
}

impl ConstraintListChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty() && self.modified.is_empty()
    }
}

/// All changes for one matched table pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableChange {
    /// Reference-side identity
    pub table: TableIdentifier,
    /// Old (target) / new (reference) name when the pair was matched under
    /// a rename
    pub rename: Option<NameChange>,
    pub added_columns: Vec<ColumnDefinition>,
    /// Names of columns present only in the target
    pub removed_columns: Vec<String>,
    pub modified_columns: Vec<ColumnChange>,
    pub primary_key_change: Option<PrimaryKeyChange>,
    pub constraint_changes: ConstraintListChange,
    pub added_foreign_keys: Vec<ForeignKeyDefinition>,
    /// Names of foreign keys present only in the target
    pub dropped_foreign_keys: Vec<String>,
    /// Definition-matched foreign keys that only differ in name
    pub renamed_foreign_keys: Vec<NameChange>,
    pub type_change: Option<ValueChange<String>>,
    pub tablespace_change: Option<ValueChange<Option<String>>>,
    pub added_options: Vec<TableOption>,
    pub removed_options: Vec<TableOption>,
    pub index_changes: IndexListChange,
    pub trigger_changes: TriggerListChange,
    pub grant_changes: GrantListChange,
}

impl TableChange {
    pub fn new(table: TableIdentifier) -> Self {
        Self {
            table,
            rename: None,
            added_columns: Vec::new(),
            removed_columns: Vec::new(),
            modified_columns: Vec::new(),
            primary_key_change: None,
            constraint_changes: ConstraintListChange::default(),
            added_foreign_keys: Vec::new(),
            dropped_foreign_keys: Vec::new(),
            renamed_foreign_keys: Vec::new(),
            type_change: None,
            tablespace_change: None,
            added_options: Vec::new(),
            removed_options: Vec::new(),
            index_changes: IndexListChange::default(),
            trigger_changes: TriggerListChange::default(),
            grant_changes: GrantListChange::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rename.is_none()
            && self.added_columns.is_empty()
            && self.removed_columns.is_empty()
            && self.modified_columns.is_empty()
            && self.primary_key_change.is_none()
            && self.constraint_changes.is_empty()
            && self.added_foreign_keys.is_empty()
            && self.dropped_foreign_keys.is_empty()
            && self.renamed_foreign_keys.is_empty()
            && self.type_change.is_none()
            && self.tablespace_change.is_none()
            && self.added_options.is_empty()
            && self.removed_options.is_empty()
            && self.index_changes.is_empty()
            && self.trigger_changes.is_empty()
            && self.grant_changes.is_empty()
    }
}

/// One table fragment in reference inventory order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableEntry {
    /// Table missing from the target: full reference definition
    Added(TableDefinition),
    Modified(Box<TableChange>),
}

/// Changes for one matched view pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewChange {
    pub view: TableIdentifier,
    /// Full reference definition, present when the source text differs
    pub definition: Option<ViewDefinition>,
    pub index_changes: IndexListChange,
    pub grant_changes: GrantListChange,
}

impl ViewChange {
    pub fn new(view: TableIdentifier) -> Self {
        Self {
            view,
            definition: None,
            index_changes: IndexListChange::default(),
            grant_changes: GrantListChange::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.definition.is_none() && self.index_changes.is_empty() && self.grant_changes.is_empty()
    }
}

/// One view fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEntry {
    Created(ViewDefinition),
    Updated(Box<ViewChange>),
}

/// Sequence property tags for the modify-properties list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceProperty {
    MinValue,
    MaxValue,
    StartValue,
    Increment,
    Cycle,
    Cache,
    CurrentValue,
}

impl SequenceProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceProperty::MinValue => "min-value",
            SequenceProperty::MaxValue => "max-value",
            SequenceProperty::StartValue => "start-value",
            SequenceProperty::Increment => "increment",
            SequenceProperty::Cycle => "cycle",
            SequenceProperty::Cache => "cache",
            SequenceProperty::CurrentValue => "current-value",
        }
    }
}

/// A single changed sequence property, rendered as old/new text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencePropertyChange {
    pub property: SequenceProperty,
    pub old: String,
    pub new: String,
}

/// Changes for one matched sequence pair: the full reference definition plus
/// the list of exactly the properties that changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceChange {
    pub definition: SequenceDefinition,
    pub changed: Vec<SequencePropertyChange>,
}

/// One sequence fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequenceEntry {
    Created(SequenceDefinition),
    Updated(SequenceChange),
}

/// One procedure fragment; updates carry the full reference definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcedureEntry {
    Created(ProcedureDefinition),
    Updated(ProcedureDefinition),
}

/// One package fragment; updates carry the full reference definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PackageEntry {
    Created(PackageDefinition),
    Updated(PackageDefinition),
}

/// One custom-type fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeEntry {
    Created(TypeDefinition),
    Updated(TypeDefinition),
}

/// Complete diff between two schemas, in report order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDiff {
    pub tables: Vec<TableEntry>,
    pub dropped_tables: Vec<TableIdentifier>,
    pub views: Vec<ViewEntry>,
    pub dropped_views: Vec<TableIdentifier>,
    pub sequences: Vec<SequenceEntry>,
    pub dropped_sequences: Vec<String>,
    pub procedures: Vec<ProcedureEntry>,
    pub dropped_procedures: Vec<String>,
    pub packages: Vec<PackageEntry>,
    pub dropped_packages: Vec<String>,
    pub types: Vec<TypeEntry>,
    pub dropped_types: Vec<String>,
}

impl SchemaDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fragment of any kind was produced
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.dropped_tables.is_empty()
            && self.views.is_empty()
            && self.dropped_views.is_empty()
            && self.sequences.is_empty()
            && self.dropped_sequences.is_empty()
            && self.procedures.is_empty()
            && self.dropped_procedures.is_empty()
            && self.packages.is_empty()
            && self.dropped_packages.is_empty()
            && self.types.is_empty()
            && self.dropped_types.is_empty()
    }

    /// Total number of fragments
    pub fn change_count(&self) -> usize {
        self.tables.len()
            + self.dropped_tables.len()
            + self.views.len()
            + self.dropped_views.len()
            + self.sequences.len()
            + self.dropped_sequences.len()
            + self.procedures.len()
            + self.dropped_procedures.len()
            + self.packages.len()
            + self.dropped_packages.len()
            + self.types.len()
            + self.dropped_types.len()
    }
}

/// How a comparison run ended. Cancellation is not a failure: the diff is
/// valid but incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareStatus {
    Complete,
    Cancelled,
}

/// Result of one comparison run: everything the report writer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaComparison {
    pub reference: ConnectionInfo,
    pub target: ConnectionInfo,
    pub settings: CompareSettings,
    pub diff: SchemaDiff,
    pub status: CompareStatus,
}

impl SchemaComparison {
    pub fn is_cancelled(&self) -> bool {
        self.status == CompareStatus::Cancelled
    }
}
