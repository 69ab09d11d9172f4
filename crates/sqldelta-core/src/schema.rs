//! Schema object model
//!
//! Read-only descriptions of the database objects the diff engine compares:
//! tables, views, sequences, procedures, packages, triggers, indexes,
//! columns, constraints, foreign keys and grants. All of these are snapshots
//! supplied once per comparison run; nothing here is ever mutated by the
//! engine.

use crate::ident::{ObjectName, TableIdentifier};
use serde::{Deserialize, Serialize};

/// JDBC-like type code attached to every column
///
/// The code drives the coarse type-family equality used when
/// `compare_jdbc_types` is enabled: all CLOB variants compare equal, all BLOB
/// variants compare equal, and character types compare equal only when the
/// stored size matches. `Other` never coerces; vendor-specific coercions are
/// a policy extension, not a hidden default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnTypeCode {
    Char,
    VarChar,
    LongVarChar,
    NChar,
    NVarChar,
    Clob,
    NClob,
    Blob,
    Binary,
    VarBinary,
    LongVarBinary,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Numeric,
    Decimal,
    Real,
    Float,
    Double,
    Boolean,
    Bit,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Other,
}

impl ColumnTypeCode {
    /// Fixed- and variable-length character types (not large objects)
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            ColumnTypeCode::Char
                | ColumnTypeCode::VarChar
                | ColumnTypeCode::LongVarChar
                | ColumnTypeCode::NChar
                | ColumnTypeCode::NVarChar
        )
    }

    pub fn is_clob(&self) -> bool {
        matches!(self, ColumnTypeCode::Clob | ColumnTypeCode::NClob)
    }

    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            ColumnTypeCode::Blob
                | ColumnTypeCode::Binary
                | ColumnTypeCode::VarBinary
                | ColumnTypeCode::LongVarBinary
        )
    }

    /// Exact numeric types where precision and scale are significant
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnTypeCode::Numeric | ColumnTypeCode::Decimal)
    }
}

/// Per-column foreign key reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub constraint_name: String,
    pub table: String,
    pub column: String,
}

/// Column description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub ordinal: usize,
    /// Vendor type string as reported by the engine, e.g. `NUMERIC(10,2)`
    pub dbms_type: String,
    pub type_code: ColumnTypeCode,
    pub size: Option<i64>,
    pub digits: Option<i32>,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub comment: Option<String>,
    /// Generation expression for computed columns
    pub expression: Option<String>,
    pub collation: Option<String>,
    pub foreign_key: Option<ForeignKeyRef>,
    pub is_primary_key: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, dbms_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal: 0,
            dbms_type: dbms_type.into(),
            type_code: ColumnTypeCode::Other,
            size: None,
            digits: None,
            nullable: true,
            default_value: None,
            comment: None,
            expression: None,
            collation: None,
            foreign_key: None,
            is_primary_key: false,
        }
    }
}

/// One column of an index definition, with optional sort direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub direction: Option<String>,
}

impl IndexColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
        }
    }
}

/// Index description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub unique: bool,
    pub primary_key: bool,
    /// Vendor type keyword, e.g. `NORMAL`, `BTREE`, `CLUSTERED`
    pub index_type: String,
    pub filter: Option<String>,
    pub columns: Vec<IndexColumn>,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<IndexColumn>) -> Self {
        Self {
            name: name.into(),
            unique: false,
            primary_key: false,
            index_type: "NORMAL".to_string(),
            filter: None,
            columns,
        }
    }

    /// Structural identity: the ordered column/direction list. Indexes are
    /// matched across a table pair on this, never on the name, so a renamed
    /// but otherwise identical index is a name change rather than add+drop.
    pub fn same_structure(&self, other: &IndexDefinition) -> bool {
        self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|(a, b)| {
                    a.name.eq_ignore_ascii_case(&b.name)
                        && a.direction.as_deref().map(str::to_uppercase)
                            == b.direction.as_deref().map(str::to_uppercase)
                })
    }

    /// Column list rendered as `col [dir], ...` for display and reporting
    pub fn expression(&self) -> String {
        self.columns
            .iter()
            .map(|c| match &c.direction {
                Some(dir) => format!("{} {}", c.name, dir),
                None => c.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Check constraint attached to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraint {
    /// System-generated constraints frequently have no meaningful name
    pub name: Option<String>,
    pub expression: String,
}

impl TableConstraint {
    pub fn new(name: Option<&str>, expression: impl Into<String>) -> Self {
        Self {
            name: name.map(|n| n.to_string()),
            expression: expression.into(),
        }
    }

    pub fn expression_matches(&self, other: &TableConstraint) -> bool {
        self.expression.trim() == other.expression.trim()
    }
}

/// Referential action for foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FkRule {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl FkRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FkRule::NoAction => "NO ACTION",
            FkRule::Restrict => "RESTRICT",
            FkRule::Cascade => "CASCADE",
            FkRule::SetNull => "SET NULL",
            FkRule::SetDefault => "SET DEFAULT",
        }
    }
}

/// Foreign key description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_schema: Option<String>,
    pub referenced_columns: Vec<String>,
    pub update_rule: FkRule,
    pub delete_rule: FkRule,
    pub enabled: bool,
    pub validated: bool,
}

impl ForeignKeyDefinition {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        referenced_table: impl Into<String>,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            referenced_table: referenced_table.into(),
            referenced_schema: None,
            referenced_columns,
            update_rule: FkRule::NoAction,
            delete_rule: FkRule::NoAction,
            enabled: true,
            validated: true,
        }
    }

    /// Definition equality, ignoring the constraint name. A renamed foreign
    /// key is reported separately from a definition change.
    pub fn definition_matches(&self, other: &ForeignKeyDefinition) -> bool {
        self.columns == other.columns
            && self.referenced_table.eq_ignore_ascii_case(&other.referenced_table)
            && self.referenced_columns == other.referenced_columns
            && self.update_rule == other.update_rule
            && self.delete_rule == other.delete_rule
            && self.enabled == other.enabled
            && self.validated == other.validated
    }
}

/// A single grant tuple. `Eq + Hash` so grant reconciliation is a plain set
/// difference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantDefinition {
    pub grantee: String,
    pub privilege: String,
    pub grantable: bool,
}

impl GrantDefinition {
    pub fn new(grantee: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self {
            grantee: grantee.into(),
            privilege: privilege.into(),
            grantable: false,
        }
    }
}

/// Trigger timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        }
    }
}

/// Trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
    Truncate,
}

impl TriggerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
            TriggerEvent::Truncate => "TRUNCATE",
        }
    }
}

/// Trigger description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub name: String,
    pub timing: TriggerTiming,
    pub events: Vec<TriggerEvent>,
    pub source: Option<String>,
    pub comment: Option<String>,
}

impl TriggerDefinition {
    pub fn new(name: impl Into<String>, timing: TriggerTiming, events: Vec<TriggerEvent>) -> Self {
        Self {
            name: name.into(),
            timing,
            events,
            source: None,
            comment: None,
        }
    }

    /// Trimmed source text for comparison; absent source compares as empty
    pub fn trimmed_source(&self) -> &str {
        self.source.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Primary key description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyDefinition {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl PrimaryKeyDefinition {
    pub fn new(name: Option<&str>, columns: Vec<String>) -> Self {
        Self {
            name: name.map(|n| n.to_string()),
            columns,
        }
    }
}

/// Vendor-specific table option, e.g. `ENGINE=InnoDB` or `ORGANIZATION INDEX`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableOption {
    pub name: String,
    pub value: Option<String>,
}

impl TableOption {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(|v| v.to_string()),
        }
    }
}

/// Complete table description with all attached collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub identifier: TableIdentifier,
    /// Vendor table type keyword, e.g. `TABLE`, `TEMPORARY TABLE`
    pub table_type: String,
    pub tablespace: Option<String>,
    pub comment: Option<String>,
    pub options: Vec<TableOption>,
    pub columns: Vec<ColumnDefinition>,
    pub primary_key: Option<PrimaryKeyDefinition>,
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    pub indexes: Vec<IndexDefinition>,
    pub constraints: Vec<TableConstraint>,
    pub triggers: Vec<TriggerDefinition>,
    pub grants: Vec<GrantDefinition>,
}

impl TableDefinition {
    pub fn new(identifier: TableIdentifier) -> Self {
        Self {
            identifier,
            table_type: "TABLE".to_string(),
            tablespace: None,
            comment: None,
            options: Vec::new(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
            triggers: Vec::new(),
            grants: Vec::new(),
        }
    }

    pub fn name(&self) -> &ObjectName {
        &self.identifier.name
    }

    /// Primary key column list, from the explicit PK or the column flags
    pub fn primary_key_columns(&self) -> Vec<String> {
        if let Some(pk) = &self.primary_key {
            return pk.columns.clone();
        }
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect()
    }
}

/// View description. Views carry columns, indexes and grants so they can be
/// compared either by source text or structurally like a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub identifier: TableIdentifier,
    pub source: Option<String>,
    pub materialized: bool,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
    pub grants: Vec<GrantDefinition>,
    pub comment: Option<String>,
}

impl ViewDefinition {
    pub fn new(identifier: TableIdentifier) -> Self {
        Self {
            identifier,
            source: None,
            materialized: false,
            columns: Vec::new(),
            indexes: Vec::new(),
            grants: Vec::new(),
            comment: None,
        }
    }

    pub fn name(&self) -> &ObjectName {
        &self.identifier.name
    }

    pub fn trimmed_source(&self) -> &str {
        self.source.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Sequence description. Equality is property-by-property; the diff emits
/// only the properties that changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDefinition {
    pub schema: Option<String>,
    pub name: String,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub start_value: Option<i64>,
    pub increment: i64,
    pub cycle: bool,
    pub cache: Option<i64>,
    pub current_value: Option<i64>,
    pub comment: Option<String>,
}

impl SequenceDefinition {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(|s| s.to_string()),
            name: name.into(),
            min_value: None,
            max_value: None,
            start_value: None,
            increment: 1,
            cycle: false,
            cache: None,
            current_value: None,
            comment: None,
        }
    }
}

/// Parameter mode for procedure signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParameterMode {
    #[default]
    In,
    Out,
    InOut,
}

/// Procedure parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: Option<String>,
    pub data_type: String,
    pub mode: ParameterMode,
}

impl ParameterDefinition {
    pub fn new(name: Option<&str>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.map(|n| n.to_string()),
            data_type: data_type.into(),
            mode: ParameterMode::In,
        }
    }
}

/// Stored procedure (or function) description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDefinition {
    pub schema: Option<String>,
    pub name: String,
    pub parameters: Vec<ParameterDefinition>,
    pub source: Option<String>,
    /// Owning package, for engines that group procedures into packages
    pub package: Option<String>,
    pub comment: Option<String>,
}

impl ProcedureDefinition {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(|s| s.to_string()),
            name: name.into(),
            parameters: Vec::new(),
            source: None,
            package: None,
            comment: None,
        }
    }

    /// Parameter-type list used for signature matching, e.g. `(INT, VARCHAR)`
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.parameters.iter().map(|p| p.data_type.as_str()).collect();
        format!("({})", types.join(", "))
    }

    pub fn trimmed_source(&self) -> &str {
        self.source.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Package description (Oracle-style procedure container)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDefinition {
    pub schema: Option<String>,
    pub name: String,
    pub source: Option<String>,
}

impl PackageDefinition {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(|s| s.to_string()),
            name: name.into(),
            source: None,
        }
    }

    pub fn trimmed_source(&self) -> &str {
        self.source.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Kind tag for custom types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Enum,
    Composite,
    Domain,
}

/// Custom type description (enums, domains, composites)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub schema: Option<String>,
    pub name: String,
    pub kind: TypeKind,
    pub values: Option<Vec<String>>,
    pub definition: Option<String>,
}

impl TypeDefinition {
    pub fn new(schema: Option<&str>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            schema: schema.map(|s| s.to_string()),
            name: name.into(),
            kind,
            values: None,
            definition: None,
        }
    }
}

/// Object kind tag carried by inventory handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Table,
    View,
    MaterializedView,
    Sequence,
    Procedure,
    Package,
    Type,
}

impl ObjectKind {
    /// Type predicate used to partition unmatched target objects into
    /// drop-table vs drop-view lists
    pub fn is_view(&self) -> bool {
        matches!(self, ObjectKind::View | ObjectKind::MaterializedView)
    }
}

/// Closed union over every comparable object. The orchestrator dispatches
/// with an exhaustive match, so adding a variant forces every handler to be
/// updated at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DbObject {
    Table(TableDefinition),
    View(ViewDefinition),
    Sequence(SequenceDefinition),
    Procedure(ProcedureDefinition),
    Package(PackageDefinition),
    Type(TypeDefinition),
}

impl DbObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            DbObject::Table(_) => ObjectKind::Table,
            DbObject::View(v) if v.materialized => ObjectKind::MaterializedView,
            DbObject::View(_) => ObjectKind::View,
            DbObject::Sequence(_) => ObjectKind::Sequence,
            DbObject::Procedure(_) => ObjectKind::Procedure,
            DbObject::Package(_) => ObjectKind::Package,
            DbObject::Type(_) => ObjectKind::Type,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DbObject::Table(t) => t.identifier.name.as_str(),
            DbObject::View(v) => v.identifier.name.as_str(),
            DbObject::Sequence(s) => &s.name,
            DbObject::Procedure(p) => &p.name,
            DbObject::Package(p) => &p.name,
            DbObject::Type(t) => &t.name,
        }
    }

    pub fn schema(&self) -> Option<&str> {
        match self {
            DbObject::Table(t) => t.identifier.schema.as_deref(),
            DbObject::View(v) => v.identifier.schema.as_deref(),
            DbObject::Sequence(s) => s.schema.as_deref(),
            DbObject::Procedure(p) => p.schema.as_deref(),
            DbObject::Package(p) => p.schema.as_deref(),
            DbObject::Type(t) => t.schema.as_deref(),
        }
    }
}
