//! Comparison policy
//!
//! Which facets to compare and how names and types are matched. Every toggle
//! defaults to on so a plain `CompareSettings::default()` produces the most
//! complete diff.

use serde::{Deserialize, Serialize};

/// Configuration for a schema comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSettings {
    /// Whether to compare index definitions
    pub include_indexes: bool,
    /// Whether to compare foreign keys
    pub include_foreign_keys: bool,
    /// Whether to compare primary keys
    pub include_primary_keys: bool,
    /// Whether to compare check constraints
    pub include_constraints: bool,
    /// Whether to compare table grants
    pub include_grants: bool,
    /// Whether to compare triggers
    pub include_triggers: bool,
    /// Whether to compare views
    pub include_views: bool,
    /// Whether to compare procedures and packages
    pub include_procedures: bool,
    /// Whether to compare sequences
    pub include_sequences: bool,
    /// Compare columns by type-family (CLOB/BLOB variants coerce, character
    /// types need matching size) instead of the raw vendor type string
    pub compare_jdbc_types: bool,
    /// Match check constraints by name; when false they are matched by
    /// expression text and names are ignored
    pub constraints_by_name: bool,
    /// Surface views in the table inventory and compare them structurally
    pub views_as_tables: bool,
    /// Table names to exclude: exact names or glob patterns (`%`, `*`).
    /// Globs are expanded against both inventories before exclusion applies.
    pub exclude_tables: Vec<String>,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            include_indexes: true,
            include_foreign_keys: true,
            include_primary_keys: true,
            include_constraints: true,
            include_grants: true,
            include_triggers: true,
            include_views: true,
            include_procedures: true,
            include_sequences: true,
            compare_jdbc_types: false,
            constraints_by_name: true,
            views_as_tables: false,
            exclude_tables: Vec::new(),
        }
    }
}

impl CompareSettings {
    /// Creates settings with every facet enabled
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_indexes(mut self) -> Self {
        self.include_indexes = false;
        self
    }

    pub fn without_foreign_keys(mut self) -> Self {
        self.include_foreign_keys = false;
        self
    }

    pub fn without_primary_keys(mut self) -> Self {
        self.include_primary_keys = false;
        self
    }

    pub fn without_constraints(mut self) -> Self {
        self.include_constraints = false;
        self
    }

    pub fn without_grants(mut self) -> Self {
        self.include_grants = false;
        self
    }

    pub fn without_triggers(mut self) -> Self {
        self.include_triggers = false;
        self
    }

    pub fn without_views(mut self) -> Self {
        self.include_views = false;
        self
    }

    pub fn without_procedures(mut self) -> Self {
        self.include_procedures = false;
        self
    }

    pub fn without_sequences(mut self) -> Self {
        self.include_sequences = false;
        self
    }

    /// Enables type-family comparison instead of raw type-string equality
    pub fn with_jdbc_types(mut self) -> Self {
        self.compare_jdbc_types = true;
        self
    }

    /// Matches check constraints by expression text instead of name
    pub fn constraints_by_expression(mut self) -> Self {
        self.constraints_by_name = false;
        self
    }

    /// Treats views as tables: structural comparison within the table pass
    pub fn with_views_as_tables(mut self) -> Self {
        self.views_as_tables = true;
        self
    }

    /// Adds a table exclusion (exact name or `%`/`*` glob)
    pub fn exclude_table(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_tables.push(pattern.into());
        self
    }
}
