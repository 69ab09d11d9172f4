//! Tests for schema comparison

use sqldelta_core::{
    CancellationFlag, ColumnDefinition, ColumnTypeCode, ConnectionInfo, ForeignKeyDefinition,
    ForeignKeyRef, GrantDefinition, IdentifierCase, IndexColumn, IndexDefinition, ObjectName,
    PackageDefinition, PrimaryKeyDefinition, ProcedureDefinition, Result as CoreResult,
    SchemaSnapshot, SchemaSource, SequenceDefinition, SqlDeltaError, TableConstraint,
    TableDefinition, TableHandle, TableIdentifier, TriggerDefinition, TriggerEvent, TriggerTiming,
    ViewDefinition,
};

use super::column::compare_column;
use super::comparator::{match_inventories, CompareError, SchemaComparator};
use super::diff::{
    ColumnFkChange, CompareStatus, DefaultChange, PrimaryKeyChange, SequenceProperty, TableEntry,
    ViewEntry,
};
use super::grants::compare_grants;
use super::index::compare_index_lists;
use super::objects::{compare_sequences, compare_views};
use super::settings::CompareSettings;
use super::table::compare_tables;
use super::trigger::compare_trigger_lists;

fn create_test_column(name: &str, dbms_type: &str, nullable: bool) -> ColumnDefinition {
    let mut column = ColumnDefinition::new(name, dbms_type);
    column.nullable = nullable;
    column
}

fn create_numeric_column(name: &str, size: i64, digits: i32) -> ColumnDefinition {
    let mut column = ColumnDefinition::new(name, format!("NUMERIC({},{})", size, digits));
    column.type_code = ColumnTypeCode::Numeric;
    column.size = Some(size);
    column.digits = Some(digits);
    column.nullable = false;
    column
}

fn create_test_table(name: &str, columns: Vec<ColumnDefinition>) -> TableDefinition {
    let mut table = TableDefinition::new(TableIdentifier::new(name));
    table.columns = columns;
    table
}

fn create_test_index(name: &str, columns: Vec<&str>, unique: bool) -> IndexDefinition {
    let mut index = IndexDefinition::new(
        name,
        columns.into_iter().map(IndexColumn::new).collect(),
    );
    index.unique = unique;
    index
}

fn create_test_trigger(name: &str, source: &str) -> TriggerDefinition {
    let mut trigger =
        TriggerDefinition::new(name, TriggerTiming::Before, vec![TriggerEvent::Insert]);
    trigger.source = Some(source.to_string());
    trigger
}

fn create_test_view(name: &str, source: &str) -> ViewDefinition {
    let mut view = ViewDefinition::new(TableIdentifier::new(name));
    view.source = Some(source.to_string());
    view
}

fn create_test_sequence(name: &str, increment: i64) -> SequenceDefinition {
    let mut seq = SequenceDefinition::new(None, name);
    seq.increment = increment;
    seq.start_value = Some(1);
    seq
}

fn create_test_procedure(name: &str, source: &str) -> ProcedureDefinition {
    let mut proc = ProcedureDefinition::new(None, name);
    proc.source = Some(source.to_string());
    proc
}

fn create_snapshot(tables: Vec<TableDefinition>) -> SchemaSnapshot {
    SchemaSnapshot::new(ConnectionInfo::new("jdbc:test")).with_tables(tables)
}

#[cfg(test)]
mod column_comparison_tests {
    use super::*;

    #[test]
    fn test_identical_columns_yield_no_change() {
        let column = create_test_column("name", "VARCHAR(100)", true);
        let settings = CompareSettings::default();
        assert!(compare_column(&column, &column, &settings, true).is_none());
    }

    #[test]
    fn test_type_change_only_emits_type_facet() {
        let reference = create_numeric_column("amount", 10, 2);
        let target = create_numeric_column("amount", 10, 0);
        let settings = CompareSettings::new().with_jdbc_types();

        let change = compare_column(&reference, &target, &settings, false).unwrap();

        assert!(change.type_change.is_some());
        assert!(change.nullable_change.is_none());
        assert!(change.default_change.is_none());
        assert!(change.comment_change.is_none());
        assert!(change.collation_change.is_none());
    }

    #[test]
    fn test_clob_variants_equal_under_jdbc_types() {
        let mut reference = create_test_column("body", "CLOB", true);
        reference.type_code = ColumnTypeCode::Clob;
        let mut target = create_test_column("body", "NCLOB", true);
        target.type_code = ColumnTypeCode::NClob;

        let settings = CompareSettings::new().with_jdbc_types();
        assert!(compare_column(&reference, &target, &settings, false).is_none());

        // Raw type-string comparison still sees a difference
        let raw = CompareSettings::default();
        assert!(compare_column(&reference, &target, &raw, false).is_some());
    }

    #[test]
    fn test_blob_variants_equal_under_jdbc_types() {
        let mut reference = create_test_column("payload", "BLOB", true);
        reference.type_code = ColumnTypeCode::Blob;
        let mut target = create_test_column("payload", "VARBINARY", true);
        target.type_code = ColumnTypeCode::VarBinary;

        let settings = CompareSettings::new().with_jdbc_types();
        assert!(compare_column(&reference, &target, &settings, false).is_none());
    }

    #[test]
    fn test_character_types_need_matching_size() {
        let mut reference = create_test_column("name", "VARCHAR(100)", true);
        reference.type_code = ColumnTypeCode::VarChar;
        reference.size = Some(100);
        let mut target = create_test_column("name", "CHAR(100)", true);
        target.type_code = ColumnTypeCode::Char;
        target.size = Some(100);

        let settings = CompareSettings::new().with_jdbc_types();
        assert!(compare_column(&reference, &target, &settings, false).is_none());

        target.size = Some(50);
        target.dbms_type = "CHAR(50)".to_string();
        assert!(compare_column(&reference, &target, &settings, false).is_some());
    }

    #[test]
    fn test_nullable_change() {
        let reference = create_test_column("name", "VARCHAR(100)", false);
        let target = create_test_column("name", "VARCHAR(100)", true);
        let settings = CompareSettings::default();

        let change = compare_column(&reference, &target, &settings, false).unwrap();
        let nullable = change.nullable_change.unwrap();
        assert!(nullable.old);
        assert!(!nullable.new);
    }

    #[test]
    fn test_removed_default_has_explicit_marker() {
        let reference = create_test_column("flag", "INT", true);
        let mut target = create_test_column("flag", "INT", true);
        target.default_value = Some("0".to_string());

        let settings = CompareSettings::default();
        let change = compare_column(&reference, &target, &settings, false).unwrap();

        assert_eq!(
            change.default_change,
            Some(DefaultChange::Removed {
                old: "0".to_string()
            })
        );
    }

    #[test]
    fn test_changed_default() {
        let mut reference = create_test_column("flag", "INT", true);
        reference.default_value = Some("1".to_string());
        let mut target = create_test_column("flag", "INT", true);
        target.default_value = Some("0".to_string());

        let settings = CompareSettings::default();
        let change = compare_column(&reference, &target, &settings, false).unwrap();

        assert_eq!(
            change.default_change,
            Some(DefaultChange::Changed {
                old: Some("0".to_string()),
                new: "1".to_string()
            })
        );
    }

    #[test]
    fn test_column_fk_rename() {
        let mut reference = create_test_column("user_id", "INT", false);
        reference.foreign_key = Some(ForeignKeyRef {
            constraint_name: "fk_orders_users".to_string(),
            table: "users".to_string(),
            column: "id".to_string(),
        });
        let mut target = reference.clone();
        target.foreign_key = Some(ForeignKeyRef {
            constraint_name: "fk_old_name".to_string(),
            table: "users".to_string(),
            column: "id".to_string(),
        });

        let settings = CompareSettings::default();
        let change = compare_column(&reference, &target, &settings, true).unwrap();

        match change.foreign_key_change.unwrap() {
            ColumnFkChange::Renamed(rename) => {
                assert_eq!(rename.old, "fk_old_name");
                assert_eq!(rename.new, "fk_orders_users");
            }
            other => panic!("expected rename, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod index_comparison_tests {
    use super::*;

    #[test]
    fn test_identical_index_lists_yield_no_change() {
        let indexes = vec![create_test_index("idx_name", vec!["name"], false)];
        assert!(compare_index_lists(&indexes, &indexes).is_empty());
    }

    #[test]
    fn test_renamed_index_is_a_name_change_not_add_drop() {
        let reference = vec![create_test_index("idx_customer_name", vec!["name"], false)];
        let target = vec![create_test_index("idx_name", vec!["name"], false)];

        let change = compare_index_lists(&reference, &target);

        assert!(change.added.is_empty());
        assert!(change.dropped.is_empty());
        assert_eq!(change.modified.len(), 1);
        let modified = &change.modified[0];
        let name_change = modified.name_change.as_ref().unwrap();
        assert_eq!(name_change.old, "idx_name");
        assert_eq!(name_change.new, "idx_customer_name");
        assert!(modified.unique_change.is_none());
        assert!(modified.type_change.is_none());
        assert!(modified.filter_change.is_none());
    }

    #[test]
    fn test_structurally_different_index_is_add_plus_drop() {
        let reference = vec![create_test_index("idx_name", vec!["name", "email"], false)];
        let target = vec![create_test_index("idx_name", vec!["name"], false)];

        let change = compare_index_lists(&reference, &target);

        assert_eq!(change.added.len(), 1);
        assert_eq!(change.dropped, vec!["idx_name".to_string()]);
        assert!(change.modified.is_empty());
    }

    #[test]
    fn test_uniqueness_change() {
        let reference = vec![create_test_index("idx_email", vec!["email"], true)];
        let target = vec![create_test_index("idx_email", vec!["email"], false)];

        let change = compare_index_lists(&reference, &target);

        assert_eq!(change.modified.len(), 1);
        let unique = change.modified[0].unique_change.as_ref().unwrap();
        assert!(!unique.old);
        assert!(unique.new);
    }

    #[test]
    fn test_reference_only_index_carries_full_definition() {
        let reference = vec![
            create_test_index("idx_name", vec!["name"], false),
            create_test_index("idx_email", vec!["email"], true),
        ];
        let target = vec![create_test_index("idx_name", vec!["name"], false)];

        let change = compare_index_lists(&reference, &target);

        assert_eq!(change.added.len(), 1);
        assert_eq!(change.added[0].name, "idx_email");
        assert!(change.added[0].unique);
    }
}

#[cfg(test)]
mod grant_comparison_tests {
    use super::*;

    #[test]
    fn test_revoke_set_is_exact_difference() {
        let reference = vec![GrantDefinition::new("A", "SELECT")];
        let target = vec![
            GrantDefinition::new("A", "SELECT"),
            GrantDefinition::new("B", "SELECT"),
        ];

        let change = compare_grants(&reference, &target);

        assert!(change.added.is_empty());
        assert_eq!(change.revoked, vec![GrantDefinition::new("B", "SELECT")]);
    }

    #[test]
    fn test_equal_grant_sets_yield_no_change() {
        let grants = vec![
            GrantDefinition::new("app", "SELECT"),
            GrantDefinition::new("app", "INSERT"),
        ];
        assert!(compare_grants(&grants, &grants).is_empty());
    }
}

#[cfg(test)]
mod trigger_comparison_tests {
    use super::*;

    #[test]
    fn test_identical_triggers_yield_no_change() {
        let triggers = vec![create_test_trigger("trg_audit", "BEGIN NULL; END;")];
        assert!(compare_trigger_lists(&triggers, &triggers).is_empty());
    }

    #[test]
    fn test_source_change_is_an_update_with_reference_definition() {
        let reference = vec![create_test_trigger("trg_audit", "BEGIN audit(); END;")];
        let target = vec![create_test_trigger("trg_audit", "BEGIN NULL; END;")];

        let change = compare_trigger_lists(&reference, &target);

        assert_eq!(change.update.len(), 1);
        assert_eq!(
            change.update[0].source.as_deref(),
            Some("BEGIN audit(); END;")
        );
        assert!(change.create.is_empty());
        assert!(change.drop.is_empty());
    }

    #[test]
    fn test_source_comparison_ignores_surrounding_whitespace() {
        let reference = vec![create_test_trigger("trg_audit", "  BEGIN NULL; END;\n")];
        let target = vec![create_test_trigger("trg_audit", "BEGIN NULL; END;")];

        assert!(compare_trigger_lists(&reference, &target).is_empty());
    }

    #[test]
    fn test_missing_and_extra_triggers() {
        let reference = vec![create_test_trigger("trg_new", "BEGIN NULL; END;")];
        let target = vec![create_test_trigger("trg_old", "BEGIN NULL; END;")];

        let change = compare_trigger_lists(&reference, &target);

        assert_eq!(change.create.len(), 1);
        assert_eq!(change.create[0].name, "trg_new");
        assert_eq!(change.drop, vec!["trg_old".to_string()]);
    }
}

#[cfg(test)]
mod table_comparison_tests {
    use super::*;

    fn settings() -> CompareSettings {
        CompareSettings::default()
    }

    #[test]
    fn test_table_against_itself_is_empty() {
        let mut table = create_test_table(
            "users",
            vec![
                create_test_column("id", "INT", false),
                create_test_column("name", "VARCHAR(100)", true),
            ],
        );
        table.primary_key = Some(PrimaryKeyDefinition::new(
            Some("pk_users"),
            vec!["id".to_string()],
        ));
        table.indexes = vec![create_test_index("idx_name", vec!["name"], false)];
        table.grants = vec![GrantDefinition::new("app", "SELECT")];

        let change = compare_tables(&table, &table, &settings(), IdentifierCase::Upper);
        assert!(change.is_none());
    }

    #[test]
    fn test_new_column_emits_add_column_and_nothing_else() {
        let reference = create_test_table(
            "t",
            vec![
                create_test_column("id", "INT", false),
                create_test_column("name", "VARCHAR(100)", true),
                create_test_column("email", "VARCHAR(100)", true),
            ],
        );
        let target = create_test_table(
            "t",
            vec![
                create_test_column("id", "INT", false),
                create_test_column("name", "VARCHAR(100)", true),
            ],
        );

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();

        assert_eq!(change.added_columns.len(), 1);
        assert_eq!(change.added_columns[0].name, "email");
        assert!(change.removed_columns.is_empty());
        assert!(change.modified_columns.is_empty());
        assert!(change.primary_key_change.is_none());
        assert!(change.constraint_changes.is_empty());
        assert!(change.index_changes.is_empty());
        assert!(change.grant_changes.is_empty());
        assert!(change.rename.is_none());
    }

    #[test]
    fn test_column_matching_is_case_insensitive() {
        let reference = create_test_table("t", vec![create_test_column("ID", "INT", false)]);
        let target = create_test_table("t", vec![create_test_column("id", "INT", false)]);

        assert!(compare_tables(&reference, &target, &settings(), IdentifierCase::Upper).is_none());
    }

    #[test]
    fn test_primary_key_added_and_removed() {
        let mut with_pk = create_test_table("t", vec![create_test_column("id", "INT", false)]);
        with_pk.primary_key = Some(PrimaryKeyDefinition::new(None, vec!["id".to_string()]));
        let without_pk = create_test_table("t", vec![create_test_column("id", "INT", false)]);

        let added = compare_tables(&with_pk, &without_pk, &settings(), IdentifierCase::Upper)
            .unwrap();
        assert!(matches!(
            added.primary_key_change,
            Some(PrimaryKeyChange::Added(_))
        ));

        let removed = compare_tables(&without_pk, &with_pk, &settings(), IdentifierCase::Upper)
            .unwrap();
        assert!(matches!(
            removed.primary_key_change,
            Some(PrimaryKeyChange::Removed(_))
        ));
    }

    #[test]
    fn test_primary_key_column_change_is_modified() {
        let mut reference = create_test_table(
            "t",
            vec![
                create_test_column("id", "INT", false),
                create_test_column("tenant_id", "INT", false),
            ],
        );
        reference.primary_key = Some(PrimaryKeyDefinition::new(
            None,
            vec!["id".to_string(), "tenant_id".to_string()],
        ));
        let mut target = reference.clone();
        target.primary_key = Some(PrimaryKeyDefinition::new(None, vec!["id".to_string()]));

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();
        assert!(matches!(
            change.primary_key_change,
            Some(PrimaryKeyChange::Modified { .. })
        ));
    }

    #[test]
    fn test_constraints_matched_by_name_report_expression_change() {
        let mut reference = create_test_table("t", vec![create_test_column("age", "INT", true)]);
        reference.constraints = vec![TableConstraint::new(Some("chk_age"), "age >= 0")];
        let mut target = reference.clone();
        target.constraints = vec![TableConstraint::new(Some("chk_age"), "age > 0")];

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();

        assert_eq!(change.constraint_changes.modified.len(), 1);
        let modified = &change.constraint_changes.modified[0];
        assert_eq!(modified.name, "chk_age");
        assert_eq!(modified.expression_change.old, "age > 0");
        assert_eq!(modified.expression_change.new, "age >= 0");
    }

    #[test]
    fn test_constraints_matched_by_expression_ignore_names() {
        let mut reference = create_test_table("t", vec![create_test_column("age", "INT", true)]);
        reference.constraints = vec![TableConstraint::new(Some("chk_age_v2"), "age > 0")];
        let mut target = reference.clone();
        target.constraints = vec![TableConstraint::new(Some("chk_age"), "age > 0")];

        let by_expression = CompareSettings::new().constraints_by_expression();
        assert!(compare_tables(&reference, &target, &by_expression, IdentifierCase::Upper)
            .is_none());
    }

    #[test]
    fn test_foreign_key_matched_by_definition_reports_rename() {
        let mut reference = create_test_table(
            "orders",
            vec![create_test_column("user_id", "INT", false)],
        );
        reference.foreign_keys = vec![ForeignKeyDefinition::new(
            "fk_orders_users",
            vec!["user_id".to_string()],
            "users",
            vec!["id".to_string()],
        )];
        let mut target = reference.clone();
        target.foreign_keys[0].name = "fk_old".to_string();

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();

        assert!(change.added_foreign_keys.is_empty());
        assert!(change.dropped_foreign_keys.is_empty());
        assert_eq!(change.renamed_foreign_keys.len(), 1);
        assert_eq!(change.renamed_foreign_keys[0].old, "fk_old");
        assert_eq!(change.renamed_foreign_keys[0].new, "fk_orders_users");
    }

    #[test]
    fn test_foreign_key_definition_change_is_drop_plus_add() {
        let mut reference = create_test_table(
            "orders",
            vec![create_test_column("user_id", "INT", false)],
        );
        reference.foreign_keys = vec![ForeignKeyDefinition::new(
            "fk_user",
            vec!["user_id".to_string()],
            "users",
            vec!["id".to_string()],
        )];
        let mut target = reference.clone();
        target.foreign_keys[0].delete_rule = sqldelta_core::FkRule::Cascade;

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();

        assert_eq!(change.added_foreign_keys.len(), 1);
        assert_eq!(change.dropped_foreign_keys, vec!["fk_user".to_string()]);
    }

    #[test]
    fn test_tablespace_and_options() {
        let mut reference = create_test_table("t", vec![create_test_column("id", "INT", false)]);
        reference.tablespace = Some("fast_disk".to_string());
        reference.options = vec![sqldelta_core::TableOption::new("ENGINE", Some("InnoDB"))];
        let mut target = create_test_table("t", vec![create_test_column("id", "INT", false)]);
        target.options = vec![sqldelta_core::TableOption::new("ENGINE", Some("MyISAM"))];

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();

        let tablespace = change.tablespace_change.unwrap();
        assert_eq!(tablespace.old, None);
        assert_eq!(tablespace.new, Some("fast_disk".to_string()));
        assert_eq!(change.added_options.len(), 1);
        assert_eq!(change.removed_options.len(), 1);
    }

    #[test]
    fn test_quoted_name_difference_is_a_rename() {
        let mut reference = create_test_table("x", vec![create_test_column("id", "INT", false)]);
        reference.identifier.name = ObjectName::quoted("Users");
        let mut target = create_test_table("x", vec![create_test_column("id", "INT", false)]);
        target.identifier.name = ObjectName::new("USERS");

        let change = compare_tables(&reference, &target, &settings(), IdentifierCase::Upper)
            .unwrap();

        let rename = change.rename.unwrap();
        assert_eq!(rename.old, "USERS");
        assert_eq!(rename.new, "Users");
    }

    #[test]
    fn test_disabled_facets_are_not_compared() {
        let mut reference = create_test_table("t", vec![create_test_column("id", "INT", false)]);
        reference.indexes = vec![create_test_index("idx_id", vec!["id"], false)];
        reference.grants = vec![GrantDefinition::new("app", "SELECT")];
        let target = create_test_table("t", vec![create_test_column("id", "INT", false)]);

        let stripped = CompareSettings::new()
            .without_indexes()
            .without_grants()
            .without_triggers();
        assert!(compare_tables(&reference, &target, &stripped, IdentifierCase::Upper).is_none());
    }
}

#[cfg(test)]
mod symmetry_tests {
    use super::*;

    #[test]
    fn test_swapping_inputs_turns_adds_into_drops() {
        let reference = vec![create_test_index("idx_email", vec!["email"], true)];
        let target = Vec::new();

        let forward = compare_index_lists(&reference, &target);
        assert_eq!(forward.added.len(), 1);
        assert!(forward.dropped.is_empty());

        let backward = compare_index_lists(&target, &reference);
        assert!(backward.added.is_empty());
        assert_eq!(backward.dropped, vec!["idx_email".to_string()]);
    }

    #[test]
    fn test_swapping_inputs_swaps_old_new_pairs() {
        let reference = create_test_column("n", "BIGINT", true);
        let target = create_test_column("n", "INT", true);
        let settings = CompareSettings::default();

        let forward = compare_column(&reference, &target, &settings, false)
            .unwrap()
            .type_change
            .unwrap();
        let backward = compare_column(&target, &reference, &settings, false)
            .unwrap()
            .type_change
            .unwrap();

        assert_eq!(forward.old, backward.new);
        assert_eq!(forward.new, backward.old);
    }

    #[test]
    fn test_swapping_grant_inputs_swaps_add_and_revoke() {
        let reference = vec![GrantDefinition::new("A", "SELECT")];
        let target = vec![
            GrantDefinition::new("A", "SELECT"),
            GrantDefinition::new("B", "SELECT"),
        ];

        let forward = compare_grants(&reference, &target);
        let backward = compare_grants(&target, &reference);

        assert_eq!(forward.revoked, backward.added);
        assert_eq!(forward.added, backward.revoked);
    }
}

#[cfg(test)]
mod object_comparison_tests {
    use super::*;

    #[test]
    fn test_view_against_itself_is_empty() {
        let view = create_test_view("v_users", "SELECT * FROM users");
        let settings = CompareSettings::default();
        assert!(compare_views(&view, &view, &settings).is_none());
    }

    #[test]
    fn test_view_source_change_carries_reference_definition() {
        let reference = create_test_view("v_users", "SELECT id, name FROM users");
        let target = create_test_view("v_users", "SELECT * FROM users");
        let settings = CompareSettings::default();

        let change = compare_views(&reference, &target, &settings).unwrap();
        let definition = change.definition.unwrap();
        assert_eq!(
            definition.source.as_deref(),
            Some("SELECT id, name FROM users")
        );
    }

    #[test]
    fn test_sequence_against_itself_is_empty() {
        let seq = create_test_sequence("user_id_seq", 1);
        assert!(compare_sequences(&seq, &seq).is_none());
    }

    #[test]
    fn test_sequence_reports_only_changed_properties() {
        let reference = create_test_sequence("user_id_seq", 10);
        let target = create_test_sequence("user_id_seq", 1);

        let change = compare_sequences(&reference, &target).unwrap();

        assert_eq!(change.changed.len(), 1);
        assert_eq!(change.changed[0].property, SequenceProperty::Increment);
        assert_eq!(change.changed[0].old, "1");
        assert_eq!(change.changed[0].new, "10");
    }

    #[test]
    fn test_sequence_cycle_and_cache_changes() {
        let mut reference = create_test_sequence("s", 1);
        reference.cycle = true;
        reference.cache = Some(20);
        let target = create_test_sequence("s", 1);

        let change = compare_sequences(&reference, &target).unwrap();
        let properties: Vec<SequenceProperty> =
            change.changed.iter().map(|c| c.property).collect();
        assert_eq!(
            properties,
            vec![SequenceProperty::Cycle, SequenceProperty::Cache]
        );
    }
}

#[cfg(test)]
mod comparator_tests {
    use super::*;
    use sqldelta_core::TypeDefinition;

    fn comparator() -> SchemaComparator {
        SchemaComparator::new()
    }

    #[test]
    fn test_table_absent_in_target_becomes_one_add_table() {
        let orders = create_test_table(
            "ORDERS",
            vec![
                create_test_column("id", "INT", false),
                create_test_column("total", "NUMERIC(10,2)", false),
            ],
        );
        let reference = create_snapshot(vec![orders.clone()]);
        let target = create_snapshot(vec![]);

        let comparison = comparator().compare(&reference, &target).unwrap();

        assert_eq!(comparison.diff.tables.len(), 1);
        match &comparison.diff.tables[0] {
            TableEntry::Added(def) => {
                assert_eq!(def.name().as_str(), "ORDERS");
                assert_eq!(def.columns.len(), 2);
            }
            other => panic!("expected add-table, got {:?}", other),
        }
        assert!(comparison.diff.dropped_tables.is_empty());
        assert_eq!(comparison.status, CompareStatus::Complete);
    }

    #[test]
    fn test_identical_schemas_yield_empty_diff() {
        let tables = vec![create_test_table(
            "users",
            vec![create_test_column("id", "INT", false)],
        )];
        let reference = create_snapshot(tables.clone());
        let target = create_snapshot(tables);

        let comparison = comparator().compare(&reference, &target).unwrap();
        assert!(comparison.diff.is_empty());
    }

    #[test]
    fn test_case_folded_names_match_across_sides() {
        let reference = create_snapshot(vec![create_test_table(
            "USERS",
            vec![create_test_column("id", "INT", false)],
        )]);
        let target = create_snapshot(vec![create_test_table(
            "users",
            vec![create_test_column("id", "INT", false)],
        )]);

        let comparison = comparator().compare(&reference, &target).unwrap();
        assert!(comparison.diff.is_empty());
    }

    #[test]
    fn test_unmatched_target_table_is_dropped() {
        let reference = create_snapshot(vec![]);
        let target = create_snapshot(vec![create_test_table(
            "legacy",
            vec![create_test_column("id", "INT", false)],
        )]);

        let comparison = comparator().compare(&reference, &target).unwrap();

        assert_eq!(comparison.diff.dropped_tables.len(), 1);
        assert_eq!(
            comparison.diff.dropped_tables[0].name.as_str(),
            "legacy"
        );
    }

    #[test]
    fn test_exclusion_glob_applies_to_both_sides() {
        let reference = create_snapshot(vec![
            create_test_table("TMP_LOAD", vec![create_test_column("id", "INT", false)]),
            create_test_table("users", vec![create_test_column("id", "INT", false)]),
        ]);
        let target = create_snapshot(vec![create_test_table(
            "TMP_STAGE",
            vec![create_test_column("id", "INT", false)],
        )]);

        let settings = CompareSettings::new().exclude_table("TMP%");
        let comparison = SchemaComparator::with_settings(settings)
            .compare(&reference, &target)
            .unwrap();

        // TMP_LOAD is not added, TMP_STAGE is not dropped; only users remains
        assert_eq!(comparison.diff.tables.len(), 1);
        assert!(matches!(&comparison.diff.tables[0], TableEntry::Added(def) if def.name().as_str() == "users"));
        assert!(comparison.diff.dropped_tables.is_empty());
    }

    #[test]
    fn test_exclusion_exact_name() {
        let reference = create_snapshot(vec![create_test_table(
            "flyway_history",
            vec![create_test_column("id", "INT", false)],
        )]);
        let target = create_snapshot(vec![]);

        let settings = CompareSettings::new().exclude_table("flyway_history");
        let comparison = SchemaComparator::with_settings(settings)
            .compare(&reference, &target)
            .unwrap();

        assert!(comparison.diff.is_empty());
    }

    #[test]
    fn test_views_are_matched_and_dropped_separately() {
        let mut reference = create_snapshot(vec![]);
        reference.views = vec![create_test_view("v_new", "SELECT 1")];
        let mut target = create_snapshot(vec![]);
        target.views = vec![create_test_view("v_old", "SELECT 2")];

        let comparison = comparator().compare(&reference, &target).unwrap();

        assert_eq!(comparison.diff.views.len(), 1);
        assert!(matches!(&comparison.diff.views[0], ViewEntry::Created(v) if v.name().as_str() == "v_new"));
        assert_eq!(comparison.diff.dropped_views.len(), 1);
        assert_eq!(comparison.diff.dropped_views[0].name.as_str(), "v_old");
    }

    #[test]
    fn test_sequences_compared_and_dropped() {
        let mut reference = create_snapshot(vec![]);
        reference.sequences = vec![create_test_sequence("seq_a", 10)];
        let mut target = create_snapshot(vec![]);
        target.sequences = vec![
            create_test_sequence("seq_a", 1),
            create_test_sequence("seq_gone", 1),
        ];

        let comparison = comparator().compare(&reference, &target).unwrap();

        assert_eq!(comparison.diff.sequences.len(), 1);
        assert_eq!(
            comparison.diff.dropped_sequences,
            vec!["seq_gone".to_string()]
        );
    }

    #[test]
    fn test_procedures_matched_by_signature() {
        let mut overload_int = create_test_procedure("get_user", "BEGIN v1 END");
        overload_int.parameters = vec![sqldelta_core::ParameterDefinition::new(
            Some("id"),
            "INT",
        )];
        let mut overload_text = create_test_procedure("get_user", "BEGIN v2 END");
        overload_text.parameters = vec![sqldelta_core::ParameterDefinition::new(
            Some("name"),
            "VARCHAR",
        )];

        let mut reference = create_snapshot(vec![]);
        reference.procedures = vec![overload_int.clone(), overload_text.clone()];
        let mut target = create_snapshot(vec![]);
        // Only the INT overload exists in the target, with different source
        let mut target_proc = overload_int.clone();
        target_proc.source = Some("BEGIN old END".to_string());
        target.procedures = vec![target_proc];

        let comparison = comparator().compare(&reference, &target).unwrap();

        // INT overload updated, VARCHAR overload created
        assert_eq!(comparison.diff.procedures.len(), 2);
        assert!(comparison.diff.dropped_procedures.is_empty());
    }

    #[test]
    fn test_packages_compared_exactly_once() {
        let mut pkg = PackageDefinition::new(None, "billing");
        pkg.source = Some("PACKAGE billing AS ... END;".to_string());

        let mut reference = create_snapshot(vec![]);
        // Duplicate entries simulate a package discovered once per member
        // procedure
        reference.packages = vec![pkg.clone(), pkg.clone(), pkg.clone()];
        let target = create_snapshot(vec![]);

        let comparison = comparator().compare(&reference, &target).unwrap();

        assert_eq!(comparison.diff.packages.len(), 1);
    }

    #[test]
    fn test_packaged_procedures_are_not_compared_individually() {
        let mut packaged = create_test_procedure("charge", "BEGIN ... END");
        packaged.package = Some("billing".to_string());

        let mut reference = create_snapshot(vec![]);
        reference.procedures = vec![packaged];
        let target = create_snapshot(vec![]);

        let comparison = comparator().compare(&reference, &target).unwrap();
        assert!(comparison.diff.procedures.is_empty());
    }

    #[test]
    fn test_cancelled_run_reports_cancelled_status() {
        let reference = create_snapshot(vec![create_test_table(
            "users",
            vec![create_test_column("id", "INT", false)],
        )]);
        let target = create_snapshot(vec![]);

        let cancel = CancellationFlag::new();
        cancel.cancel();
        let comparison = comparator()
            .compare_with_cancel(&reference, &target, &cancel)
            .unwrap();

        assert_eq!(comparison.status, CompareStatus::Cancelled);
        assert!(comparison.diff.is_empty());
    }

    #[test]
    fn test_mismatched_pair_lists_error_immediately() {
        let reference = create_snapshot(vec![]);
        let target = create_snapshot(vec![]);

        let result = comparator().compare_pairs(
            &reference,
            &target,
            &["a".to_string(), "b".to_string()],
            &["a".to_string()],
            &CancellationFlag::new(),
        );

        assert!(matches!(
            result,
            Err(CompareError::MismatchedPairs {
                reference: 2,
                target: 1
            })
        ));
    }

    #[test]
    fn test_explicit_pairs_compare_differently_named_tables() {
        let reference = create_snapshot(vec![create_test_table(
            "users_v2",
            vec![
                create_test_column("id", "INT", false),
                create_test_column("email", "VARCHAR(100)", true),
            ],
        )]);
        let target = create_snapshot(vec![create_test_table(
            "users",
            vec![create_test_column("id", "INT", false)],
        )]);

        let comparison = comparator()
            .compare_pairs(
                &reference,
                &target,
                &["users_v2".to_string()],
                &["users".to_string()],
                &CancellationFlag::new(),
            )
            .unwrap();

        assert_eq!(comparison.diff.tables.len(), 1);
        match &comparison.diff.tables[0] {
            TableEntry::Modified(change) => {
                assert_eq!(change.added_columns.len(), 1);
                assert!(change.rename.is_some());
            }
            other => panic!("expected modify-table, got {:?}", other),
        }
    }

    /// Source whose table detail retrieval always fails for one table
    struct FailingSource {
        inner: SchemaSnapshot,
        fail_on: String,
    }

    impl SchemaSource for FailingSource {
        fn connection(&self) -> &ConnectionInfo {
            self.inner.connection()
        }

        fn list_tables(&self) -> Vec<TableHandle> {
            self.inner.list_tables()
        }

        fn get_table(&self, handle: &TableHandle) -> CoreResult<TableDefinition> {
            if handle
                .identifier
                .name
                .as_str()
                .eq_ignore_ascii_case(&self.fail_on)
            {
                Err(SqlDeltaError::Retrieval(format!(
                    "cannot read columns of {}",
                    handle.identifier
                )))
            } else {
                self.inner.get_table(handle)
            }
        }

        fn list_views(&self) -> Vec<TableHandle> {
            self.inner.list_views()
        }

        fn get_view(&self, handle: &TableHandle) -> CoreResult<ViewDefinition> {
            self.inner.get_view(handle)
        }

        fn sequences(&self) -> Vec<SequenceDefinition> {
            self.inner.sequences()
        }

        fn procedures(&self) -> Vec<ProcedureDefinition> {
            self.inner.procedures()
        }

        fn packages(&self) -> Vec<PackageDefinition> {
            self.inner.packages()
        }

        fn extra_types(&self) -> Vec<TypeDefinition> {
            self.inner.extra_types()
        }
    }

    #[test]
    fn test_retrieval_failure_skips_object_and_continues() {
        let reference = FailingSource {
            inner: create_snapshot(vec![
                create_test_table("broken", vec![create_test_column("id", "INT", false)]),
                create_test_table("users", vec![create_test_column("id", "INT", false)]),
            ]),
            fail_on: "broken".to_string(),
        };
        let target = create_snapshot(vec![]);

        let comparison = comparator().compare(&reference, &target).unwrap();

        // "broken" is skipped, "users" still produces its add-table fragment
        assert_eq!(comparison.diff.tables.len(), 1);
        assert!(matches!(&comparison.diff.tables[0], TableEntry::Added(def) if def.name().as_str() == "users"));
        assert_eq!(comparison.status, CompareStatus::Complete);
    }
}

#[cfg(test)]
mod matching_tests {
    use super::*;

    fn handle(schema: Option<&str>, name: &str) -> TableHandle {
        let identifier = match schema {
            Some(s) => TableIdentifier::with_schema(s, name),
            None => TableIdentifier::new(name),
        };
        TableHandle::table(identifier)
    }

    #[test]
    fn test_same_schema_match_wins_over_any_schema() {
        let reference = vec![handle(Some("app"), "users")];
        let target = vec![handle(Some("other"), "users"), handle(Some("app"), "users")];

        let pairs = match_inventories(&reference, &target, IdentifierCase::Upper);

        let matched = pairs.iter().find(|p| p.is_matched()).unwrap();
        assert_eq!(
            matched.target().unwrap().identifier.schema.as_deref(),
            Some("app")
        );
    }

    #[test]
    fn test_any_schema_fallback() {
        let reference = vec![handle(Some("app"), "users")];
        let target = vec![handle(Some("legacy"), "users")];

        let pairs = match_inventories(&reference, &target, IdentifierCase::Upper);
        assert!(pairs[0].is_matched());
    }

    #[test]
    fn test_adjusted_case_fallback_matches_mixed_quoting() {
        let mut quoted = handle(None, "x");
        quoted.identifier.name = ObjectName::quoted("ORDERS");
        let unquoted = handle(None, "orders");

        let pairs = match_inventories(&[quoted], &[unquoted], IdentifierCase::Upper);
        assert!(pairs[0].is_matched());
    }

    #[test]
    fn test_each_target_claimed_once() {
        let reference = vec![handle(None, "users"), handle(None, "USERS")];
        let target = vec![handle(None, "users")];

        let pairs = match_inventories(&reference, &target, IdentifierCase::Upper);

        let matched = pairs.iter().filter(|p| p.is_matched()).count();
        let reference_only = pairs.iter().filter(|p| p.is_reference_only()).count();
        assert_eq!(matched, 1);
        assert_eq!(reference_only, 1);
    }

    #[test]
    fn test_unmatched_views_partition_into_dropped_views() {
        let reference = create_snapshot(vec![]);
        let mut target = create_snapshot(vec![]);
        target.tables = vec![create_test_table(
            "t_old",
            vec![create_test_column("id", "INT", false)],
        )];
        target.views = vec![create_test_view("v_old", "SELECT 1")];

        let settings = CompareSettings::new().with_views_as_tables();
        let comparison = SchemaComparator::with_settings(settings)
            .compare(&reference, &target)
            .unwrap();

        assert_eq!(comparison.diff.dropped_tables.len(), 1);
        assert_eq!(comparison.diff.dropped_views.len(), 1);
    }
}
