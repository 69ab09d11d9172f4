//! XML report writer
//!
//! One `schema-diff` document per comparison run: connection metadata, a
//! settings echo, then the change fragments in fixed order (tables, dropped
//! tables, views, sequences, procedures, packages, custom types). Every
//! nesting level indents by two spaces; downstream tooling relies on the
//! exact layout, so the writer is byte-deterministic for fixed input.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io;
use thiserror::Error;

use sqldelta_core::{
    ColumnDefinition, ConnectionInfo, ForeignKeyDefinition, GrantDefinition, IndexDefinition,
    PackageDefinition, PrimaryKeyDefinition, ProcedureDefinition, SequenceDefinition,
    TableConstraint, TableDefinition, TableOption, TriggerDefinition, TypeDefinition, TypeKind,
    ViewDefinition,
};

use crate::compare::{
    ColumnChange, ColumnFkChange, CompareSettings, DefaultChange, GrantListChange, IndexChange,
    IndexListChange, PackageEntry, ProcedureEntry, SchemaComparison, SequenceEntry, TableChange,
    TableEntry, TriggerListChange, TypeEntry, ViewEntry,
};
use crate::compare::{ConstraintListChange, PrimaryKeyChange, SequenceChange, ViewChange};

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid UTF-8 in generated report: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

type XmlWriter = Writer<Vec<u8>>;

/// Serializes a `SchemaComparison` into the XML diff document
#[derive(Debug, Default)]
pub struct XmlReportWriter;

impl XmlReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the complete document and returns it as a string
    pub fn write(&self, comparison: &SchemaComparison) -> ReportResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        start(&mut writer, "schema-diff")?;

        write_connection(&mut writer, "reference-connection", &comparison.reference)?;
        write_connection(&mut writer, "target-connection", &comparison.target)?;
        write_settings(&mut writer, &comparison.settings)?;

        let diff = &comparison.diff;

        for entry in &diff.tables {
            match entry {
                TableEntry::Added(def) => write_add_table(&mut writer, def)?,
                TableEntry::Modified(change) => write_modify_table(&mut writer, change)?,
            }
        }
        let dropped_tables: Vec<String> = diff
            .dropped_tables
            .iter()
            .map(|t| t.qualified_name())
            .collect();
        write_name_list(&mut writer, "drop-tables", "table-name", &dropped_tables)?;

        for entry in &diff.views {
            match entry {
                ViewEntry::Created(def) => {
                    start_named(&mut writer, "create-view", def.name().as_str())?;
                    write_view_def(&mut writer, def)?;
                    end(&mut writer, "create-view")?;
                }
                ViewEntry::Updated(change) => write_update_view(&mut writer, change)?,
            }
        }
        let dropped_views: Vec<String> = diff
            .dropped_views
            .iter()
            .map(|v| v.qualified_name())
            .collect();
        write_name_list(&mut writer, "drop-views", "view-name", &dropped_views)?;

        for entry in &diff.sequences {
            match entry {
                SequenceEntry::Created(def) => {
                    start_named(&mut writer, "create-sequence", &def.name)?;
                    write_sequence_def(&mut writer, def)?;
                    end(&mut writer, "create-sequence")?;
                }
                SequenceEntry::Updated(change) => write_update_sequence(&mut writer, change)?,
            }
        }
        write_name_list(
            &mut writer,
            "drop-sequences",
            "sequence-name",
            &diff.dropped_sequences,
        )?;

        for entry in &diff.procedures {
            match entry {
                ProcedureEntry::Created(def) => write_proc(&mut writer, "create-proc", def)?,
                ProcedureEntry::Updated(def) => write_proc(&mut writer, "update-proc", def)?,
            }
        }
        write_name_list(
            &mut writer,
            "drop-procedures",
            "procedure-name",
            &diff.dropped_procedures,
        )?;

        for entry in &diff.packages {
            match entry {
                PackageEntry::Created(def) => write_package(&mut writer, "create-package", def)?,
                PackageEntry::Updated(def) => write_package(&mut writer, "update-package", def)?,
            }
        }
        write_name_list(
            &mut writer,
            "drop-packages",
            "package-name",
            &diff.dropped_packages,
        )?;

        for entry in &diff.types {
            match entry {
                TypeEntry::Created(def) => write_type(&mut writer, "create-type", def)?,
                TypeEntry::Updated(def) => write_type(&mut writer, "update-type", def)?,
            }
        }
        write_name_list(&mut writer, "drop-types", "type-name", &diff.dropped_types)?;

        end(&mut writer, "schema-diff")?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Convenience wrapper around `XmlReportWriter::write`
pub fn write_xml(comparison: &SchemaComparison) -> ReportResult<String> {
    XmlReportWriter::new().write(comparison)
}

fn start(w: &mut XmlWriter, tag: &str) -> io::Result<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))
}

fn start_named(w: &mut XmlWriter, tag: &str, name: &str) -> io::Result<()> {
    start_with(w, tag, &[("name", name)])
}

fn start_with(w: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
    let mut element = BytesStart::new(tag);
    for attr in attrs {
        element.push_attribute(*attr);
    }
    w.write_event(Event::Start(element))
}

fn end(w: &mut XmlWriter, tag: &str) -> io::Result<()> {
    w.write_event(Event::End(BytesEnd::new(tag)))
}

fn empty_with(w: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
    let mut element = BytesStart::new(tag);
    for attr in attrs {
        element.push_attribute(*attr);
    }
    w.write_event(Event::Empty(element))
}

fn text_element(w: &mut XmlWriter, tag: &str, text: &str) -> io::Result<()> {
    start(w, tag)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, tag)
}

fn opt_text_element(w: &mut XmlWriter, tag: &str, text: Option<&str>) -> io::Result<()> {
    if let Some(text) = text {
        text_element(w, tag, text)?;
    }
    Ok(())
}

fn bool_element(w: &mut XmlWriter, tag: &str, value: bool) -> io::Result<()> {
    text_element(w, tag, bool_str(value))
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Renders an old/new pair as an empty element with `old`/`new` attributes
fn change_element(w: &mut XmlWriter, tag: &str, old: &str, new: &str) -> io::Result<()> {
    empty_with(w, tag, &[("old", old), ("new", new)])
}

fn opt_str(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn write_name_list(
    w: &mut XmlWriter,
    block_tag: &str,
    item_tag: &str,
    names: &[String],
) -> io::Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    start(w, block_tag)?;
    for name in names {
        text_element(w, item_tag, name)?;
    }
    end(w, block_tag)
}

fn write_connection(w: &mut XmlWriter, tag: &str, info: &ConnectionInfo) -> io::Result<()> {
    start(w, tag)?;
    text_element(w, "url", &info.url)?;
    opt_text_element(w, "username", info.username.as_deref())?;
    opt_text_element(w, "database-product", info.database_product.as_deref())?;
    opt_text_element(w, "schema", info.schema.as_deref())?;
    opt_text_element(w, "catalog", info.catalog.as_deref())?;
    if let Some(captured) = &info.captured_at {
        text_element(w, "captured-at", &captured.to_rfc3339())?;
    }
    end(w, tag)
}

fn write_settings(w: &mut XmlWriter, settings: &CompareSettings) -> io::Result<()> {
    start(w, "compare-settings")?;
    bool_element(w, "include-indexes", settings.include_indexes)?;
    bool_element(w, "include-foreign-keys", settings.include_foreign_keys)?;
    bool_element(w, "include-primary-keys", settings.include_primary_keys)?;
    bool_element(w, "include-constraints", settings.include_constraints)?;
    bool_element(w, "include-grants", settings.include_grants)?;
    bool_element(w, "include-triggers", settings.include_triggers)?;
    bool_element(w, "include-views", settings.include_views)?;
    bool_element(w, "include-procedures", settings.include_procedures)?;
    bool_element(w, "include-sequences", settings.include_sequences)?;
    bool_element(w, "compare-jdbc-types", settings.compare_jdbc_types)?;
    bool_element(w, "constraints-by-name", settings.constraints_by_name)?;
    bool_element(w, "views-as-tables", settings.views_as_tables)?;
    if !settings.exclude_tables.is_empty() {
        start(w, "exclude-tables")?;
        for pattern in &settings.exclude_tables {
            text_element(w, "table-name", pattern)?;
        }
        end(w, "exclude-tables")?;
    }
    end(w, "compare-settings")
}

fn write_add_table(w: &mut XmlWriter, def: &TableDefinition) -> io::Result<()> {
    start_named(w, "add-table", def.name().as_str())?;
    write_table_def(w, def)?;
    end(w, "add-table")
}

fn write_table_def(w: &mut XmlWriter, def: &TableDefinition) -> io::Result<()> {
    start(w, "table-def")?;
    text_element(w, "table-name", def.name().as_str())?;
    opt_text_element(w, "table-schema", def.identifier.schema.as_deref())?;
    opt_text_element(w, "table-catalog", def.identifier.catalog.as_deref())?;
    text_element(w, "table-type", &def.table_type)?;
    opt_text_element(w, "tablespace", def.tablespace.as_deref())?;
    opt_text_element(w, "table-comment", def.comment.as_deref())?;
    for option in &def.options {
        write_option(w, option)?;
    }
    for column in &def.columns {
        write_column_def(w, column)?;
    }
    if let Some(pk) = &def.primary_key {
        write_primary_key(w, "primary-key", pk)?;
    }
    for fk in &def.foreign_keys {
        write_foreign_key_def(w, fk)?;
    }
    for index in &def.indexes {
        write_index_def(w, index)?;
    }
    for constraint in &def.constraints {
        write_constraint_def(w, constraint)?;
    }
    for trigger in &def.triggers {
        write_trigger_def(w, trigger)?;
    }
    for grant in &def.grants {
        write_grant(w, grant)?;
    }
    end(w, "table-def")
}

fn write_option(w: &mut XmlWriter, option: &TableOption) -> io::Result<()> {
    match &option.value {
        Some(value) => {
            start_named(w, "option", &option.name)?;
            w.write_event(Event::Text(BytesText::new(value)))?;
            end(w, "option")
        }
        None => empty_with(w, "option", &[("name", &option.name)]),
    }
}

fn write_column_def(w: &mut XmlWriter, column: &ColumnDefinition) -> io::Result<()> {
    start_named(w, "column-def", &column.name)?;
    text_element(w, "dbms-type", &column.dbms_type)?;
    if let Some(size) = column.size {
        text_element(w, "size", &size.to_string())?;
    }
    if let Some(digits) = column.digits {
        text_element(w, "digits", &digits.to_string())?;
    }
    bool_element(w, "nullable", column.nullable)?;
    opt_text_element(w, "default-value", column.default_value.as_deref())?;
    opt_text_element(w, "comment", column.comment.as_deref())?;
    opt_text_element(w, "expression", column.expression.as_deref())?;
    opt_text_element(w, "collation", column.collation.as_deref())?;
    if column.is_primary_key {
        bool_element(w, "primary-key", true)?;
    }
    if let Some(fk) = &column.foreign_key {
        empty_with(
            w,
            "references",
            &[
                ("constraint-name", &fk.constraint_name),
                ("table", &fk.table),
                ("column", &fk.column),
            ],
        )?;
    }
    end(w, "column-def")
}

fn write_primary_key(w: &mut XmlWriter, tag: &str, pk: &PrimaryKeyDefinition) -> io::Result<()> {
    start(w, tag)?;
    opt_text_element(w, "constraint-name", pk.name.as_deref())?;
    for column in &pk.columns {
        text_element(w, "column-name", column)?;
    }
    end(w, tag)
}

fn write_foreign_key_def(w: &mut XmlWriter, fk: &ForeignKeyDefinition) -> io::Result<()> {
    start_named(w, "foreign-key-def", &fk.name)?;
    for column in &fk.columns {
        text_element(w, "source-column", column)?;
    }
    opt_text_element(w, "referenced-schema", fk.referenced_schema.as_deref())?;
    text_element(w, "referenced-table", &fk.referenced_table)?;
    for column in &fk.referenced_columns {
        text_element(w, "referenced-column", column)?;
    }
    text_element(w, "update-rule", fk.update_rule.as_str())?;
    text_element(w, "delete-rule", fk.delete_rule.as_str())?;
    bool_element(w, "enabled", fk.enabled)?;
    bool_element(w, "validated", fk.validated)?;
    end(w, "foreign-key-def")
}

fn write_index_def(w: &mut XmlWriter, index: &IndexDefinition) -> io::Result<()> {
    start_named(w, "index-def", &index.name)?;
    bool_element(w, "unique", index.unique)?;
    bool_element(w, "primary-key", index.primary_key)?;
    text_element(w, "type", &index.index_type)?;
    opt_text_element(w, "filter", index.filter.as_deref())?;
    for column in &index.columns {
        match &column.direction {
            Some(direction) => empty_with(
                w,
                "column",
                &[("name", &column.name), ("direction", direction)],
            )?,
            None => empty_with(w, "column", &[("name", &column.name)])?,
        }
    }
    end(w, "index-def")
}

fn write_constraint_def(w: &mut XmlWriter, constraint: &TableConstraint) -> io::Result<()> {
    match &constraint.name {
        Some(name) => {
            start_named(w, "constraint-def", name)?;
        }
        None => start(w, "constraint-def")?,
    }
    w.write_event(Event::Text(BytesText::new(&constraint.expression)))?;
    end(w, "constraint-def")
}

fn write_trigger_def(w: &mut XmlWriter, trigger: &TriggerDefinition) -> io::Result<()> {
    start_named(w, "trigger-def", &trigger.name)?;
    text_element(w, "timing", trigger.timing.as_str())?;
    for event in &trigger.events {
        text_element(w, "event", event.as_str())?;
    }
    opt_text_element(w, "source", trigger.source.as_deref())?;
    opt_text_element(w, "comment", trigger.comment.as_deref())?;
    end(w, "trigger-def")
}

fn write_grant(w: &mut XmlWriter, grant: &GrantDefinition) -> io::Result<()> {
    empty_with(
        w,
        "grant",
        &[
            ("grantee", &grant.grantee),
            ("privilege", &grant.privilege),
            ("grantable", bool_str(grant.grantable)),
        ],
    )
}

fn write_modify_table(w: &mut XmlWriter, change: &TableChange) -> io::Result<()> {
    start_named(w, "modify-table", change.table.name.as_str())?;

    if let Some(rename) = &change.rename {
        change_element(w, "rename", &rename.old, &rename.new)?;
    }

    for column in &change.added_columns {
        start(w, "add-column")?;
        write_column_def(w, column)?;
        end(w, "add-column")?;
    }
    for name in &change.removed_columns {
        empty_with(w, "remove-column", &[("name", name)])?;
    }
    for column_change in &change.modified_columns {
        write_modify_column(w, column_change)?;
    }

    if let Some(pk_change) = &change.primary_key_change {
        write_primary_key_change(w, pk_change)?;
    }

    write_constraint_changes(w, &change.constraint_changes)?;

    if !change.added_foreign_keys.is_empty() {
        start(w, "add-foreign-keys")?;
        for fk in &change.added_foreign_keys {
            write_foreign_key_def(w, fk)?;
        }
        end(w, "add-foreign-keys")?;
    }
    if !change.dropped_foreign_keys.is_empty() {
        start(w, "drop-foreign-keys")?;
        for name in &change.dropped_foreign_keys {
            text_element(w, "constraint-name", name)?;
        }
        end(w, "drop-foreign-keys")?;
    }
    if !change.renamed_foreign_keys.is_empty() {
        start(w, "rename-foreign-keys")?;
        for rename in &change.renamed_foreign_keys {
            change_element(w, "rename", &rename.old, &rename.new)?;
        }
        end(w, "rename-foreign-keys")?;
    }

    if let Some(type_change) = &change.type_change {
        change_element(w, "table-type-change", &type_change.old, &type_change.new)?;
    }
    if let Some(tablespace) = &change.tablespace_change {
        change_element(
            w,
            "tablespace-change",
            opt_str(&tablespace.old),
            opt_str(&tablespace.new),
        )?;
    }

    if !change.added_options.is_empty() {
        start(w, "add-options")?;
        for option in &change.added_options {
            write_option(w, option)?;
        }
        end(w, "add-options")?;
    }
    if !change.removed_options.is_empty() {
        start(w, "remove-options")?;
        for option in &change.removed_options {
            write_option(w, option)?;
        }
        end(w, "remove-options")?;
    }

    write_index_changes(w, &change.index_changes)?;
    write_trigger_changes(w, &change.trigger_changes)?;
    write_grant_changes(w, &change.grant_changes)?;

    end(w, "modify-table")
}

fn write_modify_column(w: &mut XmlWriter, change: &ColumnChange) -> io::Result<()> {
    start_named(w, "modify-column", &change.column_name)?;

    if let Some(type_change) = &change.type_change {
        change_element(w, "type-change", &type_change.old, &type_change.new)?;
    }
    if let Some(nullable) = &change.nullable_change {
        change_element(
            w,
            "nullable-change",
            bool_str(nullable.old),
            bool_str(nullable.new),
        )?;
    }
    match &change.default_change {
        Some(DefaultChange::Removed { old }) => {
            empty_with(w, "remove-default", &[("old", old)])?;
        }
        Some(DefaultChange::Changed { old, new }) => {
            change_element(w, "default-change", opt_str(old), new)?;
        }
        None => {}
    }
    if let Some(comment) = &change.comment_change {
        change_element(
            w,
            "comment-change",
            opt_str(&comment.old),
            opt_str(&comment.new),
        )?;
    }
    if let Some(expression) = &change.expression_change {
        change_element(
            w,
            "expression-change",
            opt_str(&expression.old),
            opt_str(&expression.new),
        )?;
    }
    if let Some(collation) = &change.collation_change {
        change_element(
            w,
            "collation-change",
            opt_str(&collation.old),
            opt_str(&collation.new),
        )?;
    }
    match &change.foreign_key_change {
        Some(ColumnFkChange::Added(fk)) => {
            empty_with(
                w,
                "add-foreign-key",
                &[
                    ("constraint-name", &fk.constraint_name),
                    ("table", &fk.table),
                    ("column", &fk.column),
                ],
            )?;
        }
        Some(ColumnFkChange::Dropped(fk)) => {
            empty_with(w, "drop-foreign-key", &[("constraint-name", &fk.constraint_name)])?;
        }
        Some(ColumnFkChange::Renamed(rename)) => {
            change_element(w, "rename-foreign-key", &rename.old, &rename.new)?;
        }
        Some(ColumnFkChange::Replaced { old, new }) => {
            empty_with(w, "drop-foreign-key", &[("constraint-name", &old.constraint_name)])?;
            empty_with(
                w,
                "add-foreign-key",
                &[
                    ("constraint-name", &new.constraint_name),
                    ("table", &new.table),
                    ("column", &new.column),
                ],
            )?;
        }
        None => {}
    }

    end(w, "modify-column")
}

fn write_primary_key_change(w: &mut XmlWriter, change: &PrimaryKeyChange) -> io::Result<()> {
    match change {
        PrimaryKeyChange::Added(pk) => write_primary_key(w, "add-primary-key", pk),
        PrimaryKeyChange::Removed(pk) => write_primary_key(w, "remove-primary-key", pk),
        PrimaryKeyChange::Modified { old, new } => {
            start(w, "modify-primary-key")?;
            write_primary_key(w, "old-primary-key", old)?;
            write_primary_key(w, "new-primary-key", new)?;
            end(w, "modify-primary-key")
        }
    }
}

fn write_constraint_changes(w: &mut XmlWriter, change: &ConstraintListChange) -> io::Result<()> {
    if !change.added.is_empty() {
        start(w, "add-constraints")?;
        for constraint in &change.added {
            write_constraint_def(w, constraint)?;
        }
        end(w, "add-constraints")?;
    }
    if !change.dropped.is_empty() {
        start(w, "drop-constraints")?;
        for constraint in &change.dropped {
            write_constraint_def(w, constraint)?;
        }
        end(w, "drop-constraints")?;
    }
    if !change.modified.is_empty() {
        start(w, "modify-constraints")?;
        for modified in &change.modified {
            empty_with(
                w,
                "constraint",
                &[
                    ("name", &modified.name),
                    ("old", &modified.expression_change.old),
                    ("new", &modified.expression_change.new),
                ],
            )?;
        }
        end(w, "modify-constraints")?;
    }
    Ok(())
}

fn write_index_changes(w: &mut XmlWriter, change: &IndexListChange) -> io::Result<()> {
    for index in &change.added {
        start(w, "add-index")?;
        write_index_def(w, index)?;
        end(w, "add-index")?;
    }
    for name in &change.dropped {
        empty_with(w, "drop-index", &[("name", name)])?;
    }
    for modified in &change.modified {
        write_modify_index(w, modified)?;
    }
    Ok(())
}

fn write_modify_index(w: &mut XmlWriter, change: &IndexChange) -> io::Result<()> {
    start_named(w, "modify-index", &change.index_name)?;
    if let Some(name) = &change.name_change {
        change_element(w, "name-change", &name.old, &name.new)?;
    }
    if let Some(unique) = &change.unique_change {
        change_element(w, "unique-change", bool_str(unique.old), bool_str(unique.new))?;
    }
    if let Some(primary) = &change.primary_change {
        change_element(
            w,
            "primary-change",
            bool_str(primary.old),
            bool_str(primary.new),
        )?;
    }
    if let Some(index_type) = &change.type_change {
        change_element(w, "type-change", &index_type.old, &index_type.new)?;
    }
    if let Some(filter) = &change.filter_change {
        change_element(
            w,
            "filter-change",
            opt_str(&filter.old),
            opt_str(&filter.new),
        )?;
    }
    end(w, "modify-index")
}

fn write_trigger_changes(w: &mut XmlWriter, change: &TriggerListChange) -> io::Result<()> {
    for trigger in &change.create {
        start(w, "create-trigger")?;
        write_trigger_def(w, trigger)?;
        end(w, "create-trigger")?;
    }
    for trigger in &change.update {
        start(w, "update-trigger")?;
        write_trigger_def(w, trigger)?;
        end(w, "update-trigger")?;
    }
    for name in &change.drop {
        empty_with(w, "drop-trigger", &[("name", name)])?;
    }
    Ok(())
}

fn write_grant_changes(w: &mut XmlWriter, change: &GrantListChange) -> io::Result<()> {
    if !change.added.is_empty() {
        start(w, "add-grants")?;
        for grant in &change.added {
            write_grant(w, grant)?;
        }
        end(w, "add-grants")?;
    }
    if !change.revoked.is_empty() {
        start(w, "revoke-grants")?;
        for grant in &change.revoked {
            write_grant(w, grant)?;
        }
        end(w, "revoke-grants")?;
    }
    Ok(())
}

fn write_view_def(w: &mut XmlWriter, view: &ViewDefinition) -> io::Result<()> {
    start(w, "view-def")?;
    text_element(w, "view-name", view.name().as_str())?;
    opt_text_element(w, "view-schema", view.identifier.schema.as_deref())?;
    bool_element(w, "materialized", view.materialized)?;
    opt_text_element(w, "view-source", view.source.as_deref())?;
    opt_text_element(w, "comment", view.comment.as_deref())?;
    for column in &view.columns {
        write_column_def(w, column)?;
    }
    for index in &view.indexes {
        write_index_def(w, index)?;
    }
    for grant in &view.grants {
        write_grant(w, grant)?;
    }
    end(w, "view-def")
}

fn write_update_view(w: &mut XmlWriter, change: &ViewChange) -> io::Result<()> {
    start_named(w, "update-view", change.view.name.as_str())?;
    if let Some(def) = &change.definition {
        write_view_def(w, def)?;
    }
    write_index_changes(w, &change.index_changes)?;
    write_grant_changes(w, &change.grant_changes)?;
    end(w, "update-view")
}

fn write_sequence_def(w: &mut XmlWriter, seq: &SequenceDefinition) -> io::Result<()> {
    start(w, "sequence-def")?;
    text_element(w, "sequence-name", &seq.name)?;
    opt_text_element(w, "sequence-schema", seq.schema.as_deref())?;
    if let Some(min) = seq.min_value {
        text_element(w, "min-value", &min.to_string())?;
    }
    if let Some(max) = seq.max_value {
        text_element(w, "max-value", &max.to_string())?;
    }
    if let Some(start_value) = seq.start_value {
        text_element(w, "start-value", &start_value.to_string())?;
    }
    text_element(w, "increment", &seq.increment.to_string())?;
    bool_element(w, "cycle", seq.cycle)?;
    if let Some(cache) = seq.cache {
        text_element(w, "cache", &cache.to_string())?;
    }
    if let Some(current) = seq.current_value {
        text_element(w, "current-value", &current.to_string())?;
    }
    opt_text_element(w, "comment", seq.comment.as_deref())?;
    end(w, "sequence-def")
}

fn write_update_sequence(w: &mut XmlWriter, change: &SequenceChange) -> io::Result<()> {
    start_named(w, "update-sequence", &change.definition.name)?;
    write_sequence_def(w, &change.definition)?;
    start(w, "modify-properties")?;
    for property in &change.changed {
        empty_with(
            w,
            "property",
            &[
                ("name", property.property.as_str()),
                ("old", &property.old),
                ("new", &property.new),
            ],
        )?;
    }
    end(w, "modify-properties")?;
    end(w, "update-sequence")
}

fn write_proc(w: &mut XmlWriter, tag: &str, proc: &ProcedureDefinition) -> io::Result<()> {
    start_named(w, tag, &proc.name)?;
    start(w, "proc-def")?;
    text_element(w, "proc-name", &proc.name)?;
    opt_text_element(w, "proc-schema", proc.schema.as_deref())?;
    if !proc.parameters.is_empty() {
        text_element(w, "signature", &proc.signature())?;
    }
    opt_text_element(w, "source", proc.source.as_deref())?;
    opt_text_element(w, "comment", proc.comment.as_deref())?;
    end(w, "proc-def")?;
    end(w, tag)
}

fn write_package(w: &mut XmlWriter, tag: &str, package: &PackageDefinition) -> io::Result<()> {
    start_named(w, tag, &package.name)?;
    start(w, "package-def")?;
    text_element(w, "package-name", &package.name)?;
    opt_text_element(w, "package-schema", package.schema.as_deref())?;
    opt_text_element(w, "source", package.source.as_deref())?;
    end(w, "package-def")?;
    end(w, tag)
}

fn write_type(w: &mut XmlWriter, tag: &str, def: &TypeDefinition) -> io::Result<()> {
    start_named(w, tag, &def.name)?;
    start(w, "type-def")?;
    text_element(w, "type-name", &def.name)?;
    opt_text_element(w, "type-schema", def.schema.as_deref())?;
    text_element(
        w,
        "kind",
        match def.kind {
            TypeKind::Enum => "enum",
            TypeKind::Composite => "composite",
            TypeKind::Domain => "domain",
        },
    )?;
    if let Some(values) = &def.values {
        for value in values {
            text_element(w, "value", value)?;
        }
    }
    opt_text_element(w, "definition", def.definition.as_deref())?;
    end(w, "type-def")?;
    end(w, tag)
}
