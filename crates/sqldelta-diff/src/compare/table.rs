//! Table pair comparison
//!
//! Combines the column, primary key, constraint, foreign key, option, index,
//! trigger and grant comparisons for one matched table pair into a single
//! change set. An empty change set means the tables are equal under the
//! active policy and no fragment is emitted.

use sqldelta_core::{
    names_equal, ForeignKeyDefinition, IdentifierCase, PrimaryKeyDefinition, TableConstraint,
    TableDefinition, TableOption,
};

use super::column::compare_column;
use super::diff::{
    ConstraintChange, ConstraintListChange, NameChange, PrimaryKeyChange, TableChange, ValueChange,
};
use super::grants::compare_grants;
use super::index::compare_index_lists;
use super::settings::CompareSettings;
use super::trigger::compare_trigger_lists;

/// Compares one matched table pair. Returns `None` when every tracked facet
/// is equal.
///
/// `case` is the target connection's default identifier case, used for the
/// rename check: table names compare case-sensitively when either side is
/// quoted, folded otherwise.
pub fn compare_tables(
    reference: &TableDefinition,
    target: &TableDefinition,
    settings: &CompareSettings,
    case: IdentifierCase,
) -> Option<TableChange> {
    let mut change = TableChange::new(reference.identifier.clone());

    if !reference.name().matches(target.name(), case) {
        change.rename = Some(NameChange::new(
            target.name().as_str().to_string(),
            reference.name().as_str().to_string(),
        ));
    }

    compare_columns(reference, target, settings, &mut change);

    if settings.include_primary_keys {
        change.primary_key_change = compare_primary_keys(reference, target);
    }

    if settings.include_constraints {
        change.constraint_changes =
            compare_constraints(&reference.constraints, &target.constraints, settings);
    }

    if settings.include_foreign_keys {
        compare_foreign_keys(&reference.foreign_keys, &target.foreign_keys, &mut change);
    }

    if !reference.table_type.eq_ignore_ascii_case(&target.table_type) {
        change.type_change = Some(ValueChange::new(
            target.table_type.clone(),
            reference.table_type.clone(),
        ));
    }

    if reference.tablespace != target.tablespace {
        change.tablespace_change = Some(ValueChange::new(
            target.tablespace.clone(),
            reference.tablespace.clone(),
        ));
    }

    compare_options(&reference.options, &target.options, &mut change);

    if settings.include_indexes {
        change.index_changes = compare_index_lists(&reference.indexes, &target.indexes);
    }

    if settings.include_triggers {
        change.trigger_changes = compare_trigger_lists(&reference.triggers, &target.triggers);
    }

    if settings.include_grants {
        change.grant_changes = compare_grants(&reference.grants, &target.grants);
    }

    if change.is_empty() {
        None
    } else {
        Some(change)
    }
}

/// Columns are matched by case-insensitive name equality after quote
/// stripping. Reference-only columns are added with their full definition,
/// target-only columns are removed by name.
fn compare_columns(
    reference: &TableDefinition,
    target: &TableDefinition,
    settings: &CompareSettings,
    change: &mut TableChange,
) {
    for ref_col in &reference.columns {
        match target
            .columns
            .iter()
            .find(|c| names_equal(&c.name, &ref_col.name))
        {
            Some(tgt_col) => {
                // Foreign keys are reported at table level; per-column FK
                // comparison stays off to avoid duplicate fragments.
                if let Some(col_change) = compare_column(ref_col, tgt_col, settings, false) {
                    change.modified_columns.push(col_change);
                }
            }
            None => change.added_columns.push(ref_col.clone()),
        }
    }

    for tgt_col in &target.columns {
        if !reference
            .columns
            .iter()
            .any(|c| names_equal(&c.name, &tgt_col.name))
        {
            change.removed_columns.push(tgt_col.name.clone());
        }
    }
}

fn compare_primary_keys(
    reference: &TableDefinition,
    target: &TableDefinition,
) -> Option<PrimaryKeyChange> {
    let ref_cols = reference.primary_key_columns();
    let tgt_cols = target.primary_key_columns();

    let ref_pk = || {
        reference
            .primary_key
            .clone()
            .unwrap_or_else(|| PrimaryKeyDefinition::new(None, ref_cols.clone()))
    };
    let tgt_pk = || {
        target
            .primary_key
            .clone()
            .unwrap_or_else(|| PrimaryKeyDefinition::new(None, tgt_cols.clone()))
    };

    match (ref_cols.is_empty(), tgt_cols.is_empty()) {
        (false, true) => Some(PrimaryKeyChange::Added(ref_pk())),
        (true, false) => Some(PrimaryKeyChange::Removed(tgt_pk())),
        (false, false) if !pk_columns_equal(&ref_cols, &tgt_cols) => {
            Some(PrimaryKeyChange::Modified {
                old: tgt_pk(),
                new: ref_pk(),
            })
        }
        _ => None,
    }
}

fn pk_columns_equal(reference: &[String], target: &[String]) -> bool {
    reference.len() == target.len()
        && reference
            .iter()
            .zip(target.iter())
            .all(|(a, b)| names_equal(a, b))
}

/// Constraints are matched by name or by expression text depending on the
/// policy. Unnamed constraints always fall back to expression matching.
fn compare_constraints(
    reference: &[TableConstraint],
    target: &[TableConstraint],
    settings: &CompareSettings,
) -> ConstraintListChange {
    let mut change = ConstraintListChange::default();
    let mut claimed = vec![false; target.len()];

    for ref_con in reference {
        let matched = target.iter().enumerate().find(|(pos, tgt_con)| {
            !claimed[*pos] && constraints_match(ref_con, tgt_con, settings)
        });

        match matched {
            Some((pos, tgt_con)) => {
                claimed[pos] = true;
                if !ref_con.expression_matches(tgt_con) {
                    // Only reachable under name matching
                    change.modified.push(ConstraintChange {
                        name: ref_con.name.clone().unwrap_or_default(),
                        expression_change: ValueChange::new(
                            tgt_con.expression.clone(),
                            ref_con.expression.clone(),
                        ),
                    });
                }
            }
            None => change.added.push(ref_con.clone()),
        }
    }

    for (pos, tgt_con) in target.iter().enumerate() {
        if !claimed[pos] {
            change.dropped.push(tgt_con.clone());
        }
    }

    change
}

fn constraints_match(
    reference: &TableConstraint,
    target: &TableConstraint,
    settings: &CompareSettings,
) -> bool {
    if settings.constraints_by_name {
        match (&reference.name, &target.name) {
            (Some(r), Some(t)) => names_equal(r, t),
            _ => reference.expression_matches(target),
        }
    } else {
        reference.expression_matches(target)
    }
}

/// Foreign keys are matched by definition equality, never by name. A
/// definition-matched pair with different names is a rename; everything else
/// becomes an add/drop pair.
fn compare_foreign_keys(
    reference: &[ForeignKeyDefinition],
    target: &[ForeignKeyDefinition],
    change: &mut TableChange,
) {
    let mut claimed = vec![false; target.len()];

    for ref_fk in reference {
        let matched = target
            .iter()
            .enumerate()
            .find(|(pos, tgt_fk)| !claimed[*pos] && ref_fk.definition_matches(tgt_fk));

        match matched {
            Some((pos, tgt_fk)) => {
                claimed[pos] = true;
                if !names_equal(&ref_fk.name, &tgt_fk.name) {
                    change.renamed_foreign_keys.push(NameChange::new(
                        tgt_fk.name.clone(),
                        ref_fk.name.clone(),
                    ));
                }
            }
            None => change.added_foreign_keys.push(ref_fk.clone()),
        }
    }

    for (pos, tgt_fk) in target.iter().enumerate() {
        if !claimed[pos] {
            change.dropped_foreign_keys.push(tgt_fk.name.clone());
        }
    }
}

/// Options present only in the reference are added, options present only in
/// the target are removed; an option is identified by name and value.
fn compare_options(reference: &[TableOption], target: &[TableOption], change: &mut TableChange) {
    for ref_opt in reference {
        if !target.contains(ref_opt) {
            change.added_options.push(ref_opt.clone());
        }
    }
    for tgt_opt in target {
        if !reference.contains(tgt_opt) {
            change.removed_options.push(tgt_opt.clone());
        }
    }
}
