//! Per-column comparison
//!
//! Compares one reference/target column pair and returns only the facets
//! that differ. Type equality has two modes: raw vendor-type-string equality,
//! or the coarser type-family equality selected by `compare_jdbc_types`.

use sqldelta_core::{ColumnDefinition, ColumnTypeCode};

use super::diff::{ColumnChange, ColumnFkChange, DefaultChange, NameChange, ValueChange};
use super::settings::CompareSettings;

/// Compares one column pair. Returns `None` when no tracked facet differs.
///
/// `compare_fk` selects per-column foreign key comparison; a table diff that
/// reports foreign keys at table level passes `false` to avoid duplicate
/// fragments.
pub fn compare_column(
    reference: &ColumnDefinition,
    target: &ColumnDefinition,
    settings: &CompareSettings,
    compare_fk: bool,
) -> Option<ColumnChange> {
    let mut change = ColumnChange::new(&reference.name);

    if !types_equal(reference, target, settings) {
        change.type_change = Some(ValueChange::new(
            target.dbms_type.clone(),
            reference.dbms_type.clone(),
        ));
    }

    if reference.nullable != target.nullable {
        change.nullable_change = Some(ValueChange::new(target.nullable, reference.nullable));
    }

    change.default_change = compare_defaults(reference, target);

    if reference.comment != target.comment {
        change.comment_change = Some(ValueChange::new(
            target.comment.clone(),
            reference.comment.clone(),
        ));
    }

    if trimmed(&reference.expression) != trimmed(&target.expression) {
        change.expression_change = Some(ValueChange::new(
            target.expression.clone(),
            reference.expression.clone(),
        ));
    }

    if reference.collation != target.collation {
        change.collation_change = Some(ValueChange::new(
            target.collation.clone(),
            reference.collation.clone(),
        ));
    }

    if compare_fk {
        change.foreign_key_change = compare_column_fk(reference, target);
    }

    if change.is_empty() {
        None
    } else {
        Some(change)
    }
}

/// Type equality under the active policy
pub fn types_equal(
    reference: &ColumnDefinition,
    target: &ColumnDefinition,
    settings: &CompareSettings,
) -> bool {
    if settings.compare_jdbc_types {
        type_families_equal(reference, target)
    } else {
        reference.dbms_type.trim() == target.dbms_type.trim()
    }
}

/// Coarse type-family equality: all CLOB variants are equal, all BLOB
/// variants are equal, character types are equal only when the stored size
/// matches, exact numerics need matching precision and scale. `Other` never
/// coerces; vendor-specific coercions are a policy extension point.
fn type_families_equal(reference: &ColumnDefinition, target: &ColumnDefinition) -> bool {
    let (rc, tc) = (reference.type_code, target.type_code);

    if rc.is_clob() && tc.is_clob() {
        return true;
    }
    if rc.is_blob() && tc.is_blob() {
        return true;
    }
    if rc.is_character() && tc.is_character() {
        return reference.size == target.size;
    }
    if rc == ColumnTypeCode::Other || tc == ColumnTypeCode::Other {
        return reference.dbms_type.trim() == target.dbms_type.trim();
    }
    if rc.is_numeric() && tc.is_numeric() {
        return reference.size == target.size && reference.digits == target.digits;
    }
    rc == tc && reference.size == target.size && reference.digits == target.digits
}

fn compare_defaults(
    reference: &ColumnDefinition,
    target: &ColumnDefinition,
) -> Option<DefaultChange> {
    let new = normalized_default(&reference.default_value);
    let old = normalized_default(&target.default_value);
    match (new, old) {
        (None, Some(old)) => Some(DefaultChange::Removed {
            old: old.to_string(),
        }),
        (Some(new), old) if old != Some(new) => Some(DefaultChange::Changed {
            old: old.map(|s| s.to_string()),
            new: new.to_string(),
        }),
        _ => None,
    }
}

/// An empty or whitespace-only default counts as no default
fn normalized_default(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn compare_column_fk(
    reference: &ColumnDefinition,
    target: &ColumnDefinition,
) -> Option<ColumnFkChange> {
    match (&reference.foreign_key, &target.foreign_key) {
        (Some(r), None) => Some(ColumnFkChange::Added(r.clone())),
        (None, Some(t)) => Some(ColumnFkChange::Dropped(t.clone())),
        (Some(r), Some(t)) => {
            let same_target = r.table.eq_ignore_ascii_case(&t.table)
                && r.column.eq_ignore_ascii_case(&t.column);
            if same_target {
                if r.constraint_name == t.constraint_name {
                    None
                } else {
                    Some(ColumnFkChange::Renamed(NameChange::new(
                        t.constraint_name.clone(),
                        r.constraint_name.clone(),
                    )))
                }
            } else {
                Some(ColumnFkChange::Replaced {
                    old: t.clone(),
                    new: r.clone(),
                })
            }
        }
        (None, None) => None,
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}
