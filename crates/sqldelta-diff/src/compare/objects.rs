//! View, sequence, procedure, package and custom-type comparison
//!
//! All of these follow the same shape: target absent means create with the
//! full reference definition, matched-but-different means update. Views fold
//! in index and grant differences; sequences report the exact list of
//! changed properties.

use sqldelta_core::{
    PackageDefinition, ProcedureDefinition, SequenceDefinition, TypeDefinition, ViewDefinition,
};

use super::diff::{SequenceChange, SequenceProperty, SequencePropertyChange, ViewChange};
use super::grants::compare_grants;
use super::index::compare_index_lists;
use super::settings::CompareSettings;

/// Compares one matched view pair. Returns `None` when the trimmed source
/// text and all folded-in collections agree.
pub fn compare_views(
    reference: &ViewDefinition,
    target: &ViewDefinition,
    settings: &CompareSettings,
) -> Option<ViewChange> {
    let mut change = ViewChange::new(reference.identifier.clone());

    if reference.trimmed_source() != target.trimmed_source()
        || reference.materialized != target.materialized
    {
        change.definition = Some(reference.clone());
    }

    if settings.include_indexes {
        change.index_changes = compare_index_lists(&reference.indexes, &target.indexes);
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

/// Compares one matched sequence pair property by property. Returns `None`
/// when every property agrees.
pub fn compare_sequences(
    reference: &SequenceDefinition,
    target: &SequenceDefinition,
) -> Option<SequenceChange> {
    let mut changed = Vec::new();

    push_property(
        &mut changed,
        SequenceProperty::MinValue,
        &target.min_value,
        &reference.min_value,
    );
    push_property(
        &mut changed,
        SequenceProperty::MaxValue,
        &target.max_value,
        &reference.max_value,
    );
    push_property(
        &mut changed,
        SequenceProperty::StartValue,
        &target.start_value,
        &reference.start_value,
    );
    push_property(
        &mut changed,
        SequenceProperty::Increment,
        &Some(target.increment),
        &Some(reference.increment),
    );
    if reference.cycle != target.cycle {
        changed.push(SequencePropertyChange {
            property: SequenceProperty::Cycle,
            old: target.cycle.to_string(),
            new: reference.cycle.to_string(),
        });
    }
    push_property(
        &mut changed,
        SequenceProperty::Cache,
        &target.cache,
        &reference.cache,
    );
    push_property(
        &mut changed,
        SequenceProperty::CurrentValue,
        &target.current_value,
        &reference.current_value,
    );

    if changed.is_empty() {
        None
    } else {
        Some(SequenceChange {
            definition: reference.clone(),
            changed,
        })
    }
}

fn push_property(
    changed: &mut Vec<SequencePropertyChange>,
    property: SequenceProperty,
    old: &Option<i64>,
    new: &Option<i64>,
) {
    if old != new {
        changed.push(SequencePropertyChange {
            property,
            old: render_value(old),
            new: render_value(new),
        });
    }
}

fn render_value(value: &Option<i64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Procedures are equal when their trimmed source text matches
pub fn procedures_equal(reference: &ProcedureDefinition, target: &ProcedureDefinition) -> bool {
    reference.trimmed_source() == target.trimmed_source()
}

/// Packages are equal when their trimmed source text matches
pub fn packages_equal(reference: &PackageDefinition, target: &PackageDefinition) -> bool {
    reference.trimmed_source() == target.trimmed_source()
}

/// Custom types are equal when their value lists and trimmed definitions
/// match
pub fn custom_types_equal(reference: &TypeDefinition, target: &TypeDefinition) -> bool {
    reference.values == target.values
        && reference.definition.as_deref().map(str::trim)
            == target.definition.as_deref().map(str::trim)
        && reference.kind == target.kind
}
