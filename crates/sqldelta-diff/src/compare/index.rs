//! Index reconciliation
//!
//! Matching is structural-first: indexes pair up on their ordered column
//! list, never on their name, so a renamed but otherwise identical index is
//! reported as a single name change instead of an add/drop pair.

use sqldelta_core::IndexDefinition;

use super::diff::{IndexChange, IndexListChange, NameChange, ValueChange};

/// Reconciles the full index collections of one table or view pair
pub fn compare_index_lists(
    reference: &[IndexDefinition],
    target: &[IndexDefinition],
) -> IndexListChange {
    let mut change = IndexListChange::default();
    let mut claimed = vec![false; target.len()];

    for ref_idx in reference {
        let matched = target
            .iter()
            .enumerate()
            .find(|(pos, tgt_idx)| !claimed[*pos] && ref_idx.same_structure(tgt_idx));

        match matched {
            Some((pos, tgt_idx)) => {
                claimed[pos] = true;
                if let Some(idx_change) = compare_index(ref_idx, tgt_idx) {
                    change.modified.push(idx_change);
                }
            }
            None => change.added.push(ref_idx.clone()),
        }
    }

    for (pos, tgt_idx) in target.iter().enumerate() {
        if !claimed[pos] {
            change.dropped.push(tgt_idx.name.clone());
        }
    }

    change
}

/// Compares the facets of a structurally matched index pair. Returns `None`
/// when name, uniqueness, primary flag, type keyword and filter all agree.
pub fn compare_index(
    reference: &IndexDefinition,
    target: &IndexDefinition,
) -> Option<IndexChange> {
    let mut change = IndexChange::new(&target.name);

    if !reference.name.eq_ignore_ascii_case(&target.name) {
        change.name_change = Some(NameChange::new(
            target.name.clone(),
            reference.name.clone(),
        ));
    }

    if reference.unique != target.unique {
        change.unique_change = Some(ValueChange::new(target.unique, reference.unique));
    }

    if reference.primary_key != target.primary_key {
        change.primary_change = Some(ValueChange::new(target.primary_key, reference.primary_key));
    }

    if !reference.index_type.eq_ignore_ascii_case(&target.index_type) {
        change.type_change = Some(ValueChange::new(
            target.index_type.clone(),
            reference.index_type.clone(),
        ));
    }

    let ref_filter = reference.filter.as_deref().map(str::trim);
    let tgt_filter = target.filter.as_deref().map(str::trim);
    if ref_filter != tgt_filter {
        change.filter_change = Some(ValueChange::new(
            target.filter.clone(),
            reference.filter.clone(),
        ));
    }

    if change.is_empty() {
        None
    } else {
        Some(change)
    }
}
