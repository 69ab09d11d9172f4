//! Grant reconciliation
//!
//! Pure set difference over grant tuples: grants to add are the reference
//! set minus the target set, grants to revoke the reverse. Order of the
//! input lists is preserved in the output.

use std::collections::HashSet;

use sqldelta_core::GrantDefinition;

use super::diff::GrantListChange;

/// Computes the grant difference for one table or view pair
pub fn compare_grants(
    reference: &[GrantDefinition],
    target: &[GrantDefinition],
) -> GrantListChange {
    let reference_set: HashSet<&GrantDefinition> = reference.iter().collect();
    let target_set: HashSet<&GrantDefinition> = target.iter().collect();

    GrantListChange {
        added: reference
            .iter()
            .filter(|g| !target_set.contains(g))
            .cloned()
            .collect(),
        revoked: target
            .iter()
            .filter(|g| !reference_set.contains(g))
            .cloned()
            .collect(),
    }
}
