//! Trigger reconciliation
//!
//! Triggers are matched by name. A matched trigger whose trimmed source,
//! events or timing differ is carried as an update with the full reference
//! definition; reference-only triggers become creates, target-only triggers
//! become drops.

use sqldelta_core::{names_equal, TriggerDefinition};

use super::diff::TriggerListChange;

/// Reconciles the trigger collections of one table pair
pub fn compare_trigger_lists(
    reference: &[TriggerDefinition],
    target: &[TriggerDefinition],
) -> TriggerListChange {
    let mut change = TriggerListChange::default();

    for ref_trg in reference {
        match target.iter().find(|t| names_equal(&t.name, &ref_trg.name)) {
            Some(tgt_trg) => {
                if !triggers_equal(ref_trg, tgt_trg) {
                    change.update.push(ref_trg.clone());
                }
            }
            None => change.create.push(ref_trg.clone()),
        }
    }

    for tgt_trg in target {
        if !reference.iter().any(|r| names_equal(&r.name, &tgt_trg.name)) {
            change.drop.push(tgt_trg.name.clone());
        }
    }

    change
}

/// Trimmed source text, trigger events and timing must all agree
pub fn triggers_equal(reference: &TriggerDefinition, target: &TriggerDefinition) -> bool {
    reference.trimmed_source() == target.trimmed_source()
        && reference.events == target.events
        && reference.timing == target.timing
}
