//! Schema comparison orchestrator
//!
//! Matches the reference and target inventories, drives the per-object-type
//! diffs and assembles one `SchemaComparison` in report order. Matching is a
//! pure function over two handle slices; the orchestrator only adds policy
//! (exclusion, facet toggles), retrieval-failure handling and cooperative
//! cancellation on top.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use sqldelta_core::{
    names_equal, CancellationFlag, IdentifierCase, SchemaSource, SqlDeltaError, TableDefinition,
    TableHandle, ViewDefinition,
};

use super::diff::{
    CompareStatus, PackageEntry, ProcedureEntry, SchemaComparison, SchemaDiff, SequenceEntry,
    TableEntry, TypeEntry, ViewEntry,
};
use super::objects::{
    compare_sequences, compare_views, custom_types_equal, packages_equal, procedures_equal,
};
use super::pair::DiffPair;
use super::settings::CompareSettings;
use super::table::compare_tables;

/// Errors that can occur during schema comparison
#[derive(Debug, Error)]
pub enum CompareError {
    /// Explicit pairing was requested with lists of different lengths
    #[error("mismatched pair lists: {reference} reference names vs {target} target names")]
    MismatchedPairs { reference: usize, target: usize },

    #[error(transparent)]
    Core(#[from] SqlDeltaError),
}

/// Result type for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Schema comparator driving one reference-vs-target run
#[derive(Debug, Default)]
pub struct SchemaComparator {
    settings: CompareSettings,
}

impl SchemaComparator {
    /// Creates a comparator with default settings (every facet enabled)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CompareSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompareSettings {
        &self.settings
    }

    /// Compares two schema sources without external cancellation
    pub fn compare(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
    ) -> CompareResult<SchemaComparison> {
        self.compare_with_cancel(reference, target, &CancellationFlag::new())
    }

    /// Compares two schema sources, polling `cancel` between objects. A
    /// cancelled run returns a valid, incomplete comparison with
    /// `CompareStatus::Cancelled`; it is never reported as an error.
    pub fn compare_with_cancel(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
    ) -> CompareResult<SchemaComparison> {
        let mut diff = SchemaDiff::new();
        let status = self.run(reference, target, cancel, &mut diff);
        Ok(SchemaComparison {
            reference: reference.connection().clone(),
            target: target.connection().clone(),
            settings: self.settings.clone(),
            diff,
            status,
        })
    }

    /// Compares explicitly paired tables: `reference_names[i]` against
    /// `target_names[i]`. Mismatched list lengths are a caller error and are
    /// surfaced immediately.
    pub fn compare_pairs(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        reference_names: &[String],
        target_names: &[String],
        cancel: &CancellationFlag,
    ) -> CompareResult<SchemaComparison> {
        if reference_names.len() != target_names.len() {
            return Err(CompareError::MismatchedPairs {
                reference: reference_names.len(),
                target: target_names.len(),
            });
        }

        let case = target.connection().default_case;
        let ref_handles = reference.list_tables();
        let tgt_handles = target.list_tables();
        let mut diff = SchemaDiff::new();
        let mut status = CompareStatus::Complete;

        for (ref_name, tgt_name) in reference_names.iter().zip(target_names.iter()) {
            if cancel.is_cancelled() {
                status = CompareStatus::Cancelled;
                break;
            }

            let Some(ref_handle) = find_by_name(&ref_handles, ref_name) else {
                warn!(name = %ref_name, "skipping pair: reference table not found");
                continue;
            };
            let Some(ref_def) = fetch_table(reference, ref_handle, false) else {
                continue;
            };

            match find_by_name(&tgt_handles, tgt_name) {
                Some(tgt_handle) => {
                    let Some(tgt_def) = fetch_table(target, tgt_handle, false) else {
                        continue;
                    };
                    if let Some(change) =
                        compare_tables(&ref_def, &tgt_def, &self.settings, case)
                    {
                        diff.tables.push(TableEntry::Modified(Box::new(change)));
                    }
                }
                None => diff.tables.push(TableEntry::Added(ref_def)),
            }
        }

        Ok(SchemaComparison {
            reference: reference.connection().clone(),
            target: target.connection().clone(),
            settings: self.settings.clone(),
            diff,
            status,
        })
    }

    fn run(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let case = target.connection().default_case;

        if self.table_pass(reference, target, cancel, case, diff) == CompareStatus::Cancelled {
            return CompareStatus::Cancelled;
        }

        if self.settings.include_views && !self.settings.views_as_tables {
            if self.view_pass(reference, target, cancel, case, diff) == CompareStatus::Cancelled {
                return CompareStatus::Cancelled;
            }
        }

        if self.settings.include_sequences {
            if self.sequence_pass(reference, target, cancel, diff) == CompareStatus::Cancelled {
                return CompareStatus::Cancelled;
            }
        }

        if self.settings.include_procedures {
            if self.procedure_pass(reference, target, cancel, diff) == CompareStatus::Cancelled {
                return CompareStatus::Cancelled;
            }
            if self.package_pass(reference, target, cancel, diff) == CompareStatus::Cancelled {
                return CompareStatus::Cancelled;
            }
        }

        self.type_pass(reference, target, cancel, diff)
    }

    fn table_pass(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        case: IdentifierCase,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let mut ref_handles = reference.list_tables();
        let mut tgt_handles = target.list_tables();

        if self.settings.views_as_tables {
            ref_handles.extend(reference.list_views());
            tgt_handles.extend(target.list_views());
        }

        let excluded = self.excluded_names(&ref_handles, &tgt_handles);
        ref_handles.retain(|h| !is_excluded(h, &excluded));
        tgt_handles.retain(|h| !is_excluded(h, &excluded));

        for pair in match_inventories(&ref_handles, &tgt_handles, case) {
            if cancel.is_cancelled() {
                return CompareStatus::Cancelled;
            }

            match (pair.reference(), pair.target()) {
                (Some(ref_handle), Some(tgt_handle)) => {
                    let fetched = fetch_table(reference, ref_handle, self.settings.views_as_tables)
                        .zip(fetch_table(target, tgt_handle, self.settings.views_as_tables));
                    let Some((ref_def, tgt_def)) = fetched else {
                        continue;
                    };
                    if let Some(change) =
                        compare_tables(&ref_def, &tgt_def, &self.settings, case)
                    {
                        diff.tables.push(TableEntry::Modified(Box::new(change)));
                    }
                }
                (Some(ref_handle), None) => {
                    if let Some(def) =
                        fetch_table(reference, ref_handle, self.settings.views_as_tables)
                    {
                        diff.tables.push(TableEntry::Added(def));
                    }
                }
                (None, Some(tgt_handle)) => {
                    if tgt_handle.kind.is_view() {
                        diff.dropped_views.push(tgt_handle.identifier.clone());
                    } else {
                        diff.dropped_tables.push(tgt_handle.identifier.clone());
                    }
                }
                (None, None) => unreachable!("DiffPair invariant: one side always present"),
            }
        }

        CompareStatus::Complete
    }

    fn view_pass(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        case: IdentifierCase,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let ref_handles = reference.list_views();
        let tgt_handles = target.list_views();

        for pair in match_inventories(&ref_handles, &tgt_handles, case) {
            if cancel.is_cancelled() {
                return CompareStatus::Cancelled;
            }

            match (pair.reference(), pair.target()) {
                (Some(ref_handle), Some(tgt_handle)) => {
                    let fetched =
                        fetch_view(reference, ref_handle).zip(fetch_view(target, tgt_handle));
                    let Some((ref_def, tgt_def)) = fetched else {
                        continue;
                    };
                    if let Some(change) = compare_views(&ref_def, &tgt_def, &self.settings) {
                        diff.views.push(ViewEntry::Updated(Box::new(change)));
                    }
                }
                (Some(ref_handle), None) => {
                    if let Some(def) = fetch_view(reference, ref_handle) {
                        diff.views.push(ViewEntry::Created(def));
                    }
                }
                (None, Some(tgt_handle)) => {
                    diff.dropped_views.push(tgt_handle.identifier.clone());
                }
                (None, None) => unreachable!("DiffPair invariant: one side always present"),
            }
        }

        CompareStatus::Complete
    }

    fn sequence_pass(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let ref_seqs = reference.sequences();
        let tgt_seqs = target.sequences();

        for ref_seq in &ref_seqs {
            if cancel.is_cancelled() {
                return CompareStatus::Cancelled;
            }
            let matched = tgt_seqs.iter().find(|t| {
                schema_scope_matches(t.schema.as_deref(), ref_seq.schema.as_deref())
                    && names_equal(&t.name, &ref_seq.name)
            });
            match matched {
                Some(tgt_seq) => {
                    if let Some(change) = compare_sequences(ref_seq, tgt_seq) {
                        diff.sequences.push(SequenceEntry::Updated(change));
                    }
                }
                None => diff.sequences.push(SequenceEntry::Created(ref_seq.clone())),
            }
        }

        for tgt_seq in &tgt_seqs {
            let matched = ref_seqs.iter().any(|r| {
                schema_scope_matches(r.schema.as_deref(), tgt_seq.schema.as_deref())
                    && names_equal(&r.name, &tgt_seq.name)
            });
            if !matched {
                diff.dropped_sequences.push(tgt_seq.name.clone());
            }
        }

        CompareStatus::Complete
    }

    fn procedure_pass(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let ref_procs = reference.procedures();
        let tgt_procs = target.procedures();

        // Packaged procedures are compared through their package, not
        // individually.
        for ref_proc in ref_procs.iter().filter(|p| p.package.is_none()) {
            if cancel.is_cancelled() {
                return CompareStatus::Cancelled;
            }
            let matched = tgt_procs.iter().filter(|p| p.package.is_none()).find(|t| {
                schema_scope_matches(t.schema.as_deref(), ref_proc.schema.as_deref())
                    && names_equal(&t.name, &ref_proc.name)
                    && t.signature().eq_ignore_ascii_case(&ref_proc.signature())
            });
            match matched {
                Some(tgt_proc) => {
                    if !procedures_equal(ref_proc, tgt_proc) {
                        diff.procedures.push(ProcedureEntry::Updated(ref_proc.clone()));
                    }
                }
                None => diff.procedures.push(ProcedureEntry::Created(ref_proc.clone())),
            }
        }

        for tgt_proc in tgt_procs.iter().filter(|p| p.package.is_none()) {
            let matched = ref_procs.iter().filter(|p| p.package.is_none()).any(|r| {
                schema_scope_matches(r.schema.as_deref(), tgt_proc.schema.as_deref())
                    && names_equal(&r.name, &tgt_proc.name)
                    && r.signature().eq_ignore_ascii_case(&tgt_proc.signature())
            });
            if !matched {
                diff.dropped_procedures
                    .push(format!("{}{}", tgt_proc.name, tgt_proc.signature()));
            }
        }

        CompareStatus::Complete
    }

    /// Each package is compared exactly once, no matter how many procedures
    /// belong to it.
    fn package_pass(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let ref_pkgs = reference.packages();
        let tgt_pkgs = target.packages();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for ref_pkg in &ref_pkgs {
            if cancel.is_cancelled() {
                return CompareStatus::Cancelled;
            }
            let key = package_key(ref_pkg.schema.as_deref(), &ref_pkg.name);
            if !seen.insert(key) {
                debug!(package = %ref_pkg.name, "package already compared, skipping duplicate");
                continue;
            }
            let matched = tgt_pkgs.iter().find(|t| {
                schema_scope_matches(t.schema.as_deref(), ref_pkg.schema.as_deref())
                    && names_equal(&t.name, &ref_pkg.name)
            });
            match matched {
                Some(tgt_pkg) => {
                    if !packages_equal(ref_pkg, tgt_pkg) {
                        diff.packages.push(PackageEntry::Updated(ref_pkg.clone()));
                    }
                }
                None => diff.packages.push(PackageEntry::Created(ref_pkg.clone())),
            }
        }

        let mut dropped_seen: HashSet<(String, String)> = HashSet::new();
        for tgt_pkg in &tgt_pkgs {
            let key = package_key(tgt_pkg.schema.as_deref(), &tgt_pkg.name);
            if !dropped_seen.insert(key) {
                continue;
            }
            let matched = ref_pkgs.iter().any(|r| {
                schema_scope_matches(r.schema.as_deref(), tgt_pkg.schema.as_deref())
                    && names_equal(&r.name, &tgt_pkg.name)
            });
            if !matched {
                diff.dropped_packages.push(tgt_pkg.name.clone());
            }
        }

        CompareStatus::Complete
    }

    fn type_pass(
        &self,
        reference: &dyn SchemaSource,
        target: &dyn SchemaSource,
        cancel: &CancellationFlag,
        diff: &mut SchemaDiff,
    ) -> CompareStatus {
        let ref_types = reference.extra_types();
        let tgt_types = target.extra_types();

        for ref_type in &ref_types {
            if cancel.is_cancelled() {
                return CompareStatus::Cancelled;
            }
            let matched = tgt_types.iter().find(|t| {
                schema_scope_matches(t.schema.as_deref(), ref_type.schema.as_deref())
                    && names_equal(&t.name, &ref_type.name)
            });
            match matched {
                Some(tgt_type) => {
                    if !custom_types_equal(ref_type, tgt_type) {
                        diff.types.push(TypeEntry::Updated(ref_type.clone()));
                    }
                }
                None => diff.types.push(TypeEntry::Created(ref_type.clone())),
            }
        }

        for tgt_type in &tgt_types {
            let matched = ref_types.iter().any(|r| {
                schema_scope_matches(r.schema.as_deref(), tgt_type.schema.as_deref())
                    && names_equal(&r.name, &tgt_type.name)
            });
            if !matched {
                diff.dropped_types.push(tgt_type.name.clone());
            }
        }

        CompareStatus::Complete
    }

    /// Expands the exclusion list against both inventories. Globs (`%`, `*`)
    /// are matched case-insensitively against the bare table names on both
    /// sides, so an excluded glob removes matching tables from consideration
    /// everywhere.
    fn excluded_names(
        &self,
        reference: &[TableHandle],
        target: &[TableHandle],
    ) -> HashSet<String> {
        let mut excluded = HashSet::new();
        for pattern in &self.settings.exclude_tables {
            if pattern.contains('%') || pattern.contains('*') {
                let Some(re) = glob_regex(pattern) else {
                    warn!(pattern = %pattern, "ignoring unparsable exclusion pattern");
                    continue;
                };
                for handle in reference.iter().chain(target.iter()) {
                    let name = handle.identifier.name.as_str();
                    if re.is_match(name) {
                        excluded.insert(name.to_lowercase());
                    }
                }
            } else {
                excluded.insert(
                    sqldelta_core::ObjectName::parse(pattern)
                        .as_str()
                        .to_lowercase(),
                );
            }
        }
        excluded
    }
}

/// Matches two inventories into diff pairs: matched and reference-only pairs
/// in reference order, then target-only pairs in target order. For each
/// reference handle the target is searched by (a) same schema and name,
/// (b) same name in any schema, (c) adjusted-case name; the first hit wins
/// and every target handle is claimed at most once.
pub fn match_inventories(
    reference: &[TableHandle],
    target: &[TableHandle],
    case: IdentifierCase,
) -> Vec<DiffPair<TableHandle>> {
    let mut pairs = Vec::with_capacity(reference.len() + target.len());
    let mut claimed = vec![false; target.len()];

    for ref_handle in reference {
        let found = find_target(ref_handle, target, &claimed, case);
        match found {
            Some(pos) => {
                claimed[pos] = true;
                pairs.push(DiffPair::matched(ref_handle.clone(), target[pos].clone()));
            }
            None => pairs.push(DiffPair::reference_only(ref_handle.clone())),
        }
    }

    for (pos, tgt_handle) in target.iter().enumerate() {
        if !claimed[pos] {
            pairs.push(DiffPair::target_only(tgt_handle.clone()));
        }
    }

    pairs
}

fn find_target(
    ref_handle: &TableHandle,
    target: &[TableHandle],
    claimed: &[bool],
    case: IdentifierCase,
) -> Option<usize> {
    let ref_id = &ref_handle.identifier;

    // (a) same schema + same name
    if let Some(pos) = target.iter().enumerate().position(|(pos, t)| {
        !claimed[pos]
            && t.identifier.same_schema(ref_id)
            && t.identifier.name.matches(&ref_id.name, case)
    }) {
        return Some(pos);
    }

    // (b) same name in any schema
    if let Some(pos) = target
        .iter()
        .enumerate()
        .position(|(pos, t)| !claimed[pos] && t.identifier.name.matches(&ref_id.name, case))
    {
        return Some(pos);
    }

    // (c) lookup by adjusted-case name: unquoted names folded to the
    // connection default, quoted names verbatim. Catches mixed-quoting
    // pairs the direct match rules reject.
    target.iter().enumerate().position(|(pos, t)| {
        !claimed[pos]
            && t.identifier.name.comparison_name(case) == ref_id.name.comparison_name(case)
    })
}

fn find_by_name<'a>(handles: &'a [TableHandle], name: &str) -> Option<&'a TableHandle> {
    handles
        .iter()
        .find(|h| names_equal(h.identifier.name.as_str(), name))
}

/// Detail fetch with best-effort semantics: a retrieval failure is logged
/// and the object skipped, never aborting the run.
fn fetch_table(
    source: &dyn SchemaSource,
    handle: &TableHandle,
    views_as_tables: bool,
) -> Option<TableDefinition> {
    let result = if views_as_tables && handle.kind.is_view() {
        source.get_view(handle).map(view_as_table)
    } else {
        source.get_table(handle)
    };
    match result {
        Ok(def) => Some(def),
        Err(err) => {
            warn!(object = %handle.identifier, error = %err, "skipping object: detail retrieval failed");
            None
        }
    }
}

fn fetch_view(source: &dyn SchemaSource, handle: &TableHandle) -> Option<ViewDefinition> {
    match source.get_view(handle) {
        Ok(def) => Some(def),
        Err(err) => {
            warn!(object = %handle.identifier, error = %err, "skipping view: detail retrieval failed");
            None
        }
    }
}

/// Structural stand-in for a view compared under `views_as_tables`
fn view_as_table(view: ViewDefinition) -> TableDefinition {
    let mut table = TableDefinition::new(view.identifier);
    table.table_type = "VIEW".to_string();
    table.comment = view.comment;
    table.columns = view.columns;
    table.indexes = view.indexes;
    table.grants = view.grants;
    table
}

/// Schema scope is only enforced when both sides carry one; a snapshot that
/// omits schema names is already scoped by construction.
fn schema_scope_matches(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => true,
    }
}

fn package_key(schema: Option<&str>, name: &str) -> (String, String) {
    (
        schema.unwrap_or_default().to_lowercase(),
        name.to_lowercase(),
    )
}

fn is_excluded(handle: &TableHandle, excluded: &HashSet<String>) -> bool {
    excluded.contains(&handle.identifier.name.as_str().to_lowercase())
}

fn glob_regex(pattern: &str) -> Option<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 4);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '%' | '*' => expr.push_str(".*"),
            c => expr.push_str(&regex::escape(&c.to_string())),
        }
    }
    expr.push('$');
    RegexBuilder::new(&expr).case_insensitive(true).build().ok()
}
