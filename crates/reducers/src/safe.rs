//! Safe variants
//!
//! Wrappers that never violate a primitive's precondition. Singular forms
//! return the state unchanged when the precondition fails; plural forms
//! filter the batch down to the items that satisfy it and delegate. A batch
//! that filters down to nothing returns the state unchanged.
//!
//! - **if-new**: only ids that are absent (`add`, `create`)
//! - **existing**: only ids that are present (`replace`, `merge`)
//! - **safe**: `move_safe` (source present, target absent) and the remove
//!   forms, which are already total

use crate::functions::{Creator, Merger};
use crate::primitives::{self, TARGET};
use normal_core::query::{filter_known, filter_unknown};
use normal_core::{NormalizedCollection, Record};
use tracing::debug;

/// [`primitives::add`] when `record.id()` is absent
pub fn add_if_new<R: Record>(state: &NormalizedCollection<R>, record: R) -> NormalizedCollection<R> {
    if state.contains(record.id()) {
        return state.clone();
    }
    primitives::add(state, record)
}

/// [`primitives::add_all`] over the records whose id is absent
pub fn add_all_if_new<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> NormalizedCollection<R> {
    primitives::add_all(state, dedup_new(filter_unknown(state, records)))
}

/// [`primitives::create`] when the created record's id is absent
pub fn create_if_new<R: Record>(
    state: &NormalizedCollection<R>,
    data: R,
    creator: &Creator<R>,
) -> NormalizedCollection<R> {
    add_if_new(state, creator.apply(data))
}

/// [`primitives::create_all`] over the created records whose id is absent
pub fn create_all_if_new<R: Record>(
    state: &NormalizedCollection<R>,
    data: Vec<R>,
    creator: &Creator<R>,
) -> NormalizedCollection<R> {
    let created = data.into_iter().map(|d| creator.apply(d)).collect();
    add_all_if_new(state, created)
}

/// [`primitives::replace`] when `record.id()` is present
pub fn replace_existing<R: Record>(
    state: &NormalizedCollection<R>,
    record: R,
) -> NormalizedCollection<R> {
    if !state.contains(record.id()) {
        return state.clone();
    }
    primitives::replace(state, record)
}

/// [`primitives::replace_all`] over the records whose id is present
pub fn replace_all_existing<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> NormalizedCollection<R> {
    primitives::replace_all(state, filter_known(state, records))
}

/// [`primitives::merge`] when `patch.id()` is present
pub fn merge_existing<R: Record>(
    state: &NormalizedCollection<R>,
    patch: R,
    merger: &Merger<R>,
) -> NormalizedCollection<R> {
    if !state.contains(patch.id()) {
        return state.clone();
    }
    primitives::merge(state, patch, merger)
}

/// [`primitives::merge_all`] over the patches whose id is present
pub fn merge_all_existing<R: Record>(
    state: &NormalizedCollection<R>,
    patches: Vec<R>,
    merger: &Merger<R>,
) -> NormalizedCollection<R> {
    primitives::merge_all(state, filter_known(state, patches), merger)
}

/// [`primitives::move_record`] when `from` is present and `to` is absent
pub fn move_safe<R: Record>(
    state: &NormalizedCollection<R>,
    from: &str,
    to: &str,
) -> NormalizedCollection<R> {
    if !state.contains(from) || state.contains(to) {
        debug!(target: TARGET, from, to, "move skipped");
        return state.clone();
    }
    primitives::move_record(state, from, to)
}

/// [`primitives::remove`], which is already a no-op for absent ids
pub fn remove_safe<R: Record>(state: &NormalizedCollection<R>, id: &str) -> NormalizedCollection<R> {
    primitives::remove(state, id)
}

/// [`primitives::remove_all`], which already ignores absent ids
pub fn remove_all_safe<R: Record, S: AsRef<str>>(
    state: &NormalizedCollection<R>,
    ids: &[S],
) -> NormalizedCollection<R> {
    primitives::remove_all(state, ids)
}

/// Drop repeated ids within a batch of new records, keeping the first
fn dedup_new<R: Record>(records: Vec<R>) -> Vec<R> {
    let mut seen = rustc_hash::FxHashSet::default();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id().to_string()))
        .collect()
}
