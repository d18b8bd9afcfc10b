//! Collection primitives
//!
//! The base mutations over a [`NormalizedCollection`]. Every function takes
//! the current state by reference and returns the next state, sharing each
//! part it did not touch (an empty batch shares all of them).
//!
//! ## Preconditions
//!
//! These functions do not validate their preconditions; callers pre-check or
//! use the `safe` / `throwing` variants. A violated precondition never
//! breaks the order/index invariants, but the resulting data is
//! implementation-defined:
//!
//! | Operation | Violation | Outcome |
//! |---|---|---|
//! | `add`, `add_all`, `create`, `create_all` | id present | record overwritten in place, order unchanged |
//! | `replace`, `replace_all`, `merge`, `merge_all` | id absent | that record is skipped |
//! | `move_record` | `from` absent | state returned unchanged |
//! | `move_record` | `to` present | old `to` record dropped, moved record appended |
//!
//! Each violation is logged at `warn` on the `normal::reducers` target.

use crate::functions::{Creator, Merger};
use normal_core::{Index, NormalizedCollection, Record};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::warn;

pub(crate) const TARGET: &str = "normal::reducers";

// =============================================================================
// Internal helpers
// =============================================================================

/// Insert every record: new ids are appended, present ids overwritten in place.
///
/// Returns the next state and the ids that were already present in `state`.
fn upsert_all<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> (NormalizedCollection<R>, Vec<String>) {
    if records.is_empty() {
        return (state.clone(), Vec::new());
    }

    let mut index = state.index().clone();
    let mut appended = Vec::new();
    let mut overwritten = Vec::new();

    for record in records {
        let id = record.id().to_string();
        if index.insert(id.clone(), record).is_none() {
            appended.push(id);
        } else if state.contains(&id) {
            overwritten.push(id);
        }
    }

    let order = if appended.is_empty() {
        Arc::clone(state.order_arc())
    } else {
        let mut order = state.order().to_vec();
        order.extend(appended);
        Arc::new(order)
    };

    (state.with_order_and_index(order, Arc::new(index)), overwritten)
}

/// Keep a merged record stored under the id it was merged into
fn stored_under<R: Record>(id: &str, merged: R) -> R {
    if merged.id() == id {
        merged
    } else {
        warn!(target: TARGET, id, merged_id = merged.id(), "merger changed the record id, restoring it");
        merged.with_id(id)
    }
}

// =============================================================================
// Add / create
// =============================================================================

/// Append a new record
///
/// Precondition: `record.id()` is absent.
pub fn add<R: Record>(state: &NormalizedCollection<R>, record: R) -> NormalizedCollection<R> {
    add_all(state, vec![record])
}

/// Append a batch of new records
///
/// Precondition: none of the ids are present. An empty batch returns the
/// state unchanged.
pub fn add_all<R: Record>(state: &NormalizedCollection<R>, records: Vec<R>) -> NormalizedCollection<R> {
    let (next, overwritten) = upsert_all(state, records);
    if !overwritten.is_empty() {
        warn!(target: TARGET, ids = ?overwritten, "add: ids already present, records overwritten in place");
    }
    next
}

/// Run `creator` over `data`, then [`add`] the result
pub fn create<R: Record>(
    state: &NormalizedCollection<R>,
    data: R,
    creator: &Creator<R>,
) -> NormalizedCollection<R> {
    add(state, creator.apply(data))
}

/// Run `creator` over each item, then [`add_all`] the results
pub fn create_all<R: Record>(
    state: &NormalizedCollection<R>,
    data: Vec<R>,
    creator: &Creator<R>,
) -> NormalizedCollection<R> {
    add_all(state, data.into_iter().map(|d| creator.apply(d)).collect())
}

// =============================================================================
// Replace / merge
// =============================================================================

/// Overwrite an existing record, keeping its position
///
/// Precondition: `record.id()` is present.
pub fn replace<R: Record>(state: &NormalizedCollection<R>, record: R) -> NormalizedCollection<R> {
    replace_all(state, vec![record])
}

/// Overwrite a batch of existing records
///
/// Precondition: every id is present. The order part is always shared.
pub fn replace_all<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> NormalizedCollection<R> {
    if records.is_empty() {
        return state.clone();
    }

    let mut index: Option<Index<R>> = None;
    let mut missing = Vec::new();
    for record in records {
        if !state.contains(record.id()) {
            missing.push(record.id().to_string());
            continue;
        }
        index
            .get_or_insert_with(|| state.index().clone())
            .insert(record.id().to_string(), record);
    }

    if !missing.is_empty() {
        warn!(target: TARGET, ids = ?missing, "replace: ids not found, skipped");
    }

    match index {
        Some(index) => state.with_order_and_index(Arc::clone(state.order_arc()), Arc::new(index)),
        None => state.clone(),
    }
}

/// Merge a partial record into the existing one with `merger`
///
/// Precondition: `patch.id()` is present.
pub fn merge<R: Record>(
    state: &NormalizedCollection<R>,
    patch: R,
    merger: &Merger<R>,
) -> NormalizedCollection<R> {
    merge_all(state, vec![patch], merger)
}

/// Merge a batch of partial records
///
/// Patches apply in input order, so a repeated id merges over the result of
/// the previous patch. Precondition: every id is present.
pub fn merge_all<R: Record>(
    state: &NormalizedCollection<R>,
    patches: Vec<R>,
    merger: &Merger<R>,
) -> NormalizedCollection<R> {
    if patches.is_empty() {
        return state.clone();
    }

    let mut index: Option<Index<R>> = None;
    let mut missing = Vec::new();
    for patch in patches {
        let id = patch.id().to_string();
        let merged = {
            let current = index.as_ref().unwrap_or(state.index());
            match current.get(&id) {
                Some(existing) => stored_under(&id, merger.apply(existing, &patch)),
                None => {
                    missing.push(id);
                    continue;
                }
            }
        };
        index
            .get_or_insert_with(|| state.index().clone())
            .insert(id, merged);
    }

    if !missing.is_empty() {
        warn!(target: TARGET, ids = ?missing, "merge: ids not found, skipped");
    }

    match index {
        Some(index) => state.with_order_and_index(Arc::clone(state.order_arc()), Arc::new(index)),
        None => state.clone(),
    }
}

// =============================================================================
// Move / remove
// =============================================================================

/// Move the record at `from` to the key `to`
///
/// The record's id is rewritten to `to`, `from` leaves the order and `to` is
/// appended at the end. Preconditions: `from` present, `to` absent.
pub fn move_record<R: Record>(
    state: &NormalizedCollection<R>,
    from: &str,
    to: &str,
) -> NormalizedCollection<R> {
    let record = match state.get(from) {
        Some(record) => record.with_id(to),
        None => {
            warn!(target: TARGET, from, to, "move: source id not found");
            return state.clone();
        }
    };
    if from != to && state.contains(to) {
        warn!(target: TARGET, from, to, "move: target id already present, replaced");
    }

    let mut order: Vec<String> = state
        .order()
        .iter()
        .filter(|id| id.as_str() != from && id.as_str() != to)
        .cloned()
        .collect();
    order.push(to.to_string());

    let mut index = state.index().clone();
    index.remove(from);
    index.insert(to.to_string(), record);

    state.with_order_and_index(Arc::new(order), Arc::new(index))
}

/// Remove `id` if present
///
/// Removing an absent id returns the state unchanged.
pub fn remove<R: Record>(state: &NormalizedCollection<R>, id: &str) -> NormalizedCollection<R> {
    remove_all(state, &[id])
}

/// Remove every present id
///
/// Returns the state unchanged when `ids` is empty or none of them match.
pub fn remove_all<R: Record, S: AsRef<str>>(
    state: &NormalizedCollection<R>,
    ids: &[S],
) -> NormalizedCollection<R> {
    let doomed: FxHashSet<&str> = ids
        .iter()
        .map(|id| id.as_ref())
        .filter(|id| state.contains(id))
        .collect();
    if doomed.is_empty() {
        return state.clone();
    }

    let order: Vec<String> = state
        .order()
        .iter()
        .filter(|id| !doomed.contains(id.as_str()))
        .cloned()
        .collect();
    let mut index = state.index().clone();
    for id in &doomed {
        index.remove(*id);
    }

    state.with_order_and_index(Arc::new(order), Arc::new(index))
}

// =============================================================================
// Add-or-X
// =============================================================================

/// Merge into the existing record, or add it when absent
pub fn add_or_merge<R: Record>(
    state: &NormalizedCollection<R>,
    record: R,
    merger: &Merger<R>,
) -> NormalizedCollection<R> {
    add_or_merge_all(state, vec![record], merger)
}

/// Per record: merge when present, add when absent
///
/// The order part is shared when no id is new.
pub fn add_or_merge_all<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
    merger: &Merger<R>,
) -> NormalizedCollection<R> {
    if records.is_empty() {
        return state.clone();
    }

    let mut index = state.index().clone();
    let mut appended = Vec::new();
    for record in records {
        let id = record.id().to_string();
        let next = match index.get(&id) {
            Some(existing) => stored_under(&id, merger.apply(existing, &record)),
            None => {
                appended.push(id.clone());
                record
            }
        };
        index.insert(id, next);
    }

    let order = if appended.is_empty() {
        Arc::clone(state.order_arc())
    } else {
        let mut order = state.order().to_vec();
        order.extend(appended);
        Arc::new(order)
    };
    state.with_order_and_index(order, Arc::new(index))
}

/// Replace the existing record, or add it when absent
pub fn add_or_replace<R: Record>(state: &NormalizedCollection<R>, record: R) -> NormalizedCollection<R> {
    add_or_replace_all(state, vec![record])
}

/// Per record: replace when present, add when absent
///
/// The order part is shared when no id is new.
pub fn add_or_replace_all<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> NormalizedCollection<R> {
    upsert_all(state, records).0
}
