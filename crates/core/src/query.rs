//! Read-only helpers over a collection
//!
//! Sequence helpers project `order` through `index` first, so they always
//! see records in collection order.

use crate::collection::NormalizedCollection;
use crate::record::Record;
use std::cmp::Ordering;

/// Records in collection order
pub fn to_array<R>(state: &NormalizedCollection<R>) -> Vec<&R> {
    state
        .order()
        .iter()
        .filter_map(|id| state.index().get(id))
        .collect()
}

/// Map `f` over the records in collection order
pub fn map<R, T, F>(state: &NormalizedCollection<R>, f: F) -> Vec<T>
where
    F: FnMut(&R) -> T,
{
    to_array(state).into_iter().map(f).collect()
}

/// Records matching `predicate`, in collection order
pub fn filter<R, F>(state: &NormalizedCollection<R>, mut predicate: F) -> Vec<&R>
where
    F: FnMut(&R) -> bool,
{
    to_array(state).into_iter().filter(|r| predicate(*r)).collect()
}

/// Call `f` on each record in collection order
pub fn for_each<R, F>(state: &NormalizedCollection<R>, f: F)
where
    F: FnMut(&R),
{
    to_array(state).into_iter().for_each(f)
}

/// Records sorted lexicographically by id
pub fn sort<R: Record>(state: &NormalizedCollection<R>) -> Vec<&R> {
    sort_by(state, |a, b| a.id().cmp(b.id()))
}

/// Records sorted with `compare` (stable)
pub fn sort_by<R, F>(state: &NormalizedCollection<R>, mut compare: F) -> Vec<&R>
where
    F: FnMut(&R, &R) -> Ordering,
{
    let mut records = to_array(state);
    records.sort_by(|a, b| compare(*a, *b));
    records
}

/// Records sorted by comparing their ids with `compare`
pub fn sort_ids<R, F>(state: &NormalizedCollection<R>, mut compare: F) -> Vec<&R>
where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut ids: Vec<&String> = state.order().iter().collect();
    ids.sort_by(|a, b| compare(a.as_str(), b.as_str()));
    ids.into_iter()
        .filter_map(|id| state.index().get(id))
        .collect()
}

/// Records whose id matches `predicate`, in collection order
pub fn filter_ids<R, F>(state: &NormalizedCollection<R>, mut predicate: F) -> Vec<&R>
where
    F: FnMut(&str) -> bool,
{
    state
        .order()
        .iter()
        .filter(|id| predicate(id.as_str()))
        .filter_map(|id| state.index().get(id))
        .collect()
}

/// Whether `id` is present
pub fn exists<R>(state: &NormalizedCollection<R>, id: &str) -> bool {
    state.contains(id)
}

/// Whether every id is present (true for an empty list)
pub fn all_exist<R, S: AsRef<str>>(state: &NormalizedCollection<R>, ids: &[S]) -> bool {
    ids.iter().all(|id| state.contains(id.as_ref()))
}

/// Whether at least one id is present (false for an empty list)
pub fn any_exist<R, S: AsRef<str>>(state: &NormalizedCollection<R>, ids: &[S]) -> bool {
    ids.iter().any(|id| state.contains(id.as_ref()))
}

/// Split a batch into (present, absent) by id, keeping input order
pub fn partition_known<R: Record>(state: &NormalizedCollection<R>, data: Vec<R>) -> (Vec<R>, Vec<R>) {
    data.into_iter().partition(|r| state.contains(r.id()))
}

/// Records of `data` whose id is present
pub fn filter_known<R: Record>(state: &NormalizedCollection<R>, data: Vec<R>) -> Vec<R> {
    partition_known(state, data).0
}

/// Records of `data` whose id is absent
pub fn filter_unknown<R: Record>(state: &NormalizedCollection<R>, data: Vec<R>) -> Vec<R> {
    partition_known(state, data).1
}
