//! Reducer factories
//!
//! An [`ActionReducer`] is a two-argument `(state, action) -> Result<state>`
//! function value. [`Reducer`](crate::Reducer) uses them as per-type
//! overrides. The factories here bind a creator or merger into the
//! matching `create*` / `merge*` function so a custom policy can be plugged
//! into one action type without touching the rest.
//!
//! A factory-built reducer ignores an action whose payload does not match
//! its expected shape, returning the state unchanged.

use crate::action::{Action, Payload};
use normal_core::{NormalizedCollection, Record, Result};
use normal_reducers::{self as reducers, Creator, Merger};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub(crate) const TARGET: &str = "normal::dispatch";

type ReducerFn<R> =
    dyn Fn(&NormalizedCollection<R>, Action<R>) -> Result<NormalizedCollection<R>> + Send + Sync;

/// A cloneable `(state, action) -> Result<state>` function value
pub struct ActionReducer<R> {
    f: Arc<ReducerFn<R>>,
}

impl<R> ActionReducer<R> {
    /// Wrap a reducer function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&NormalizedCollection<R>, Action<R>) -> Result<NormalizedCollection<R>>
            + Send
            + Sync
            + 'static,
    {
        ActionReducer { f: Arc::new(f) }
    }

    /// Run the reducer
    pub fn apply(
        &self,
        state: &NormalizedCollection<R>,
        action: Action<R>,
    ) -> Result<NormalizedCollection<R>> {
        (self.f)(state, action)
    }
}

impl<R> Clone for ActionReducer<R> {
    fn clone(&self) -> Self {
        ActionReducer {
            f: Arc::clone(&self.f),
        }
    }
}

impl<R> fmt::Debug for ActionReducer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionReducer")
    }
}

// =============================================================================
// Payload adapters
// =============================================================================

fn on_record<R, F>(f: F) -> ActionReducer<R>
where
    R: Record + 'static,
    F: Fn(&NormalizedCollection<R>, R) -> Result<NormalizedCollection<R>> + Send + Sync + 'static,
{
    ActionReducer::new(move |state, action: Action<R>| match action.payload {
        Payload::Record(record) => f(state, record),
        _ => {
            warn!(target: TARGET, kind = %action.kind, "expected a record payload, action ignored");
            Ok(state.clone())
        }
    })
}

fn on_records<R, F>(f: F) -> ActionReducer<R>
where
    R: Record + 'static,
    F: Fn(&NormalizedCollection<R>, Vec<R>) -> Result<NormalizedCollection<R>>
        + Send
        + Sync
        + 'static,
{
    ActionReducer::new(move |state, action: Action<R>| match action.payload {
        Payload::Records(records) => f(state, records),
        _ => {
            warn!(target: TARGET, kind = %action.kind, "expected a records payload, action ignored");
            Ok(state.clone())
        }
    })
}

// =============================================================================
// Create factories
// =============================================================================

/// `CREATE` with a custom creator
pub fn create_reducer<R: Record + 'static>(creator: Creator<R>) -> ActionReducer<R> {
    on_record(move |state, data| Ok(reducers::create(state, data, &creator)))
}

/// `CREATE_ALL` with a custom creator
pub fn create_all_reducer<R: Record + 'static>(creator: Creator<R>) -> ActionReducer<R> {
    on_records(move |state, data| Ok(reducers::create_all(state, data, &creator)))
}

/// `CREATE_IF_NEW` with a custom creator
pub fn create_if_new_reducer<R: Record + 'static>(creator: Creator<R>) -> ActionReducer<R> {
    on_record(move |state, data| Ok(reducers::create_if_new(state, data, &creator)))
}

/// `CREATE_ALL_IF_NEW` with a custom creator
pub fn create_all_if_new_reducer<R: Record + 'static>(creator: Creator<R>) -> ActionReducer<R> {
    on_records(move |state, data| Ok(reducers::create_all_if_new(state, data, &creator)))
}

/// `CREATE` refusing present ids, with a custom creator
pub fn create_or_throw_reducer<R: Record + 'static>(creator: Creator<R>) -> ActionReducer<R> {
    on_record(move |state, data| reducers::create_or_throw(state, data, &creator))
}

/// `CREATE_ALL` refusing present ids, with a custom creator
pub fn create_all_or_throw_reducer<R: Record + 'static>(creator: Creator<R>) -> ActionReducer<R> {
    on_records(move |state, data| reducers::create_all_or_throw(state, data, &creator))
}

// =============================================================================
// Merge factories
// =============================================================================

/// `MERGE` with a custom merger
pub fn merge_reducer<R: Record + 'static>(merger: Merger<R>) -> ActionReducer<R> {
    on_record(move |state, patch| Ok(reducers::merge(state, patch, &merger)))
}

/// `MERGE_ALL` with a custom merger
pub fn merge_all_reducer<R: Record + 'static>(merger: Merger<R>) -> ActionReducer<R> {
    on_records(move |state, patches| Ok(reducers::merge_all(state, patches, &merger)))
}

/// Merge one existing record with a custom merger
pub fn merge_existing_reducer<R: Record + 'static>(merger: Merger<R>) -> ActionReducer<R> {
    on_record(move |state, patch| Ok(reducers::merge_existing(state, patch, &merger)))
}

/// Merge the existing records of a batch with a custom merger
pub fn merge_all_existing_reducer<R: Record + 'static>(merger: Merger<R>) -> ActionReducer<R> {
    on_records(move |state, patches| Ok(reducers::merge_all_existing(state, patches, &merger)))
}

/// `MERGE` refusing absent ids, with a custom merger
pub fn merge_or_throw_reducer<R: Record + 'static>(merger: Merger<R>) -> ActionReducer<R> {
    on_record(move |state, patch| reducers::merge_or_throw(state, patch, &merger))
}

/// `MERGE_ALL` refusing absent ids, with a custom merger
pub fn merge_all_or_throw_reducer<R: Record + 'static>(merger: Merger<R>) -> ActionReducer<R> {
    on_records(move |state, patches| reducers::merge_all_or_throw(state, patches, &merger))
}
