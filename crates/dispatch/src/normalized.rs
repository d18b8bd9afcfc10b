//! Normalized payloads
//!
//! Fetch results often arrive pre-normalized: one map of records per entity
//! type, plus the ids of the top-level result. [`UpdateFromNormalized`]
//! picks one entity type out of such a payload and feeds its records, in
//! payload order, to a batch reducer.

use indexmap::IndexMap;
use normal_core::{NormalizedCollection, Record, ShallowMerge};
use normal_reducers::{add_or_merge_all, Merger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Records grouped by entity type, keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "R: Serialize",
    deserialize = "R: Deserialize<'de>"
))]
pub struct NormalizedPayload<R> {
    /// entity type -> id -> record, ids in payload order
    pub entities: BTreeMap<String, IndexMap<String, R>>,
    /// Top-level result ids
    #[serde(default)]
    pub result: Vec<String>,
}

impl<R> Default for NormalizedPayload<R> {
    fn default() -> Self {
        NormalizedPayload {
            entities: BTreeMap::new(),
            result: Vec::new(),
        }
    }
}

impl<R: Record> NormalizedPayload<R> {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records under `entity_key`, keyed by their ids
    pub fn with_entities(mut self, entity_key: impl Into<String>, records: Vec<R>) -> Self {
        let table = self.entities.entry(entity_key.into()).or_default();
        for record in records {
            table.insert(record.id().to_string(), record);
        }
        self
    }

    /// Set the top-level result ids
    pub fn with_result(mut self, ids: Vec<String>) -> Self {
        self.result = ids;
        self
    }

    /// Records under `entity_key`, in payload order
    pub fn records(&self, entity_key: &str) -> Vec<R> {
        self.entities
            .get(entity_key)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }
}

/// A plural reducer `(state, records) -> state`
pub type BatchReducer<R> =
    Arc<dyn Fn(&NormalizedCollection<R>, Vec<R>) -> NormalizedCollection<R> + Send + Sync>;

/// Applies one entity type of a [`NormalizedPayload`] to a collection
pub struct UpdateFromNormalized<R> {
    entity_key: String,
    reducer: BatchReducer<R>,
}

impl<R: Record + ShallowMerge + 'static> UpdateFromNormalized<R> {
    /// Add-or-merge the records under `entity_key` with the shallow merger
    pub fn new(entity_key: impl Into<String>) -> Self {
        let merger = Merger::shallow();
        Self::with_reducer(entity_key, move |state, records| {
            add_or_merge_all(state, records, &merger)
        })
    }
}

impl<R: Record> UpdateFromNormalized<R> {
    /// Apply the records under `entity_key` with a custom batch reducer
    pub fn with_reducer<F>(entity_key: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(&NormalizedCollection<R>, Vec<R>) -> NormalizedCollection<R> + Send + Sync + 'static,
    {
        UpdateFromNormalized {
            entity_key: entity_key.into(),
            reducer: Arc::new(reducer),
        }
    }

    /// The entity type this adapter reads
    pub fn entity_key(&self) -> &str {
        &self.entity_key
    }

    /// Apply the payload. A missing or empty entity table leaves `state` unchanged.
    pub fn apply(
        &self,
        state: &NormalizedCollection<R>,
        payload: &NormalizedPayload<R>,
    ) -> NormalizedCollection<R> {
        match payload.entities.get(&self.entity_key) {
            Some(table) if !table.is_empty() => {
                (self.reducer)(state, table.values().cloned().collect())
            }
            _ => state.clone(),
        }
    }
}

impl<R> Clone for UpdateFromNormalized<R> {
    fn clone(&self) -> Self {
        UpdateFromNormalized {
            entity_key: self.entity_key.clone(),
            reducer: Arc::clone(&self.reducer),
        }
    }
}

impl<R> fmt::Debug for UpdateFromNormalized<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateFromNormalized")
            .field("entity_key", &self.entity_key)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`UpdateFromNormalized::new`]
pub fn update_from_normalized<R: Record + ShallowMerge + 'static>(
    entity_key: impl Into<String>,
) -> UpdateFromNormalized<R> {
    UpdateFromNormalized::new(entity_key)
}
