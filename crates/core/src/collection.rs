//! The normalized collection
//!
//! A [`NormalizedCollection`] is a flat store of uniquely identified records:
//! an ordered id list plus an id-to-record index, and any number of extra
//! top-level fields carried alongside.
//!
//! ## Invariants
//!
//! - **Consistency**: `order` holds exactly the keys of `index`, without
//!   duplicates. Order is insertion order unless a move reorders it.
//! - **Identity**: the record stored under `k` has `id() == k`.
//! - **Sharing**: operations share every part they did not touch. Each part
//!   sits behind an `Arc`, so "same reference" means `Arc::ptr_eq`.
//! - **Immutability**: nothing is mutated in place. Writers clone a part
//!   before changing it and hand back a new collection.
//!
//! Cloning a collection is three reference-count bumps.

use crate::error::{Error, Result};
use crate::record::Record;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Id-to-record map used as the collection index
pub type Index<R> = FxHashMap<String, R>;

/// Extra top-level fields carried by a collection
pub type Extras = Map<String, Value>;

/// Ordered id list plus id-to-record index
#[derive(Debug, Clone)]
pub struct NormalizedCollection<R> {
    order: Arc<Vec<String>>,
    index: Arc<Index<R>>,
    extras: Arc<Extras>,
}

impl<R> Default for NormalizedCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> NormalizedCollection<R> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a fresh empty collection
    pub fn new() -> Self {
        Self::with_extras(Extras::new())
    }

    /// Create an empty collection carrying extra top-level fields
    pub fn with_extras(extras: Extras) -> Self {
        NormalizedCollection {
            order: Arc::new(Vec::new()),
            index: Arc::new(Index::default()),
            extras: Arc::new(extras),
        }
    }

    /// Assemble a collection from shared parts
    ///
    /// The caller keeps `order` and `index` consistent. Reducers use this to return a
    /// collection that shares the parts they left untouched.
    pub fn from_parts(order: Arc<Vec<String>>, index: Arc<Index<R>>, extras: Arc<Extras>) -> Self {
        NormalizedCollection {
            order,
            index,
            extras,
        }
    }

    /// Same extras, new order and index
    pub fn with_order_and_index(&self, order: Arc<Vec<String>>, index: Arc<Index<R>>) -> Self {
        Self::from_parts(order, index, Arc::clone(&self.extras))
    }

    /// Set one extra field, sharing order and index
    pub fn with_extra(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut extras = (*self.extras).clone();
        extras.insert(key.into(), value.into());
        Self::from_parts(
            Arc::clone(&self.order),
            Arc::clone(&self.index),
            Arc::new(extras),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Ids in iteration order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Id-to-record index
    pub fn index(&self) -> &Index<R> {
        &self.index
    }

    /// Extra top-level fields
    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    /// Read one extra field
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Shared handle to the order part
    pub fn order_arc(&self) -> &Arc<Vec<String>> {
        &self.order
    }

    /// Shared handle to the index part
    pub fn index_arc(&self) -> &Arc<Index<R>> {
        &self.index
    }

    /// Shared handle to the extras part
    pub fn extras_arc(&self) -> &Arc<Extras> {
        &self.extras
    }

    /// Look up a record
    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id)
    }

    /// Whether `id` is present
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the collection holds no records
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Whether both collections share the same `order` part
    pub fn shares_order_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.order, &other.order)
    }

    /// Whether both collections share the same `index` part
    pub fn shares_index_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.index, &other.index)
    }

    /// Whether both collections share every part
    ///
    /// This is the "returned the identical state" check consumers use for
    /// cheap change detection.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.shares_order_with(other)
            && self.shares_index_with(other)
            && Arc::ptr_eq(&self.extras, &other.extras)
    }
}

impl<R: Record> NormalizedCollection<R> {
    /// Build a collection from records in iteration order
    ///
    /// A repeated id keeps its first position and its last record.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let mut order = Vec::new();
        let mut index = Index::default();
        for record in records {
            let id = record.id().to_string();
            if index.insert(id.clone(), record).is_none() {
                order.push(id);
            }
        }
        Self::from_parts(Arc::new(order), Arc::new(index), Arc::new(Extras::new()))
    }

    /// Verify that `order` matches the index keys and every record sits under its own id
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for id in self.order.iter() {
            if !seen.insert(id.as_str()) {
                return Err(Error::Corrupted(format!("duplicate id {} in order", id)));
            }
            if !self.index.contains_key(id) {
                return Err(Error::Corrupted(format!("id {} in order but not in index", id)));
            }
        }
        if self.index.len() != self.order.len() {
            let dangling: Vec<&str> = self
                .index
                .keys()
                .filter(|k| !seen.contains(k.as_str()))
                .map(|k| k.as_str())
                .collect();
            return Err(Error::Corrupted(format!(
                "ids {} in index but not in order",
                dangling.join(", ")
            )));
        }
        for (key, record) in self.index.iter() {
            if record.id() != key {
                return Err(Error::Corrupted(format!(
                    "record under {} has id {}",
                    key,
                    record.id()
                )));
            }
        }
        Ok(())
    }
}

impl<R: PartialEq> PartialEq for NormalizedCollection<R> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.index == other.index && self.extras == other.extras
    }
}

// =============================================================================
// Serde
// =============================================================================

#[derive(Serialize)]
struct ReprRef<'a, R> {
    order: &'a [String],
    index: &'a Index<R>,
    #[serde(flatten)]
    extras: &'a Extras,
}

#[derive(Deserialize)]
struct Repr<R> {
    order: Vec<String>,
    index: Index<R>,
    #[serde(flatten)]
    extras: Extras,
}

impl<R: Serialize> Serialize for NormalizedCollection<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ReprRef {
            order: &self.order,
            index: &self.index,
            extras: &self.extras,
        }
        .serialize(serializer)
    }
}

impl<'de, R> Deserialize<'de> for NormalizedCollection<R>
where
    R: Record + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = Repr::<R>::deserialize(deserializer)?;
        let collection =
            Self::from_parts(Arc::new(repr.order), Arc::new(repr.index), Arc::new(repr.extras));
        collection.check_invariants().map_err(de::Error::custom)?;
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Entity;
    use serde_json::json;

    fn foo_bar() -> NormalizedCollection<Entity> {
        NormalizedCollection::from_records(vec![
            Entity::new("foo").with("name", "Foo"),
            Entity::new("bar").with("name", "Bar"),
        ])
    }

    #[test]
    fn test_new_is_empty_and_fresh() {
        let a: NormalizedCollection<Entity> = NormalizedCollection::new();
        let b: NormalizedCollection<Entity> = NormalizedCollection::new();
        assert!(a.is_empty());
        assert_eq!(a, b);
        // Each default is its own allocation, never a shared singleton
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_from_records_keeps_insertion_order() {
        let c = foo_bar();
        assert_eq!(c.order(), &["foo".to_string(), "bar".to_string()]);
        assert_eq!(c.get("bar").unwrap().get("name"), Some(&json!("Bar")));
        c.check_invariants().unwrap();
    }

    #[test]
    fn test_from_records_repeated_id_keeps_first_position() {
        let c = NormalizedCollection::from_records(vec![
            Entity::new("a").with("v", 1),
            Entity::new("b"),
            Entity::new("a").with("v", 2),
        ]);
        assert_eq!(c.order(), &["a".to_string(), "b".to_string()]);
        assert_eq!(c.get("a").unwrap().get("v"), Some(&json!(2)));
        c.check_invariants().unwrap();
    }

    #[test]
    fn test_clone_shares_all_parts() {
        let c = foo_bar();
        let d = c.clone();
        assert!(c.ptr_eq(&d));
    }

    #[test]
    fn test_with_extra_shares_order_and_index() {
        let c = foo_bar();
        let d = c.with_extra("loading", true);
        assert!(d.shares_order_with(&c));
        assert!(d.shares_index_with(&c));
        assert!(!d.ptr_eq(&c));
        assert_eq!(d.extra("loading"), Some(&json!(true)));
        assert_eq!(c.extra("loading"), None);
    }

    #[test]
    fn test_check_invariants_detects_duplicates() {
        let c = foo_bar();
        let order = Arc::new(vec!["foo".to_string(), "foo".to_string()]);
        let broken = c.with_order_and_index(order, Arc::clone(c.index_arc()));
        assert!(matches!(broken.check_invariants(), Err(Error::Corrupted(_))));
    }

    #[test]
    fn test_check_invariants_detects_dangling_index_entry() {
        let c = foo_bar();
        let order = Arc::new(vec!["foo".to_string()]);
        let broken = c.with_order_and_index(order, Arc::clone(c.index_arc()));
        let err = broken.check_invariants().unwrap_err();
        assert!(err.to_string().contains("bar"));
    }

    #[test]
    fn test_check_invariants_detects_id_mismatch() {
        let mut index = Index::default();
        index.insert("foo".to_string(), Entity::new("other"));
        let broken = NormalizedCollection::from_parts(
            Arc::new(vec!["foo".to_string()]),
            Arc::new(index),
            Arc::new(Extras::new()),
        );
        assert!(broken.check_invariants().is_err());
    }

    #[test]
    fn test_serde_shape_flattens_extras() {
        let c = foo_bar().with_extra("page", 2);
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["order"], json!(["foo", "bar"]));
        assert_eq!(v["index"]["foo"], json!({"id": "foo", "name": "Foo"}));
        assert_eq!(v["page"], json!(2));

        let back: NormalizedCollection<Entity> = serde_json::from_value(v).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_state() {
        let v = json!({"order": ["foo"], "index": {}});
        let r: std::result::Result<NormalizedCollection<Entity>, _> = serde_json::from_value(v);
        assert!(r.is_err());
    }
}
