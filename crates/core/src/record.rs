//! Record capabilities
//!
//! The collection is agnostic about record shape. It only needs to read a
//! record's id and, when a record moves, produce a copy carrying the new id.
//!
//! - [`Record`]: the identifier capability every stored type implements
//! - [`ShallowMerge`]: the default merge contract (`{...existing, ...patch}`)
//! - [`Entity`]: a ready-made JSON-object record for dynamic data

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field in [`Entity`] objects
pub const ID_FIELD: &str = "id";

/// A uniquely identified record
///
/// Implementors must keep `with_id(x).id() == x`.
pub trait Record: Clone {
    /// The record's identifier
    fn id(&self) -> &str;

    /// A copy of this record with its identifier rewritten
    fn with_id(&self, id: &str) -> Self;
}

/// Right-biased shallow merge, the default merger's contract
///
/// `existing.shallow_merge(patch)` keeps every field of `existing` that
/// `patch` does not set, and takes `patch`'s value for every field it does.
pub trait ShallowMerge {
    /// Merge `patch` over `self`
    fn shallow_merge(&self, patch: &Self) -> Self;
}

// =============================================================================
// Entity
// =============================================================================

/// A dynamic record backed by a JSON object with a string `id` field
///
/// Serializes transparently as the underlying object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Entity {
    id: String,
    fields: Map<String, Value>,
}

impl Entity {
    /// Create an entity holding only its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        Entity { id, fields }
    }

    /// Build an entity from a JSON value
    ///
    /// Fails with [`Error::MissingId`] unless `value` is an object with a
    /// string `id` field.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::try_from(map),
            _ => Err(Error::MissingId),
        }
    }

    /// Set a field (builder pattern)
    ///
    /// Setting `id` to a string also changes the entity's identity;
    /// non-string values for `id` are ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if key == ID_FIELD {
            if let Value::String(id) = value {
                self.id = id.clone();
                self.fields.insert(key, Value::String(id));
            }
            return;
        }
        self.fields.insert(key, value);
    }

    /// Read a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields, including `id`
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Convert into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Map<String, Value>> for Entity {
    type Error = Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        let id = match fields.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            _ => return Err(Error::MissingId),
        };
        Ok(Entity { id, fields })
    }
}

impl From<Entity> for Map<String, Value> {
    fn from(entity: Entity) -> Self {
        entity.fields
    }
}

impl Record for Entity {
    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(&self, id: &str) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        Entity {
            id: id.to_string(),
            fields,
        }
    }
}

impl ShallowMerge for Entity {
    fn shallow_merge(&self, patch: &Self) -> Self {
        let mut fields = self.fields.clone();
        for (k, v) in &patch.fields {
            fields.insert(k.clone(), v.clone());
        }
        Entity {
            id: patch.id.clone(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_new_has_id_field() {
        let e = Entity::new("foo");
        assert_eq!(e.id(), "foo");
        assert_eq!(e.get("id"), Some(&json!("foo")));
    }

    #[test]
    fn test_entity_from_value_requires_string_id() {
        assert_eq!(Entity::from_value(json!({"name": "x"})), Err(Error::MissingId));
        assert_eq!(Entity::from_value(json!({"id": 4})), Err(Error::MissingId));
        assert_eq!(Entity::from_value(json!([1, 2])), Err(Error::MissingId));

        let e = Entity::from_value(json!({"id": "a", "n": 1})).unwrap();
        assert_eq!(e.id(), "a");
        assert_eq!(e.get("n"), Some(&json!(1)));
    }

    #[test]
    fn test_with_id_rewrites_field_and_keeps_rest() {
        let e = Entity::new("foo").with("name", "Foo");
        let moved = e.with_id("baz");
        assert_eq!(moved.id(), "baz");
        assert_eq!(moved.get("id"), Some(&json!("baz")));
        assert_eq!(moved.get("name"), Some(&json!("Foo")));
        // source untouched
        assert_eq!(e.id(), "foo");
    }

    #[test]
    fn test_set_id_with_non_string_is_ignored() {
        let mut e = Entity::new("foo");
        e.set("id", 12);
        assert_eq!(e.id(), "foo");
        assert_eq!(e.get("id"), Some(&json!("foo")));
    }

    #[test]
    fn test_shallow_merge_is_right_biased() {
        let existing = Entity::new("foo").with("a", 1).with("b", 2);
        let patch = Entity::new("foo").with("b", 3).with("c", 4);
        let merged = existing.shallow_merge(&patch);
        assert_eq!(
            merged.into_value(),
            json!({"id": "foo", "a": 1, "b": 3, "c": 4})
        );
    }

    #[test]
    fn test_entity_serde_is_transparent() {
        let e = Entity::new("foo").with("name", "Foo");
        let s = serde_json::to_value(&e).unwrap();
        assert_eq!(s, json!({"id": "foo", "name": "Foo"}));

        let back: Entity = serde_json::from_value(s).unwrap();
        assert_eq!(back, e);

        let bad: std::result::Result<Entity, _> = serde_json::from_value(json!({"name": "x"}));
        assert!(bad.is_err());
    }
}
