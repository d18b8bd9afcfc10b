//! Actions
//!
//! An [`Action`] is a type string plus one payload. The type string may be
//! namespaced (`USERS_ADD`), so the dispatcher resolves it against its own
//! table into the closed [`ActionType`] enum and matches on that.
//!
//! ## Wire shape
//!
//! | Payload | JSON |
//! |---|---|
//! | record | `{"type": "ADD", "data": {...}}` |
//! | records | `{"type": "ADD_ALL", "data": [...]}` |
//! | move | `{"type": "MOVE", "from": "a", "to": "b"}` |
//! | id | `{"type": "REMOVE", "id": "a"}` |
//! | ids | `{"type": "REMOVE_ALL", "ids": ["a"]}` |
//! | normalized | `{"type": "UPDATE_NORMALIZED", "data": {"entities": {...}, "result": [...]}}` |

use crate::normalized::NormalizedPayload;
use normal_core::{Error, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The closed set of operations a dispatcher knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Add one record
    Add,
    /// Add a batch of records
    AddAll,
    /// Add one record if its id is new
    AddIfNew,
    /// Add the records whose ids are new
    AddAllIfNew,
    /// Merge one record, adding it when absent
    AddOrMerge,
    /// Merge a batch, adding absent records
    AddOrMergeAll,
    /// Replace one record, adding it when absent
    AddOrReplace,
    /// Replace a batch, adding absent records
    AddOrReplaceAll,
    /// Create one record through the creator
    Create,
    /// Create a batch through the creator
    CreateAll,
    /// Create one record if its id is new
    CreateIfNew,
    /// Create the records whose ids are new
    CreateAllIfNew,
    /// Merge into one existing record
    Merge,
    /// Merge into a batch of existing records
    MergeAll,
    /// Move a record to a new id
    Move,
    /// Remove one id
    Remove,
    /// Remove a list of ids
    RemoveAll,
    /// Replace one existing record
    Replace,
    /// Replace a batch of existing records
    ReplaceAll,
    /// Replace one record if it exists
    ReplaceExisting,
    /// Replace the records that exist
    ReplaceAllExisting,
    /// Add or merge one entity type out of a normalized payload
    UpdateNormalized,
}

/// The payload shape an action type expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// A single record
    Record,
    /// A list of records
    Records,
    /// A `from` / `to` id pair
    Move,
    /// A single id
    Id,
    /// A list of ids
    Ids,
    /// A normalized multi-entity payload
    Normalized,
}

impl ActionType {
    /// Every action type, in declaration order
    pub const ALL: [ActionType; 22] = [
        ActionType::Add,
        ActionType::AddAll,
        ActionType::AddIfNew,
        ActionType::AddAllIfNew,
        ActionType::AddOrMerge,
        ActionType::AddOrMergeAll,
        ActionType::AddOrReplace,
        ActionType::AddOrReplaceAll,
        ActionType::Create,
        ActionType::CreateAll,
        ActionType::CreateIfNew,
        ActionType::CreateAllIfNew,
        ActionType::Merge,
        ActionType::MergeAll,
        ActionType::Move,
        ActionType::Remove,
        ActionType::RemoveAll,
        ActionType::Replace,
        ActionType::ReplaceAll,
        ActionType::ReplaceExisting,
        ActionType::ReplaceAllExisting,
        ActionType::UpdateNormalized,
    ];

    /// The un-namespaced type string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Add => "ADD",
            ActionType::AddAll => "ADD_ALL",
            ActionType::AddIfNew => "ADD_IF_NEW",
            ActionType::AddAllIfNew => "ADD_ALL_IF_NEW",
            ActionType::AddOrMerge => "ADD_OR_MERGE",
            ActionType::AddOrMergeAll => "ADD_OR_MERGE_ALL",
            ActionType::AddOrReplace => "ADD_OR_REPLACE",
            ActionType::AddOrReplaceAll => "ADD_OR_REPLACE_ALL",
            ActionType::Create => "CREATE",
            ActionType::CreateAll => "CREATE_ALL",
            ActionType::CreateIfNew => "CREATE_IF_NEW",
            ActionType::CreateAllIfNew => "CREATE_ALL_IF_NEW",
            ActionType::Merge => "MERGE",
            ActionType::MergeAll => "MERGE_ALL",
            ActionType::Move => "MOVE",
            ActionType::Remove => "REMOVE",
            ActionType::RemoveAll => "REMOVE_ALL",
            ActionType::Replace => "REPLACE",
            ActionType::ReplaceAll => "REPLACE_ALL",
            ActionType::ReplaceExisting => "REPLACE_EXISTING",
            ActionType::ReplaceAllExisting => "REPLACE_ALL_EXISTING",
            ActionType::UpdateNormalized => "UPDATE_NORMALIZED",
        }
    }

    /// The payload shape this type expects
    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            ActionType::Add
            | ActionType::AddIfNew
            | ActionType::AddOrMerge
            | ActionType::AddOrReplace
            | ActionType::Create
            | ActionType::CreateIfNew
            | ActionType::Merge
            | ActionType::Replace
            | ActionType::ReplaceExisting => PayloadKind::Record,
            ActionType::AddAll
            | ActionType::AddAllIfNew
            | ActionType::AddOrMergeAll
            | ActionType::AddOrReplaceAll
            | ActionType::CreateAll
            | ActionType::CreateAllIfNew
            | ActionType::MergeAll
            | ActionType::ReplaceAll
            | ActionType::ReplaceAllExisting => PayloadKind::Records,
            ActionType::Move => PayloadKind::Move,
            ActionType::Remove => PayloadKind::Id,
            ActionType::RemoveAll => PayloadKind::Ids,
            ActionType::UpdateNormalized => PayloadKind::Normalized,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ActionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown action type '{}'", s)))
    }
}

// =============================================================================
// Payload / Action
// =============================================================================

/// The data an action carries
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<R> {
    /// A single record
    Record(R),
    /// A list of records
    Records(Vec<R>),
    /// A `from` / `to` id pair
    Move {
        /// Source id
        from: String,
        /// Destination id
        to: String,
    },
    /// A single id
    Id(String),
    /// A list of ids
    Ids(Vec<String>),
    /// A normalized multi-entity payload
    Normalized(NormalizedPayload<R>),
    /// No payload, for custom action types
    None,
}

impl<R> Payload<R> {
    /// The shape of this payload, `None` for an empty payload
    pub fn kind(&self) -> Option<PayloadKind> {
        match self {
            Payload::Record(_) => Some(PayloadKind::Record),
            Payload::Records(_) => Some(PayloadKind::Records),
            Payload::Move { .. } => Some(PayloadKind::Move),
            Payload::Id(_) => Some(PayloadKind::Id),
            Payload::Ids(_) => Some(PayloadKind::Ids),
            Payload::Normalized(_) => Some(PayloadKind::Normalized),
            Payload::None => None,
        }
    }
}

/// A requested state transition
#[derive(Debug, Clone, PartialEq)]
pub struct Action<R> {
    /// Type string, possibly namespaced
    pub kind: String,
    /// Operation arguments
    pub payload: Payload<R>,
}

impl<R> Action<R> {
    /// Create an action from a type string and payload
    pub fn new(kind: impl Into<String>, payload: Payload<R>) -> Self {
        Action {
            kind: kind.into(),
            payload,
        }
    }

    /// Create an action using the un-namespaced type string of `action_type`
    pub fn of(action_type: ActionType, payload: Payload<R>) -> Self {
        Self::new(action_type.as_str(), payload)
    }
}

// =============================================================================
// Serde
// =============================================================================

// Serialization borrows the payload; deserialization reads every known
// field first and then picks the payload from what is present.

#[derive(Serialize)]
#[serde(untagged)]
enum WireData<'a, R> {
    Records(&'a [R]),
    Normalized(&'a NormalizedPayload<R>),
    Record(&'a R),
}

#[derive(Serialize)]
struct WireActionRef<'a, R> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<WireData<'a, R>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ids: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct WireAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    ids: Option<Vec<String>>,
}

/// Whether `data` should be read as a normalized payload
///
/// The type string decides when it names `UPDATE_NORMALIZED`; otherwise an
/// object needs both `entities` and `result`.
fn is_normalized_data(kind: &str, data: &Value) -> bool {
    if kind.contains(ActionType::UpdateNormalized.as_str()) {
        return true;
    }
    match data {
        Value::Object(map) => map.contains_key("entities") && map.contains_key("result"),
        _ => false,
    }
}

impl WireAction {
    fn into_action<R: DeserializeOwned>(self) -> std::result::Result<Action<R>, String> {
        let payload = match (self.data, self.from, self.to) {
            (Some(data), _, _) => match data {
                Value::Array(_) => Payload::Records(
                    serde_json::from_value(data).map_err(|e| format!("invalid records: {}", e))?,
                ),
                data if is_normalized_data(&self.kind, &data) => Payload::Normalized(
                    serde_json::from_value(data)
                        .map_err(|e| format!("invalid normalized payload: {}", e))?,
                ),
                data => Payload::Record(
                    serde_json::from_value(data).map_err(|e| format!("invalid record: {}", e))?,
                ),
            },
            (None, Some(from), Some(to)) => Payload::Move { from, to },
            (None, Some(_), None) => return Err("move is missing `to`".to_string()),
            (None, None, Some(_)) => return Err("move is missing `from`".to_string()),
            (None, None, None) => match (self.ids, self.id) {
                (Some(ids), _) => Payload::Ids(ids),
                (None, Some(id)) => Payload::Id(id),
                (None, None) => Payload::None,
            },
        };
        Ok(Action::new(self.kind, payload))
    }
}

impl<R: Serialize> Serialize for Action<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut wire = WireActionRef {
            kind: &self.kind,
            data: None,
            from: None,
            to: None,
            id: None,
            ids: None,
        };
        match &self.payload {
            Payload::Record(r) => wire.data = Some(WireData::Record(r)),
            Payload::Records(rs) => wire.data = Some(WireData::Records(rs.as_slice())),
            Payload::Normalized(n) => wire.data = Some(WireData::Normalized(n)),
            Payload::Move { from, to } => {
                wire.from = Some(from.as_str());
                wire.to = Some(to.as_str());
            }
            Payload::Id(id) => wire.id = Some(id.as_str()),
            Payload::Ids(ids) => wire.ids = Some(ids.as_slice()),
            Payload::None => {}
        }
        wire.serialize(serializer)
    }
}

impl<'de, R: DeserializeOwned> Deserialize<'de> for Action<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        WireAction::deserialize(deserializer)?
            .into_action()
            .map_err(de::Error::custom)
    }
}
