//! Action creators
//!
//! [`ActionCreators`] builds correctly namespaced [`Action`]s, one
//! constructor per [`ActionType`]. [`ActionCreators::names`] exposes the
//! camelCase name each constructor goes by on the wire side, derived from
//! the namespaced type string (`USERS_ADD_ALL` is `usersAddAll`).

use crate::action::{Action, ActionType, Payload};
use crate::config::Namespace;
use crate::normalized::NormalizedPayload;
use heck::ToLowerCamelCase;
use std::collections::BTreeMap;

/// Namespaced action constructors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionCreators {
    namespace: Namespace,
}

impl ActionCreators {
    /// Creators for `namespace`
    pub fn new(namespace: Namespace) -> Self {
        ActionCreators { namespace }
    }

    /// The namespace applied to every type string
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The namespaced type string for `action_type`
    pub fn type_of(&self, action_type: ActionType) -> String {
        self.namespace.apply(action_type)
    }

    /// Every action type mapped to its namespaced type string
    pub fn types(&self) -> BTreeMap<ActionType, String> {
        ActionType::ALL
            .iter()
            .map(|t| (*t, self.type_of(*t)))
            .collect()
    }

    /// camelCase constructor name mapped to its namespaced type string
    pub fn names(&self) -> BTreeMap<String, String> {
        ActionType::ALL
            .iter()
            .map(|t| {
                let kind = self.type_of(*t);
                (kind.to_lower_camel_case(), kind)
            })
            .collect()
    }

    fn action<R>(&self, action_type: ActionType, payload: Payload<R>) -> Action<R> {
        Action::new(self.type_of(action_type), payload)
    }

    // ------------------------------------------------------------------------
    // Single record
    // ------------------------------------------------------------------------

    /// `ADD`
    pub fn add<R>(&self, record: R) -> Action<R> {
        self.action(ActionType::Add, Payload::Record(record))
    }

    /// `ADD_IF_NEW`
    pub fn add_if_new<R>(&self, record: R) -> Action<R> {
        self.action(ActionType::AddIfNew, Payload::Record(record))
    }

    /// `ADD_OR_MERGE`
    pub fn add_or_merge<R>(&self, record: R) -> Action<R> {
        self.action(ActionType::AddOrMerge, Payload::Record(record))
    }

    /// `ADD_OR_REPLACE`
    pub fn add_or_replace<R>(&self, record: R) -> Action<R> {
        self.action(ActionType::AddOrReplace, Payload::Record(record))
    }

    /// `CREATE`
    pub fn create<R>(&self, data: R) -> Action<R> {
        self.action(ActionType::Create, Payload::Record(data))
    }

    /// `CREATE_IF_NEW`
    pub fn create_if_new<R>(&self, data: R) -> Action<R> {
        self.action(ActionType::CreateIfNew, Payload::Record(data))
    }

    /// `MERGE`
    pub fn merge<R>(&self, patch: R) -> Action<R> {
        self.action(ActionType::Merge, Payload::Record(patch))
    }

    /// `REPLACE`
    pub fn replace<R>(&self, record: R) -> Action<R> {
        self.action(ActionType::Replace, Payload::Record(record))
    }

    /// `REPLACE_EXISTING`
    pub fn replace_existing<R>(&self, record: R) -> Action<R> {
        self.action(ActionType::ReplaceExisting, Payload::Record(record))
    }

    // ------------------------------------------------------------------------
    // Batches
    // ------------------------------------------------------------------------

    /// `ADD_ALL`
    pub fn add_all<R>(&self, records: Vec<R>) -> Action<R> {
        self.action(ActionType::AddAll, Payload::Records(records))
    }

    /// `ADD_ALL_IF_NEW`
    pub fn add_all_if_new<R>(&self, records: Vec<R>) -> Action<R> {
        self.action(ActionType::AddAllIfNew, Payload::Records(records))
    }

    /// `ADD_OR_MERGE_ALL`
    pub fn add_or_merge_all<R>(&self, records: Vec<R>) -> Action<R> {
        self.action(ActionType::AddOrMergeAll, Payload::Records(records))
    }

    /// `ADD_OR_REPLACE_ALL`
    pub fn add_or_replace_all<R>(&self, records: Vec<R>) -> Action<R> {
        self.action(ActionType::AddOrReplaceAll, Payload::Records(records))
    }

    /// `CREATE_ALL`
    pub fn create_all<R>(&self, data: Vec<R>) -> Action<R> {
        self.action(ActionType::CreateAll, Payload::Records(data))
    }

    /// `CREATE_ALL_IF_NEW`
    pub fn create_all_if_new<R>(&self, data: Vec<R>) -> Action<R> {
        self.action(ActionType::CreateAllIfNew, Payload::Records(data))
    }

    /// `MERGE_ALL`
    pub fn merge_all<R>(&self, patches: Vec<R>) -> Action<R> {
        self.action(ActionType::MergeAll, Payload::Records(patches))
    }

    /// `REPLACE_ALL`
    pub fn replace_all<R>(&self, records: Vec<R>) -> Action<R> {
        self.action(ActionType::ReplaceAll, Payload::Records(records))
    }

    /// `REPLACE_ALL_EXISTING`
    pub fn replace_all_existing<R>(&self, records: Vec<R>) -> Action<R> {
        self.action(ActionType::ReplaceAllExisting, Payload::Records(records))
    }

    // ------------------------------------------------------------------------
    // Ids and payloads
    // ------------------------------------------------------------------------

    /// `MOVE`
    pub fn move_record<R>(&self, from: impl Into<String>, to: impl Into<String>) -> Action<R> {
        self.action(
            ActionType::Move,
            Payload::Move {
                from: from.into(),
                to: to.into(),
            },
        )
    }

    /// `REMOVE`
    pub fn remove<R>(&self, id: impl Into<String>) -> Action<R> {
        self.action(ActionType::Remove, Payload::Id(id.into()))
    }

    /// `REMOVE_ALL`
    pub fn remove_all<R, S: Into<String>>(&self, ids: impl IntoIterator<Item = S>) -> Action<R> {
        self.action(
            ActionType::RemoveAll,
            Payload::Ids(ids.into_iter().map(Into::into).collect()),
        )
    }

    /// `UPDATE_NORMALIZED`
    pub fn update_normalized<R>(&self, payload: NormalizedPayload<R>) -> Action<R> {
        self.action(ActionType::UpdateNormalized, Payload::Normalized(payload))
    }
}
