//! The dispatching reducer
//!
//! [`Reducer`] routes an [`Action`] to the collection operation its type
//! names. Type strings are resolved once, through a table built from the
//! configured namespace, into the closed [`ActionType`] enum.
//!
//! ## Routing order
//!
//! 1. A custom reducer registered for the exact type string handles the
//!    action, whether or not the string names a built-in type.
//! 2. Unknown type string: the state is returned unchanged.
//! 3. A registered override for the type handles the action.
//! 4. Otherwise the built-in operation runs. A [`Reducer::throwing`]
//!    reducer uses the or-throw forms for the nine operations that have
//!    one (`ADD`, `ADD_ALL`, `CREATE`, `CREATE_ALL`, `MERGE`, `MERGE_ALL`,
//!    `MOVE`, `REPLACE`, `REPLACE_ALL`).
//!
//! A payload whose shape does not fit the type is ignored like an unknown
//! action. `UPDATE_NORMALIZED` is ignored unless an entity key is configured.

use crate::action::{Action, ActionType, Payload};
use crate::config::ReducerConfig;
use crate::creators::ActionCreators;
use crate::factories::TARGET;
use crate::normalized::UpdateFromNormalized;
use normal_core::{NormalizedCollection, Record, Result};
use normal_reducers as reducers;
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, warn};

/// Which registry the built-in operations come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Standard,
    OrThrow,
}

/// Dispatches actions to collection operations
pub struct Reducer<R> {
    config: ReducerConfig<R>,
    variant: Variant,
    table: FxHashMap<String, ActionType>,
    normalized: Option<UpdateFromNormalized<R>>,
}

impl<R: Record + 'static> Reducer<R> {
    /// Reducer using the plain operations
    pub fn new(config: ReducerConfig<R>) -> Self {
        Self::build(config, Variant::Standard)
    }

    /// Reducer that refuses violated preconditions with an error
    pub fn throwing(config: ReducerConfig<R>) -> Self {
        Self::build(config, Variant::OrThrow)
    }

    fn build(config: ReducerConfig<R>, variant: Variant) -> Self {
        let table = ActionType::ALL
            .iter()
            .map(|t| (config.namespace().apply(*t), *t))
            .collect();
        let normalized = config.entity_key().map(|key| {
            let merger = config.merger().clone();
            UpdateFromNormalized::with_reducer(key, move |state, records| {
                reducers::add_or_merge_all(state, records, &merger)
            })
        });
        Reducer {
            config,
            variant,
            table,
            normalized,
        }
    }
}

impl<R: Record> Reducer<R> {
    /// The configuration this reducer was built from
    pub fn config(&self) -> &ReducerConfig<R> {
        &self.config
    }

    /// Whether this reducer uses the or-throw operations
    pub fn is_throwing(&self) -> bool {
        self.variant == Variant::OrThrow
    }

    /// Action creators sharing this reducer's namespace
    pub fn action_creators(&self) -> ActionCreators {
        ActionCreators::new(self.config.namespace().clone())
    }

    /// The action type a (namespaced) type string names, if any
    pub fn resolve(&self, kind: &str) -> Option<ActionType> {
        self.table.get(kind).copied()
    }

    /// A fresh empty collection carrying the configured default extras
    pub fn initial_state(&self) -> NormalizedCollection<R> {
        NormalizedCollection::with_extras(self.config.default_extras().clone())
    }

    /// Apply `action` to `state`, starting from [`Reducer::initial_state`]
    /// when there is no state yet
    pub fn reduce(
        &self,
        state: Option<&NormalizedCollection<R>>,
        action: Action<R>,
    ) -> Result<NormalizedCollection<R>> {
        match state {
            Some(state) => self.dispatch(state, action),
            None => self.dispatch(&self.initial_state(), action),
        }
    }

    /// Apply `action` to `state`
    ///
    /// # Errors
    ///
    /// Only a throwing reducer or an override returns errors: a constraint
    /// violation naming every offending id. The input state is untouched.
    pub fn dispatch(
        &self,
        state: &NormalizedCollection<R>,
        action: Action<R>,
    ) -> Result<NormalizedCollection<R>> {
        if let Some(reducer) = self.config.custom_for(&action.kind) {
            debug!(target: TARGET, kind = %action.kind, "dispatching to custom reducer");
            return reducer.apply(state, action);
        }
        let Some(action_type) = self.resolve(&action.kind) else {
            debug!(target: TARGET, kind = %action.kind, "unknown action type, state unchanged");
            return Ok(state.clone());
        };
        if let Some(reducer) = self.config.override_for(action_type) {
            debug!(target: TARGET, kind = %action.kind, %action_type, "dispatching to override");
            return reducer.apply(state, action);
        }
        debug!(target: TARGET, kind = %action.kind, %action_type, "dispatching");
        self.builtin(action_type, state, action.payload)
    }

    fn builtin(
        &self,
        action_type: ActionType,
        state: &NormalizedCollection<R>,
        payload: Payload<R>,
    ) -> Result<NormalizedCollection<R>> {
        use ActionType as T;
        use Payload as P;

        let creator = self.config.creator();
        let merger = self.config.merger();
        let throwing = self.is_throwing();

        let next = match (action_type, payload) {
            (T::Add, P::Record(r)) if throwing => reducers::add_or_throw(state, r)?,
            (T::Add, P::Record(r)) => reducers::add(state, r),
            (T::AddAll, P::Records(rs)) if throwing => reducers::add_all_or_throw(state, rs)?,
            (T::AddAll, P::Records(rs)) => reducers::add_all(state, rs),
            (T::AddIfNew, P::Record(r)) => reducers::add_if_new(state, r),
            (T::AddAllIfNew, P::Records(rs)) => reducers::add_all_if_new(state, rs),
            (T::AddOrMerge, P::Record(r)) => reducers::add_or_merge(state, r, merger),
            (T::AddOrMergeAll, P::Records(rs)) => reducers::add_or_merge_all(state, rs, merger),
            (T::AddOrReplace, P::Record(r)) => reducers::add_or_replace(state, r),
            (T::AddOrReplaceAll, P::Records(rs)) => reducers::add_or_replace_all(state, rs),

            (T::Create, P::Record(d)) if throwing => reducers::create_or_throw(state, d, creator)?,
            (T::Create, P::Record(d)) => reducers::create(state, d, creator),
            (T::CreateAll, P::Records(ds)) if throwing => {
                reducers::create_all_or_throw(state, ds, creator)?
            }
            (T::CreateAll, P::Records(ds)) => reducers::create_all(state, ds, creator),
            (T::CreateIfNew, P::Record(d)) => reducers::create_if_new(state, d, creator),
            (T::CreateAllIfNew, P::Records(ds)) => reducers::create_all_if_new(state, ds, creator),

            (T::Merge, P::Record(p)) if throwing => reducers::merge_or_throw(state, p, merger)?,
            (T::Merge, P::Record(p)) => reducers::merge(state, p, merger),
            (T::MergeAll, P::Records(ps)) if throwing => {
                reducers::merge_all_or_throw(state, ps, merger)?
            }
            (T::MergeAll, P::Records(ps)) => reducers::merge_all(state, ps, merger),

            (T::Replace, P::Record(r)) if throwing => reducers::replace_or_throw(state, r)?,
            (T::Replace, P::Record(r)) => reducers::replace(state, r),
            (T::ReplaceAll, P::Records(rs)) if throwing => {
                reducers::replace_all_or_throw(state, rs)?
            }
            (T::ReplaceAll, P::Records(rs)) => reducers::replace_all(state, rs),
            (T::ReplaceExisting, P::Record(r)) => reducers::replace_existing(state, r),
            (T::ReplaceAllExisting, P::Records(rs)) => reducers::replace_all_existing(state, rs),

            (T::Move, P::Move { from, to }) if throwing => reducers::move_or_throw(state, &from, &to)?,
            (T::Move, P::Move { from, to }) => reducers::move_record(state, &from, &to),
            (T::Remove, P::Id(id)) => reducers::remove(state, &id),
            (T::RemoveAll, P::Ids(ids)) => reducers::remove_all(state, &ids),

            (T::UpdateNormalized, P::Normalized(payload)) => match &self.normalized {
                Some(adapter) => adapter.apply(state, &payload),
                None => {
                    warn!(target: TARGET, "no entity key configured, UPDATE_NORMALIZED ignored");
                    state.clone()
                }
            },

            (action_type, payload) => {
                warn!(
                    target: TARGET,
                    %action_type,
                    expected = ?action_type.payload_kind(),
                    got = ?payload.kind(),
                    "payload does not match action type, action ignored"
                );
                state.clone()
            }
        };
        Ok(next)
    }
}

impl<R> Clone for Reducer<R> {
    fn clone(&self) -> Self {
        Reducer {
            config: self.config.clone(),
            variant: self.variant,
            table: self.table.clone(),
            normalized: self.normalized.clone(),
        }
    }
}

impl<R> fmt::Debug for Reducer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("config", &self.config)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
