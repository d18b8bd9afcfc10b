//! Action dispatch for normalized collections
//!
//! Maps Redux-style actions onto the reducers in `normal-reducers`:
//! - **action**: the closed [`ActionType`] set, [`Action`] and its wire shape
//! - **config**: [`ReducerConfig`] (namespace, creator, merger, overrides, custom types,
//!   default extras) and the TOML-loadable [`ReducerSettings`]
//! - **creators**: namespaced [`ActionCreators`]
//! - **factories**: [`ActionReducer`] overrides that bind a creator or merger
//! - **normalized**: applying one entity type of a [`NormalizedPayload`]
//! - **reducer**: the dispatching [`Reducer`]
//!
//! ## Example
//!
//! ```
//! use normal_core::Entity;
//! use normal_dispatch::{Reducer, ReducerConfig};
//!
//! let reducer: Reducer<Entity> = Reducer::new(ReducerConfig::new().with_prefix("USERS_"));
//! let actions = reducer.action_creators();
//!
//! let state = reducer.reduce(None, actions.add(Entity::new("u1"))).unwrap();
//! let state = reducer.dispatch(&state, actions.move_record("u1", "u2")).unwrap();
//! assert_eq!(state.order(), &["u2".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod config;
pub mod creators;
pub mod factories;
pub mod normalized;
pub mod reducer;

pub use action::{Action, ActionType, Payload, PayloadKind};
pub use config::{Namespace, ReducerConfig, ReducerSettings};
pub use creators::ActionCreators;
pub use factories::{
    create_all_if_new_reducer, create_all_or_throw_reducer, create_all_reducer,
    create_if_new_reducer, create_or_throw_reducer, create_reducer, merge_all_existing_reducer,
    merge_all_or_throw_reducer, merge_all_reducer, merge_existing_reducer, merge_or_throw_reducer,
    merge_reducer, ActionReducer,
};
pub use normalized::{update_from_normalized, BatchReducer, NormalizedPayload, UpdateFromNormalized};
pub use reducer::Reducer;
