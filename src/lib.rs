//! normal-reducer - Normalized collections with pure reducers
//!
//! A normalized collection keeps records in two parts: an ordered list of
//! ids and an id-to-record index. Every operation is a pure function that
//! returns the next state and shares every part it did not touch with the
//! previous one, so change detection is a pointer comparison.
//!
//! # Quick Start
//!
//! ```
//! use normal_reducer::{Entity, Reducer, ReducerConfig};
//!
//! let reducer: Reducer<Entity> = Reducer::new(ReducerConfig::new());
//! let actions = reducer.action_creators();
//!
//! let state = reducer.reduce(None, actions.add_all(vec![Entity::new("a"), Entity::new("b")]))?;
//! let next = reducer.dispatch(&state, actions.remove("missing"))?;
//! assert!(next.ptr_eq(&state));
//! # Ok::<(), normal_reducer::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `normal-core`: [`NormalizedCollection`], [`Record`], [`Entity`], [`Error`]
//! - `normal-reducers`: the pure operations and their safe / or-throw variants
//! - `normal-dispatch`: [`Action`], [`Reducer`], [`ActionCreators`], overrides

pub use normal_core::*;
pub use normal_dispatch::*;
pub use normal_reducers::*;
