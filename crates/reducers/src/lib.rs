//! Reducers over normalized collections
//!
//! Pure state-transition functions for a [`NormalizedCollection`]:
//! - **primitives**: add, create, replace, merge, move, remove and their
//!   batch and add-or-X forms
//! - **safe**: if-new / existing / safe variants that filter or no-op
//!   instead of violating a precondition
//! - **throwing**: or-throw variants that refuse with a constraint
//!   violation carrying every offending id
//! - **functions**: the creator and merger values `create*` / `merge*` apply
//!
//! ## Sharing
//!
//! Every function returns the next state and shares each part it did not
//! touch with the input. A no-op returns a collection for which
//! [`NormalizedCollection::ptr_eq`] holds against the input.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod functions;
pub mod primitives;
pub mod safe;
pub mod throwing;

pub use functions::{Creator, Merger};
pub use normal_core::{Error, NormalizedCollection, Operation, Record, Result, ShallowMerge};
pub use primitives::{
    add, add_all, add_or_merge, add_or_merge_all, add_or_replace, add_or_replace_all, create,
    create_all, merge, merge_all, move_record, remove, remove_all, replace, replace_all,
};
pub use safe::{
    add_all_if_new, add_if_new, create_all_if_new, create_if_new, merge_all_existing,
    merge_existing, move_safe, remove_all_safe, remove_safe, replace_all_existing,
    replace_existing,
};
pub use throwing::{
    add_all_or_throw, add_or_throw, create_all_or_throw, create_or_throw, merge_all_or_throw,
    merge_or_throw, move_or_throw, replace_all_or_throw, replace_or_throw,
};
