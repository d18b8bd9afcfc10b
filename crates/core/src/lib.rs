//! Core types for normalized collections
//!
//! This crate defines the foundational types used throughout the workspace:
//! - NormalizedCollection: ordered id list plus id-to-record index
//! - Record / ShallowMerge: the capabilities a stored record provides
//! - Entity: a dynamic JSON-object record
//! - Error: error type hierarchy, including constraint violations
//! - Query helpers: ordered projection, filtering, sorting, membership

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod error;
pub mod query;
pub mod record;

// Re-export commonly used types and traits
pub use collection::{Extras, Index, NormalizedCollection};
pub use error::{Error, Operation, Result};
pub use record::{Entity, Record, ShallowMerge, ID_FIELD};
