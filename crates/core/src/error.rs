//! Error types for normalized collections
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! - **Constraint violations** (`AlreadyExists`, `NotFound`): raised by the
//!   `*_or_throw` operations. They carry the operation and every offending id,
//!   so a batch reports all of its violations in a single error.
//! - **Data errors** (`MissingId`, `Corrupted`): a record without a usable id,
//!   or a collection that fails its invariant check.
//! - **Configuration errors** (`Config`): reducer settings that fail to parse.
//!
//! No-ops are never errors: empty batches, removing absent ids and unknown
//! action types all return the input state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for collection operations
pub type Result<T> = std::result::Result<T, Error>;

/// The operation that raised a constraint violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Add a single record
    Add,
    /// Add a batch of records
    AddAll,
    /// Create a single record through a creator
    Create,
    /// Create a batch of records through a creator
    CreateAll,
    /// Merge a partial record into an existing one
    Merge,
    /// Merge a batch of partial records
    MergeAll,
    /// Replace an existing record
    Replace,
    /// Replace a batch of existing records
    ReplaceAll,
    /// Move a record to a new id
    Move,
}

impl Operation {
    /// Verb used in error messages
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Add | Operation::AddAll => "add",
            Operation::Create | Operation::CreateAll => "create",
            Operation::Merge | Operation::MergeAll => "merge",
            Operation::Replace | Operation::ReplaceAll => "replace",
            Operation::Move => "move",
        }
    }

    /// Whether this is a batch operation
    pub fn is_batch(&self) -> bool {
        matches!(
            self,
            Operation::AddAll | Operation::CreateAll | Operation::MergeAll | Operation::ReplaceAll
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::AddAll => "add_all",
            Operation::Create => "create",
            Operation::CreateAll => "create_all",
            Operation::Merge => "merge",
            Operation::MergeAll => "merge_all",
            Operation::Replace => "replace",
            Operation::ReplaceAll => "replace_all",
            Operation::Move => "move",
        };
        f.write_str(name)
    }
}

/// Error types for normalized collections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// One or more ids are already present in the collection
    #[error("can't {} {}: already exist{}", .op.verb(), id_list(.ids), plural_s(.ids))]
    AlreadyExists {
        /// Operation that was refused
        op: Operation,
        /// Every offending id, in input order
        ids: Vec<String>,
    },

    /// One or more ids are missing from the collection
    #[error("can't {} {}: not found", .op.verb(), id_list(.ids))]
    NotFound {
        /// Operation that was refused
        op: Operation,
        /// Every offending id, in input order
        ids: Vec<String>,
    },

    /// A record has no usable identifier field
    #[error("record has no string `id` field")]
    MissingId,

    /// The collection does not satisfy its order/index invariants
    #[error("Collection corrupted: {0}")]
    Corrupted(String),

    /// Reducer settings could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn id_list(ids: &[String]) -> String {
    match ids {
        [single] => format!("id {}", single),
        many => format!("ids {}", many.join(", ")),
    }
}

fn plural_s(ids: &[String]) -> &'static str {
    if ids.len() == 1 {
        "s"
    } else {
        ""
    }
}

impl Error {
    /// Build an `AlreadyExists` error
    pub fn already_exists(op: Operation, ids: Vec<String>) -> Self {
        Error::AlreadyExists { op, ids }
    }

    /// Build a `NotFound` error
    pub fn not_found(op: Operation, ids: Vec<String>) -> Self {
        Error::NotFound { op, ids }
    }

    /// Whether this error is an invariant violation raised by an `*_or_throw` operation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. } | Error::NotFound { .. })
    }

    /// The operation that raised a constraint violation
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::AlreadyExists { op, .. } | Error::NotFound { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Offending ids of a constraint violation (empty for other errors)
    pub fn ids(&self) -> &[String] {
        match self {
            Error::AlreadyExists { ids, .. } | Error::NotFound { ids, .. } => ids,
            _ => &[],
        }
    }
}
