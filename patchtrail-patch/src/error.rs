//! Error types for the patch algebra.

use thiserror::Error;

/// Result type for patch algebra operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Errors that can occur while computing, filtering or replaying patches.
///
/// Replay errors indicate a consistency violation in stored history (a gap
/// in the record sequence, or records replayed out of creation order) and
/// are not recoverable by retrying.
#[derive(Debug, Error)]
pub enum PatchError {
    /// A path is not a well-formed JSON Pointer.
    #[error("malformed JSON pointer: {0:?}")]
    MalformedPointer(String),

    /// An exclusion pattern could not be parsed.
    #[error("malformed exclusion pattern: {0}")]
    MalformedPattern(String),

    /// An array segment is not a valid index for its array.
    #[error("invalid array index {index:?} at {path:?}")]
    InvalidIndex { path: String, index: String },

    /// The parent of an operation's target path does not exist.
    #[error("missing parent for path {0:?}")]
    MissingParent(String),

    /// A `remove` or `replace` target does not exist.
    #[error("missing target for path {0:?}")]
    MissingTarget(String),

    /// An `add` or `replace` operation carries no value.
    #[error("operation at {0:?} carries no value")]
    MissingValue(String),

    /// The operation cannot apply to the value found at its parent path
    /// (e.g. a key lookup inside a scalar).
    #[error("cannot apply {op} at {path:?}")]
    IncompatibleTarget { op: String, path: String },
}
