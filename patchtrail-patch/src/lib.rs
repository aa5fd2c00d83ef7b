//! Patch algebra for patchtrail.
//!
//! Pure, synchronous computation over JSON data views:
//! - **diff**: compute the RFC-6902-style operation sequence turning one
//!   data view into another
//! - **exclude**: filter and redact operations against wildcard path rules
//!   so excluded sub-trees never reach persisted history
//! - **original values**: tag surviving operations with the pre-mutation
//!   value at their path
//! - **replay**: apply an ordered operation sequence onto an accumulator,
//!   reconstructing any past state from `{}`
//!
//! Nothing in this crate performs I/O. Malformed pointers or a replay
//! against inconsistent state are fatal `PatchError`s, not recoverable
//! conditions — they indicate corrupted history, and callers are expected
//! to propagate them.

mod diff;
mod error;
mod exclude;
pub mod pointer;
mod replay;

pub use diff::compare;
pub use error::{PatchError, PatchResult};
pub use exclude::{apply_exclusions, ExcludeRule, WILDCARD};
pub use replay::{apply, apply_original_values, replay};
