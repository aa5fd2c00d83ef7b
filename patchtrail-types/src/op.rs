//! RFC-6902-style patch operations.
//!
//! An operation targets a JSON Pointer path within an entity's data view.
//! The wire form is the flat JSON-Patch object, e.g.
//! `{"op":"add","path":"/prop","value":"foo"}`, optionally carrying
//! `originalValue` when original-value tracking is enabled.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three operation kinds the diff produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Remove,
    Replace,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

/// A single patch operation at a JSON Pointer path.
///
/// Operation order within a record is significant: replay applies operations
/// strictly in array order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    /// The operation kind.
    pub op: OpKind,

    /// JSON Pointer relative to the data view root.
    pub path: String,

    /// The new value (`add` and `replace` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// The value at `path` in the prior data view, when original-value
    /// tracking is enabled and the path resolved.
    #[serde(
        default,
        rename = "originalValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_value: Option<Value>,
}

impl PatchOp {
    /// Creates an `add` operation.
    #[must_use]
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: OpKind::Add,
            path: path.into(),
            value: Some(value),
            original_value: None,
        }
    }

    /// Creates a `remove` operation.
    #[must_use]
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: OpKind::Remove,
            path: path.into(),
            value: None,
            original_value: None,
        }
    }

    /// Creates a `replace` operation.
    #[must_use]
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: OpKind::Replace,
            path: path.into(),
            value: Some(value),
            original_value: None,
        }
    }

    /// Attaches the pre-mutation value at this operation's path.
    #[must_use]
    pub fn with_original(mut self, original: Value) -> Self {
        self.original_value = Some(original);
        self
    }
}
