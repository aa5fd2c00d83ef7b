//! JSON Pointer (RFC 6901) parsing and resolution.
//!
//! Paths are always relative to the data view root. The empty pointer `""`
//! denotes the root itself.

use crate::{PatchError, PatchResult};
use serde_json::Value;

/// Splits a pointer into unescaped segments. The empty pointer yields no
/// segments; any other pointer must start with `/`.
pub fn parse(pointer: &str) -> PatchResult<Vec<String>> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(PatchError::MalformedPointer(pointer.to_string()));
    };
    Ok(rest.split('/').map(unescape).collect())
}

/// Escapes a single reference token (`~` → `~0`, `/` → `~1`).
#[must_use]
pub fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Unescapes a single reference token.
#[must_use]
pub fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Joins unescaped segments back into a pointer string.
#[must_use]
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        out.push_str(&escape(seg.as_ref()));
    }
    out
}

/// Resolves a segment sequence against a value, descending through object
/// keys and array indices. Returns `None` when any step is absent.
#[must_use]
pub fn resolve<'a, S: AsRef<str>>(value: &'a Value, segments: &[S]) -> Option<&'a Value> {
    let mut current = value;
    for seg in segments {
        let seg = seg.as_ref();
        current = match current {
            Value::Object(map) => map.get(seg)?,
            Value::Array(arr) => arr.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
