//! Replay: applying ordered operation sequences onto an accumulator, and
//! original-value tagging of computed operations.
//!
//! Callers guarantee path continuity by replaying from `{}` through every
//! record in creation order with no gaps — a missing parent or target
//! during replay therefore signals corrupted history and is fatal.

use crate::{pointer, PatchError, PatchResult};
use patchtrail_types::{OpKind, PatchOp};
use serde_json::Value;

/// Applies every operation in order, mutating `state` in place.
pub fn replay(state: &mut Value, ops: &[PatchOp]) -> PatchResult<()> {
    for op in ops {
        apply(state, op)?;
    }
    Ok(())
}

/// Applies a single operation to `state`.
pub fn apply(state: &mut Value, op: &PatchOp) -> PatchResult<()> {
    let segments = pointer::parse(&op.path)?;

    // The empty pointer targets the document root.
    let Some((last, parents)) = segments.split_last() else {
        return match op.op {
            OpKind::Add | OpKind::Replace => {
                *state = required_value(op)?.clone();
                Ok(())
            }
            OpKind::Remove => Err(PatchError::IncompatibleTarget {
                op: op.op.to_string(),
                path: op.path.clone(),
            }),
        };
    };

    let parent = descend(state, parents).ok_or_else(|| PatchError::MissingParent(op.path.clone()))?;

    match op.op {
        OpKind::Add => add(parent, last, required_value(op)?.clone(), &op.path),
        OpKind::Remove => remove(parent, last, &op.path),
        OpKind::Replace => replace(parent, last, required_value(op)?.clone(), &op.path),
    }
}

/// Looks up the pre-mutation value at each operation's path within `before`
/// and attaches it as `originalValue`. Absent values are omitted.
pub fn apply_original_values(ops: Vec<PatchOp>, before: &Value) -> PatchResult<Vec<PatchOp>> {
    ops.into_iter()
        .map(|op| {
            let segments = pointer::parse(&op.path)?;
            Ok(match pointer::resolve(before, &segments) {
                Some(original) => op.with_original(original.clone()),
                None => op,
            })
        })
        .collect()
}

fn required_value(op: &PatchOp) -> PatchResult<&Value> {
    op.value
        .as_ref()
        .ok_or_else(|| PatchError::MissingValue(op.path.clone()))
}

fn descend<'a>(state: &'a mut Value, segments: &[String]) -> Option<&'a mut Value> {
    let mut current = state;
    for seg in segments {
        current = match current {
            Value::Object(map) => map.get_mut(seg)?,
            Value::Array(arr) => arr.get_mut(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn add(parent: &mut Value, last: &str, value: Value, path: &str) -> PatchResult<()> {
    match parent {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(arr) => {
            if last == "-" {
                arr.push(value);
                return Ok(());
            }
            let index = parse_index(last, path)?;
            if index > arr.len() {
                return Err(PatchError::InvalidIndex {
                    path: path.to_string(),
                    index: last.to_string(),
                });
            }
            arr.insert(index, value);
            Ok(())
        }
        _ => Err(incompatible("add", path)),
    }
}

fn remove(parent: &mut Value, last: &str, path: &str) -> PatchResult<()> {
    match parent {
        Value::Object(map) => map
            .remove(last)
            .map(|_| ())
            .ok_or_else(|| PatchError::MissingTarget(path.to_string())),
        Value::Array(arr) => {
            let index = parse_index(last, path)?;
            if index >= arr.len() {
                return Err(PatchError::MissingTarget(path.to_string()));
            }
            arr.remove(index);
            Ok(())
        }
        _ => Err(incompatible("remove", path)),
    }
}

fn replace(parent: &mut Value, last: &str, value: Value, path: &str) -> PatchResult<()> {
    match parent {
        Value::Object(map) => match map.get_mut(last) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(PatchError::MissingTarget(path.to_string())),
        },
        Value::Array(arr) => {
            let index = parse_index(last, path)?;
            match arr.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(PatchError::MissingTarget(path.to_string())),
            }
        }
        _ => Err(incompatible("replace", path)),
    }
}

fn parse_index(segment: &str, path: &str) -> PatchResult<usize> {
    segment.parse::<usize>().map_err(|_| PatchError::InvalidIndex {
        path: path.to_string(),
        index: segment.to_string(),
    })
}

fn incompatible(op: &str, path: &str) -> PatchError {
    PatchError::IncompatibleTarget {
        op: op.to_string(),
        path: path.to_string(),
    }
}
