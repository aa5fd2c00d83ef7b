//! Exclusion rules: wildcard path patterns redacting sensitive sub-trees
//! from patch operations before they are persisted.
//!
//! A rule like `/accounts/*/secret` matches the `secret` key of every
//! element of the `accounts` array. Rules act on operations two ways:
//!
//! - rule is ancestor-or-equal of the operation's path → the operation is
//!   dropped entirely
//! - operation's path is a strict ancestor of the rule → the excluded
//!   sub-tree is deleted from inside the operation's `value`
//!
//! Deletion keeps array positions stable: excluded array elements are
//! nulled in place rather than removed, so index-based paths in other
//! operations stay meaningful.

use crate::{pointer, PatchError, PatchResult};
use patchtrail_types::PatchOp;
use serde_json::Value;

/// The wildcard marker matching any non-negative integer array index.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal object key (or literal array index).
    Key(String),
    /// Wildcard: matches any array index.
    AnyIndex,
}

impl Segment {
    fn matches(&self, concrete: &str) -> bool {
        match self {
            Self::Key(key) => key == concrete,
            Self::AnyIndex => concrete.parse::<u64>().is_ok(),
        }
    }
}

/// A parsed exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeRule {
    pattern: String,
    segments: Vec<Segment>,
}

impl ExcludeRule {
    /// Parses a rule from a JSON-Pointer-like pattern whose segments may be
    /// the `*` wildcard. The root pattern is rejected — excluding everything
    /// is a configuration mistake.
    pub fn parse(pattern: &str) -> PatchResult<Self> {
        let raw = pointer::parse(pattern)
            .map_err(|_| PatchError::MalformedPattern(pattern.to_string()))?;
        if raw.is_empty() {
            return Err(PatchError::MalformedPattern(pattern.to_string()));
        }
        let segments = raw
            .into_iter()
            .map(|seg| {
                if seg == WILDCARD {
                    Segment::AnyIndex
                } else {
                    Segment::Key(seg)
                }
            })
            .collect();
        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// The original pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this rule's path is an ancestor of, or equal to, the given
    /// operation path. A covered operation is dropped.
    fn covers(&self, op_segments: &[String]) -> bool {
        self.segments.len() <= op_segments.len()
            && self
                .segments
                .iter()
                .zip(op_segments)
                .all(|(rule_seg, seg)| rule_seg.matches(seg))
    }

    /// Whether the given operation path is a strict ancestor of this rule's
    /// path, meaning the excluded sub-tree lies inside the operation value.
    fn lies_inside(&self, op_segments: &[String]) -> bool {
        op_segments.len() < self.segments.len()
            && op_segments
                .iter()
                .zip(&self.segments)
                .all(|(seg, rule_seg)| rule_seg.matches(seg))
    }
}

/// Filters an operation sequence against a rule set.
///
/// An operation whose `value` was pruned down to an empty object is dropped
/// (nothing visible changed there); arrays emptied or nulled by pruning are
/// kept so element positions remain stable.
pub fn apply_exclusions(ops: Vec<PatchOp>, rules: &[ExcludeRule]) -> PatchResult<Vec<PatchOp>> {
    let mut kept = Vec::with_capacity(ops.len());

    'ops: for mut op in ops {
        let op_segments = pointer::parse(&op.path)?;
        let mut pruned = false;

        for rule in rules {
            if rule.covers(&op_segments) {
                continue 'ops;
            }
            if rule.lies_inside(&op_segments) {
                if let Some(value) = op.value.as_mut() {
                    pruned |= prune(value, &rule.segments[op_segments.len()..]);
                }
            }
        }

        if pruned {
            if let Some(Value::Object(map)) = &op.value {
                if map.is_empty() {
                    continue;
                }
            }
        }
        kept.push(op);
    }

    Ok(kept)
}

/// Deletes the sub-tree addressed by `remainder` from `value`. Wildcard
/// segments apply the deletion to every array element independently.
/// Returns whether anything was actually deleted.
fn prune(value: &mut Value, remainder: &[Segment]) -> bool {
    match remainder {
        [] => false,
        [last] => prune_leaf(value, last),
        [head, rest @ ..] => match (head, value) {
            (Segment::Key(key), Value::Object(map)) => {
                map.get_mut(key).is_some_and(|child| prune(child, rest))
            }
            (Segment::Key(key), Value::Array(arr)) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| arr.get_mut(i))
                .is_some_and(|child| prune(child, rest)),
            (Segment::AnyIndex, Value::Array(arr)) => {
                let mut any = false;
                for element in arr {
                    any |= prune(element, rest);
                }
                any
            }
            _ => false,
        },
    }
}

fn prune_leaf(value: &mut Value, last: &Segment) -> bool {
    match (last, value) {
        (Segment::Key(key), Value::Object(map)) => map.remove(key).is_some(),
        // Array leaves are nulled in place, not removed, so sibling
        // index-based paths stay valid.
        (Segment::Key(key), Value::Array(arr)) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| arr.get_mut(i))
            .map(|slot| {
                let had = !slot.is_null();
                *slot = Value::Null;
                had
            })
            .unwrap_or(false),
        (Segment::AnyIndex, Value::Array(arr)) => {
            let mut any = false;
            for slot in arr {
                any |= !slot.is_null();
                *slot = Value::Null;
            }
            any
        }
        _ => false,
    }
}
