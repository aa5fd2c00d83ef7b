//! Structural diff between two data views.
//!
//! Produces the operation sequence that turns `before` into `after` when
//! applied in order. Array elements are compared index-positionally — no
//! longest-common-subsequence alignment — which trades diff minimality for
//! determinism and a much simpler replay contract.

use crate::pointer;
use patchtrail_types::PatchOp;
use serde_json::Value;

/// Computes the ordered operation sequence turning `before` into `after`.
///
/// Policy:
/// - object key additions/removals are `add`/`remove` at the key's pointer
/// - a changed scalar or replaced sub-tree is a single `replace` at the
///   shallowest differing path
/// - arrays diff per index; growth appends `add`s in ascending index order,
///   shrinkage emits trailing `remove`s in descending index order so that
///   in-order replay keeps indices valid
#[must_use]
pub fn compare(before: &Value, after: &Value) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    diff_value("", before, after, &mut ops);
    ops
}

fn diff_value(path: &str, before: &Value, after: &Value, ops: &mut Vec<PatchOp>) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(b), Value::Object(a)) => {
            for (key, before_child) in b {
                let child_path = format!("{path}/{}", pointer::escape(key));
                match a.get(key) {
                    Some(after_child) => diff_value(&child_path, before_child, after_child, ops),
                    None => ops.push(PatchOp::remove(child_path)),
                }
            }
            for (key, after_child) in a {
                if !b.contains_key(key) {
                    let child_path = format!("{path}/{}", pointer::escape(key));
                    ops.push(PatchOp::add(child_path, after_child.clone()));
                }
            }
        }
        (Value::Array(b), Value::Array(a)) => {
            let common = b.len().min(a.len());
            for i in 0..common {
                diff_value(&format!("{path}/{i}"), &b[i], &a[i], ops);
            }
            for (i, after_child) in a.iter().enumerate().skip(common) {
                ops.push(PatchOp::add(format!("{path}/{i}"), after_child.clone()));
            }
            for i in (common..b.len()).rev() {
                ops.push(PatchOp::remove(format!("{path}/{i}")));
            }
        }
        // Type change or scalar change: one replace at the shallowest
        // differing path.
        _ => ops.push(PatchOp::replace(path.to_string(), after.clone())),
    }
}
