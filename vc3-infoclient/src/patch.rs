//! RFC 7386 JSON merge patches.
//!
//! Objects merge key by key, `null` removes a key, any other value replaces
//! the target wholesale. Arrays are values, not merged element-wise.

use serde_json::{Map, Value};

/// Applies `patch` to `target` in place.
pub fn apply_merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_fields) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_fields) = target {
        for (key, value) in patch_fields {
            if value.is_null() {
                target_fields.remove(key);
            } else {
                apply_merge_patch(target_fields.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

/// Computes the smallest merge patch turning `from` into `to`, or `None`
/// if they are already equal.
///
/// Object members of `to` whose value is `null` cannot be expressed by a
/// merge patch and come out deleted.
pub fn merge_diff(from: &Value, to: &Value) -> Option<Value> {
    match (from, to) {
        (Value::Object(old), Value::Object(new)) => {
            let mut patch = Map::new();
            for key in old.keys().filter(|k| !new.contains_key(*k)) {
                patch.insert(key.clone(), Value::Null);
            }
            for (key, new_value) in new {
                match old.get(key) {
                    Some(old_value) => {
                        if let Some(sub) = merge_diff(old_value, new_value) {
                            patch.insert(key.clone(), sub);
                        }
                    }
                    None => {
                        patch.insert(key.clone(), new_value.clone());
                    }
                }
            }
            (!patch.is_empty()).then_some(Value::Object(patch))
        }
        _ if from == to => None,
        _ => Some(to.clone()),
    }
}
