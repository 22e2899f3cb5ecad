//! Dotted field path traversal over JSON samples

use serde_json::{Map, Value};

/// Collect every leaf value `path` reaches in `sample`.
///
/// Lists met along the way are unwound, so `ground_truth.detections.label`
/// yields one value per detection. A list at the end of the path is unwound
/// too. Nulls are dropped.
pub fn resolve<'a>(sample: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![sample];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            step(value, segment, &mut next);
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }

    let mut leaves = Vec::with_capacity(current.len());
    for value in current {
        match value {
            Value::Array(items) => leaves.extend(items.iter().filter(|v| !v.is_null())),
            Value::Null => {}
            other => leaves.push(other),
        }
    }
    leaves
}

fn step<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(segment) {
                out.push(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                step(item, segment, out);
            }
        }
        _ => {}
    }
}

/// The key a value is counted and matched under.
///
/// Strings are their own key, numbers and booleans use their JSON text.
/// Objects, lists and null have no key.
pub fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Set `value` at dotted `path`, creating intermediate objects as needed
pub fn insert(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert(map, rest, value);
            }
        }
    }
}
