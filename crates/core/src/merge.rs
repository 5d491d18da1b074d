//! RFC 7386 JSON Merge Patch: a recursive object overlay where `null`-valued
//! keys denote removals.

use serde_json::{Map, Value};

/// Apply `patch` onto `doc` in place per RFC 7386.
pub fn merge(doc: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *doc = patch.clone();
        return;
    };

    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    let target = doc.as_object_mut().expect("just normalized to an object");
    for (key, value) in patch_map {
        if value.is_null() {
            target.remove(key.as_str());
        } else {
            merge(target.entry(key.as_str()).or_insert(Value::Null), value);
        }
    }
}

/// Compute the merged document without mutating `doc`.
pub fn merge_patch(doc: &Value, patch: &Value) -> Value {
    let mut result = doc.clone();
    merge(&mut result, patch);
    result
}

/// Decode both inputs as JSON, merge, and re-encode the result.
pub fn merge_patch_json(doc_bytes: &[u8], patch_bytes: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let doc: Value = serde_json::from_slice(doc_bytes)?;
    let patch: Value = serde_json::from_slice(patch_bytes)?;
    let merged = merge_patch(&doc, &patch);
    serde_json::to_vec(&merged)
}
