//! Deep equality re-export plus the permutation-aware variant used by the
//! `equivalent` array optimization.

use serde_json::Value;

pub use jsondiff_util::deep_equal;

/// Structural equality that treats arrays as multisets, recursively.
///
/// Two arrays are unordered-equal if there is a pairing of their elements
/// (not necessarily by index) under which every pair is itself
/// unordered-equal. Objects still compare by key, not by position — only
/// array order is relaxed.
pub fn unordered_deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(a), Value::Array(b)) => arrays_permutation_equal(a, b),
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, va)| match b.get(key) {
                    Some(vb) => unordered_deep_equal(va, vb),
                    None => false,
                })
        }
        _ => deep_equal(a, b),
    }
}

/// Whether two array slices are equal as multisets under `unordered_deep_equal`.
pub fn arrays_unordered_equal(a: &[Value], b: &[Value]) -> bool {
    arrays_permutation_equal(a, b)
}

/// Find a bijection between `a` and `b` under `unordered_deep_equal`.
///
/// `O(n^2)` greedy matching: fine for the array sizes this optimization
/// targets, and no worse asymptotically than the LCS alignment it competes
/// with.
fn arrays_permutation_equal(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (j, y) in b.iter().enumerate() {
            if !used[j] && unordered_deep_equal(x, y) {
                used[j] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_arrays_are_unordered_equal() {
        assert!(unordered_deep_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
    }

    #[test]
    fn permuted_arrays_are_unordered_equal() {
        assert!(unordered_deep_equal(&json!([1, 2, 3]), &json!([3, 1, 2])));
    }

    #[test]
    fn permuted_arrays_with_duplicates_require_exact_multiset_match() {
        assert!(!unordered_deep_equal(&json!([1, 2, 2]), &json!([1, 1, 2])));
    }

    #[test]
    fn nested_permutation_equivalence_from_spec_scenario() {
        let a = json!({"a":{"b":[{"c":[4,5]},2,1]}});
        let b = json!({"a":{"b":[{"c":[5,4]},1,2]}});
        assert!(unordered_deep_equal(&a, &b));
    }

    #[test]
    fn objects_never_relax_key_order_because_maps_have_none() {
        assert!(unordered_deep_equal(
            &json!({"a": 1, "b": 2}),
            &json!({"b": 2, "a": 1})
        ));
    }
}
