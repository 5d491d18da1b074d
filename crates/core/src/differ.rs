//! The recursive structural comparator: walks two values in lock-step and
//! emits a patch under the configured optimization modes.

use std::collections::HashMap;

use serde_json::{Map, Value};

use jsondiff_pointer::Cursor;
use jsondiff_util::sort::insertion_sort_by;

use crate::bytes::{compact, compact_in_place};
use crate::equal::{arrays_unordered_equal, deep_equal};
use crate::error::DiffError;
use crate::hash::hash_unordered;
use crate::lcs::lcs;
use crate::operation::{OpKind, Operation, Patch};
use crate::options::Options;
use crate::value::comparable;

/// One location recorded by the factorize pre-pass: where an unchanged
/// subtree lives in the source document.
struct HashedNode {
    pointer: String,
    value: Value,
}

/// Owns the mutable state of a single comparison: the cursor, the patch
/// buffer under construction, and (when `factorize` is set) the
/// digest→location map.
pub struct Differ<'a> {
    cursor: Cursor,
    patch: Patch,
    hashmap: HashMap<i64, HashedNode>,
    options: &'a Options,
    target_bytes: Vec<u8>,
}

impl<'a> Differ<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            cursor: Cursor::new(),
            patch: Patch::new(),
            hashmap: HashMap::new(),
            options,
            target_bytes: Vec::new(),
        }
    }

    /// Reset all per-comparison state for reuse, preserving buffer capacity.
    pub fn reset(&mut self) {
        self.patch.truncate(0);
        self.hashmap.clear();
        self.cursor.rewind(0);
        self.target_bytes.clear();
    }

    /// Run one comparison and consume the differ, returning the patch.
    ///
    /// `src`/`tgt` are already-decoded values, so [`DiffError::UnsupportedValueType`]
    /// can never originate here — `serde_json::Value` only ever holds one of
    /// the six accepted kinds. It surfaces instead from a caller's
    /// `marshal`/`unmarshal` override rejecting a host type before decoding
    /// reaches the differ.
    pub fn diff(mut self, src: &Value, tgt: &Value, doc: &[u8]) -> Result<Patch, DiffError> {
        self.target_bytes = if self.options.rationalize && !self.options.skip_compact {
            compact(doc)
        } else {
            doc.to_vec()
        };

        if self.options.factorize {
            let mark = self.cursor.mark();
            self.prepare(src, tgt);
            self.cursor.rewind(mark);
        }

        self.compare(src, tgt);
        Ok(self.patch)
    }

    // ── top-level dispatch ──────────────────────────────────────────────

    fn compare(&mut self, src: &Value, tgt: &Value) {
        if self.options.is_ignored(self.cursor.as_str()) {
            return;
        }
        if !comparable(src, tgt) {
            if self.cursor.is_root() {
                self.patch.push(Operation::add(String::new(), tgt.clone()));
            } else {
                self.replace(src, tgt);
            }
            return;
        }
        if deep_equal(src, tgt) {
            return;
        }

        let size = self.patch.len();
        match (src, tgt) {
            (Value::Array(s), Value::Array(t)) => {
                if self.options.lcs {
                    self.compare_arrays_lcs(s, t);
                } else {
                    self.compare_arrays(s, t);
                }
            }
            (Value::Object(s), Value::Object(t)) => self.compare_objects(s, t),
            _ => self.replace(src, tgt),
        }

        if self.options.rationalize && self.patch.len() > size {
            self.rationalize(src, tgt, size);
        }
    }

    fn compare_objects(&mut self, src: &Map<String, Value>, tgt: &Map<String, Value>) {
        const IN_SRC: u8 = 1;
        const IN_TGT: u8 = 2;

        let mut membership: HashMap<&str, u8> = HashMap::new();
        for k in src.keys() {
            *membership.entry(k.as_str()).or_insert(0) |= IN_SRC;
        }
        for k in tgt.keys() {
            *membership.entry(k.as_str()).or_insert(0) |= IN_TGT;
        }

        let mut keys: Vec<&str> = membership.keys().copied().collect();
        insertion_sort_by(&mut keys, |a, b| a.cmp(b));

        for key in keys {
            let mask = membership[key];
            let mark = self.cursor.mark();
            self.cursor.append_key(key);
            match mask {
                m if m == IN_SRC | IN_TGT => {
                    self.compare(&src[key], &tgt[key]);
                }
                IN_SRC => {
                    if !self.options.is_ignored(self.cursor.as_str()) {
                        self.remove(src[key].clone());
                    }
                }
                IN_TGT => {
                    if !self.options.is_ignored(self.cursor.as_str()) {
                        self.add(tgt[key].clone());
                    }
                }
                _ => unreachable!("membership mask is always IN_SRC, IN_TGT, or both"),
            }
            self.cursor.rewind(mark);
        }
    }

    fn compare_arrays(&mut self, src: &[Value], tgt: &[Value]) {
        let sl = src.len();
        let tl = tgt.len();
        let ml = sl.min(tl);

        if tl < sl {
            for i in ml..sl {
                let mark = self.cursor.mark();
                self.cursor.append_index(ml);
                self.remove(src[i].clone());
                self.cursor.rewind(mark);
            }
            return;
        }

        if self.options.equivalent && arrays_unordered_equal(src, tgt) {
            return;
        }

        for i in 0..ml {
            let mark = self.cursor.mark();
            self.cursor.append_index(i);
            self.compare(&src[i], &tgt[i]);
            self.cursor.rewind(mark);
        }

        if tl > sl {
            for item in &tgt[ml..tl] {
                let mark = self.cursor.mark();
                self.cursor.append_key("-");
                self.add(item.clone());
                self.cursor.rewind(mark);
            }
        }
    }

    /// Array diff using the LCS-aligned match sequence: unmatched runs on
    /// either side become `remove`/`add`, matched pairs recurse. `ai`/`bi`
    /// track the live index after prior edits so emitted paths remain
    /// correct under sequential application.
    fn compare_arrays_lcs(&mut self, src: &[Value], tgt: &[Value]) {
        let pairs = lcs(src, tgt);
        let mut ai = 0usize;
        let mut bi = 0usize;
        let mut live = 0usize; // current length of the live (mutated) array

        for (pi, pj) in pairs.into_iter().chain(std::iter::once((src.len(), tgt.len()))) {
            while ai < pi && bi < pj {
                let mark = self.cursor.mark();
                self.cursor.append_index(live);
                self.compare(&src[ai], &tgt[bi]);
                self.cursor.rewind(mark);
                ai += 1;
                bi += 1;
                live += 1;
            }
            while ai < pi {
                let mark = self.cursor.mark();
                self.cursor.append_index(live);
                self.remove(src[ai].clone());
                self.cursor.rewind(mark);
                ai += 1;
            }
            while bi < pj {
                let mark = self.cursor.mark();
                self.cursor.append_index(live);
                self.add(tgt[bi].clone());
                self.cursor.rewind(mark);
                bi += 1;
                live += 1;
            }
            if pi < src.len() && pj < tgt.len() {
                // matched element itself: positions stay aligned, advance past it.
                let mark = self.cursor.mark();
                self.cursor.append_index(live);
                self.compare(&src[pi], &tgt[pj]);
                self.cursor.rewind(mark);
                ai = pi + 1;
                bi = pj + 1;
                live += 1;
            }
        }
    }

    // ── emitters ─────────────────────────────────────────────────────────

    fn replace(&mut self, src: &Value, tgt: &Value) {
        let path = self.cursor.copy();
        if self.options.invertible {
            self.patch.push(Operation::test(path.clone(), src.clone()));
        }
        self.patch.push(Operation::replace(path, tgt.clone(), src.clone()));
    }

    fn remove(&mut self, old_value: Value) {
        let path = self.cursor.copy();
        if self.options.invertible {
            self.patch.push(Operation::test(path.clone(), old_value.clone()));
        }
        self.patch.push(Operation::remove(path, old_value));
    }

    fn add(&mut self, value: Value) {
        let path = self.cursor.copy();
        if !self.options.factorize {
            self.patch.push(Operation::add(path, value));
            return;
        }

        if let Some(idx) = self.find_removed(&value) {
            let from = self.patch.0[idx].path.clone();
            // RFC 6902 §4.4: `from` must not be a proper prefix of `path`.
            if !path.starts_with(&from) {
                self.patch.0.remove(idx);
                self.patch.push(Operation::mov(from, path));
                return;
            }
        }

        let found = self.find_unchanged(&value);
        match found {
            Some(from) if !self.options.invertible => {
                self.patch.push(Operation::copy(from, path));
            }
            _ => {
                self.patch.push(Operation::add(path, value));
            }
        }
    }

    fn find_removed(&self, value: &Value) -> Option<usize> {
        self.patch.0.iter().position(|op| {
            op.op == OpKind::Remove && op.old_value.as_ref().is_some_and(|v| deep_equal(v, value))
        })
    }

    fn find_unchanged(&self, value: &Value) -> Option<String> {
        let digest = hash_unordered_or_ordered(value);
        self.hashmap.get(&digest).and_then(|node| {
            deep_equal(&node.value, value).then(|| node.pointer.clone())
        })
    }

    // ── factorize pre-pass ───────────────────────────────────────────────

    fn prepare(&mut self, src: &Value, tgt: &Value) {
        if !comparable(src, tgt) {
            return;
        }
        if deep_equal(src, tgt) {
            let digest = hash_unordered_or_ordered(tgt);
            self.hashmap.insert(
                digest,
                HashedNode { pointer: self.cursor.copy(), value: tgt.clone() },
            );
            return;
        }
        match (src, tgt) {
            (Value::Array(s), Value::Array(t)) => {
                for i in 0..s.len().min(t.len()) {
                    let mark = self.cursor.mark();
                    self.cursor.append_index(i);
                    self.prepare(&s[i], &t[i]);
                    self.cursor.rewind(mark);
                }
            }
            (Value::Object(s), Value::Object(t)) => {
                for (k, v1) in s {
                    if let Some(v2) = t.get(k) {
                        let mark = self.cursor.mark();
                        self.cursor.append_key(k);
                        self.prepare(v1, v2);
                        self.cursor.rewind(mark);
                    }
                }
            }
            _ => {}
        }
    }

    // ── rationalize ──────────────────────────────────────────────────────

    fn rationalize(&mut self, src: &Value, tgt: &Value, first_op: usize) {
        let path = self.cursor.copy();
        let mut candidate = Patch::new();
        if self.options.invertible {
            candidate.push(Operation::test(path.clone(), src.clone()));
        }
        candidate.push(Operation::replace(path.clone(), tgt.clone(), src.clone()));

        let new_len = candidate.json_length(&self.target_bytes);
        let cur_len = Patch(self.patch.0[first_op..].to_vec()).json_length(&self.target_bytes);

        if cur_len > new_len {
            self.patch.truncate(first_op);
            for op in candidate.0 {
                self.patch.push(op);
            }
        }
    }
}

fn hash_unordered_or_ordered(value: &Value) -> i64 {
    // The hashmap is keyed identically whether or not `equivalent` is active;
    // using the unordered digest here makes factorization resilient to
    // reordered child arrays without requiring a second map.
    hash_unordered(value)
}

/// Compute a patch transforming `src` into `tgt` under `options`.
pub fn diff(src: &Value, tgt: &Value, doc: &[u8], options: &Options) -> Result<Patch, DiffError> {
    Differ::new(options).diff(src, tgt, doc)
}

/// Like [`diff`] but compacts `doc` in place first when `options.in_place_compaction`.
pub fn diff_with_doc_buffer(
    src: &Value,
    tgt: &Value,
    doc: &mut Vec<u8>,
    options: &Options,
) -> Result<Patch, DiffError> {
    if options.in_place_compaction && options.rationalize && !options.skip_compact {
        compact_in_place(doc);
    }
    Differ::new(options).diff(src, tgt, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compare(src: Value, tgt: Value, options: Options) -> Patch {
        diff(&src, &tgt, b"", &options).unwrap()
    }

    #[test]
    fn replace_and_remove_seed_scenario() {
        let src = json!({"spec":{"containers":[{"image":"nginx:latest"}],"volumes":[{"emptyDir":{"medium":"Memory"}}]}});
        let tgt = json!({"spec":{"containers":[{"image":"nginx:1.19.5-alpine"}],"volumes":[{"emptyDir":{}}]}});
        let patch = compare(src, tgt, Options::default());
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.0[0].op, OpKind::Replace);
        assert_eq!(patch.0[0].path, "/spec/containers/0/image");
        assert_eq!(patch.0[1].op, OpKind::Remove);
        assert_eq!(patch.0[1].path, "/spec/volumes/0/emptyDir/medium");
    }

    #[test]
    fn factorize_copy_and_move_seed_scenario() {
        let src = json!({"a":[1,2,3],"b":{"foo":"bar"}});
        let tgt = json!({"a":[1,2,3],"c":[1,2,3],"d":{"foo":"bar"}});
        let options = Options::new().factorize(true);
        let patch = compare(src, tgt, options);
        assert_eq!(patch.len(), 2);
        assert!(patch.0.iter().any(|op| op.op == OpKind::Copy && op.path == "/c" && op.from.as_deref() == Some("/a")));
        assert!(patch.0.iter().any(|op| op.op == OpKind::Move && op.path == "/d" && op.from.as_deref() == Some("/b")));
    }

    #[test]
    fn invertible_seed_scenario() {
        let src = json!({"a":"1","b":"2"});
        let tgt = json!({"a":"3","c":"4"});
        let options = Options::new().invertible(true);
        let patch = compare(src, tgt, options);
        let kinds: Vec<OpKind> = patch.0.iter().map(|op| op.op).collect();
        assert_eq!(
            kinds,
            vec![OpKind::Test, OpKind::Replace, OpKind::Test, OpKind::Remove, OpKind::Add]
        );
    }

    #[test]
    fn equivalent_seed_scenario() {
        let src = json!({"a":{"b":[{"c":[4,5]},2,1]}});
        let tgt = json!({"a":{"b":[{"c":[5,4]},1,2]}});
        let options = Options::new().equivalent(true);
        let patch = compare(src, tgt, options);
        assert!(patch.is_empty());
    }

    #[test]
    fn lcs_middle_removal_seed_scenario() {
        let names = |names: &[&str]| -> Value {
            Value::Array(names.iter().map(|n| json!({"name": n})).collect())
        };
        let src = names(&["name1", "name2", "name3", "name4", "name5", "name6"]);
        let tgt = names(&["name1", "name2", "name4", "name5", "name6"]);
        let options = Options::new().lcs(true);
        let patch = compare(src, tgt, options);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.0[0].op, OpKind::Remove);
        assert_eq!(patch.0[0].path, "/2");
    }

    #[test]
    fn empty_diff_invariant() {
        let v = json!({"a": [1, {"b": 2}], "c": "d"});
        let patch = compare(v.clone(), v, Options::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn ignore_respect_invariant() {
        let src = json!({"a": 1, "b": 1});
        let tgt = json!({"a": 2, "b": 2});
        let options = Options::new().ignores(["/b".to_string()]);
        let patch = compare(src, tgt, options);
        assert!(patch.0.iter().all(|op| op.path != "/b"));
    }

    #[test]
    fn root_type_change_emits_single_add() {
        let patch = compare(json!({"a": 1}), json!([1, 2]), Options::default());
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.0[0].op, OpKind::Add);
        assert_eq!(patch.0[0].path, "");
    }

    #[test]
    fn array_append_uses_dash_token() {
        let patch = compare(json!([1, 2]), json!([1, 2, 3]), Options::default());
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.0[0].op, OpKind::Add);
        assert_eq!(patch.0[0].path, "/-");
    }
}
