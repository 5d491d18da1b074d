//! The patch model: operations, serialization, length accounting, inversion.

use crate::bytes::{find_index, find_key};
use crate::error::InvertError;
use jsondiff_util::json_size;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value;

/// The six RFC 6902 operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        }
    }
}

/// A single patch operation.
///
/// `old_value` is retained for factorization and inversion; it is never
/// serialized.
#[derive(Debug, Clone)]
pub struct Operation {
    pub op: OpKind,
    pub path: String,
    pub from: Option<String>,
    pub value: Option<Value>,
    pub old_value: Option<Value>,
}

impl Operation {
    pub fn add(path: String, value: Value) -> Self {
        Self { op: OpKind::Add, path, from: None, value: Some(value), old_value: None }
    }

    pub fn remove(path: String, old_value: Value) -> Self {
        Self { op: OpKind::Remove, path, from: None, value: None, old_value: Some(old_value) }
    }

    pub fn replace(path: String, value: Value, old_value: Value) -> Self {
        Self { op: OpKind::Replace, path, from: None, value: Some(value), old_value: Some(old_value) }
    }

    pub fn mov(from: String, path: String) -> Self {
        Self { op: OpKind::Move, path, from: Some(from), value: None, old_value: None }
    }

    pub fn copy(from: String, path: String) -> Self {
        Self { op: OpKind::Copy, path, from: Some(from), value: None, old_value: None }
    }

    pub fn test(path: String, value: Value) -> Self {
        Self { op: OpKind::Test, path, from: None, value: Some(value), old_value: None }
    }

    fn bears_value(&self) -> bool {
        matches!(self.op, OpKind::Add | OpKind::Replace | OpKind::Test)
    }

    /// Estimated serialized length of this single operation: a constant base
    /// cost plus `op`/`path`/`from`/`value` field lengths, as RFC 6902 JSON
    /// text (not the exact byte count, just a stable stand-in for it).
    ///
    /// When `raw_value` is `Some`, it is used verbatim for the value's
    /// contribution (the raw sub-document extracted from the target byte
    /// view), avoiding a re-serialization of `value`.
    pub fn json_length(&self, raw_value: Option<&[u8]>) -> usize {
        const BASE: usize = r#"{"op":"","path":""}"#.len();
        let mut len = BASE + self.op.as_str().len() + self.path.len();
        if let Some(from) = &self.from {
            len += r#","from":""#.len() + from.len();
        }
        if self.bears_value() {
            let value_len = match raw_value {
                Some(raw) => raw.len(),
                None => self
                    .value
                    .as_ref()
                    .map(json_size::json_size)
                    .unwrap_or(4),
            };
            len += r#","value":"#.len() + value_len;
        }
        len
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = 2 + self.from.is_some() as usize + self.bears_value() as usize;
        let mut state = serializer.serialize_struct("Operation", fields)?;
        state.serialize_field("op", self.op.as_str())?;
        state.serialize_field("path", &self.path)?;
        if let Some(from) = &self.from {
            state.serialize_field("from", from)?;
        }
        if self.bears_value() {
            state.serialize_field("value", self.value.as_ref().unwrap_or(&Value::Null))?;
        }
        state.end()
    }
}

/// An ordered sequence of operations, applied left to right.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Patch(pub Vec<Operation>);

impl Patch {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, op: Operation) {
        self.0.push(op);
    }

    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Sum of each operation's [`Operation::json_length`] plus `n-1` comma
    /// separators, matching the textual shape of a serialized JSON array.
    ///
    /// `doc` is the compacted target byte document, used to resolve each
    /// operation's raw value via [`find_key`]/[`find_index`] instead of
    /// re-serializing `value`.
    pub fn json_length(&self, doc: &[u8]) -> usize {
        if self.0.is_empty() {
            return 2; // "[]"
        }
        let ops: usize = self
            .0
            .iter()
            .map(|op| op.json_length(raw_value_at(doc, &op.path)))
            .sum();
        ops + (self.0.len() - 1)
    }

    /// Invert this patch: produce a patch that, applied after this one,
    /// restores the original document.
    ///
    /// Requires the patch to have been built with `invertible` (destructive
    /// operations preceded by a `test` of the old value); otherwise returns
    /// [`InvertError::NonReversible`].
    pub fn invert(&self) -> Result<Patch, InvertError> {
        // Each source operation (or test+op pair) inverts to a *group* of one
        // or two operations whose internal order matters (a guard `test` must
        // stay before the mutation it guards). Only the order of groups
        // reverses, never the order within a group.
        let mut groups: Vec<Vec<Operation>> = Vec::new();
        let mut i = 0;
        while i < self.0.len() {
            let op = &self.0[i];
            match op.op {
                OpKind::Test => {
                    let next = self.0.get(i + 1).ok_or(InvertError::NonReversible {
                        path: op.path.clone(),
                    })?;
                    if next.path != op.path {
                        return Err(InvertError::TestPointer {
                            op: next.op.as_str(),
                            test_path: op.path.clone(),
                            op_path: next.path.clone(),
                        });
                    }
                    match next.op {
                        OpKind::Replace => {
                            let old = op.value.clone().unwrap_or(Value::Null);
                            let new = next.value.clone().unwrap_or(Value::Null);
                            groups.push(vec![
                                Operation::test(next.path.clone(), new),
                                Operation::replace(next.path.clone(), old, Value::Null),
                            ]);
                        }
                        OpKind::Remove => {
                            let old = op.value.clone().unwrap_or(Value::Null);
                            groups.push(vec![Operation::add(next.path.clone(), old)]);
                        }
                        _ => {
                            return Err(InvertError::NonReversible { path: next.path.clone() });
                        }
                    }
                    i += 2;
                }
                OpKind::Add => {
                    groups.push(vec![Operation::remove(op.path.clone(), Value::Null)]);
                    i += 1;
                }
                OpKind::Remove => {
                    return Err(InvertError::NonReversible { path: op.path.clone() });
                }
                OpKind::Replace => {
                    return Err(InvertError::NonReversible { path: op.path.clone() });
                }
                OpKind::Copy => {
                    let from = op.from.clone().unwrap_or_default();
                    if op.path.starts_with(&from)
                        && op.path[from.len()..].starts_with('/')
                    {
                        return Err(InvertError::AmbiguousCopyOp {
                            from,
                            path: op.path.clone(),
                        });
                    }
                    groups.push(vec![Operation::remove(op.path.clone(), Value::Null)]);
                    i += 1;
                }
                OpKind::Move => {
                    let from = op.from.clone().unwrap_or_default();
                    groups.push(vec![Operation::mov(op.path.clone(), from)]);
                    i += 1;
                }
            }
        }
        let mut inverted = Vec::with_capacity(self.0.len());
        for group in groups.into_iter().rev() {
            inverted.extend(group);
        }
        Ok(Patch(inverted))
    }
}

fn raw_value_at<'a>(doc: &'a [u8], path: &str) -> Option<&'a [u8]> {
    let (parent, last) = path.rsplit_once('/')?;
    let parent_doc = if parent.is_empty() {
        doc
    } else {
        // Only the last segment is resolved against `doc`; callers pass the
        // compacted target view rooted at the document root, so nested
        // parents are reached by repeated find_key/find_index from root.
        let mut cur = doc;
        for segment in parent.split('/').skip(1) {
            cur = match segment.parse::<usize>() {
                Ok(i) => find_index(cur, i)?,
                Err(_) => find_key(cur, &unescape(segment))?,
            };
        }
        cur
    };
    match last.parse::<usize>() {
        Ok(i) => find_index(parent_doc, i),
        Err(_) => find_key(parent_doc, &unescape(last)),
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_replace_test_force_value_field() {
        let add = Operation::add("/a".into(), Value::Null);
        let v = serde_json::to_value(&add).unwrap();
        assert_eq!(v["value"], Value::Null);
        assert!(v.get("from").is_none());
    }

    #[test]
    fn remove_move_copy_omit_value() {
        let remove = Operation::remove("/a".into(), json!(1));
        let v = serde_json::to_value(&remove).unwrap();
        assert!(v.get("value").is_none());

        let mov = Operation::mov("/a".into(), "/b".into());
        let v = serde_json::to_value(&mov).unwrap();
        assert!(v.get("value").is_none());
        assert_eq!(v["from"], "/a");

        let cp = Operation::copy("/a".into(), "/b".into());
        let v = serde_json::to_value(&cp).unwrap();
        assert!(v.get("value").is_none());
        assert_eq!(v["from"], "/a");
    }

    #[test]
    fn invert_add_becomes_remove() {
        let patch = Patch(vec![Operation::add("/a".into(), json!(1))]);
        let inverted = patch.invert().unwrap();
        assert_eq!(inverted.0.len(), 1);
        assert_eq!(inverted.0[0].op, OpKind::Remove);
        assert_eq!(inverted.0[0].path, "/a");
    }

    #[test]
    fn invert_test_replace_pair() {
        let patch = Patch(vec![
            Operation::test("/a".into(), json!("1")),
            Operation::replace("/a".into(), json!("3"), json!("1")),
        ]);
        let inverted = patch.invert().unwrap();
        assert_eq!(inverted.0.len(), 2);
        assert_eq!(inverted.0[0].op, OpKind::Test);
        assert_eq!(inverted.0[0].value, Some(json!("3")));
        assert_eq!(inverted.0[1].op, OpKind::Replace);
        assert_eq!(inverted.0[1].value, Some(json!("1")));
    }

    #[test]
    fn invert_test_remove_pair_becomes_add() {
        let patch = Patch(vec![
            Operation::test("/b".into(), json!("2")),
            Operation::remove("/b".into(), json!("2")),
        ]);
        let inverted = patch.invert().unwrap();
        assert_eq!(inverted.0.len(), 1);
        assert_eq!(inverted.0[0].op, OpKind::Add);
        assert_eq!(inverted.0[0].value, Some(json!("2")));
    }

    #[test]
    fn bare_remove_is_non_reversible() {
        let patch = Patch(vec![Operation::remove("/a".into(), json!(1))]);
        assert!(matches!(patch.invert(), Err(InvertError::NonReversible { .. })));
    }

    #[test]
    fn ambiguous_copy_is_rejected() {
        let patch = Patch(vec![Operation::copy("/a".into(), "/a/b".into())]);
        assert!(matches!(patch.invert(), Err(InvertError::AmbiguousCopyOp { .. })));
    }

    #[test]
    fn move_inverts_by_swapping_from_and_path() {
        let patch = Patch(vec![Operation::mov("/a".into(), "/b".into())]);
        let inverted = patch.invert().unwrap();
        assert_eq!(inverted.0[0].from.as_deref(), Some("/b"));
        assert_eq!(inverted.0[0].path, "/a");
    }
}
