//! The external applier: mutate a `Value` in place by walking a patch's
//! operations, each addressed by a raw JSON Pointer.
//!
//! On failure, every operation already applied is unwound in reverse order
//! so the caller always sees either the fully-patched document or the
//! untouched original.

use std::mem;

use serde_json::Value;

use jsondiff_pointer::parse as parse_pointer;

use crate::error::ApplyError;
use crate::operation::{OpKind, Operation, Patch};

/// Apply `patch` to `doc` in place. If any operation fails, previously
/// applied operations are reverted before returning the error.
pub fn apply(doc: &mut Value, patch: &Patch) -> Result<(), ApplyError> {
    apply_ops(doc, &patch.0)
}

/// Apply `patch` to `doc` in place without rollback: on failure the document
/// is left partially patched. Cheaper when the caller doesn't need atomicity
/// (e.g. it holds its own undo log, or failure is itself fatal).
pub fn apply_unsafe(doc: &mut Value, patch: &Patch) -> Result<(), ApplyError> {
    for op in &patch.0 {
        apply_one(doc, op)?;
    }
    Ok(())
}

/// Parse `doc_bytes` as JSON and apply `patch`, re-serializing the result.
///
/// `validate` exists for interface symmetry with the spec: decoding always
/// checks well-formedness (there is no cheaper partial-parse available), so
/// it currently has no observable effect beyond documenting caller intent.
pub fn apply_json(doc_bytes: &[u8], patch: &Patch, _validate: bool) -> Result<Vec<u8>, ApplyError> {
    let mut doc: Value = serde_json::from_slice(doc_bytes).map_err(ApplyError::InvalidDocument)?;
    apply(&mut doc, patch)?;
    serde_json::to_vec(&doc).map_err(ApplyError::InvalidDocument)
}

fn apply_ops(doc: &mut Value, ops: &[Operation]) -> Result<(), ApplyError> {
    let (op, tail) = match ops.split_first() {
        None => return Ok(()),
        Some(pair) => pair,
    };

    match op.op {
        OpKind::Add => {
            let prev = add(doc, &op.path, op.value.clone().unwrap_or(Value::Null))?;
            apply_ops(doc, tail).map_err(|e| {
                match prev {
                    None => {
                        remove(doc, &op.path, true).ok();
                    }
                    Some(v) => {
                        add(doc, &op.path, v).ok();
                    }
                }
                e
            })
        }
        OpKind::Remove => {
            let prev = remove(doc, &op.path, false)?;
            apply_ops(doc, tail).map_err(|e| {
                add(doc, &op.path, prev).ok();
                e
            })
        }
        OpKind::Replace => {
            let prev = replace(doc, &op.path, op.value.clone().unwrap_or(Value::Null))?;
            apply_ops(doc, tail).map_err(|e| {
                replace(doc, &op.path, prev).ok();
                e
            })
        }
        OpKind::Move => {
            let from = op.from.clone().unwrap_or_default();
            let prev = mov(doc, &from, &op.path, false)?;
            apply_ops(doc, tail).map_err(|e| {
                mov(doc, &op.path, &from, true).ok();
                if let Some(v) = prev.clone() {
                    add(doc, &op.path, v).ok();
                }
                e
            })
        }
        OpKind::Copy => {
            let from = op.from.clone().unwrap_or_default();
            let prev = copy(doc, &from, &op.path)?;
            apply_ops(doc, tail).map_err(|e| {
                match prev.clone() {
                    None => {
                        remove(doc, &op.path, true).ok();
                    }
                    Some(v) => {
                        add(doc, &op.path, v).ok();
                    }
                }
                e
            })
        }
        OpKind::Test => {
            test(doc, &op.path, op.value.as_ref().unwrap_or(&Value::Null))?;
            apply_ops(doc, tail)
        }
    }
}

fn apply_one(doc: &mut Value, op: &Operation) -> Result<(), ApplyError> {
    match op.op {
        OpKind::Add => {
            add(doc, &op.path, op.value.clone().unwrap_or(Value::Null))?;
        }
        OpKind::Remove => {
            remove(doc, &op.path, false)?;
        }
        OpKind::Replace => {
            replace(doc, &op.path, op.value.clone().unwrap_or(Value::Null))?;
        }
        OpKind::Move => {
            let from = op.from.clone().unwrap_or_default();
            mov(doc, &from, &op.path, false)?;
        }
        OpKind::Copy => {
            let from = op.from.clone().unwrap_or_default();
            copy(doc, &from, &op.path)?;
        }
        OpKind::Test => {
            test(doc, &op.path, op.value.as_ref().unwrap_or(&Value::Null))?;
        }
    }
    Ok(())
}

fn split_pointer(pointer: &str) -> Result<(&str, String), ApplyError> {
    let mut components = parse_pointer(pointer)?;
    let last = components
        .pop()
        .ok_or_else(|| ApplyError::PathNotFound { path: pointer.to_string() })?;
    let idx = pointer.rfind('/').ok_or_else(|| ApplyError::PathNotFound { path: pointer.to_string() })?;
    Ok((&pointer[..idx], last))
}

fn parse_index(raw: &str, len: usize) -> Result<usize, ApplyError> {
    if raw.starts_with('0') && raw.len() != 1 {
        return Err(ApplyError::PathNotFound { path: raw.to_string() });
    }
    match raw.parse::<usize>() {
        Ok(idx) if idx < len => Ok(idx),
        _ => Err(ApplyError::PathNotFound { path: raw.to_string() }),
    }
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<Option<Value>, ApplyError> {
    if path.is_empty() {
        return Ok(Some(mem::replace(doc, value)));
    }
    let (parent, last) = split_pointer(path)?;
    let parent = doc
        .pointer_mut(parent)
        .ok_or_else(|| ApplyError::PathNotFound { path: path.to_string() })?;
    match parent {
        Value::Object(obj) => Ok(obj.insert(last, value)),
        Value::Array(arr) if last == "-" => {
            arr.push(value);
            Ok(None)
        }
        Value::Array(arr) => {
            let idx = parse_index(&last, arr.len() + 1)?;
            arr.insert(idx, value);
            Ok(None)
        }
        _ => Err(ApplyError::PathNotFound { path: path.to_string() }),
    }
}

fn remove(doc: &mut Value, path: &str, allow_last: bool) -> Result<Value, ApplyError> {
    let (parent, last) = split_pointer(path)?;
    let parent = doc
        .pointer_mut(parent)
        .ok_or_else(|| ApplyError::PathNotFound { path: path.to_string() })?;
    match parent {
        Value::Object(obj) => obj
            .remove(last.as_str())
            .ok_or_else(|| ApplyError::PathNotFound { path: path.to_string() }),
        Value::Array(arr) if allow_last && last == "-" => arr
            .pop()
            .ok_or_else(|| ApplyError::PathNotFound { path: path.to_string() }),
        Value::Array(arr) => {
            let idx = parse_index(&last, arr.len())?;
            Ok(arr.remove(idx))
        }
        _ => Err(ApplyError::PathNotFound { path: path.to_string() }),
    }
}

fn replace(doc: &mut Value, path: &str, value: Value) -> Result<Value, ApplyError> {
    parse_pointer(path)?;
    let target = doc
        .pointer_mut(path)
        .ok_or_else(|| ApplyError::PathNotFound { path: path.to_string() })?;
    Ok(mem::replace(target, value))
}

fn mov(doc: &mut Value, from: &str, path: &str, allow_last: bool) -> Result<Option<Value>, ApplyError> {
    if path.starts_with(from) && path[from.len()..].starts_with('/') {
        return Err(ApplyError::PathNotFound { path: path.to_string() });
    }
    let value = remove(doc, from, allow_last)?;
    add(doc, path, value)
}

fn copy(doc: &mut Value, from: &str, path: &str) -> Result<Option<Value>, ApplyError> {
    parse_pointer(from)?;
    let source = doc
        .pointer(from)
        .ok_or_else(|| ApplyError::PathNotFound { path: from.to_string() })?
        .clone();
    add(doc, path, source)
}

fn test(doc: &Value, path: &str, expected: &Value) -> Result<(), ApplyError> {
    parse_pointer(path)?;
    let target = doc
        .pointer(path)
        .ok_or_else(|| ApplyError::PathNotFound { path: path.to_string() })?;
    if target == expected {
        Ok(())
    } else {
        Err(ApplyError::TestFailed { path: path.to_string() })
    }
}
