//! Canonical content hasher (64-bit, ordered and unordered modes).
//!
//! Same rolling-update shape as the djb2/FNV-style hash in the upstream
//! hashing module: a running `i64` state is mixed one scalar at a time via
//! [`update_num`]. Extended from 32 to 64 bits and given an `unordered` mode
//! for array elements so that permuted arrays of unordered-equal elements
//! hash equally (used by the `equivalent` optimization and by
//! factorization's identical-subtree lookup).
//!
//! Collisions are tolerated: a hash match is a fast-path candidate, never
//! proof. Callers must confirm with [`crate::equal`]/`deep_equal` before
//! committing to a factorization.

use serde_json::{Map, Number, Value};

const START_STATE: i64 = 5381;

const NULL_CONST: i64 = 0x3a6f_1b9e_8d52_47c1_u64 as i64;
const TRUE_CONST: i64 = 0x7c4e_2a81_5f93_66b0_u64 as i64;
const FALSE_CONST: i64 = 0x1e88_b4d0_9a6c_2f33_u64 as i64;
const ARRAY_CONST: i64 = 0x4f21_cd87_0b3e_99a4_u64 as i64;
const STRING_CONST: i64 = 0x9b05_6e3c_d418_7f2a_u64 as i64;
const OBJECT_CONST: i64 = 0x2d8a_f511_6c7b_3e90_u64 as i64;

/// Mix a single integer into the hash state: `state = (state << 5) + state + num`.
fn update_num(state: i64, num: i64) -> i64 {
    state.wrapping_shl(5).wrapping_add(state).wrapping_add(num)
}

/// Mix a UTF-8 string into the hash state, byte by byte in reverse.
fn update_str(mut state: i64, s: &str) -> i64 {
    state = update_num(state, STRING_CONST);
    state = update_num(state, s.len() as i64);
    for &b in s.as_bytes().iter().rev() {
        state = update_num(state, b as i64);
    }
    state
}

fn update_number(state: i64, n: &Number) -> i64 {
    // Feed the IEEE-754 bit pattern for floats; this intentionally hashes
    // `1` and `1.0` identically since deep_equal treats them as equal.
    let bits = n.as_f64().unwrap_or(0.0).to_bits() as i64;
    update_num(state, bits)
}

/// Digest `value` in ordered mode: array element order and object key order
/// (after sorting) both participate.
pub fn hash(value: &Value) -> i64 {
    hash_with(value, false)
}

/// Digest `value` in unordered mode: arrays combine element digests with an
/// order-insensitive XOR-sum instead of positional mixing.
pub fn hash_unordered(value: &Value) -> i64 {
    hash_with(value, true)
}

fn hash_with(value: &Value, unordered: bool) -> i64 {
    update_value(START_STATE, value, unordered)
}

fn update_value(state: i64, value: &Value, unordered: bool) -> i64 {
    match value {
        Value::Null => update_num(state, NULL_CONST),
        Value::Bool(true) => update_num(state, TRUE_CONST),
        Value::Bool(false) => update_num(state, FALSE_CONST),
        Value::Number(n) => update_number(state, n),
        Value::String(s) => update_str(state, s),
        Value::Array(items) => update_array(state, items, unordered),
        Value::Object(map) => update_object(state, map, unordered),
    }
}

fn update_array(state: i64, items: &[Value], unordered: bool) -> i64 {
    let mut state = update_num(state, ARRAY_CONST);
    state = update_num(state, items.len() as i64);
    if unordered {
        let combined = items
            .iter()
            .fold(0i64, |acc, v| acc ^ hash_unordered(v));
        update_num(state, combined)
    } else {
        for (index, item) in items.iter().enumerate() {
            state = update_num(state, index as i64);
            state = update_value(state, item, false);
        }
        state
    }
}

fn update_object(state: i64, map: &Map<String, Value>, unordered: bool) -> i64 {
    let mut state = update_num(state, OBJECT_CONST);
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        state = update_str(state, key);
        state = update_value(state, &map[key], unordered);
    }
    state
}
