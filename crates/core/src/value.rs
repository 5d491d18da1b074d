//! Type discriminator over the six-variant JSON value universe.
//!
//! `serde_json::Value` already rejects anything outside `null`, `bool`,
//! `number`, `string`, `array`, `object` at decode time, so [`Kind`] exists
//! purely to classify an already-decoded value for dispatch in the differ —
//! there is no `invalid` runtime payload to carry, only the discriminator.

use serde_json::Value;

/// The classification of a decoded JSON value.
///
/// Number is a single kind here: `serde_json::Number` already carries either
/// a float or (with the `arbitrary_precision` feature) a preserved decimal
/// literal, and [`jsondiff_util::deep_equal`] dispatches on that internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// Classify a decoded value.
pub fn kind_of(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(_) => Kind::Number,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
    }
}

/// Two values are comparable (can be recursed into together) only if they
/// share a discriminator. Mismatched kinds always produce a `replace`.
pub fn comparable(a: &Value, b: &Value) -> bool {
    kind_of(a) == kind_of(b)
}
