//! JSON size calculation utilities.
//!
//! Provides functions for calculating the exact serialized size of JSON
//! values, used by the differ's rationalize pass to compare the cost of a
//! group of operations against a single replace.

mod json;

pub use json::{json_size, json_size_approx, utf8_size};
