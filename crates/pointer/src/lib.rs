//! Mutable RFC 6901 JSON Pointer cursor and stateless pointer parsing.
//!
//! [`Cursor`] is the path-tracking primitive the differ threads through its
//! recursive traversal without per-step allocation. [`parse`] and [`format`]
//! convert between pointer strings and unescaped path components for callers
//! that need to address a document from a stored pointer (the applier, the
//! rationalizer's byte-document lookups).

mod cursor;
mod error;
mod parse;

pub use cursor::{Cursor, Mark};
pub use error::PointerError;
pub use parse::{escape_component, format, parse};
