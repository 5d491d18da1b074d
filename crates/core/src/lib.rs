//! Structural JSON differ producing RFC 6902 JSON Patch documents, with
//! factorization, rationalization, invertibility, array-equivalence, and
//! LCS-based array alignment as independently selectable optimizations. Also
//! exposes the RFC 6902 applier and RFC 7386 merge-patch computation as
//! straightforward external collaborators.

pub mod apply;
pub mod bytes;
pub mod differ;
pub mod equal;
pub mod error;
pub mod hash;
pub mod lcs;
pub mod merge;
pub mod operation;
pub mod options;
pub mod value;

pub use apply::{apply as apply_patch, apply_json, apply_unsafe};
pub use error::{ApplyError, DiffError, InvertError};
pub use merge::{merge_patch, merge_patch_json};
pub use operation::{OpKind, Operation, Patch};
pub use options::Options;

use serde_json::Value;

/// Compute a patch transforming `src` into `tgt`.
///
/// `doc` is an optional raw byte view of `tgt`, consulted by the
/// rationalizer to estimate replace costs without re-serializing values; an
/// empty slice disables that optimization's cost comparison (it then always
/// prefers the replace when `rationalize` is set, since the raw length falls
/// back to the serialized value's own length).
pub fn compare(src: &Value, tgt: &Value, doc: &[u8], options: &Options) -> Result<Patch, DiffError> {
    differ::diff(src, tgt, doc, options)
}

/// Decode both inputs as JSON and compute a patch transforming `src` into `tgt`.
pub fn compare_json(src_bytes: &[u8], tgt_bytes: &[u8], options: &Options) -> Result<Patch, DiffError> {
    let src: Value = serde_json::from_slice(src_bytes).map_err(DiffError::Decode)?;
    let tgt: Value = serde_json::from_slice(tgt_bytes).map_err(DiffError::Decode)?;
    differ::diff(&src, &tgt, tgt_bytes, options)
}
