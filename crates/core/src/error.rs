use thiserror::Error;

/// Errors that can occur while computing a diff.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The host value could not be turned into a [`Value`](serde_json::Value).
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
    /// The supplied bytes are not valid JSON.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
    /// A value's runtime type falls outside the six-variant JSON universe.
    #[error("unsupported value type at {path}")]
    UnsupportedValueType {
        /// Pointer to the offending location.
        path: String,
    },
}

/// Errors surfaced while applying a patch to a document.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A pointer in the patch could not be parsed.
    #[error("pointer parse error: {0}")]
    Pointer(#[from] jsondiff_pointer::PointerError),
    /// The pointer does not address an existing location.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The offending pointer.
        path: String,
    },
    /// A `test` operation's value did not match the document.
    #[error("test failed at {path}")]
    TestFailed {
        /// The offending pointer.
        path: String,
    },
    /// The document supplied to `apply` was not valid JSON (only checked when requested).
    #[error("document is not valid JSON: {0}")]
    InvalidDocument(#[source] serde_json::Error),
}

/// Errors surfaced while inverting an invertible patch.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InvertError {
    /// A `remove` or `replace` without a preceding `test` cannot be reversed.
    #[error("operation at {path} is not reversible without a preceding test")]
    NonReversible {
        /// Pointer of the non-reversible operation.
        path: String,
    },
    /// A `copy` whose `from` is a prefix of `path` cannot be unambiguously inverted.
    #[error("copy from {from} to {path} is ambiguous to invert")]
    AmbiguousCopyOp {
        /// Source pointer of the copy.
        from: String,
        /// Destination pointer of the copy.
        path: String,
    },
    /// A `test` operation's path did not match the operation that followed it.
    #[error("test at {test_path} does not precede operation on {op_path} ({op})")]
    TestPointer {
        /// Operation name the mismatched test preceded.
        op: &'static str,
        /// Path carried by the `test` operation.
        test_path: String,
        /// Path carried by the following operation.
        op_path: String,
    },
}
