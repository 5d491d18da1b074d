use thiserror::Error;

/// Errors surfaced while parsing an RFC 6901 pointer string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// A non-empty pointer did not start with `/`.
    #[error("leading-slash: pointer must be empty or start with '/'")]
    LeadingSlash,
    /// A `~` escape sequence was cut off at the end of a token.
    #[error("incomplete-escape: token ends with a bare '~'")]
    IncompleteEscape,
    /// A `~` was followed by something other than `0` or `1`.
    #[error("invalid-escape: '~' must be followed by '0' or '1'")]
    InvalidEscape,
}
