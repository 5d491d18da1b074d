//! Stateless parsing and formatting of RFC 6901 pointer strings.

use crate::error::PointerError;

/// Escape one path component for inclusion in a pointer string.
///
/// Per RFC 6901: `~` becomes `~0`, `/` becomes `~1`. Applied character by
/// character so the two substitutions never interact.
///
/// ```
/// use jsondiff_pointer::escape_component;
///
/// assert_eq!(escape_component("a/b"), "a~1b");
/// assert_eq!(escape_component("~k"), "~0k");
/// assert_eq!(escape_component("plain"), "plain");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('~') && !component.contains('/') {
        return component.to_string();
    }
    let mut out = String::with_capacity(component.len());
    for ch in component.chars() {
        match ch {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            other => out.push(other),
        }
    }
    out
}

/// Unescape one already-split path component.
///
/// `~1` decodes to `/`, `~0` decodes to `~`. A trailing `~` or a `~` followed
/// by anything else is rejected.
fn unescape_component(component: &str) -> Result<String, PointerError> {
    if !component.contains('~') {
        return Ok(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(_) => return Err(PointerError::InvalidEscape),
            None => return Err(PointerError::IncompleteEscape),
        }
    }
    Ok(out)
}

/// Parse an RFC 6901 pointer string into unescaped path components.
///
/// The empty string addresses the whole document and parses to an empty
/// path. Any other pointer must start with `/`.
///
/// ```
/// use jsondiff_pointer::parse;
///
/// assert_eq!(parse("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse("/").unwrap(), vec![""]);
/// assert_eq!(parse("/a~1b/~0k/0").unwrap(), vec!["a/b", "~k", "0"]);
/// ```
pub fn parse(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(PointerError::LeadingSlash);
    }
    pointer[1..].split('/').map(unescape_component).collect()
}

/// Format unescaped path components back into an RFC 6901 pointer string.
///
/// ```
/// use jsondiff_pointer::{format, parse};
///
/// let path = parse("/a~1b/~0k").unwrap();
/// assert_eq!(format(&path), "/a~1b/~0k");
/// ```
pub fn format(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}
