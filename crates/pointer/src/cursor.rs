use crate::parse::escape_component;
use std::fmt::Write as _;

/// A mutable RFC 6901 pointer, reused across one differ invocation.
///
/// The cursor always holds the location currently being visited. Recursive
/// callers save a [`Cursor::mark`] before descending into a child, append a
/// key or index, recurse, then [`Cursor::rewind`] back to the saved mark —
/// the buffer is never reallocated for the common append/rewind cycle.
///
/// ```
/// use jsondiff_pointer::Cursor;
///
/// let mut cursor = Cursor::new();
/// assert!(cursor.is_root());
///
/// let mark = cursor.mark();
/// cursor.append_key("foo");
/// cursor.append_index(3);
/// assert_eq!(cursor.as_str(), "/foo/3");
///
/// cursor.rewind(mark);
/// assert!(cursor.is_root());
/// ```
#[derive(Debug, Default)]
pub struct Cursor {
    buf: String,
}

/// An opaque snapshot of a [`Cursor`]'s length, produced by [`Cursor::mark`].
pub type Mark = usize;

impl Cursor {
    /// Create a cursor positioned at the document root.
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Record the current end of the buffer so it can be restored later.
    pub fn mark(&self) -> Mark {
        self.buf.len()
    }

    /// Truncate the buffer back to a previously recorded mark.
    pub fn rewind(&mut self, mark: Mark) {
        self.buf.truncate(mark);
    }

    /// Append an object key component, escaping it per RFC 6901.
    pub fn append_key(&mut self, key: &str) {
        self.buf.push('/');
        if key.contains('~') || key.contains('/') {
            self.buf.push_str(&escape_component(key));
        } else {
            self.buf.push_str(key);
        }
    }

    /// Append an array index component.
    pub fn append_index(&mut self, index: usize) {
        self.buf.push('/');
        // Writes decimal digits straight into the reused buffer instead of
        // formatting a temporary string first.
        write!(self.buf, "{index}").expect("writing to a String cannot fail");
    }

    /// `true` when the cursor points at the document root (`""`).
    pub fn is_root(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the pointer string the cursor currently holds.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Materialize a detached, owned copy of the current pointer.
    ///
    /// Operations store this instead of aliasing the live cursor buffer.
    pub fn copy(&self) -> String {
        self.buf.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        let cursor = Cursor::new();
        assert!(cursor.is_root());
        assert_eq!(cursor.as_str(), "");
    }

    #[test]
    fn append_and_rewind_restores_state() {
        let mut cursor = Cursor::new();
        let mark = cursor.mark();
        cursor.append_key("spec");
        cursor.append_key("containers");
        cursor.append_index(0);
        assert_eq!(cursor.as_str(), "/spec/containers/0");
        cursor.rewind(mark);
        assert!(cursor.is_root());
    }

    #[test]
    fn append_key_escapes_special_characters() {
        let mut cursor = Cursor::new();
        cursor.append_key("a/b");
        cursor.append_key("~tilde");
        assert_eq!(cursor.as_str(), "/a~1b/~0tilde");
    }

    #[test]
    fn nested_marks_compose_like_a_call_stack() {
        let mut cursor = Cursor::new();
        let outer = cursor.mark();
        cursor.append_key("a");
        let inner = cursor.mark();
        cursor.append_key("b");
        assert_eq!(cursor.as_str(), "/a/b");
        cursor.rewind(inner);
        assert_eq!(cursor.as_str(), "/a");
        cursor.rewind(outer);
        assert!(cursor.is_root());
    }

    #[test]
    fn copy_detaches_from_the_live_buffer() {
        let mut cursor = Cursor::new();
        cursor.append_key("x");
        let copied = cursor.copy();
        cursor.append_key("y");
        assert_eq!(copied, "/x");
        assert_eq!(cursor.as_str(), "/x/y");
    }

    #[test]
    fn large_indices_format_correctly() {
        let mut cursor = Cursor::new();
        cursor.append_index(0);
        cursor.append_index(12345);
        assert_eq!(cursor.as_str(), "/0/12345");
    }
}
