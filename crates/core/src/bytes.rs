//! Raw byte-document helpers used by the rationalizer's cost estimate.
//!
//! These operate on a JSON byte view without decoding it, so the
//! rationalizer can compare the size of a hypothetical single `replace`
//! against the operations it would otherwise emit without re-serializing a
//! `Value` it already consumed.

/// Strip insignificant whitespace from a JSON byte stream, respecting
/// string/escape state so bytes inside string literals are left untouched.
pub fn compact(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut in_string = false;
    let mut escaped = false;
    for &b in bytes {
        if in_string {
            out.push(b);
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => continue,
            b'"' => {
                in_string = true;
                out.push(b);
            }
            _ => out.push(b),
        }
    }
    out
}

/// Compact `bytes` in place, truncating the buffer to the new length.
pub fn compact_in_place(bytes: &mut Vec<u8>) {
    let compacted = compact(bytes);
    *bytes = compacted;
}

/// Find the raw sub-document addressed by `key` within a compacted JSON
/// object byte view (the leading `{` through trailing `}` included).
///
/// Returns `None` when `doc` is not an object or the key is absent.
pub fn find_key<'a>(doc: &'a [u8], key: &str) -> Option<&'a [u8]> {
    let mut i = skip_ws(doc, 0);
    if doc.get(i) != Some(&b'{') {
        return None;
    }
    i += 1;
    loop {
        i = skip_ws(doc, i);
        if doc.get(i) == Some(&b'}') {
            return None;
        }
        let (found_key, after_key) = read_string(doc, i)?;
        i = skip_ws(doc, after_key);
        if doc.get(i) != Some(&b':') {
            return None;
        }
        i += 1;
        i = skip_ws(doc, i);
        let value_start = i;
        let value_end = skip_value(doc, i)?;
        if found_key == key {
            return Some(&doc[value_start..value_end]);
        }
        i = skip_ws(doc, value_end);
        match doc.get(i) {
            Some(b',') => i += 1,
            Some(b'}') => return None,
            _ => return None,
        }
    }
}

/// Find the raw sub-document at zero-based `index` within a compacted JSON
/// array byte view.
pub fn find_index(doc: &[u8], index: usize) -> Option<&[u8]> {
    let mut i = skip_ws(doc, 0);
    if doc.get(i) != Some(&b'[') {
        return None;
    }
    i += 1;
    let mut current = 0usize;
    loop {
        i = skip_ws(doc, i);
        if doc.get(i) == Some(&b']') {
            return None;
        }
        let value_start = i;
        let value_end = skip_value(doc, i)?;
        if current == index {
            return Some(&doc[value_start..value_end]);
        }
        current += 1;
        i = skip_ws(doc, value_end);
        match doc.get(i) {
            Some(b',') => i += 1,
            Some(b']') => return None,
            _ => return None,
        }
    }
}

fn skip_ws(doc: &[u8], mut i: usize) -> usize {
    while let Some(&b) = doc.get(i) {
        if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Read a JSON string starting at `doc[i]` (which must be `"`). Returns the
/// unescaped contents and the index just past the closing quote.
///
/// Decodes all six single-character escapes plus `\uXXXX`, including
/// surrogate pairs (`\uD800`-`\uDBFF` followed by `\uDC00`-`\uDFFF`) for
/// codepoints outside the basic multilingual plane. An unpaired surrogate
/// decodes to U+FFFD rather than failing the whole read.
fn read_string(doc: &[u8], i: usize) -> Option<(String, usize)> {
    if doc.get(i) != Some(&b'"') {
        return None;
    }
    let mut j = i + 1;
    let mut out = Vec::new();
    loop {
        let b = *doc.get(j)?;
        match b {
            b'"' => return Some((String::from_utf8(out).ok()?, j + 1)),
            b'\\' => {
                let esc = *doc.get(j + 1)?;
                j += 2;
                match esc {
                    b'"' => out.push(b'"'),
                    b'\\' => out.push(b'\\'),
                    b'/' => out.push(b'/'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'u' => {
                        let (unit, after) = read_hex4(doc, j)?;
                        j = after;
                        let ch = if (0xd800..=0xdbff).contains(&unit) {
                            if doc.get(j) == Some(&b'\\') && doc.get(j + 1) == Some(&b'u') {
                                let (low, after_low) = read_hex4(doc, j + 2)?;
                                if (0xdc00..=0xdfff).contains(&low) {
                                    j = after_low;
                                    let c = 0x10000
                                        + ((unit as u32 - 0xd800) << 10)
                                        + (low as u32 - 0xdc00);
                                    char::from_u32(c).unwrap_or('\u{fffd}')
                                } else {
                                    '\u{fffd}'
                                }
                            } else {
                                '\u{fffd}'
                            }
                        } else if (0xdc00..=0xdfff).contains(&unit) {
                            '\u{fffd}'
                        } else {
                            char::from_u32(unit as u32)?
                        };
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    _ => return None,
                }
            }
            other => {
                out.push(other);
                j += 1;
            }
        }
    }
}

/// Read four hex digits starting at `doc[i]`, returning the parsed value and
/// the index just past them.
fn read_hex4(doc: &[u8], i: usize) -> Option<(u16, usize)> {
    let digits = doc.get(i..i + 4)?;
    let s = std::str::from_utf8(digits).ok()?;
    let value = u16::from_str_radix(s, 16).ok()?;
    Some((value, i + 4))
}

/// Advance past one JSON value starting at `doc[i]`, returning the index
/// just past it. Tracks nesting depth and string/escape state; does not
/// validate the value is well-formed JSON beyond what is needed to find its
/// end.
fn skip_value(doc: &[u8], i: usize) -> Option<usize> {
    let b = *doc.get(i)?;
    match b {
        b'{' | b'[' => {
            let close = if b == b'{' { b'}' } else { b']' };
            let mut depth = 1i32;
            let mut j = i + 1;
            let mut in_string = false;
            let mut escaped = false;
            while depth > 0 {
                let c = *doc.get(j)?;
                if in_string {
                    if escaped {
                        escaped = false;
                    } else if c == b'\\' {
                        escaped = true;
                    } else if c == b'"' {
                        in_string = false;
                    }
                } else if c == b'"' {
                    in_string = true;
                } else if c == b {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                }
                j += 1;
            }
            Some(j)
        }
        b'"' => read_string(doc, i).map(|(_, end)| end),
        _ => {
            let mut j = i;
            while let Some(&c) = doc.get(j) {
                if matches!(c, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r') {
                    break;
                }
                j += 1;
            }
            Some(j)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_strips_whitespace_outside_strings() {
        let input = b"{ \"a\" : 1,\n \"b\": \" x y \" }";
        let out = compact(input);
        assert_eq!(out, b"{\"a\":1,\"b\":\" x y \"}");
    }

    #[test]
    fn find_key_locates_nested_value() {
        let doc = br#"{"a":1,"b":{"c":2},"d":[1,2,3]}"#;
        assert_eq!(find_key(doc, "b"), Some(&br#"{"c":2}"#[..]));
        assert_eq!(find_key(doc, "d"), Some(&br#"[1,2,3]"#[..]));
        assert_eq!(find_key(doc, "missing"), None);
    }

    #[test]
    fn find_index_locates_array_element() {
        let doc = br#"[{"a":1},"two",3]"#;
        assert_eq!(find_index(doc, 0), Some(&br#"{"a":1}"#[..]));
        assert_eq!(find_index(doc, 1), Some(&br#""two""#[..]));
        assert_eq!(find_index(doc, 2), Some(&br#"3"#[..]));
        assert_eq!(find_index(doc, 3), None);
    }

    #[test]
    fn find_key_ignores_braces_inside_strings() {
        let doc = br#"{"a":"x{y}z","b":2}"#;
        assert_eq!(find_key(doc, "a"), Some(&br#""x{y}z""#[..]));
        assert_eq!(find_key(doc, "b"), Some(&br#"2"#[..]));
    }

    #[test]
    fn read_string_decodes_unicode_escape() {
        // JSON text carrying a literal `é` escape, as an ASCII-only
        // serializer would emit for an accented character.
        let doc = b"{\"caf\\u00e9\":1}";
        assert_eq!(find_key(doc, "caf\u{e9}"), Some(&b"1"[..]));
    }

    #[test]
    fn read_string_decodes_surrogate_pair_escape_in_a_key() {
        // `😀` is the UTF-16 surrogate pair for U+1F600, used
        // here as a non-BMP object key; only the key goes through
        // `read_string`, so this exercises the decode path that the
        // value's raw byte span does not.
        let doc = b"{\"\\ud83d\\ude00\":2}";
        assert_eq!(find_key(doc, "\u{1f600}"), Some(&b"2"[..]));
    }
}
