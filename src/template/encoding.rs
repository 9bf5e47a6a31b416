use std::borrow::Cow;

use super::ast::Operator;

const RESERVED: &[u8] = b":/?#[]@!$&'()*+,;=";

#[inline]
fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

#[inline]
fn is_reserved(b: u8) -> bool {
    RESERVED.contains(&b)
}

#[inline]
fn is_pct_triplet(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'%'
        && idx + 2 < bytes.len()
        && bytes[idx + 1].is_ascii_hexdigit()
        && bytes[idx + 2].is_ascii_hexdigit()
}

pub fn encode_value<'a>(value: &'a str, operator: Operator) -> Cow<'a, str> {
    if operator.allows_reserved() {
        encode_reserved(value)
    } else {
        encode_strict(value)
    }
}

/// Percent-encodes everything outside the unreserved set. Spaces become `%20`.
pub fn encode_strict(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Leaves reserved and unreserved characters and existing `%XX` triplets intact.
pub fn encode_reserved(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let passthrough = |idx: usize| {
        let b = bytes[idx];
        is_unreserved(b) || is_reserved(b) || is_pct_triplet(bytes, idx)
    };

    if (0..bytes.len()).all(passthrough) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + value.len() / 2);
    let mut run_start = 0usize;
    for (idx, ch) in value.char_indices() {
        if ch.is_ascii() && passthrough(idx) {
            continue;
        }
        out.push_str(&value[run_start..idx]);
        let mut buf = [0u8; 4];
        out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        run_start = idx + ch.len_utf8();
    }
    out.push_str(&value[run_start..]);
    Cow::Owned(out)
}

/// Decodes a captured value, returning it untouched when it is not valid UTF-8 once decoded.
pub fn decode_value(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}
