// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Percent-encoding policies for expanded values and literal template text.

use pct_str::{Encoder, PctString};

/// Characters RFC 3986 leaves unreserved and that never need encoding.
pub(crate) fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// RFC 3986 `gen-delims` and `sub-delims`.
pub(crate) fn is_reserved(c: char) -> bool {
    matches!(
        c,
        ':' | '/' | '?' | '#' | '[' | ']' | '@' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

/// Encodes every character outside the unreserved set.
#[derive(Debug, Clone, Copy)]
struct UnreservedOnly;

impl Encoder for UnreservedOnly {
    fn encode(&self, c: char) -> bool {
        !is_unreserved(c)
    }
}

/// Encodes every character that may not appear in a URI at all.
#[derive(Debug, Clone, Copy)]
struct ReservedAllowed;

impl Encoder for ReservedAllowed {
    fn encode(&self, c: char) -> bool {
        !(is_unreserved(c) || is_reserved(c))
    }
}

/// Percent-encodes `value` so that only unreserved characters remain.
pub(crate) fn encode_unreserved(value: &str) -> String {
    if value.chars().all(is_unreserved) {
        return value.to_owned();
    }
    PctString::encode(value.chars(), UnreservedOnly).into_string()
}

/// Percent-encodes `value` while leaving reserved characters and existing `%XX` triplets intact.
///
/// Applying this function twice yields the same result as applying it once.
pub(crate) fn encode_reserved(value: &str) -> String {
    if value.chars().all(|c| is_unreserved(c) || is_reserved(c)) {
        return value.to_owned();
    }

    let mut encoded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(index) = rest.find('%') {
        let (head, tail) = rest.split_at(index);
        push_reserved(&mut encoded, head);

        if is_pct_triplet(tail) {
            encoded.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            encoded.push_str("%25");
            rest = &tail[1..];
        }
    }

    push_reserved(&mut encoded, rest);
    encoded
}

fn push_reserved(target: &mut String, chunk: &str) {
    if chunk.chars().all(|c| is_unreserved(c) || is_reserved(c)) {
        target.push_str(chunk);
    } else {
        target.push_str(PctString::encode(chunk.chars(), ReservedAllowed).as_str());
    }
}

/// Returns `true` if `text` starts with `%` followed by two hex digits.
pub(crate) fn is_pct_triplet(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 3 && bytes[0] == b'%' && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()
}
