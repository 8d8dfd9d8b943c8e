// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP string escape decoding
//!
//! ISO-10303-21 strings carry non-ASCII text through control directives:
//!
//! | directive | meaning |
//! |---|---|
//! | `\X2\hhhh...\X0\` | UTF-16BE code units, 4 hex digits each |
//! | `\X4\hhhhhhhh...\X0\` | Unicode scalar values, 8 hex digits each |
//! | `\X\hh` | one ISO 8859-1 byte |
//! | `\S\c` | `c` shifted into the upper half (code point + 0x80) |
//! | `\Px\` | code page switch, ignored |
//!
//! Decoding never fails: a directive that does not parse is copied through
//! as literal text.

const X2_OPEN: &[char] = &['\\', 'X', '2', '\\'];
const X4_OPEN: &[char] = &['\\', 'X', '4', '\\'];
const X_OPEN: &[char] = &['\\', 'X', '\\'];
const S_OPEN: &[char] = &['\\', 'S', '\\'];
const X0_CLOSE: &[char] = &['\\', 'X', '0', '\\'];

#[inline]
fn starts_with(chars: &[char], at: usize, pattern: &[char]) -> bool {
    chars.get(at..at + pattern.len()) == Some(pattern)
}

/// Parse a fixed-width group of hex digits.
#[inline]
fn hex_group(group: &[char]) -> Option<u32> {
    group.iter().try_fold(0u32, |acc, c| {
        c.to_digit(16).map(|digit| acc * 16 + digit)
    })
}

/// Collect the hex payload of an `\X2\` / `\X4\` block starting at `at`.
///
/// Returns the payload, the index just past `\X0\` (or the end of input
/// when the block is never closed) and whether `\X0\` was found.
fn block_payload(chars: &[char], mut at: usize) -> (&[char], usize, bool) {
    let start = at;
    while at < chars.len() && !starts_with(chars, at, X0_CLOSE) {
        at += 1;
    }
    let payload = &chars[start..at];
    let closed = at < chars.len();
    let next = if closed { at + X0_CLOSE.len() } else { at };
    (payload, next, closed)
}

/// Decode UTF-16BE code units, 4 hex digits each.
fn decode_x2(payload: &[char]) -> Option<String> {
    let units = payload
        .chunks_exact(4)
        .map(|group| hex_group(group).map(|unit| unit as u16))
        .collect::<Option<Vec<u16>>>()?;
    Some(
        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
    )
}

/// Decode Unicode scalar values, 8 hex digits each.
fn decode_x4(payload: &[char]) -> Option<String> {
    payload
        .chunks_exact(8)
        .map(|group| hex_group(group).and_then(char::from_u32))
        .collect()
}

fn push_literal_block(out: &mut String, open: &[char], payload: &[char], closed: bool) {
    out.extend(open);
    out.extend(payload);
    if closed {
        out.extend(X0_CLOSE);
    }
}

/// Decode all STEP control directives in `s`.
///
/// Single left-to-right pass. Text outside directives is copied unchanged.
pub fn decode(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < len {
        if starts_with(&chars, i, X2_OPEN) {
            let (payload, next, closed) = block_payload(&chars, i + X2_OPEN.len());
            match decode_x2(payload) {
                Some(text) => out.push_str(&text),
                None => push_literal_block(&mut out, X2_OPEN, payload, closed),
            }
            i = next;
        } else if starts_with(&chars, i, X4_OPEN) {
            let (payload, next, closed) = block_payload(&chars, i + X4_OPEN.len());
            match decode_x4(payload) {
                Some(text) => out.push_str(&text),
                None => push_literal_block(&mut out, X4_OPEN, payload, closed),
            }
            i = next;
        } else if starts_with(&chars, i, X_OPEN) && i + 5 <= len {
            match hex_group(&chars[i + 3..i + 5]).and_then(char::from_u32) {
                Some(c) => {
                    out.push(c);
                    i += 5;
                }
                None => {
                    out.push(chars[i]);
                    i += 1;
                }
            }
        } else if starts_with(&chars, i, S_OPEN) && i + 4 <= len {
            match char::from_u32(chars[i + 3] as u32 + 0x80) {
                Some(c) => {
                    out.push(c);
                    i += 4;
                }
                None => {
                    out.push(chars[i]);
                    i += 1;
                }
            }
        } else if chars[i] == '\\' && i + 4 <= len && chars[i + 1] == 'P' && chars[i + 3] == '\\' {
            i += 4;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}
