// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lexical normalization
//!
//! Runs before anything else looks at the text: strips `/* ... */` comments
//! and collapses whitespace runs outside string literals to a single space,
//! so later stages can match on single spaces only.

use memchr::memmem;

const COMMENT_OPEN: &[u8] = b"/*";
const COMMENT_CLOSE: &[u8] = b"*/";

/// Strip comments, then collapse whitespace outside string literals.
pub fn normalize(text: &str) -> String {
    collapse_whitespace(&strip_comments(text))
}

/// Remove every `/* ... */` span.
///
/// Comments do not nest and each span ends at the first `*/` after its
/// opening. Quote state is not consulted. An unterminated comment is left in
/// place, opening marker included.
pub fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let open = memmem::Finder::new(COMMENT_OPEN);
    let close = memmem::Finder::new(COMMENT_CLOSE);

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(offset) = open.find(&bytes[pos..]) {
        let start = pos + offset;
        let body = start + COMMENT_OPEN.len();
        match close.find(&bytes[body..]) {
            Some(end_offset) => {
                out.push_str(&text[pos..start]);
                pos = body + end_offset + COMMENT_CLOSE.len();
            }
            None => break,
        }
    }

    out.push_str(&text[pos..]);
    out
}

#[inline]
fn is_collapsible(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Collapse whitespace runs outside single-quoted literals into one space.
///
/// Leading whitespace is dropped. Inside a literal every character is kept
/// verbatim; a doubled quote `''` is an escaped quote and does not end the
/// literal.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut last_was_space = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if in_string && chars.peek() == Some(&'\'') {
                chars.next();
                out.push_str("''");
            } else {
                in_string = !in_string;
                out.push(c);
            }
            last_was_space = false;
        } else if in_string {
            out.push(c);
            last_was_space = is_collapsible(c);
        } else if is_collapsible(c) {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }

    out
}
