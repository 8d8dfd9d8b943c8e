// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP statement parser using nom
//!
//! Works on normalized section bodies. Nothing here validates against an
//! EXPRESS schema: an entity is a type name plus an opaque argument body,
//! and arguments are split structurally on top-level commas.

use nom::{
    bytes::complete::take_while,
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map_res, recognize, rest},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// Split a section body into statements on `;` at parenthesis depth zero.
///
/// Quote state is not tracked, so a `;` inside a literal at depth zero ends
/// the statement there. Statements are trimmed, empty ones dropped, and a
/// trailing fragment without `;` is kept.
pub fn split_statements(content: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, b) in content.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b';' if depth == 0 => {
                let statement = content[start..i].trim();
                if !statement.is_empty() {
                    statements.push(statement);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let tail = content[start..].trim();
    if !tail.is_empty() {
        statements.push(tail);
    }

    statements
}

/// Split a DATA or REFERENCE body into entity instances on `;` at
/// parenthesis depth zero and outside string literals.
///
/// Parentheses inside a literal do not count towards the depth. Statements
/// are trimmed, empty ones dropped, and a trailing fragment is kept.
pub fn split_instances(content: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut start = 0;

    for (i, b) in content.bytes().enumerate() {
        match b {
            // `''` toggles twice
            b'\'' => in_string = !in_string,
            _ if in_string => {}
            b'(' => depth += 1,
            b')' => depth -= 1,
            b';' if depth == 0 => {
                let statement = content[start..i].trim();
                if !statement.is_empty() {
                    statements.push(statement);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let tail = content[start..].trim();
    if !tail.is_empty() {
        statements.push(tail);
    }

    statements
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Keyword: `[A-Za-z_][A-Za-z0-9_]*`
fn keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

/// Entity instance name: `#123`
fn instance_id(input: &str) -> IResult<&str, u32> {
    preceded(
        char('#'),
        map_res(digit1, |digits: &str| {
            lexical_core::parse::<u32>(digits.as_bytes())
        }),
    )(input)
}

/// Split `NAME(args)` into the upper-cased name and the text between the
/// first `(` and the last `)`.
///
/// Returns an empty name and the statement unchanged when it is not of that
/// shape.
pub fn parse_entity(statement: &str) -> (String, &str) {
    let parsed: IResult<&str, &str> = terminated(keyword, multispace0)(statement);
    let Ok((after_name, name)) = parsed else {
        return (String::new(), statement);
    };

    let trimmed = after_name.trim_end();
    match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(args) => (name.to_ascii_uppercase(), args),
        None => (String::new(), statement),
    }
}

/// Parse `#<id> = <body>`, returning the id and the trimmed body.
///
/// The body may be empty. Fails for anything not anchored on an instance
/// name, including ids that overflow `u32`.
pub fn entity_instance(statement: &str) -> Result<(u32, &str)> {
    let parsed: IResult<&str, (u32, &str)> = all_consuming(tuple((
        delimited(multispace0, instance_id, multispace0),
        preceded(char('='), rest),
    )))(statement);

    match parsed {
        Ok((_, (id, body))) => Ok((id, body.trim())),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::parse(
            statement.len() - e.input.len(),
            format!("expected `#<id> = <value>`, found {:?}", truncate(statement)),
        )),
        Err(nom::Err::Incomplete(_)) => Err(Error::parse(0, "incomplete entity instance")),
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(40) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Split an argument body on top-level commas.
///
/// Parenthesis depth and quote state are tracked together, so commas inside
/// nested lists or string literals do not split. Items are trimmed; a
/// trailing empty item is dropped.
pub fn parse_argument_list(args: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut start = 0;

    for (i, b) in args.bytes().enumerate() {
        match b {
            b'\'' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => depth -= 1,
            b',' if !in_string && depth == 0 => {
                items.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let tail = args[start..].trim();
    if !tail.is_empty() {
        items.push(tail);
    }

    items
}

/// Strip one pair of enclosing quotes without decoding.
#[inline]
fn unquote(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Unquote a string argument, un-double `''` and decode control directives.
pub fn parse_string(s: &str) -> String {
    let inner = unquote(s);
    if inner.contains("''") {
        crate::escape::decode(&inner.replace("''", "'"))
    } else {
        crate::escape::decode(inner)
    }
}

/// Parse `('a', 'b', ...)` into decoded strings.
///
/// One level of parentheses is stripped when present; `()` yields an empty
/// list.
pub fn parse_string_list(s: &str) -> Vec<String> {
    let s = s.trim();
    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(s);

    if inner.is_empty() {
        return Vec::new();
    }

    parse_argument_list(inner)
        .into_iter()
        .map(parse_string)
        .collect()
}
