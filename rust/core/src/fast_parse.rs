// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast Direct Scanning Module
//!
//! Byte-level scanners over raw entity text: instance references, type
//! names, quoted literals and numeric payloads. None of these build a token
//! tree; they are what the PMI resolver uses to chase `#id` links across the
//! store.

use memchr::memmem;
use smallvec::SmallVec;

/// Reference list; most entities point at only a handful of others.
pub type EntityRefs = SmallVec<[u32; 8]>;

/// Read `#<digits>` starting at a `#`. Returns the id and the index just past
/// the digits.
#[inline]
fn read_ref(bytes: &[u8], hash: usize) -> Option<(u32, usize)> {
    let start = hash + 1;
    let mut end = start;
    let mut id: u32 = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        id = id.checked_mul(10)?.checked_add((bytes[end] - b'0') as u32)?;
        end += 1;
    }
    (end > start).then_some((id, end))
}

/// Leftmost `#<digits>` reference.
///
/// From `DATUM_SYSTEM('',#5,#6)` extracts `5`
#[inline]
pub fn first_entity_ref(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(offset) = memchr::memchr(b'#', &bytes[pos..]) {
        let hash = pos + offset;
        if let Some((id, _)) = read_ref(bytes, hash) {
            return Some(id);
        }
        pos = hash + 1;
    }
    None
}

/// Every `#<digits>` reference, left to right, duplicates kept.
///
/// From `(#1,#2,#3)` extracts `[1, 2, 3]`
pub fn entity_refs(text: &str) -> EntityRefs {
    let bytes = text.as_bytes();
    let mut ids = EntityRefs::new();
    let mut pos = 0;
    while let Some(offset) = memchr::memchr(b'#', &bytes[pos..]) {
        let hash = pos + offset;
        match read_ref(bytes, hash) {
            Some((id, end)) => {
                ids.push(id);
                pos = end;
            }
            None => pos = hash + 1,
        }
    }
    ids
}

#[inline]
fn is_type_start(b: u8) -> bool {
    b.is_ascii_uppercase() || b == b'_'
}

#[inline]
fn is_type_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}

/// Leading type name of an entity value.
///
/// From `CARTESIAN_POINT('',(0.,0.,0.))` extracts `CARTESIAN_POINT`. For a
/// complex instance `(A() B())` the first constituent, `A`, is returned.
#[inline]
pub fn entity_type_name(text: &str) -> Option<&str> {
    if text.starts_with('(') {
        return complex_parts(text).first().map(|&(name, _)| name);
    }
    let bytes = text.as_bytes();
    if !bytes.first().copied().is_some_and(is_type_start) {
        return None;
    }
    let end = bytes.iter().position(|&b| !is_type_char(b)).unwrap_or(bytes.len());
    Some(&text[..end])
}

/// Index of the `)` closing the `(` at `open`, skipping string literals.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'\'' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `(type, args)` for each constituent of an entity value, in order.
///
/// A simple instance `A(x)` yields `[("A", "x")]`. For a complex instance
/// `(A(x) B(y))` every keyword directly inside the outer parentheses is a
/// constituent; keywords nested in arguments or string literals are not.
pub fn complex_parts(text: &str) -> Vec<(&str, &str)> {
    if !text.starts_with('(') {
        let Some(name) = entity_type_name(text) else {
            return Vec::new();
        };
        let rest = text[name.len()..].trim();
        let args = rest
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or("");
        return vec![(name, args)];
    }

    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            in_string = b != b'\'';
            i += 1;
            continue;
        }
        match b {
            b'\'' => in_string = true,
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 1 && is_type_start(b) => {
                let end = bytes[i..]
                    .iter()
                    .position(|&c| !is_type_char(c))
                    .map_or(bytes.len(), |p| i + p);
                let name = &text[i..end];
                let open = skip_spaces(bytes, end);
                if bytes.get(open) != Some(&b'(') {
                    parts.push((name, ""));
                    i = end;
                    continue;
                }
                match matching_paren(bytes, open) {
                    Some(close) => {
                        parts.push((name, &text[open + 1..close]));
                        i = close + 1;
                    }
                    None => {
                        parts.push((name, &text[open + 1..]));
                        break;
                    }
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    parts
}

/// Constituent type names of an entity value, in order.
///
/// A simple instance yields its single type name.
pub fn complex_type_names(text: &str) -> Vec<&str> {
    complex_parts(text).into_iter().map(|(name, _)| name).collect()
}

#[inline]
fn is_number_char(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
}

#[inline]
fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Read a `[0-9.eE+-]+` run at `pos`. Returns the run and the index past it.
#[inline]
fn number_run(bytes: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let len = bytes[pos..].iter().take_while(|&&b| is_number_char(b)).count();
    (len > 0).then(|| (&bytes[pos..pos + len], pos + len))
}

#[inline]
fn parse_number(run: &[u8]) -> Option<f64> {
    fast_float::parse::<f64, _>(run).ok()
}

/// Value of the first `LENGTH_MEASURE(<number>)` anywhere in the text.
///
/// Matches as a substring, so `POSITIVE_LENGTH_MEASURE(...)` counts too.
/// Returns `None` when the first well-formed occurrence holds text that is
/// not a number.
pub fn length_measure(text: &str) -> Option<f64> {
    const KEY: &[u8] = b"LENGTH_MEASURE";
    let bytes = text.as_bytes();

    for start in memmem::find_iter(bytes, KEY) {
        let mut pos = skip_spaces(bytes, start + KEY.len());
        if bytes.get(pos) != Some(&b'(') {
            continue;
        }
        pos = skip_spaces(bytes, pos + 1);
        let Some((run, after)) = number_run(bytes, pos) else {
            continue;
        };
        let close = skip_spaces(bytes, after);
        if bytes.get(close) != Some(&b')') {
            continue;
        }
        return parse_number(run);
    }

    None
}

/// Contents of every `'...'` literal, in order, raw (no decoding).
///
/// A doubled `''` inside a literal does not end it. An unterminated literal
/// is ignored.
pub fn quoted_literals(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut literals = Vec::new();
    let mut pos = 0;

    while let Some(offset) = memchr::memchr(b'\'', &bytes[pos..]) {
        let open = pos + offset;
        let mut cursor = open + 1;
        let mut close = None;
        while let Some(next) = memchr::memchr(b'\'', &bytes[cursor..]) {
            let at = cursor + next;
            if bytes.get(at + 1) == Some(&b'\'') {
                cursor = at + 2;
                continue;
            }
            close = Some(at);
            break;
        }
        let Some(close) = close else {
            break;
        };
        literals.push(&text[open + 1..close]);
        pos = close + 1;
    }

    literals
}

/// Try to read `( n , n , n )` at an opening parenthesis.
fn triple_at(bytes: &[u8], open: usize) -> Option<[&[u8]; 3]> {
    let mut pos = open + 1;
    let mut runs: [&[u8]; 3] = [&bytes[..0]; 3];
    for (i, slot) in runs.iter_mut().enumerate() {
        pos = skip_spaces(bytes, pos);
        let (run, after) = number_run(bytes, pos)?;
        *slot = run;
        pos = skip_spaces(bytes, after);
        let expected = if i < 2 { b',' } else { b')' };
        if bytes.get(pos) != Some(&expected) {
            return None;
        }
        pos += 1;
    }
    Some(runs)
}

/// First parenthesised numeric triple.
///
/// From `CARTESIAN_POINT('',(1.,2.5,-3.E-1))` extracts `[1.0, 2.5, -0.3]`
pub fn coordinates(text: &str) -> Option<[f64; 3]> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(offset) = memchr::memchr(b'(', &bytes[pos..]) {
        let open = pos + offset;
        if let Some([x, y, z]) = triple_at(bytes, open) {
            return Some([parse_number(x)?, parse_number(y)?, parse_number(z)?]);
        }
        pos = open + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_entity_ref() {
        assert_eq!(first_entity_ref("DATUM_SYSTEM('',#5,#6)"), Some(5));
        assert_eq!(first_entity_ref("X('#',#12)"), Some(12));
        assert_eq!(first_entity_ref("X('a')"), None);
    }

    #[test]
    fn test_entity_refs_in_order() {
        let refs = entity_refs("DRAUGHTING_MODEL_ITEM_ASSOCIATION('',$,#30,#20,#30)");
        assert_eq!(refs.as_slice(), &[30, 20, 30]);
        assert!(entity_refs("FOO()").is_empty());
    }

    #[test]
    fn test_entity_refs_skip_overflow() {
        assert_eq!(entity_refs("#99999999999,#2").as_slice(), &[2]);
    }

    #[test]
    fn test_entity_type_name() {
        assert_eq!(
            entity_type_name("CARTESIAN_POINT('',(0.,0.,0.))"),
            Some("CARTESIAN_POINT")
        );
        assert_eq!(entity_type_name("POLYLINE2D('',(#1))"), Some("POLYLINE2D"));
        assert_eq!(entity_type_name("'x'"), None);
        assert_eq!(entity_type_name(""), None);
    }

    #[test]
    fn test_complex_type_names() {
        let text = "(GEOMETRIC_TOLERANCE('p','',#5,#6) \
                    GEOMETRIC_TOLERANCE_WITH_DATUM_REFERENCE((#7)) \
                    POSITION_TOLERANCE())";
        assert_eq!(entity_type_name(text), Some("GEOMETRIC_TOLERANCE"));
        assert_eq!(
            complex_type_names(text),
            vec![
                "GEOMETRIC_TOLERANCE",
                "GEOMETRIC_TOLERANCE_WITH_DATUM_REFERENCE",
                "POSITION_TOLERANCE",
            ]
        );
        assert_eq!(complex_type_names("FLATNESS_TOLERANCE('a')"), vec!["FLATNESS_TOLERANCE"]);
    }

    #[test]
    fn test_complex_parts() {
        let parts = complex_parts("(A('x',(1,2)) B ( #3 ) C)");
        assert_eq!(parts, vec![("A", "'x',(1,2)"), ("B", " #3 "), ("C", "")]);
        assert_eq!(complex_parts("DATUM('A')"), vec![("DATUM", "'A'")]);
        assert!(complex_parts("$").is_empty());
    }

    #[test]
    fn test_complex_type_names_ignore_literals() {
        assert_eq!(complex_type_names("(A('B(') C())"), vec!["A", "C"]);
    }

    #[test]
    fn test_length_measure() {
        assert_relative_eq!(
            length_measure("LENGTH_MEASURE_WITH_UNIT(LENGTH_MEASURE(25.4),#9)").unwrap(),
            25.4
        );
        assert_relative_eq!(length_measure("LENGTH_MEASURE( 1.5E-2 )").unwrap(), 0.015);
        assert_relative_eq!(length_measure("POSITIVE_LENGTH_MEASURE(2.)").unwrap(), 2.0);
        assert_eq!(length_measure("LENGTH_MEASURE(#3)"), None);
        assert_eq!(length_measure("PLANE_ANGLE_MEASURE(1.)"), None);
    }

    #[test]
    fn test_length_measure_malformed_number() {
        assert_eq!(length_measure("LENGTH_MEASURE(1.2.3)"), None);
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(quoted_literals("DATUM('A','', #1, 'B')"), vec!["A", "", "B"]);
        assert_eq!(quoted_literals("X('it''s')"), vec!["it''s"]);
        assert_eq!(quoted_literals("X('open"), Vec::<&str>::new());
    }

    #[test]
    fn test_coordinates() {
        let point = coordinates("CARTESIAN_POINT('',(1.,2.5,-3.E-1))").unwrap();
        assert_relative_eq!(point[0], 1.0);
        assert_relative_eq!(point[1], 2.5);
        assert_relative_eq!(point[2], -0.3);
        assert_eq!(coordinates("CARTESIAN_POINT('',(1.,2.))"), None);
        assert!(coordinates("P( ( 0. , 0. , 10. ) )").is_some());
    }
}
