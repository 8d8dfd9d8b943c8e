// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section partitioning
//!
//! Splits a normalized exchange structure into `<NAME>; <body> ENDSEC;`
//! spans. The five sections defined by ISO-10303-21 get their own
//! [`SectionKind`]; anything else is kept raw as [`SectionKind::Unknown`].

use crate::error::{Error, Result};

/// Canonical exchange structure marker.
pub const ISO_MARKER: &str = "ISO-10303-21";
/// Closing exchange structure marker.
pub const END_ISO_MARKER: &str = "END-ISO-10303-21";
const ENDSEC: &str = "ENDSEC";

/// Section kinds defined by ISO-10303-21
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SectionKind {
    Header,
    /// Edition 3 and later
    Anchor,
    /// Edition 3 and later
    Reference,
    Data,
    /// Edition 3 and later
    Signature,
    Unknown(String),
}

impl SectionKind {
    /// Classify an upper-cased section name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "HEADER" => SectionKind::Header,
            "ANCHOR" => SectionKind::Anchor,
            "REFERENCE" => SectionKind::Reference,
            "DATA" => SectionKind::Data,
            "SIGNATURE" => SectionKind::Signature,
            other => SectionKind::Unknown(other.to_string()),
        }
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, SectionKind::Unknown(_))
    }
}

/// One `<NAME>; <body> ENDSEC;` span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawSection {
    pub kind: SectionKind,
    /// Upper-cased section name
    pub name: String,
    /// Trimmed body between the name's `;` and `ENDSEC`
    pub body: String,
}

/// Find `<keyword> ws* ;` case-insensitively, starting at `from`.
///
/// Returns the byte range of the whole marker, semicolon included.
fn find_marker(text: &str, from: usize, keyword: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let key = keyword.as_bytes();
    let first = key[0];
    let mut pos = from;

    while pos < bytes.len() {
        let offset = memchr::memchr2(
            first.to_ascii_uppercase(),
            first.to_ascii_lowercase(),
            &bytes[pos..],
        )?;
        let start = pos + offset;
        pos = start + 1;

        let end = start + key.len();
        if end > bytes.len() || !bytes[start..end].eq_ignore_ascii_case(key) {
            continue;
        }

        let mut cursor = end;
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor < bytes.len() && bytes[cursor] == b';' {
            return Some((start, cursor + 1));
        }
    }

    None
}

/// Whether the text carries the `ISO-10303-21;` marker (case-insensitive).
pub fn has_iso_marker(text: &str) -> bool {
    find_marker(text, 0, ISO_MARKER).is_some()
}

/// Remove every occurrence of a marker.
fn strip_marker(text: &str, keyword: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some((start, end)) = find_marker(text, pos, keyword) {
        out.push_str(&text[pos..start]);
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Try to read `IDENT ws* ;` at `start`. Returns the identifier and the byte
/// offset just past the semicolon.
fn section_opening(text: &str, start: usize) -> Option<(&str, usize)> {
    let rest = &text[start..];
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }

    let ident_len = rest
        .char_indices()
        .skip(1)
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    let after = rest[ident_len..].trim_start();
    if !after.starts_with(';') {
        return None;
    }
    let consumed = rest.len() - after.len() + 1;
    Some((&rest[..ident_len], start + consumed))
}

/// Split normalized text into sections.
///
/// Fails only when the `ISO-10303-21;` marker is absent. The opening and
/// closing markers are removed before scanning. Unknown section names are
/// reported with a warning and kept.
pub fn split_sections(text: &str) -> Result<Vec<RawSection>> {
    if !has_iso_marker(text) {
        tracing::warn!("ISO-10303-21 marker not found");
        return Err(Error::MissingIsoMarker);
    }

    let content = strip_marker(&strip_marker(text, END_ISO_MARKER), ISO_MARKER);
    let mut sections = Vec::new();
    let mut offset = 0;

    while let Some(section) = next_section(&content, &mut offset) {
        if let SectionKind::Unknown(ref name) = section.kind {
            tracing::warn!(section = %name, "unknown section found");
        }
        sections.push(section);
    }

    Ok(sections)
}

/// Find the next complete section at or after `offset` and advance `offset`
/// past its `ENDSEC;`.
fn next_section(content: &str, offset: &mut usize) -> Option<RawSection> {
    let mut prev = content[..*offset].chars().next_back();

    for (rel, c) in content[*offset..].char_indices() {
        let pos = *offset + rel;
        let at_boundary = prev.map_or(true, |p| !is_word_char(p));
        prev = Some(c);
        if !at_boundary {
            continue;
        }

        let Some((ident, body_start)) = section_opening(content, pos) else {
            continue;
        };
        // No later opening can find an ENDSEC either
        let (endsec_start, endsec_end) = find_marker(content, body_start, ENDSEC)?;

        let name = ident.to_ascii_uppercase();
        *offset = endsec_end;
        return Some(RawSection {
            kind: SectionKind::from_name(&name),
            name,
            body: content[body_start..endsec_start].trim().to_string(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_detection() {
        assert!(has_iso_marker("ISO-10303-21; HEADER; ENDSEC;"));
        assert!(has_iso_marker("iso-10303-21 ;"));
        assert!(!has_iso_marker("ISO-10303-21 HEADER;"));
        assert!(!has_iso_marker("HEADER; ENDSEC;"));
    }

    #[test]
    fn test_missing_marker_fails() {
        let err = split_sections("HEADER; FILE_NAME('x'); ENDSEC;").unwrap_err();
        assert_eq!(err, Error::MissingIsoMarker);
    }

    #[test]
    fn test_split_known_sections() {
        let text = "ISO-10303-21; HEADER; FILE_DESCRIPTION(('d'),'2;1'); ENDSEC; \
                    DATA; #1=FOO('x'); #2=BAR(#1); ENDSEC; END-ISO-10303-21;";
        let sections = split_sections(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Header);
        assert_eq!(sections[0].body, "FILE_DESCRIPTION(('d'),'2;1');");
        assert_eq!(sections[1].kind, SectionKind::Data);
        assert_eq!(sections[1].body, "#1=FOO('x'); #2=BAR(#1);");
    }

    #[test]
    fn test_section_names_are_case_insensitive() {
        let text = "iso-10303-21; header; X(1); endsec; data; #1=A(); EndSec ; end-iso-10303-21;";
        let sections = split_sections(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "HEADER");
        assert_eq!(sections[1].kind, SectionKind::Data);
        assert_eq!(sections[1].body, "#1=A();");
    }

    #[test]
    fn test_unknown_section_is_kept() {
        let text = "ISO-10303-21; HEADER; ENDSEC; UNKNOWN_SECTION; SOME_DATA; ENDSEC; \
                    DATA; #1=TEST('value'); ENDSEC; END-ISO-10303-21;";
        let sections = split_sections(text).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections[1].kind,
            SectionKind::Unknown("UNKNOWN_SECTION".to_string())
        );
        assert_eq!(sections[1].body, "SOME_DATA;");
        assert!(!sections[1].kind.is_known());
        assert_eq!(sections[2].kind, SectionKind::Data);
    }

    #[test]
    fn test_edition_three_sections() {
        let text = "ISO-10303-21; HEADER; ENDSEC; ANCHOR; <a>=#1; ENDSEC; \
                    REFERENCE; #5=<http://x>; ENDSEC; DATA; ENDSEC; SIGNATURE; abc; ENDSEC;";
        let kinds: Vec<SectionKind> = split_sections(text)
            .unwrap()
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::Anchor,
                SectionKind::Reference,
                SectionKind::Data,
                SectionKind::Signature,
            ]
        );
    }

    #[test]
    fn test_missing_end_marker_still_parses() {
        let sections = split_sections("ISO-10303-21; DATA; #1=A(); ENDSEC;").unwrap();
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_unterminated_section_is_dropped() {
        let sections =
            split_sections("ISO-10303-21; HEADER; ENDSEC; DATA; #1=A();").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Header);
    }
}
