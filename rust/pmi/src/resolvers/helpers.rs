// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helper functions for PMI resolvers.

use memchr::memmem;
use step_pmi_core::{
    complex_parts, first_entity_ref, length_measure, parse_argument_list, parse_string,
    quoted_literals,
};

use super::PmiResolver;
use crate::model::MeasureValue;

/// Top-level arguments of an entity value.
///
/// For a complex instance these are the arguments of the constituent named
/// `part`, falling back to the first constituent.
pub(super) fn arguments<'t>(text: &'t str, part: &str) -> Vec<&'t str> {
    let parts = complex_parts(text);
    let args = parts
        .iter()
        .find(|(name, _)| *name == part)
        .or_else(|| parts.first())
        .map_or("", |&(_, args)| args);
    parse_argument_list(args)
}

/// Decoded string argument; unset (`$`), missing or non-string arguments
/// read as empty.
pub(super) fn string_arg(args: &[&str], index: usize) -> String {
    match args.get(index) {
        Some(arg) if arg.starts_with('\'') => parse_string(arg),
        _ => String::new(),
    }
}

/// `#id` argument. Only arguments that are themselves a reference count.
pub(super) fn ref_arg(args: &[&str], index: usize) -> Option<u32> {
    args.get(index)
        .filter(|arg| arg.starts_with('#'))
        .and_then(|arg| first_entity_ref(arg))
}

/// Last quoted literal that is exactly one uppercase letter.
pub(super) fn datum_label(text: &str) -> Option<char> {
    quoted_literals(text).into_iter().rev().find_map(|literal| {
        let mut chars = literal.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Some(c),
            _ => None,
        }
    })
}

/// Name inside the first `TOLERANCE_ZONE_FORM('...')` of the text.
pub(super) fn zone_form_literal(text: &str) -> Option<String> {
    const KEY: &[u8] = b"TOLERANCE_ZONE_FORM";
    let bytes = text.as_bytes();

    memmem::find_iter(bytes, KEY).find_map(|start| {
        let rest = text[start + KEY.len()..].trim_start();
        let rest = rest.strip_prefix('(')?.trim_start();
        let literal = rest.strip_prefix('\'')?;
        let end = literal.find('\'')?;
        Some(literal[..end].to_string())
    })
}

impl PmiResolver<'_> {
    /// `LENGTH_MEASURE` value held by entity `id`.
    pub(super) fn measure(&self, id: u32) -> Option<MeasureValue> {
        let text = self.store.get(id)?;
        length_measure(text).map(|value| MeasureValue {
            value,
            raw_entity_id: id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_of_named_constituent() {
        let text = "(GEOMETRIC_TOLERANCE('pos','desc',#5,#6) POSITION_TOLERANCE())";
        assert_eq!(
            arguments(text, "GEOMETRIC_TOLERANCE"),
            vec!["'pos'", "'desc'", "#5", "#6"]
        );
        // falls back to the first constituent
        assert_eq!(arguments(text, "MISSING").len(), 4);
        assert_eq!(arguments("DATUM('n','d',#3,.F.,'A')", "DATUM").len(), 5);
    }

    #[test]
    fn test_string_and_ref_args() {
        let args = ["'name'", "$", "#12", "(#1)"];
        assert_eq!(string_arg(&args, 0), "name");
        assert_eq!(string_arg(&args, 1), "");
        assert_eq!(string_arg(&args, 9), "");
        assert_eq!(ref_arg(&args, 2), Some(12));
        assert_eq!(ref_arg(&args, 3), None);
    }

    #[test]
    fn test_datum_label() {
        assert_eq!(datum_label("DATUM('datum A','',#3,.F.,'A')"), Some('A'));
        assert_eq!(datum_label("DATUM('B','',#3,.F.,'AB')"), Some('B'));
        assert_eq!(datum_label("DATUM('x','y',#3)"), None);
    }

    #[test]
    fn test_zone_form_literal() {
        assert_eq!(
            zone_form_literal("TOLERANCE_ZONE_FORM('cylindrical')"),
            Some("cylindrical".to_string())
        );
        assert_eq!(zone_form_literal("TOLERANCE_ZONE('',#2)"), None);
        assert_eq!(zone_form_literal("TOLERANCE_ZONE_FORM($)"), None);
    }
}
