// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation PMI grouping
//!
//! Polylines drawn for one annotation share a name such as `Note (256)` or
//! `Feature Control Frame (12)`. Grouping by that name, and by the type
//! prefix before the number, recovers the annotations behind the strokes.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::document::Document;

/// Polylines sharing one presentation name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PmiGroup {
    pub name: String,
    pub pmi_type: String,
    pub polyline_ids: Vec<u32>,
}

impl PmiGroup {
    #[inline]
    pub fn polyline_count(&self) -> usize {
        self.polyline_ids.len()
    }
}

/// Type prefix of a presentation name: the leading letters and spaces
/// before `(<digits>)`, trimmed. Names without that shape are their own
/// type.
pub fn pmi_type(name: &str) -> &str {
    let prefix_len = name
        .find(|c: char| !(c.is_ascii_alphabetic() || c.is_whitespace()))
        .unwrap_or(name.len());
    let prefix = &name[..prefix_len];

    let numbered = name[prefix_len..]
        .strip_prefix('(')
        .and_then(|rest| {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            (digits > 0).then(|| &rest[digits..])
        })
        .is_some_and(|rest| rest.starts_with(')'));

    if numbered && !prefix.trim().is_empty() {
        prefix.trim()
    } else {
        name
    }
}

impl Document {
    /// Named polyline groups, largest first. Groups of equal size keep the
    /// order in which their names first appear.
    pub fn pmi_groups(&self) -> Vec<PmiGroup> {
        let mut groups: Vec<PmiGroup> = Vec::new();
        let mut slots: FxHashMap<&str, usize> = FxHashMap::default();

        for polyline in &self.pmi().presentation.polylines {
            let name = polyline.name.as_str();
            if name.is_empty() {
                continue;
            }
            let slot = *slots.entry(name).or_insert_with(|| {
                groups.push(PmiGroup {
                    name: name.to_string(),
                    pmi_type: pmi_type(name).to_string(),
                    polyline_ids: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].polyline_ids.push(polyline.entity_id);
        }

        // stable
        groups.sort_by(|a, b| b.polyline_count().cmp(&a.polyline_count()));
        groups
    }

    /// Number of groups per type, most common first.
    pub fn pmi_types(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for group in self.pmi_groups() {
            match counts.iter_mut().find(|(pmi_type, _)| *pmi_type == group.pmi_type) {
                Some((_, count)) => *count += 1,
                None => counts.push((group.pmi_type, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    pub fn polyline_ids_by_name(&self, name: &str) -> Vec<u32> {
        self.pmi()
            .presentation
            .polylines
            .iter()
            .filter(|polyline| polyline.name == name)
            .map(|polyline| polyline.entity_id)
            .collect()
    }

    pub fn polyline_ids_by_type(&self, wanted: &str) -> Vec<u32> {
        self.pmi()
            .presentation
            .polylines
            .iter()
            .filter(|polyline| pmi_type(&polyline.name) == wanted)
            .map(|polyline| polyline.entity_id)
            .collect()
    }
}
