// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed STEP document
//!
//! Pipeline: normalize, split sections, split statements, parse entities,
//! resolve PMI. A [`Document`] is built in one go and never mutated.

use serde::Serialize;
use step_pmi_core::{
    build_header, normalize, split_sections, split_statements, EntityStore, SectionKind,
    StepHeader, ISO_MARKER,
};
use step_pmi_semantic::{resolve_pmi, Pmi, ResolverOptions};

/// A section whose name is not one of the five ISO-10303-21 sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownSection {
    pub name: String,
    pub body: String,
}

/// Per-section item counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub file_path: Option<String>,
    pub iso_version: Option<String>,
    pub is_loaded: bool,
    pub header_count: usize,
    pub anchor_count: usize,
    pub reference_count: usize,
    pub data_count: usize,
    pub signature_count: usize,
    pub unknown_section_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    iso_version: String,
    header: StepHeader,
    header_statements: Vec<String>,
    anchors: Vec<String>,
    references: EntityStore,
    data: EntityStore,
    signatures: Vec<String>,
    unknown_sections: Vec<UnknownSection>,
    pmi: Pmi,
}

fn statements(body: &str) -> impl Iterator<Item = String> + '_ {
    split_statements(body).into_iter().map(str::to_string)
}

impl Document {
    /// Parse in-memory STEP text with default resolver options.
    pub fn parse(text: &str) -> step_pmi_core::Result<Self> {
        Self::parse_with(text, ResolverOptions::default())
    }

    /// Parse in-memory STEP text.
    ///
    /// Fails only when the `ISO-10303-21;` marker is missing. Sections of the
    /// same kind accumulate in file order; DATA and REFERENCE instances with
    /// a repeated id keep the last value.
    pub fn parse_with(text: &str, options: ResolverOptions) -> step_pmi_core::Result<Self> {
        let normalized = normalize(text);
        let sections = split_sections(&normalized)?;

        let mut header_statements = Vec::new();
        let mut anchors = Vec::new();
        let mut references = EntityStore::new();
        let mut data = EntityStore::new();
        let mut signatures = Vec::new();
        let mut unknown_sections = Vec::new();

        for section in sections {
            match section.kind {
                SectionKind::Header => header_statements.extend(statements(&section.body)),
                SectionKind::Anchor => anchors.extend(statements(&section.body)),
                SectionKind::Reference => references.extend_from_section_body(&section.body),
                SectionKind::Data => data.extend_from_section_body(&section.body),
                SectionKind::Signature => signatures.extend(statements(&section.body)),
                SectionKind::Unknown(name) => unknown_sections.push(UnknownSection {
                    name,
                    body: section.body,
                }),
            }
        }

        let header = build_header(header_statements.iter().map(String::as_str));
        let pmi = resolve_pmi(&data, options);

        tracing::debug!(
            header = header_statements.len(),
            anchors = anchors.len(),
            references = references.len(),
            data = data.len(),
            signatures = signatures.len(),
            unknown = unknown_sections.len(),
            "sections parsed"
        );

        Ok(Self {
            iso_version: ISO_MARKER.to_string(),
            header,
            header_statements,
            anchors,
            references,
            data,
            signatures,
            unknown_sections,
            pmi,
        })
    }

    /// Raw text of DATA entity `id`.
    #[inline]
    pub fn entity_text(&self, id: u32) -> Option<&str> {
        self.data.get(id)
    }

    /// Raw text of REFERENCE entity `id`.
    #[inline]
    pub fn reference_text(&self, id: u32) -> Option<&str> {
        self.references.get(id)
    }

    /// Detected exchange structure marker, always `ISO-10303-21`.
    pub fn iso_version(&self) -> &str {
        &self.iso_version
    }

    pub fn header(&self) -> &StepHeader {
        &self.header
    }

    /// HEADER statements as written, in order.
    pub fn header_statements(&self) -> &[String] {
        &self.header_statements
    }

    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    pub fn unknown_sections(&self) -> &[UnknownSection] {
        &self.unknown_sections
    }

    pub fn data(&self) -> &EntityStore {
        &self.data
    }

    pub fn references(&self) -> &EntityStore {
        &self.references
    }

    pub fn pmi(&self) -> &Pmi {
        &self.pmi
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            file_path: None,
            iso_version: Some(self.iso_version.clone()),
            is_loaded: true,
            header_count: self.header_statements.len(),
            anchor_count: self.anchors.len(),
            reference_count: self.references.len(),
            data_count: self.data.len(),
            signature_count: self.signatures.len(),
            unknown_section_count: self.unknown_sections.len(),
        }
    }
}
