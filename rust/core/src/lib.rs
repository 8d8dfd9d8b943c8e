// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # STEP-PMI Core Parser
//!
//! Structure-level parser for ISO-10303-21 ("STEP") exchange files built
//! with [nom](https://docs.rs/nom) and [memchr](https://docs.rs/memchr).
//! No EXPRESS schema is consulted: entities stay raw text addressed by id
//! and are interpreted on demand.
//!
//! ## Overview
//!
//! - **Normalization**: comment stripping and whitespace collapsing
//! - **Sections**: HEADER / ANCHOR / REFERENCE / DATA / SIGNATURE spans,
//!   unknown sections kept raw
//! - **Statements**: depth-aware statement and argument splitting
//! - **Strings**: `\X2\`, `\X4\`, `\X\`, `\S\` and `\P\` directive decoding
//! - **Header**: structured FILE_DESCRIPTION / FILE_NAME / FILE_SCHEMA and
//!   the edition 3 header entities
//! - **Entity store**: insertion-ordered id map plus an optional reverse
//!   reference index
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use step_pmi_core::{normalize, split_sections, EntityStore, SectionKind};
//!
//! let text = normalize(&std::fs::read_to_string("part.step")?);
//! for section in split_sections(&text)? {
//!     if section.kind == SectionKind::Data {
//!         let store = EntityStore::from_section_body(&section.body);
//!         println!("{} entities", store.len());
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the header model and store

pub mod error;
pub mod escape;
pub mod fast_parse;
pub mod header;
pub mod normalize;
pub mod parser;
pub mod sections;
pub mod store;

pub use error::{Error, Result};
pub use escape::decode;
pub use fast_parse::{
    complex_parts, complex_type_names, coordinates, entity_refs, entity_type_name, first_entity_ref,
    length_measure, quoted_literals, EntityRefs,
};
pub use header::{
    build_header, FileDescription, FileName, FilePopulation, FileSchema, ImplementationLevel,
    SectionContext, SectionLanguage, StepHeader,
};
pub use normalize::normalize;
pub use parser::{
    entity_instance, parse_argument_list, parse_entity, parse_string, parse_string_list,
    split_instances, split_statements,
};
pub use sections::{has_iso_marker, split_sections, RawSection, SectionKind, ISO_MARKER};
pub use store::{EntityStore, ReferenceIndex};
