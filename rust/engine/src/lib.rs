// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # STEP-PMI Engine
//!
//! Reads ISO-10303-21 files into an immutable [`Document`]: the structured
//! HEADER, the ANCHOR/REFERENCE/DATA/SIGNATURE sections, and the PMI model
//! resolved from DATA.
//!
//! ```rust,ignore
//! use step_pmi_engine::{ReaderConfig, StepReader};
//!
//! let mut reader = StepReader::with_config("part.stp", ReaderConfig::from_env());
//! let document = reader.load()?;
//! println!("{:?}", document.pmi().summary());
//! for group in document.pmi_groups() {
//!     let strokes = document.strokes(&group.polyline_ids);
//!     println!("{} ({} strokes)", group.name, strokes.len());
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod groups;
pub mod points;
pub mod reader;
pub mod source;

pub use config::ReaderConfig;
pub use document::{Document, DocumentSummary, UnknownSection};
pub use error::{LoadError, Result};
pub use groups::{pmi_type, PmiGroup};
pub use points::Stroke;
pub use reader::StepReader;
