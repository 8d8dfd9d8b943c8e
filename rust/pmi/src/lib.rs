// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # STEP-PMI Semantic
//!
//! Product Manufacturing Information resolved from the DATA section of a
//! STEP file: dimensions with their values, geometric tolerances with datum
//! references, datums, presentation polylines and the associations that tie
//! PMI to geometry.
//!
//! Entities are classified by their leading type token and linked by
//! chasing `#id` references through the [`EntityStore`]. An unresolved
//! reference yields an absent field, never an error.
//!
//! ```rust,ignore
//! use step_pmi_core::EntityStore;
//! use step_pmi_semantic::{resolve_pmi, ResolverOptions};
//!
//! let store = EntityStore::from_section_body(data_body);
//! let pmi = resolve_pmi(&store, ResolverOptions::default());
//! for tolerance in &pmi.semantic.tolerances.geometric_tolerances {
//!     println!("#{} {}", tolerance.entity_id, tolerance.kind);
//! }
//! ```
//!
//! [`EntityStore`]: step_pmi_core::EntityStore

pub mod classify;
pub mod model;
mod resolvers;

pub use classify::{classify, is_annotation, tolerance_kind, PmiKind};
pub use model::{
    Datum, DatumFeature, DatumPrecedence, DatumReference, Datums, DimensionalLocation,
    DimensionalSize, Dimensions, GeometricTolerance, MeasureValue, PlusMinusTolerance, Pmi,
    PmiAssociation, PmiSummary, PolylineData, PresentationPmi, SemanticPmi, ToleranceKind,
    ToleranceModifier, Tolerances,
};
pub use resolvers::{resolve_pmi, PmiResolver, ResolverOptions};
