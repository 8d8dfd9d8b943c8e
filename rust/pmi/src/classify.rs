// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type-name classification
//!
//! Entities are classified by their leading type token only; there is no
//! schema and no subtype lookup.

use crate::model::ToleranceKind;

/// PMI group an entity type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PmiKind {
    DimensionalLocation,
    DimensionalSize,
    GeometricTolerance,
    PlusMinusTolerance,
    Datum,
    DatumFeature,
    Polyline,
    ItemAssociation,
    Other,
}

/// Types containing `TOLERANCE` that are not geometric tolerances.
const NON_GEOMETRIC_TOLERANCES: &[&str] = &[
    "PLUS_MINUS_TOLERANCE",
    "TOLERANCE_VALUE",
    "TOLERANCE_ZONE",
    "TOLERANCE_ZONE_FORM",
];

pub fn classify(type_name: &str) -> PmiKind {
    match type_name {
        "DIMENSIONAL_LOCATION" => PmiKind::DimensionalLocation,
        "DIMENSIONAL_SIZE" => PmiKind::DimensionalSize,
        "PLUS_MINUS_TOLERANCE" => PmiKind::PlusMinusTolerance,
        "DATUM" => PmiKind::Datum,
        "DATUM_FEATURE" => PmiKind::DatumFeature,
        "POLYLINE" => PmiKind::Polyline,
        "DRAUGHTING_MODEL_ITEM_ASSOCIATION" => PmiKind::ItemAssociation,
        t if t.contains("TOLERANCE") && !NON_GEOMETRIC_TOLERANCES.contains(&t) => {
            PmiKind::GeometricTolerance
        }
        _ => PmiKind::Other,
    }
}

#[inline]
pub fn is_annotation(type_name: &str) -> bool {
    type_name.contains("ANNOTATION")
}

/// Checked in order; the first substring found decides.
const TOLERANCE_KINDS: &[(&str, ToleranceKind)] = &[
    ("ANGULARITY_TOLERANCE", ToleranceKind::Angularity),
    ("CIRCULAR_RUNOUT_TOLERANCE", ToleranceKind::CircularRunout),
    ("COAXIALITY_TOLERANCE", ToleranceKind::Coaxiality),
    ("CONCENTRICITY_TOLERANCE", ToleranceKind::Concentricity),
    ("CYLINDRICITY_TOLERANCE", ToleranceKind::Cylindricity),
    ("FLATNESS_TOLERANCE", ToleranceKind::Flatness),
    ("LINE_PROFILE_TOLERANCE", ToleranceKind::LineProfile),
    ("PARALLELISM_TOLERANCE", ToleranceKind::Parallelism),
    ("PERPENDICULARITY_TOLERANCE", ToleranceKind::Perpendicularity),
    ("POSITION_TOLERANCE", ToleranceKind::Position),
    ("ROUNDNESS_TOLERANCE", ToleranceKind::Roundness),
    ("STRAIGHTNESS_TOLERANCE", ToleranceKind::Straightness),
    ("SURFACE_PROFILE_TOLERANCE", ToleranceKind::SurfaceProfile),
    ("SYMMETRY_TOLERANCE", ToleranceKind::Symmetry),
    ("TOTAL_RUNOUT_TOLERANCE", ToleranceKind::TotalRunout),
];

fn kind_of(type_name: &str) -> Option<ToleranceKind> {
    TOLERANCE_KINDS
        .iter()
        .find(|(key, _)| type_name.contains(key))
        .map(|&(_, kind)| kind)
}

/// Tolerance characteristic from the constituent type names of an entity.
///
/// Constituents are consulted in order; the first one that maps to a kind
/// wins.
pub fn tolerance_kind<'a>(type_names: impl IntoIterator<Item = &'a str>) -> ToleranceKind {
    type_names
        .into_iter()
        .find_map(kind_of)
        .unwrap_or(ToleranceKind::Unknown)
}
