// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PMI model
//!
//! Every record carries the id of the entity it was derived from. Values are
//! computed once at resolve time; nothing here points back into the store.

use std::fmt;

use serde::Serialize;

/// Geometric tolerance characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceKind {
    Angularity,
    CircularRunout,
    Coaxiality,
    Concentricity,
    Cylindricity,
    Flatness,
    LineProfile,
    Parallelism,
    Perpendicularity,
    Position,
    Roundness,
    Straightness,
    SurfaceProfile,
    Symmetry,
    TotalRunout,
    Unknown,
}

impl ToleranceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToleranceKind::Angularity => "angularity",
            ToleranceKind::CircularRunout => "circular_runout",
            ToleranceKind::Coaxiality => "coaxiality",
            ToleranceKind::Concentricity => "concentricity",
            ToleranceKind::Cylindricity => "cylindricity",
            ToleranceKind::Flatness => "flatness",
            ToleranceKind::LineProfile => "line_profile",
            ToleranceKind::Parallelism => "parallelism",
            ToleranceKind::Perpendicularity => "perpendicularity",
            ToleranceKind::Position => "position",
            ToleranceKind::Roundness => "roundness",
            ToleranceKind::Straightness => "straightness",
            ToleranceKind::SurfaceProfile => "surface_profile",
            ToleranceKind::Symmetry => "symmetry",
            ToleranceKind::TotalRunout => "total_runout",
            ToleranceKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ToleranceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Material condition modifier on a geometric tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToleranceModifier {
    #[serde(rename = "MMC")]
    MaximumMaterialRequirement,
    #[serde(rename = "LMC")]
    LeastMaterialRequirement,
}

/// Position of a datum within its datum system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatumPrecedence {
    Primary,
    Secondary,
    Tertiary,
}

impl DatumPrecedence {
    /// Precedence for the n-th datum found in a system (0-based).
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DatumPrecedence::Primary),
            1 => Some(DatumPrecedence::Secondary),
            2 => Some(DatumPrecedence::Tertiary),
            _ => None,
        }
    }
}

/// A `LENGTH_MEASURE(...)` value and the entity it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasureValue {
    pub value: f64,
    pub raw_entity_id: u32,
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// DIMENSIONAL_LOCATION(name, description, relating_shape_aspect, related_shape_aspect)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DimensionalLocation {
    pub entity_id: u32,
    pub name: String,
    pub description: String,
    pub value: Option<MeasureValue>,
    pub relating_shape_aspect_id: Option<u32>,
    pub related_shape_aspect_id: Option<u32>,
}

/// DIMENSIONAL_SIZE(applies_to, name)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DimensionalSize {
    pub entity_id: u32,
    pub name: String,
    pub applies_to_id: Option<u32>,
    pub value: Option<MeasureValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dimensions {
    pub locations: Vec<DimensionalLocation>,
    pub sizes: Vec<DimensionalSize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatumReference {
    pub label: char,
    pub precedence: Option<DatumPrecedence>,
    /// The DATUM entity
    pub entity_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometricTolerance {
    pub entity_id: u32,
    pub name: String,
    pub description: String,
    #[serde(rename = "tolerance_type")]
    pub kind: ToleranceKind,
    pub value: Option<MeasureValue>,
    pub modifiers: Vec<ToleranceModifier>,
    pub datum_references: Vec<DatumReference>,
    /// TOLERANCE_ZONE_FORM name, e.g. `cylindrical`
    pub zone_form: Option<String>,
}

/// PLUS_MINUS_TOLERANCE(range, toleranced_dimension)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlusMinusTolerance {
    pub entity_id: u32,
    /// Symmetric range, `±value`
    pub range_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tolerances {
    pub geometric_tolerances: Vec<GeometricTolerance>,
    pub plus_minus_tolerances: Vec<PlusMinusTolerance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Datum {
    pub entity_id: u32,
    /// Single letter identification, `A`, `B`, ...
    pub label: Option<char>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatumFeature {
    pub entity_id: u32,
    pub name: String,
    pub description: String,
    pub product_definitional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Datums {
    pub datums: Vec<Datum>,
    pub datum_features: Vec<DatumFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SemanticPmi {
    pub dimensions: Dimensions,
    pub tolerances: Tolerances,
    pub datums: Datums,
}

/// POLYLINE(name, (points...)) as drawn by a presentation annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolylineData {
    pub entity_id: u32,
    pub name: String,
    pub point_ids: Vec<u32>,
}

impl PolylineData {
    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_ids.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationPmi {
    pub polylines: Vec<PolylineData>,
    /// Entities whose type name contains `ANNOTATION`
    pub annotation_count: usize,
}

/// DRAUGHTING_MODEL_ITEM_ASSOCIATION linking a PMI item to geometry and
/// its presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PmiAssociation {
    pub entity_id: u32,
    pub name: String,
    pub pmi_entity_id: Option<u32>,
    pub pmi_entity_type: Option<String>,
    pub geometry_entity_id: Option<u32>,
    pub presentation_entity_id: Option<u32>,
}

/// Everything resolved from one DATA section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pmi {
    pub semantic: SemanticPmi,
    pub presentation: PresentationPmi,
    pub associations: Vec<PmiAssociation>,
}

/// Per-group counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PmiSummary {
    pub dimension_locations: usize,
    pub dimension_sizes: usize,
    pub geometric_tolerances: usize,
    pub plus_minus_tolerances: usize,
    pub datums: usize,
    pub datum_features: usize,
    pub polylines: usize,
    pub annotations: usize,
    pub associations: usize,
}

impl Pmi {
    pub fn summary(&self) -> PmiSummary {
        let semantic = &self.semantic;
        PmiSummary {
            dimension_locations: semantic.dimensions.locations.len(),
            dimension_sizes: semantic.dimensions.sizes.len(),
            geometric_tolerances: semantic.tolerances.geometric_tolerances.len(),
            plus_minus_tolerances: semantic.tolerances.plus_minus_tolerances.len(),
            datums: semantic.datums.datums.len(),
            datum_features: semantic.datums.datum_features.len(),
            polylines: self.presentation.polylines.len(),
            annotations: self.presentation.annotation_count,
            associations: self.associations.len(),
        }
    }

    /// True when no group resolved anything.
    pub fn is_empty(&self) -> bool {
        self.summary() == PmiSummary::default()
    }
}
