// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric and plus/minus tolerance resolution.

use step_pmi_core::{complex_type_names, entity_refs, first_entity_ref, length_measure};

use super::helpers::{arguments, datum_label, string_arg, zone_form_literal};
use super::PmiResolver;
use crate::classify::{tolerance_kind, PmiKind};
use crate::model::{
    DatumPrecedence, DatumReference, GeometricTolerance, PlusMinusTolerance, ToleranceModifier,
    Tolerances,
};

const MODIFIERS: &[(&str, ToleranceModifier)] = &[
    (
        "MAXIMUM_MATERIAL_REQUIREMENT",
        ToleranceModifier::MaximumMaterialRequirement,
    ),
    (
        "LEAST_MATERIAL_REQUIREMENT",
        ToleranceModifier::LeastMaterialRequirement,
    ),
];

impl PmiResolver<'_> {
    pub(super) fn tolerances(&self) -> Tolerances {
        let geometric_tolerances = self
            .entities_of(PmiKind::GeometricTolerance)
            .map(|(id, text)| self.geometric_tolerance(id, text))
            .collect();

        let plus_minus_tolerances = self
            .entities_of(PmiKind::PlusMinusTolerance)
            .map(|(id, text)| PlusMinusTolerance {
                entity_id: id,
                // PLUS_MINUS_TOLERANCE(range, toleranced_dimension)
                range_value: first_entity_ref(text)
                    .and_then(|range_id| self.store.get(range_id))
                    .and_then(length_measure),
            })
            .collect();

        Tolerances {
            geometric_tolerances,
            plus_minus_tolerances,
        }
    }

    fn geometric_tolerance(&self, id: u32, text: &str) -> GeometricTolerance {
        // GEOMETRIC_TOLERANCE(name, description, magnitude, toleranced_shape_aspect)
        let args = arguments(text, "GEOMETRIC_TOLERANCE");
        let value = args
            .iter()
            .skip(2)
            .find_map(|arg| first_entity_ref(arg))
            .and_then(|magnitude_id| self.measure(magnitude_id));

        let modifiers = MODIFIERS
            .iter()
            .filter(|(key, _)| text.contains(key))
            .map(|&(_, modifier)| modifier)
            .collect();

        let zone_form = zone_form_literal(text).or_else(|| {
            entity_refs(text).into_iter().find_map(|ref_id| {
                self.store
                    .get(ref_id)
                    .filter(|target| target.contains("TOLERANCE_ZONE_FORM"))
                    .and_then(zone_form_literal)
            })
        });

        GeometricTolerance {
            entity_id: id,
            name: string_arg(&args, 0),
            description: string_arg(&args, 1),
            kind: tolerance_kind(complex_type_names(text)),
            value,
            modifiers,
            datum_references: self.datum_references(text),
            zone_form,
        }
    }

    /// `#id` -> DATUM_SYSTEM -> DATUM_REFERENCE_COMPARTMENT -> DATUM.
    ///
    /// Each compartment contributes its first labelled datum. Precedence
    /// restarts with every datum system, and a system referenced twice is
    /// walked twice.
    fn datum_references(&self, text: &str) -> Vec<DatumReference> {
        let mut references = Vec::new();

        for system_id in entity_refs(text) {
            let Some(system) = self.typed(system_id, "DATUM_SYSTEM") else {
                continue;
            };

            let mut found = 0usize;
            for compartment_id in entity_refs(system) {
                let Some(compartment) = self.typed(compartment_id, "DATUM_REFERENCE_COMPARTMENT")
                else {
                    continue;
                };
                let datum = entity_refs(compartment).into_iter().find_map(|datum_id| {
                    let label = datum_label(self.typed(datum_id, "DATUM")?)?;
                    Some((datum_id, label))
                });
                if let Some((datum_id, label)) = datum {
                    references.push(DatumReference {
                        label,
                        precedence: DatumPrecedence::from_index(found),
                        entity_id: datum_id,
                    });
                    found += 1;
                }
            }
        }

        references
    }
}
