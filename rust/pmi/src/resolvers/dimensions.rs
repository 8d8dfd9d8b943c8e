// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DIMENSIONAL_LOCATION / DIMENSIONAL_SIZE resolution.

use step_pmi_core::entity_refs;

use super::helpers::{arguments, ref_arg, string_arg};
use super::PmiResolver;
use crate::classify::PmiKind;
use crate::model::{DimensionalLocation, DimensionalSize, Dimensions, MeasureValue};

const SHAPE_DIMENSION_REPRESENTATION: &str = "SHAPE_DIMENSION_REPRESENTATION";

impl PmiResolver<'_> {
    pub(super) fn dimensions(&self) -> Dimensions {
        let locations = self
            .entities_of(PmiKind::DimensionalLocation)
            .map(|(id, text)| {
                // DIMENSIONAL_LOCATION(name, description, relating, related)
                let args = arguments(text, "DIMENSIONAL_LOCATION");
                DimensionalLocation {
                    entity_id: id,
                    name: string_arg(&args, 0),
                    description: string_arg(&args, 1),
                    value: self.dimension_value(id),
                    relating_shape_aspect_id: ref_arg(&args, 2),
                    related_shape_aspect_id: ref_arg(&args, 3),
                }
            })
            .collect();

        let sizes = self
            .entities_of(PmiKind::DimensionalSize)
            .map(|(id, text)| {
                // DIMENSIONAL_SIZE(applies_to, name)
                let args = arguments(text, "DIMENSIONAL_SIZE");
                DimensionalSize {
                    entity_id: id,
                    name: string_arg(&args, 1),
                    applies_to_id: ref_arg(&args, 0),
                    value: self.dimension_value(id),
                }
            })
            .collect();

        Dimensions { locations, sizes }
    }

    /// First SHAPE_DIMENSION_REPRESENTATION mentioning the dimension that
    /// leads to a `LENGTH_MEASURE` in one hop.
    fn dimension_value(&self, dimension_id: u32) -> Option<MeasureValue> {
        self.referrers(dimension_id).into_iter().find_map(|representation_id| {
            let text = self.store.get(representation_id)?;
            if !text.starts_with(SHAPE_DIMENSION_REPRESENTATION) {
                return None;
            }
            entity_refs(text).into_iter().find_map(|id| self.measure(id))
        })
    }
}
