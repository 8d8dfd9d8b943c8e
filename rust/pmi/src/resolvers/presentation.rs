// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation PMI: polylines and annotation counts.

use step_pmi_core::{entity_refs, entity_type_name};

use super::helpers::{arguments, string_arg};
use super::PmiResolver;
use crate::classify::{is_annotation, PmiKind};
use crate::model::{PolylineData, PresentationPmi};

impl PmiResolver<'_> {
    pub(super) fn presentation(&self) -> PresentationPmi {
        let polylines = self
            .entities_of(PmiKind::Polyline)
            .map(|(id, text)| PolylineData {
                entity_id: id,
                name: string_arg(&arguments(text, "POLYLINE"), 0),
                point_ids: entity_refs(text).into_vec(),
            })
            .collect();

        let annotation_count = self
            .store
            .iter()
            .filter(|(_, text)| entity_type_name(text).is_some_and(is_annotation))
            .count();

        PresentationPmi {
            polylines,
            annotation_count,
        }
    }
}
