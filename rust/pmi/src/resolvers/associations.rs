// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DRAUGHTING_MODEL_ITEM_ASSOCIATION resolution.

use step_pmi_core::{entity_refs, entity_type_name};

use super::helpers::{arguments, string_arg};
use super::PmiResolver;
use crate::classify::PmiKind;
use crate::model::PmiAssociation;

impl PmiResolver<'_> {
    /// References are taken positionally: PMI item, geometry, presentation.
    pub(super) fn associations(&self) -> Vec<PmiAssociation> {
        self.entities_of(PmiKind::ItemAssociation)
            .map(|(id, text)| {
                let refs = entity_refs(text);
                let pmi_entity_id = refs.first().copied();
                PmiAssociation {
                    entity_id: id,
                    name: string_arg(&arguments(text, "DRAUGHTING_MODEL_ITEM_ASSOCIATION"), 0),
                    pmi_entity_id,
                    pmi_entity_type: pmi_entity_id
                        .and_then(|pmi_id| self.store.get(pmi_id))
                        .and_then(entity_type_name)
                        .map(str::to_string),
                    geometry_entity_id: refs.get(1).copied(),
                    presentation_entity_id: refs.get(2).copied(),
                }
            })
            .collect()
    }
}
