// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DATUM / DATUM_FEATURE resolution.

use super::helpers::{arguments, datum_label, string_arg};
use super::PmiResolver;
use crate::classify::PmiKind;
use crate::model::{Datum, DatumFeature, Datums};

/// `.F.` anywhere in a DATUM_FEATURE clears `product_definitional`.
const FALSE_LOGICAL: &str = ".F.";

impl PmiResolver<'_> {
    pub(super) fn datums(&self) -> Datums {
        let datums = self
            .entities_of(PmiKind::Datum)
            .map(|(id, text)| {
                // DATUM(name, description, of_shape, product_definitional, identification)
                let args = arguments(text, "DATUM");
                Datum {
                    entity_id: id,
                    label: datum_label(text),
                    name: string_arg(&args, 0),
                    description: string_arg(&args, 1),
                }
            })
            .collect();

        let datum_features = self
            .entities_of(PmiKind::DatumFeature)
            .map(|(id, text)| {
                let args = arguments(text, "DATUM_FEATURE");
                DatumFeature {
                    entity_id: id,
                    name: string_arg(&args, 0),
                    description: string_arg(&args, 1),
                    product_definitional: !text.contains(FALSE_LOGICAL),
                }
            })
            .collect();

        Datums {
            datums,
            datum_features,
        }
    }
}
