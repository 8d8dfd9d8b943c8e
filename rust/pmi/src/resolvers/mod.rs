// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PMI resolvers
//!
//! Each sub-module resolves one PMI group with an independent pass over the
//! DATA store:
//!
//! - `dimensions`: DIMENSIONAL_LOCATION, DIMENSIONAL_SIZE and their values
//! - `tolerances`: geometric tolerances and PLUS_MINUS_TOLERANCE
//! - `datums`: DATUM and DATUM_FEATURE
//! - `presentation`: POLYLINE strokes and annotation counts
//! - `associations`: DRAUGHTING_MODEL_ITEM_ASSOCIATION links
//! - `helpers`: argument and literal extraction shared by the above

mod associations;
mod datums;
mod dimensions;
mod helpers;
mod presentation;
mod tolerances;


use step_pmi_core::{entity_type_name, EntityStore, ReferenceIndex};

use crate::classify::{classify, PmiKind};
use crate::model::{Pmi, SemanticPmi};

/// Resolver switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Build a reverse reference index up front instead of scanning the
    /// store for every dimension. Results are identical either way.
    pub reverse_index: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            reverse_index: true,
        }
    }
}

/// Derives the PMI model from a DATA section store.
pub struct PmiResolver<'a> {
    store: &'a EntityStore,
    index: Option<ReferenceIndex>,
}

impl<'a> PmiResolver<'a> {
    pub fn new(store: &'a EntityStore, options: ResolverOptions) -> Self {
        let index = options.reverse_index.then(|| ReferenceIndex::build(store));
        Self { store, index }
    }

    pub fn resolve(&self) -> Pmi {
        let pmi = Pmi {
            semantic: SemanticPmi {
                dimensions: self.dimensions(),
                tolerances: self.tolerances(),
                datums: self.datums(),
            },
            presentation: self.presentation(),
            associations: self.associations(),
        };

        let summary = pmi.summary();
        tracing::debug!(
            locations = summary.dimension_locations,
            sizes = summary.dimension_sizes,
            geometric = summary.geometric_tolerances,
            plus_minus = summary.plus_minus_tolerances,
            datums = summary.datums,
            datum_features = summary.datum_features,
            polylines = summary.polylines,
            annotations = summary.annotations,
            associations = summary.associations,
            "PMI resolved"
        );
        pmi
    }

    /// Entities of one PMI kind, in store order.
    fn entities_of(&self, kind: PmiKind) -> impl Iterator<Item = (u32, &'a str)> + '_ {
        self.store.iter().filter(move |(_, text)| {
            entity_type_name(text).is_some_and(|type_name| classify(type_name) == kind)
        })
    }

    /// Text of `id` when its leading type is exactly `type_name`.
    fn typed(&self, id: u32, type_name: &str) -> Option<&'a str> {
        self.store
            .get(id)
            .filter(|text| entity_type_name(text) == Some(type_name))
    }

    /// Entities whose references include `id`, in store order.
    fn referrers(&self, id: u32) -> Vec<u32> {
        match &self.index {
            Some(index) => index.referrers(id).to_vec(),
            None => self
                .store
                .iter()
                .filter(|(_, text)| step_pmi_core::entity_refs(text).contains(&id))
                .map(|(referrer, _)| referrer)
                .collect(),
        }
    }
}

/// Resolve the PMI model of a DATA store.
pub fn resolve_pmi(store: &EntityStore, options: ResolverOptions) -> Pmi {
    PmiResolver::new(store, options).resolve()
}
