// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity store
//!
//! Id-addressed map of raw entity text for the DATA and REFERENCE sections.
//! Iteration follows first-insertion order, which every "first match wins"
//! rule downstream depends on.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::fast_parse::entity_refs;
use crate::parser::{entity_instance, split_instances};

/// Entity id to raw value text (`FOO(...)` without `#id=` and `;`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntityStore {
    entries: Vec<(u32, String)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: FxHashMap<u32, usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate from a DATA or REFERENCE section body.
    ///
    /// Statements that are not `#<id> = <value>` are skipped.
    pub fn from_section_body(body: &str) -> Self {
        let mut store = Self::new();
        store.extend_from_section_body(body);
        store
    }

    /// Add the instances of another section body. Ids already present are
    /// overwritten in place.
    pub fn extend_from_section_body(&mut self, body: &str) {
        let statements = split_instances(body);
        self.entries.reserve(statements.len());
        self.index.reserve(statements.len());

        let mut skipped = 0usize;
        for statement in statements {
            match entity_instance(statement) {
                Ok((id, value)) => self.insert(id, value),
                Err(e) => {
                    skipped += 1;
                    tracing::trace!(error = %e, "skipping statement");
                }
            }
        }

        if skipped > 0 {
            tracing::trace!(skipped, "statements without an instance name");
        }
    }

    /// Insert or overwrite. An overwritten entity keeps its original
    /// iteration position.
    pub fn insert(&mut self, id: u32, value: impl Into<String>) {
        let value = value.into();
        match self.index.get(&id) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push((id, value));
            }
        }
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&str> {
        self.index
            .get(&id)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(id, value)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.entries.iter().map(|(id, value)| (*id, value.as_str()))
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

/// Reverse reference adjacency: id to the ids of entities that mention it.
///
/// Referrers are listed once each, in store order, so a lookup here gives
/// the same candidates as a full scan filtered by [`entity_refs`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    referrers: FxHashMap<u32, SmallVec<[u32; 4]>>,
}

impl ReferenceIndex {
    pub fn build(store: &EntityStore) -> Self {
        let mut referrers: FxHashMap<u32, SmallVec<[u32; 4]>> =
            FxHashMap::with_capacity_and_hasher(store.len(), Default::default());

        for (id, value) in store.iter() {
            for target in entity_refs(value) {
                let list = referrers.entry(target).or_default();
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
        }

        Self { referrers }
    }

    /// Entities whose text references `id`, in store order.
    #[inline]
    pub fn referrers(&self, id: u32) -> &[u32] {
        self.referrers
            .get(&id)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_section_body() {
        let store = EntityStore::from_section_body("#1 = FOO('x');#2 = BAR(#1);");
        assert_eq!(store.len(), 2);
        assert!(store.get(1).unwrap().contains("FOO"));
        assert_eq!(store.get(2), Some("BAR(#1)"));
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn test_malformed_statements_are_skipped() {
        let store = EntityStore::from_section_body("FOO(1); #2=BAR(); #x=BAZ(); #3 = QUX((1,2));");
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(store.get(3), Some("QUX((1,2))"));
    }

    #[test]
    fn test_duplicate_id_last_write_wins_first_position() {
        let store = EntityStore::from_section_body("#5=A(); #6=B(); #5=C();");
        assert_eq!(store.get(5), Some("C()"));
        let order: Vec<(u32, &str)> = store.iter().collect();
        assert_eq!(order, vec![(5, "C()"), (6, "B()")]);
    }

    #[test]
    fn test_nested_semicolons_stay_in_entity() {
        let store = EntityStore::from_section_body("#1=FOO(('a;b'));#2=BAR();");
        assert_eq!(store.get(1), Some("FOO(('a;b'))"));
        assert!(store.contains(2));
    }

    #[test]
    fn test_unbalanced_paren_in_literal_keeps_following_entities() {
        let store =
            EntityStore::from_section_body("#1=PRODUCT('bracket (rev A','',$);#2=BAR(#1);#3=BAZ();");
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(store.get(1), Some("PRODUCT('bracket (rev A','',$)"));
        assert_eq!(store.get(2), Some("BAR(#1)"));
    }

    #[test]
    fn test_extend_merges_sections() {
        let mut store = EntityStore::from_section_body("#1=A();#2=B();");
        store.extend_from_section_body("#3=C();#1=D();");
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(store.get(1), Some("D()"));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let store = EntityStore::from_section_body("#10=CARTESIAN_POINT('',(0.,0.,0.));");
        assert_eq!(store.get(10), store.get(10));
    }

    #[test]
    fn test_reference_index_matches_scan() {
        let store =
            EntityStore::from_section_body("#1=A(); #2=B(#1,#1); #3=C(#12); #4=D((#1,#3));");
        let index = ReferenceIndex::build(&store);

        for target in [1, 3, 12, 99] {
            let scanned: Vec<u32> = store
                .iter()
                .filter(|(_, value)| entity_refs(value).contains(&target))
                .map(|(id, _)| id)
                .collect();
            assert_eq!(index.referrers(target), scanned.as_slice());
        }
        assert_eq!(index.referrers(1), &[2, 4]);
    }
}
