// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw point extraction for presentation polylines.

use rustc_hash::FxHashSet;
use serde::Serialize;
use step_pmi_core::coordinates;

use crate::document::Document;

/// Points of one polyline, in model space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub polyline_id: u32,
    pub name: String,
    pub points: Vec<[f64; 3]>,
}

impl Stroke {
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

impl Document {
    /// First parenthesised numeric triple of DATA entity `id`.
    pub fn cartesian_point(&self, id: u32) -> Option<[f64; 3]> {
        self.entity_text(id).and_then(coordinates)
    }

    /// Strokes of the requested polylines, in store order.
    ///
    /// Point references that do not resolve are skipped; polylines left with
    /// no points are dropped.
    pub fn strokes(&self, polyline_ids: &[u32]) -> Vec<Stroke> {
        let wanted: FxHashSet<u32> = polyline_ids.iter().copied().collect();

        self.pmi()
            .presentation
            .polylines
            .iter()
            .filter(|polyline| wanted.contains(&polyline.entity_id))
            .filter_map(|polyline| {
                let points: Vec<[f64; 3]> = polyline
                    .point_ids
                    .iter()
                    .filter_map(|&id| self.cartesian_point(id))
                    .collect();
                (!points.is_empty()).then(|| Stroke {
                    polyline_id: polyline.entity_id,
                    name: polyline.name.clone(),
                    points,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TEXT: &str = "ISO-10303-21; DATA;\
        #1=CARTESIAN_POINT('',(0.,0.,0.));\
        #2=CARTESIAN_POINT('',(1.5,-2.,0.3));\
        #3=DIRECTION('',(0.,0.,1.));\
        #10=POLYLINE('Note (1)',(#1,#2,#99));\
        #11=POLYLINE('Note (1)',(#98));\
        #12=POLYLINE('Datum (2)',(#2,#1));\
        ENDSEC;";

    #[test]
    fn test_cartesian_point() {
        let doc = Document::parse(TEXT).unwrap();
        let p = doc.cartesian_point(2).unwrap();
        assert_relative_eq!(p[0], 1.5);
        assert_relative_eq!(p[1], -2.0);
        assert_relative_eq!(p[2], 0.3);
        assert!(doc.cartesian_point(99).is_none());
    }

    #[test]
    fn test_strokes_skip_unresolved() {
        let doc = Document::parse(TEXT).unwrap();
        let strokes = doc.strokes(&[12, 11, 10]);

        // #11 has no resolvable points
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].polyline_id, 10);
        assert_eq!(strokes[0].point_count(), 2);
        assert_eq!(strokes[1].polyline_id, 12);
        assert_eq!(strokes[1].name, "Datum (2)");
        assert_relative_eq!(strokes[1].points[1][2], 0.0);
    }

    #[test]
    fn test_no_strokes_for_unknown_ids() {
        let doc = Document::parse(TEXT).unwrap();
        assert!(doc.strokes(&[1, 500]).is_empty());
    }
}
