//! Spatial index over candidate locations.

use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};
use tracing::debug;

use crate::models::{Candidate, Region};

/// [lon, lat] point tagged with the candidate's position in the input slice
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over the located candidates of one query
pub struct CandidateIndex {
    tree: RTree<IndexedPoint>,
}

impl CandidateIndex {
    /// Index every candidate that has a location; the rest are left out
    pub fn build(candidates: &[Candidate]) -> Self {
        let points: Vec<IndexedPoint> = candidates
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.location.map(|p| GeomWithData::new(p.to_lon_lat(), i)))
            .collect();

        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Positions of candidates within the region's bounding box.
    ///
    /// A superset of the members: callers still run the exact containment test.
    pub fn within_envelope(&self, region: &Region) -> Vec<usize> {
        let (min, max) = match region.envelope() {
            Some(e) => e,
            None => return Vec::new(),
        };

        let envelope = AABB::from_corners(min, max);
        let hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|p| p.data)
            .collect();

        debug!(
            "{} of {} candidates fall in the region envelope",
            hits.len(),
            self.tree.size()
        );
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
