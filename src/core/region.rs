//! The region memo: a sparse table from `(lo, hi)` cell-index pairs to the
//! minimum equivalent-tree depth of that region, keyed by a dense perfect
//! hash of each region's "shape" so the table can be a flat jagged array
//! rather than a general-purpose map.

use crate::core::feature_space::FeatureSpace;

/// For a fixed `lo`, only the shape `hi - lo` varies across valid `hi`.
/// `region_hash` densely perfect-hashes that shape into `[0, row_len(lo))`.
///
/// Walks features from the last to the first, skips any axis with only one
/// level (no shape freedom there), and accumulates a mixed-radix digit per
/// remaining axis.
pub fn region_hash(fspace: &FeatureSpace, lo: usize, hi: usize) -> usize {
    let mut hash = 0usize;
    let mut code = 1usize;
    for f in (0..fspace.nb_features()).rev() {
        let size = fspace.axis_size(f);
        if size != 1 {
            let v_lo = fspace.coordinate(lo, f);
            let v_hi = fspace.coordinate(hi, f);
            hash += (v_hi - v_lo) * code;
            code *= size - v_lo;
        }
    }
    hash
}

/// A jagged table indexed first by `lo`, whose row length is
/// `region_hash(lo, C-1) + 1` — exactly as many shapes as `lo` can support.
#[derive(Debug, Clone)]
pub struct RegionMemo {
    rows: Vec<Vec<Option<usize>>>,
}

impl RegionMemo {
    /// Allocates one row per cell, each exactly sized against the largest
    /// region that could ever be queried starting at that `lo`.
    pub fn new(fspace: &FeatureSpace) -> Self {
        let last_cell = fspace.nb_cells() - 1;
        let rows = (0..fspace.nb_cells())
            .map(|lo| {
                let row_len = region_hash(fspace, lo, last_cell) + 1;
                vec![None; row_len]
            })
            .collect();
        RegionMemo { rows }
    }

    pub fn get(&self, fspace: &FeatureSpace, lo: usize, hi: usize) -> Option<usize> {
        self.rows[lo][region_hash(fspace, lo, hi)]
    }

    /// Records `depth` for `(lo, hi)`. A region's memo entry is set at most
    /// once; a second write with a different value indicates a bug in the
    /// optimizer.
    pub fn set(&mut self, fspace: &FeatureSpace, lo: usize, hi: usize, depth: usize) {
        let slot = &mut self.rows[lo][region_hash(fspace, lo, hi)];
        debug_assert!(
            slot.map_or(true, |existing| existing == depth),
            "region ({lo}, {hi}) memoized twice with different values"
        );
        *slot = Some(depth);
    }

    /// Total number of `(lo, hash)` slots across every row, i.e. `Σ_lo (H(lo) + 1)`.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forest::Forest;
    use crate::core::node::{Node, Tree};
    use crate::core::feature_space::DEFAULT_CELL_LIMIT;

    fn two_feature_space() -> FeatureSpace {
        let t = Tree::from_nodes(vec![
            Node::Internal { node_id: 0, depth: 0, split_feature: 0, split_value: 0.0, left: 1, right: 4 },
            Node::Internal { node_id: 1, depth: 1, split_feature: 1, split_value: 0.0, left: 2, right: 3 },
            Node::Leaf { node_id: 2, depth: 2, class: 0 },
            Node::Leaf { node_id: 3, depth: 2, class: 1 },
            Node::Internal { node_id: 4, depth: 1, split_feature: 1, split_value: 0.0, left: 5, right: 6 },
            Node::Leaf { node_id: 5, depth: 2, class: 1 },
            Node::Leaf { node_id: 6, depth: 2, class: 0 },
        ]);
        let forest = Forest::try_new(vec![t], 2, 2).unwrap();
        FeatureSpace::build(&forest, DEFAULT_CELL_LIMIT).unwrap()
    }

    #[test]
    fn whole_grid_region_hashes_to_last_slot() {
        let fspace = two_feature_space();
        let last = fspace.nb_cells() - 1;
        let memo = RegionMemo::new(&fspace);
        // The row for lo=0 must be able to hold the full-grid region.
        assert_eq!(region_hash(&fspace, 0, last) + 1, memo.rows[0].len());
    }

    #[test]
    fn get_and_set_round_trip() {
        let fspace = two_feature_space();
        let mut memo = RegionMemo::new(&fspace);
        assert_eq!(memo.get(&fspace, 0, 0), None);
        memo.set(&fspace, 0, 0, 0);
        assert_eq!(memo.get(&fspace, 0, 0), Some(0));
    }

    #[test]
    fn distinct_regions_hash_to_distinct_slots_for_same_lo() {
        let fspace = two_feature_space();
        let mut memo = RegionMemo::new(&fspace);
        let last = fspace.nb_cells() - 1;
        memo.set(&fspace, 0, 1, 1);
        memo.set(&fspace, 0, last, 2);
        assert_eq!(memo.get(&fspace, 0, 1), Some(1));
        assert_eq!(memo.get(&fspace, 0, last), Some(2));
    }
}
