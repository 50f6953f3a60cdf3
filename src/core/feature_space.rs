//! Derives the axis-aligned cell grid induced by a forest's split
//! thresholds, and precomputes each cell's majority class.
//!
//! This is the only place that allocates memory proportional to the grid
//! size, so it is also the only place that enforces the cell-count ceiling
//! (`GridTooLarge`).

use log::debug;

use crate::core::forest::Forest;
use crate::error::{BornAgainError, Result};

/// Default ceiling on the number of cells the grid may contain.
pub const DEFAULT_CELL_LIMIT: u64 = 1 << 30;

/// The axis-aligned grid induced by a forest's hyperplane levels, with each
/// cell's majority class precomputed.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    /// `levels[f]` is the sorted ascending list of distinct thresholds used
    /// on feature `f`, with a `+inf` sentinel appended.
    levels: Vec<Vec<f64>>,
    /// `strides[f]`, with `strides[nb_features - 1] == 1`.
    strides: Vec<usize>,
    /// Precomputed majority class of every cell, indexed by linear cell id.
    cells: Vec<usize>,
}

impl FeatureSpace {
    /// Builds the grid for `forest`, refusing to allocate the cell array if
    /// its size would exceed `cell_limit`.
    pub fn build(forest: &Forest, cell_limit: u64) -> Result<Self> {
        let levels = hyperplane_levels(forest);

        let mut cell_count: u64 = 1;
        for axis in &levels {
            cell_count = cell_count
                .checked_mul(axis.len() as u64)
                .unwrap_or(u64::MAX);
            if cell_count > cell_limit {
                return Err(BornAgainError::GridTooLarge {
                    cell_count,
                    limit: cell_limit,
                });
            }
        }
        let cell_count = cell_count as usize;

        let strides = compute_strides(&levels);

        let mut cells = vec![0usize; cell_count];
        let mut representative = vec![0.0f64; levels.len()];
        enumerate_cells(forest, &levels, &strides, 0, 0, &mut representative, &mut cells);

        debug!(
            "feature space built: {} features, {} cells",
            levels.len(),
            cell_count
        );

        Ok(FeatureSpace { levels, strides, cells })
    }

    pub fn nb_features(&self) -> usize {
        self.levels.len()
    }

    pub fn nb_cells(&self) -> usize {
        self.cells.len()
    }

    /// The number of distinct levels along `feature`, i.e. `m_feature + 1`.
    pub fn axis_size(&self, feature: usize) -> usize {
        self.levels[feature].len()
    }

    pub fn stride(&self, feature: usize) -> usize {
        self.strides[feature]
    }

    /// The threshold value of `levels[feature][level]`, used as both the
    /// cell representative along that axis and the emitted split value when
    /// the materializer splits at `level`.
    pub fn level_value(&self, feature: usize, level: usize) -> f64 {
        self.levels[feature][level]
    }

    /// The precomputed majority class of cell `index`.
    pub fn cell_class(&self, index: usize) -> usize {
        self.cells[index]
    }

    /// Extracts the per-axis coordinate `c_feature` of linear cell `index`.
    pub fn coordinate(&self, index: usize, feature: usize) -> usize {
        if feature == 0 {
            index / self.strides[0]
        } else {
            (index % self.strides[feature - 1]) / self.strides[feature]
        }
    }
}

/// Collects, per feature, the sorted distinct split thresholds used by any
/// internal node across all trees, each with a `+inf` sentinel appended.
///
/// `Forest::try_new` rejects NaN split values on every internal node before
/// a `Forest` can exist, so `forest`'s thresholds are always totally
/// ordered here; the `expect` below documents that invariant rather than
/// guarding against caller input.
fn hyperplane_levels(forest: &Forest) -> Vec<Vec<f64>> {
    use crate::core::node::Node;

    let mut levels: Vec<Vec<f64>> = vec![Vec::new(); forest.nb_features()];
    for tree in forest.trees() {
        for node in tree.nodes() {
            if let Node::Internal {
                split_feature,
                split_value,
                ..
            } = node
            {
                levels[*split_feature].push(*split_value);
            }
        }
    }
    for axis in &mut levels {
        axis.sort_by(|a, b| a.partial_cmp(b).expect("split thresholds must not be NaN"));
        axis.dedup();
        axis.push(f64::INFINITY);
    }
    levels
}

/// `strides[F-1] = 1`, `strides[f] = strides[f+1] * axis_size(f+1)`.
fn compute_strides(levels: &[Vec<f64>]) -> Vec<usize> {
    let nb_features = levels.len();
    let mut strides = vec![1usize; nb_features];
    for f in (0..nb_features.saturating_sub(1)).rev() {
        strides[f] = strides[f + 1] * levels[f + 1].len();
    }
    strides
}

/// Depth-`nb_features` recursion: at depth `k` it iterates every level
/// index of feature `k`, accumulating the linear cell index, and at depth
/// `nb_features` it queries the forest's majority vote at the accumulated
/// representative point.
#[allow(clippy::too_many_arguments)]
fn enumerate_cells(
    forest: &Forest,
    levels: &[Vec<f64>],
    strides: &[usize],
    feature: usize,
    cell_index: usize,
    representative: &mut [f64],
    cells: &mut [usize],
) {
    if feature == levels.len() {
        cells[cell_index] = forest.majority_class(representative);
        return;
    }
    let stride = strides[feature];
    for (i, &value) in levels[feature].iter().enumerate() {
        representative[feature] = value;
        enumerate_cells(
            forest,
            levels,
            strides,
            feature + 1,
            cell_index + stride * i,
            representative,
            cells,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::{Node, Tree};

    fn leaf(id: usize, depth: usize, class: usize) -> Node {
        Node::Leaf { node_id: id, depth, class }
    }

    fn internal(id: usize, depth: usize, feature: usize, value: f64, left: usize, right: usize) -> Node {
        Node::Internal {
            node_id: id,
            depth,
            split_feature: feature,
            split_value: value,
            left,
            right,
        }
    }

    fn trivial_forest() -> Forest {
        let tree = Tree::from_nodes(vec![internal(0, 0, 0, 0.5, 1, 2), leaf(1, 1, 0), leaf(2, 1, 1)]);
        Forest::try_new(vec![tree], 1, 2).unwrap()
    }

    #[test]
    fn single_feature_grid_has_two_cells() {
        let forest = trivial_forest();
        let space = FeatureSpace::build(&forest, DEFAULT_CELL_LIMIT).unwrap();
        assert_eq!(space.nb_cells(), 2);
        assert_eq!(space.cell_class(0), 0);
        assert_eq!(space.cell_class(1), 1);
        assert_eq!(space.stride(0), 1);
    }

    #[test]
    fn rejects_grid_over_the_limit() {
        let forest = trivial_forest();
        let err = FeatureSpace::build(&forest, 1).unwrap_err();
        assert!(matches!(err, BornAgainError::GridTooLarge { cell_count: 2, limit: 1 }));
    }

    #[test]
    fn two_feature_grid_strides_are_row_major() {
        let t = Tree::from_nodes(vec![
            internal(0, 0, 0, 0.0, 1, 4),
            internal(1, 1, 1, 0.0, 2, 3),
            leaf(2, 2, 0),
            leaf(3, 2, 1),
            internal(4, 1, 1, 0.0, 5, 6),
            leaf(5, 2, 1),
            leaf(6, 2, 0),
        ]);
        let forest = Forest::try_new(vec![t], 2, 2).unwrap();
        let space = FeatureSpace::build(&forest, DEFAULT_CELL_LIMIT).unwrap();
        // Feature 0 and feature 1 each have one real threshold plus the
        // sentinel, so a 2x2 grid with strides (2, 1).
        assert_eq!(space.axis_size(0), 2);
        assert_eq!(space.axis_size(1), 2);
        assert_eq!(space.stride(0), 2);
        assert_eq!(space.stride(1), 1);
        assert_eq!(space.coordinate(3, 0), 1);
        assert_eq!(space.coordinate(3, 1), 1);
    }
}
