//! The born-again optimization engine: feature space, region memo, depth
//! optimizer and materializer, tied together by [`BornAgain`].

pub mod feature_space;
pub mod forest;
pub mod materializer;
pub mod node;
pub mod optimizer;
pub mod region;

use log::debug;

use crate::core::feature_space::{FeatureSpace, DEFAULT_CELL_LIMIT};
use crate::core::forest::Forest;
use crate::core::node::Tree;
use crate::core::region::RegionMemo;
use crate::error::Result;

/// Ties the feature space and its region memo to a single forest, and
/// exposes the depth optimizer and materializer over that shared state.
///
/// Chain `build` then `reborn_tree` for the common case; the lower-level
/// `optimize_depth` is exposed separately so tests can recompute a region's
/// depth independently of the top-level call.
#[derive(Debug)]
pub struct BornAgain {
    fspace: FeatureSpace,
    memo: RegionMemo,
}

impl BornAgain {
    /// Builds the feature space for `forest` using the default cell-count
    /// ceiling ([`DEFAULT_CELL_LIMIT`]).
    pub fn build(forest: &Forest) -> Result<Self> {
        Self::build_with_cell_limit(forest, DEFAULT_CELL_LIMIT)
    }

    /// Builds the feature space for `forest`, refusing grids larger than
    /// `cell_limit`.
    pub fn build_with_cell_limit(forest: &Forest, cell_limit: u64) -> Result<Self> {
        let fspace = FeatureSpace::build(forest, cell_limit)?;
        let memo = RegionMemo::new(&fspace);
        Ok(BornAgain { fspace, memo })
    }

    pub fn feature_space(&self) -> &FeatureSpace {
        &self.fspace
    }

    /// The minimum depth of any axis-aligned tree reproducing the cell
    /// classes of region `(lo, hi)`. Safe to call more than once, or on a
    /// region other than the whole grid; see `optimizer::optimize_depth`.
    pub fn optimize_depth(&mut self, lo: usize, hi: usize) -> usize {
        optimizer::optimize_depth(&self.fspace, &mut self.memo, lo, hi)
    }

    /// Runs the depth optimizer over the whole grid and materializes one
    /// concrete minimum-depth tree.
    pub fn reborn_tree(&mut self) -> Result<Tree> {
        let top = self.fspace.nb_cells() - 1;
        let opt = self.optimize_depth(0, top);
        debug!("optimal depth for the whole grid is {opt}");
        materializer::materialize(&self.fspace, &self.memo, 0, top, opt)
    }
}
