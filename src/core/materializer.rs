//! The second DP pass: reconstructs one concrete minimum-depth tree from a
//! memo the optimizer has already filled in for region `(lo, hi)`.
//!
//! The scan below walks every candidate split in order rather than
//! replaying the optimizer's bisection — the memo already holds the true
//! depth of whichever sub-regions the optimizer actually visited, so the
//! first split whose sub-depths both resolve and sum to `opt` is provably
//! optimal, not just plausible.

use log::debug;

use crate::core::feature_space::FeatureSpace;
use crate::core::node::{Node, Tree};
use crate::core::region::RegionMemo;
use crate::error::{BornAgainError, Result};

/// Reconstructs the reborn tree for region `(lo, hi)`, whose minimum depth
/// `opt` the optimizer has already proven and recorded in `memo`.
pub fn materialize(fspace: &FeatureSpace, memo: &RegionMemo, lo: usize, hi: usize, opt: usize) -> Result<Tree> {
    let mut nodes = Vec::new();
    materialize_region(fspace, memo, lo, hi, opt, 0, &mut nodes)?;
    debug!("materialized tree with {} nodes, depth {}", nodes.len(), opt);
    Ok(Tree::from_nodes(nodes))
}

/// Looks up the depth of the region `(region_lo, region_hi)`, treating a
/// single-cell region as depth 0 without a memo lookup (singleton regions
/// are never written to the memo; see `optimize_depth`'s base case).
fn sub_depth(fspace: &FeatureSpace, memo: &RegionMemo, region_lo: usize, region_hi: usize) -> Option<usize> {
    if region_lo == region_hi {
        Some(0)
    } else {
        memo.get(fspace, region_lo, region_hi)
    }
}

fn materialize_region(
    fspace: &FeatureSpace,
    memo: &RegionMemo,
    lo: usize,
    hi: usize,
    opt: usize,
    depth: usize,
    nodes: &mut Vec<Node>,
) -> Result<usize> {
    if opt == 0 {
        let node_id = nodes.len();
        nodes.push(Node::Leaf {
            node_id,
            depth,
            class: fspace.cell_class(lo),
        });
        return Ok(node_id);
    }

    for feature in 0..fspace.nb_features() {
        let stride = fspace.stride(feature);
        let range_lo = fspace.coordinate(lo, feature);
        let range_hi = fspace.coordinate(hi, feature);

        for l in range_lo..range_hi {
            let left_hi = hi - stride * (range_hi - l);
            let right_lo = lo + stride * (l + 1 - range_lo);

            let (Some(d_left), Some(d_right)) = (
                sub_depth(fspace, memo, lo, left_hi),
                sub_depth(fspace, memo, right_lo, hi),
            ) else {
                continue;
            };

            if 1 + d_left.max(d_right) != opt {
                continue;
            }

            let node_id = nodes.len();
            nodes.push(Node::Internal {
                node_id,
                depth,
                split_feature: feature,
                split_value: fspace.level_value(feature, l),
                left: 0,
                right: 0,
            });

            let left_id = materialize_region(fspace, memo, lo, left_hi, d_left, depth + 1, nodes)?;
            let right_id = materialize_region(fspace, memo, right_lo, hi, d_right, depth + 1, nodes)?;

            match &mut nodes[node_id] {
                Node::Internal { left, right, .. } => {
                    *left = left_id;
                    *right = right_id;
                }
                Node::Leaf { .. } => unreachable!("node_id was just pushed as Internal"),
            }
            return Ok(node_id);
        }
    }

    Err(BornAgainError::Internal(format!(
        "materializer found no split for region ({lo}, {hi}) achieving depth {opt}; memo is inconsistent with the optimizer"
    )))
}
