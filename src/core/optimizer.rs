//! The core dynamic program: proves the minimum depth of an axis-aligned
//! decision tree that reproduces the forest's majority class over every
//! cell of a region.
//!
//! A branch-and-bound bisection over candidate split coordinates; the
//! tightening pointers `(lo_l, hi_l)` prune candidates using the objective's
//! monotonicity on each side of a split.

use log::trace;

use crate::core::feature_space::FeatureSpace;
use crate::core::region::RegionMemo;

/// Returns the minimum depth of any axis-aligned binary decision tree over
/// `fspace` that labels every cell of the region `(lo, hi)` with that
/// cell's precomputed class, memoizing every region it visits into `memo`.
pub fn optimize_depth(fspace: &FeatureSpace, memo: &mut RegionMemo, lo: usize, hi: usize) -> usize {
    if lo == hi {
        return 0;
    }
    if let Some(depth) = memo.get(fspace, lo, hi) {
        return depth;
    }

    trace!("optimize_depth: region ({lo}, {hi})");

    let mut best_lb = 0usize;
    let mut best_ub = usize::MAX;

    for feature in 0..fspace.nb_features() {
        if best_lb >= best_ub {
            break;
        }

        let stride = fspace.stride(feature);
        let range_lo = fspace.coordinate(lo, feature);
        let range_hi = fspace.coordinate(hi, feature);
        if range_lo == range_hi {
            continue;
        }

        let mut lo_l = range_lo;
        let mut hi_l = range_hi;
        while lo_l < hi_l && best_lb < best_ub {
            let l = lo_l + (hi_l - lo_l) / 2;

            let left_hi = hi - stride * (range_hi - l);
            let d_left = optimize_depth(fspace, memo, lo, left_hi);

            let right_lo = lo + stride * (l + 1 - range_lo);
            let d_right = optimize_depth(fspace, memo, right_lo, hi);

            if d_left == 0 && d_right == 0 {
                let depth = if fspace.cell_class(lo) == fspace.cell_class(hi) { 0 } else { 1 };
                memo.set(fspace, lo, hi, depth);
                return depth;
            }

            best_lb = best_lb.max(d_left).max(d_right);
            let cost = 1 + d_left.max(d_right);
            if cost < best_ub {
                best_ub = cost;
            }
            if 1 + d_left >= best_ub {
                hi_l = l;
            }
            if 1 + d_right >= best_ub {
                lo_l = l + 1;
            }
        }
    }

    memo.set(fspace, lo, hi, best_ub);
    best_ub
}
