//! The input to the engine: an ordered list of trees with a known feature
//! and class count, together with the majority-vote classifier the whole
//! engine exists to reproduce.

use log::debug;

use crate::core::node::{Node, Tree};
use crate::error::{BornAgainError, Result};

/// An ordered list of trees sharing a feature and class space.
///
/// Invariant: every internal node's `split_feature` is in
/// `[0, nb_features)`; every leaf's `classification` is in
/// `[0, nb_classes)`. `Forest::try_new` is the only way to build one, and it
/// checks exactly these invariants plus structural well-formedness of each
/// tree.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Tree>,
    nb_features: usize,
    nb_classes: usize,
}

impl Forest {
    /// Validates `trees` against `nb_features` and `nb_classes` and, if
    /// sound, returns the `Forest`.
    ///
    /// # Errors
    ///
    /// * [`BornAgainError::EmptyForest`] if `trees`, `nb_features`, or
    ///   `nb_classes` is zero.
    /// * [`BornAgainError::InvalidSplitFeature`] / [`BornAgainError::InvalidClass`]
    ///   if a node names a feature or class outside its declared range.
    /// * [`BornAgainError::InvalidSplitValue`] if an internal node's
    ///   `split_value` is NaN.
    /// * [`BornAgainError::UnreachableChild`] if a child index does not name
    ///   a node of the same tree.
    /// * [`BornAgainError::CyclicReference`] if following children from the
    ///   root revisits a node already on the current path.
    pub fn try_new(trees: Vec<Tree>, nb_features: usize, nb_classes: usize) -> Result<Self> {
        if trees.is_empty() || nb_features == 0 || nb_classes == 0 {
            return Err(BornAgainError::EmptyForest {
                nb_trees: trees.len(),
                nb_features,
                nb_classes,
            });
        }

        for (tree_idx, tree) in trees.iter().enumerate() {
            for node in tree.nodes() {
                match node {
                    Node::Internal { split_feature, .. } if *split_feature >= nb_features => {
                        return Err(BornAgainError::InvalidSplitFeature {
                            tree: tree_idx,
                            node: node.node_id(),
                            feature: *split_feature,
                            nb_features,
                        });
                    }
                    Node::Internal { split_value, .. } if split_value.is_nan() => {
                        return Err(BornAgainError::InvalidSplitValue {
                            tree: tree_idx,
                            node: node.node_id(),
                        });
                    }
                    Node::Leaf { class, .. } if *class >= nb_classes => {
                        return Err(BornAgainError::InvalidClass {
                            tree: tree_idx,
                            node: node.node_id(),
                            class: *class,
                            nb_classes,
                        });
                    }
                    _ => {}
                }
            }
            check_acyclic(tree_idx, tree)?;
        }

        debug!(
            "forest validated: {} trees, {} features, {} classes",
            trees.len(),
            nb_features,
            nb_classes
        );

        Ok(Forest {
            trees,
            nb_features,
            nb_classes,
        })
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn nb_features(&self) -> usize {
        self.nb_features
    }

    pub fn nb_classes(&self) -> usize {
        self.nb_classes
    }

    /// Evaluates every tree at `x`, tallies leaf classes into a histogram,
    /// and returns the smallest index achieving the maximum count.
    pub fn majority_class(&self, x: &[f64]) -> usize {
        let mut votes = vec![0usize; self.nb_classes];
        for tree in &self.trees {
            votes[tree.classify(x)] += 1;
        }
        arg_max_first(&votes)
    }
}

/// The index of the largest value in `values`, ties broken by the lowest
/// index.
fn arg_max_first(values: &[usize]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, values[0]), |(i_max, v_max), (i, &v)| {
            if v > v_max {
                (i, v)
            } else {
                (i_max, v_max)
            }
        })
        .0
}

/// Walks `tree` from its root, checking that every child index names a node
/// of `tree` and that no root-to-node path revisits a node.
fn check_acyclic(tree_idx: usize, tree: &Tree) -> Result<()> {
    fn walk(tree_idx: usize, tree: &Tree, id: usize, on_path: &mut Vec<bool>) -> Result<()> {
        if on_path[id] {
            return Err(BornAgainError::CyclicReference { tree: tree_idx, node: id });
        }
        on_path[id] = true;
        if let Node::Internal { left, right, .. } = tree.node(id) {
            for &child in &[*left, *right] {
                if child >= tree.len() {
                    return Err(BornAgainError::UnreachableChild {
                        tree: tree_idx,
                        node: id,
                        child,
                    });
                }
                walk(tree_idx, tree, child, on_path)?;
            }
        }
        on_path[id] = false;
        Ok(())
    }

    let mut on_path = vec![false; tree.len()];
    walk(tree_idx, tree, 0, &mut on_path)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn rejects_empty_forest() {
        let err = Forest::try_new(vec![], 1, 2).unwrap_err();
        assert!(matches!(err, BornAgainError::EmptyForest { .. }));
    }

    #[test]
    fn rejects_out_of_range_feature() {
        let tree = Tree::from_nodes(vec![internal(0, 0, 5, 0.0, 1, 2), leaf(1, 1, 0), leaf(2, 1, 1)]);
        let err = Forest::try_new(vec![tree], 1, 2).unwrap_err();
        assert!(matches!(err, BornAgainError::InvalidSplitFeature { feature: 5, .. }));
    }

    #[test]
    fn rejects_nan_split_value() {
        let tree = Tree::from_nodes(vec![internal(0, 0, 0, f64::NAN, 1, 2), leaf(1, 1, 0), leaf(2, 1, 1)]);
        let err = Forest::try_new(vec![tree], 1, 2).unwrap_err();
        assert!(matches!(err, BornAgainError::InvalidSplitValue { .. }));
    }

    #[test]
    fn rejects_cyclic_tree() {
        // node 0 -> 1 -> 0, a cycle.
        let tree = Tree::from_nodes(vec![internal(0, 0, 0, 0.0, 1, 1), internal(1, 1, 0, 0.0, 0, 0)]);
        let err = Forest::try_new(vec![tree], 1, 2).unwrap_err();
        assert!(matches!(err, BornAgainError::CyclicReference { .. }));
    }

    #[test]
    fn rejects_out_of_range_child() {
        let tree = Tree::from_nodes(vec![internal(0, 0, 0, 0.0, 1, 7)]);
        let err = Forest::try_new(vec![tree], 1, 2).unwrap_err();
        assert!(matches!(err, BornAgainError::UnreachableChild { child: 7, .. }));
    }

    #[test]
    fn majority_vote_breaks_ties_by_lowest_index() {
        let t0 = Tree::from_nodes(vec![leaf(0, 0, 0)]);
        let t1 = Tree::from_nodes(vec![leaf(0, 0, 1)]);
        let forest = Forest::try_new(vec![t0, t1], 1, 2).unwrap();
        assert_eq!(forest.majority_class(&[0.0]), 0);
    }
}
