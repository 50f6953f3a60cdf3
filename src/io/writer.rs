//! Emits a reborn [`Tree`] in the tree-ensemble text format.

use std::fmt::Write as _;

use crate::core::node::{Node, Tree};

/// Serializes `tree` as the single-tree, `ENSEMBLE: BA` export format,
/// attributing `dataset_name` to the `DATASET_NAME` header.
///
/// `nb_features`/`nb_classes` are the source forest's declared dimensions,
/// not derived from `tree`'s own contents: a reborn tree that never splits
/// on some feature, or never emits some class as a leaf, still describes
/// an ensemble of that full dimensionality, and the exported header must
/// say so.
///
/// Pure and allocation-only; callers own writing the result to a file.
pub fn write_tree(tree: &Tree, dataset_name: &str, nb_features: usize, nb_classes: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "DATASET_NAME: {dataset_name}");
    let _ = writeln!(out, "ENSEMBLE: BA");
    let _ = writeln!(out, "NB_TREES: 1");
    let _ = writeln!(out, "NB_FEATURES: {nb_features}");
    let _ = writeln!(out, "NB_CLASSES: {nb_classes}");
    let _ = writeln!(out, "MAX_TREE_DEPTH: {}", tree.max_depth());
    let _ = writeln!(
        out,
        "Format: node / node type(LN - leave node, IN - internal node) left child / right child / feature / threshold / node_depth / majority class (starts with index 0)"
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "[TREE 0]");
    let _ = writeln!(out, "NB_NODES: {}", tree.len());
    for node in tree.nodes() {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Leaf { node_id, depth, class } => {
            let _ = writeln!(out, "{node_id} LN -1 -1 -1 -1 {depth} {class}");
        }
        Node::Internal { node_id, depth, split_feature, split_value, left, right } => {
            let _ = writeln!(out, "{node_id} IN {left} {right} {split_feature} {split_value} {depth} -1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::parse_forest;

    #[test]
    fn round_trips_through_parse_forest() {
        let tree = Tree::from_nodes(vec![
            Node::Internal { node_id: 0, depth: 0, split_feature: 0, split_value: 0.5, left: 1, right: 2 },
            Node::Leaf { node_id: 1, depth: 1, class: 0 },
            Node::Leaf { node_id: 2, depth: 1, class: 1 },
        ]);
        let text = write_tree(&tree, "roundtrip", 1, 2);
        let forest = parse_forest(&text).unwrap();
        assert_eq!(forest.trees().len(), 1);
        assert_eq!(forest.trees()[0], tree);
        assert_eq!(forest.nb_features(), 1);
        assert_eq!(forest.nb_classes(), 2);
    }

    #[test]
    fn reports_the_source_forests_full_dimensionality_not_the_trees() {
        // The tree only ever touches feature 0 and class 1, but the source
        // ensemble declared three features and three classes.
        let tree = Tree::from_nodes(vec![Node::Leaf { node_id: 0, depth: 0, class: 1 }]);
        let text = write_tree(&tree, "redundant", 3, 3);
        assert!(text.contains("NB_FEATURES: 3"));
        assert!(text.contains("NB_CLASSES: 3"));
    }
}
