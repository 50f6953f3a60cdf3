//! Parses the tree-ensemble text format into a [`Forest`].

use crate::core::forest::Forest;
use crate::core::node::{Node, Tree};
use crate::error::{BornAgainError, Result};

/// Parses `text` as a tree-ensemble file and validates the result via
/// [`Forest::try_new`].
///
/// Header lines (`ENSEMBLE`, `NB_TREES`, `NB_FEATURES`, `NB_CLASSES`) may
/// appear in any order before the first `[TREE ...]` block; `DATASET_NAME`
/// and `MAX_TREE_DEPTH` are recognized but ignored on import.
pub fn parse_forest(text: &str) -> Result<Forest> {
    let mut lines = text.lines().enumerate().peekable();

    let mut ensemble: Option<&str> = None;
    let mut nb_trees: Option<usize> = None;
    let mut nb_features: Option<usize> = None;
    let mut nb_classes: Option<usize> = None;

    // Consume header lines until the first `[TREE ...]` marker.
    while let Some(&(line_no, line)) = lines.peek() {
        let trimmed = line.trim();
        if trimmed.starts_with("[TREE") {
            break;
        }
        lines.next();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(value) = trimmed.strip_prefix("ENSEMBLE:") {
            ensemble = Some(value.trim());
        } else if let Some(value) = trimmed.strip_prefix("NB_TREES:") {
            nb_trees = Some(parse_usize(line_no, value)?);
        } else if let Some(value) = trimmed.strip_prefix("NB_FEATURES:") {
            nb_features = Some(parse_usize(line_no, value)?);
        } else if let Some(value) = trimmed.strip_prefix("NB_CLASSES:") {
            nb_classes = Some(parse_usize(line_no, value)?);
        }
        // DATASET_NAME, MAX_TREE_DEPTH, and any free-form description line
        // are recognized by the grammar but carry no information the core
        // needs, so they are read past and dropped.
    }

    ensemble.ok_or_else(|| missing_header("ENSEMBLE"))?;
    let nb_trees = nb_trees.ok_or_else(|| missing_header("NB_TREES"))?;
    let nb_features = nb_features.ok_or_else(|| missing_header("NB_FEATURES"))?;
    let nb_classes = nb_classes.ok_or_else(|| missing_header("NB_CLASSES"))?;

    let mut trees = Vec::with_capacity(nb_trees);
    for expected_id in 0..nb_trees {
        trees.push(parse_tree(&mut lines, expected_id)?);
    }

    Forest::try_new(trees, nb_features, nb_classes)
}

fn missing_header(name: &str) -> BornAgainError {
    BornAgainError::ParseError {
        line: 0,
        message: format!("missing required header line {name}"),
    }
}

fn parse_usize(line: usize, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| BornAgainError::ParseError { line, message: format!("expected an integer: {e}") })
}

fn parse_tree<'a, I>(lines: &mut std::iter::Peekable<I>, expected_id: usize) -> Result<Tree>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let (line_no, header) = lines
        .next()
        .ok_or_else(|| BornAgainError::ParseError { line: 0, message: "unexpected end of input, expected [TREE]".into() })?;
    let header = header.trim();
    let id_str = header
        .strip_prefix("[TREE")
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| BornAgainError::ParseError { line: line_no, message: format!("malformed tree header: {header}") })?;
    let tree_id: usize = parse_usize(line_no, id_str.trim())?;
    if tree_id != expected_id {
        return Err(BornAgainError::ParseError {
            line: line_no,
            message: format!("expected [TREE {expected_id}], found [TREE {tree_id}]"),
        });
    }

    let (line_no, nb_nodes_line) = lines
        .next()
        .ok_or_else(|| BornAgainError::ParseError { line: line_no, message: "expected NB_NODES line".into() })?;
    let nb_nodes = nb_nodes_line
        .trim()
        .strip_prefix("NB_NODES:")
        .ok_or_else(|| BornAgainError::ParseError { line: line_no, message: format!("expected NB_NODES, found: {nb_nodes_line}") })
        .and_then(|v| parse_usize(line_no, v))?;

    let mut nodes = Vec::with_capacity(nb_nodes);
    for expected_node_id in 0..nb_nodes {
        let (line_no, node_line) = lines
            .next()
            .ok_or_else(|| BornAgainError::ParseError { line: line_no, message: "unexpected end of input within a tree".into() })?;
        nodes.push(parse_node(line_no, node_line, expected_node_id)?);
    }

    Ok(Tree::from_nodes(nodes))
}

fn parse_node(line_no: usize, line: &str, expected_id: usize) -> Result<Node> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 8 {
        return Err(BornAgainError::ParseError {
            line: line_no,
            message: format!("expected 8 fields in a node line, found {}", fields.len()),
        });
    }

    let field_err = |message: String| BornAgainError::ParseError { line: line_no, message };

    let node_id: usize = fields[0]
        .parse()
        .map_err(|e| field_err(format!("bad node_id: {e}")))?;
    if node_id != expected_id {
        return Err(field_err(format!("expected node id {expected_id}, found {node_id}")));
    }

    let depth: usize = fields[6]
        .parse()
        .map_err(|e| field_err(format!("bad depth: {e}")))?;

    match fields[1] {
        "LN" => {
            let class: i64 = fields[7]
                .parse()
                .map_err(|e| field_err(format!("bad class: {e}")))?;
            let class: usize = class
                .try_into()
                .map_err(|_| field_err(format!("leaf class must be non-negative, found {class}")))?;
            Ok(Node::Leaf { node_id, depth, class })
        }
        "IN" => {
            let left: usize = fields[2]
                .parse()
                .map_err(|e| field_err(format!("bad left_child: {e}")))?;
            let right: usize = fields[3]
                .parse()
                .map_err(|e| field_err(format!("bad right_child: {e}")))?;
            let split_feature: usize = fields[4]
                .parse()
                .map_err(|e| field_err(format!("bad split_feature: {e}")))?;
            let split_value: f64 = fields[5]
                .parse()
                .map_err(|e| field_err(format!("bad split_value: {e}")))?;
            Ok(Node::Internal { node_id, depth, split_feature, split_value, left, right })
        }
        other => Err(field_err(format!("expected LN or IN, found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIVIAL: &str = "\
DATASET_NAME: test
ENSEMBLE: RF
NB_TREES: 1
NB_FEATURES: 1
NB_CLASSES: 2
Format: node / node type / left / right / feature / threshold / depth / class

[TREE 0]
NB_NODES: 3
0 IN 1 2 0 0.5 0 -1
1 LN -1 -1 -1 -1 1 0
2 LN -1 -1 -1 -1 1 1
";

    #[test]
    fn parses_trivial_forest() {
        let forest = parse_forest(TRIVIAL).unwrap();
        assert_eq!(forest.nb_features(), 1);
        assert_eq!(forest.nb_classes(), 2);
        assert_eq!(forest.trees().len(), 1);
        assert_eq!(forest.trees()[0].len(), 3);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let bad = TRIVIAL.replace("0 IN 1 2 0 0.5 0 -1", "0 IN 1 2 0 0.5 0");
        let err = parse_forest(&bad).unwrap_err();
        assert!(matches!(err, BornAgainError::ParseError { .. }));
    }

    #[test]
    fn rejects_missing_header() {
        let bad = TRIVIAL.replace("NB_CLASSES: 2\n", "");
        let err = parse_forest(&bad).unwrap_err();
        assert!(matches!(err, BornAgainError::ParseError { .. }));
    }
}
