//! Typed failure surface for the born-again engine.
//!
//! Everything the engine itself can refuse to do (a malformed forest, a grid
//! that would blow past the configured cell-count ceiling) is a named
//! variant here. Violations of an internal invariant — conditions that can
//! only arise from a bug in the engine, never from caller data — collapse
//! into `Internal`.

use thiserror::Error;

/// Failure surfaced by any stage of the born-again engine or its I/O layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BornAgainError {
    /// The forest has zero trees, zero features, or zero classes.
    #[error("forest is empty: nb_trees={nb_trees}, nb_features={nb_features}, nb_classes={nb_classes}")]
    EmptyForest {
        nb_trees: usize,
        nb_features: usize,
        nb_classes: usize,
    },

    /// An internal node's `split_feature` is out of `[0, nb_features)`.
    #[error(
        "tree {tree} node {node}: split_feature {feature} is out of range [0, {nb_features})"
    )]
    InvalidSplitFeature {
        tree: usize,
        node: usize,
        feature: usize,
        nb_features: usize,
    },

    /// A leaf's `classification` is out of `[0, nb_classes)`.
    #[error("tree {tree} node {node}: class {class} is out of range [0, {nb_classes})")]
    InvalidClass {
        tree: usize,
        node: usize,
        class: usize,
        nb_classes: usize,
    },

    /// An internal node's `split_value` is NaN, so it cannot be ordered
    /// against any other threshold on its feature's axis.
    #[error("tree {tree} node {node}: split_value is NaN")]
    InvalidSplitValue { tree: usize, node: usize },

    /// An internal node's child index does not name a node in its tree.
    #[error("tree {tree} node {node}: child index {child} is out of range")]
    UnreachableChild {
        tree: usize,
        node: usize,
        child: usize,
    },

    /// Following children from the root revisits a node already seen on the
    /// current root-to-node path.
    #[error("tree {tree} node {node}: cyclic child reference")]
    CyclicReference { tree: usize, node: usize },

    /// The feature-space cell count exceeds the configured ceiling.
    #[error("grid of {cell_count} cells exceeds the configured limit of {limit}")]
    GridTooLarge { cell_count: u64, limit: u64 },

    /// A line of the text format did not match its expected shape.
    #[error("line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// An invariant the engine itself guarantees was violated. Indicates a
    /// bug in the engine, never in caller-supplied data.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BornAgainError>;
