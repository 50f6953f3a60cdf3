//! Builds a single decision tree of minimum depth that is functionally
//! equivalent to a random forest classifier: for every point in input
//! space, the reborn tree returns the same class label as the forest's
//! majority vote.
//!
//! The crate is organized the way the specification splits it:
//!
//! * [`core`] is the born-again optimization engine itself — feature
//!   space, region memo, depth optimizer, and tree materializer. This is
//!   the part worth reading.
//! * [`io`] is the mechanical text-format reader/writer. It exists so the
//!   crate is usable end to end, but it never influences the engine's
//!   semantics.
//! * [`error`] is the typed failure surface both of the above report
//!   through.
//!
//! ```
//! use born_again_trees::core::forest::Forest;
//! use born_again_trees::core::node::{Node, Tree};
//! use born_again_trees::core::BornAgain;
//!
//! let tree = Tree::from_nodes(vec![
//!     Node::Internal { node_id: 0, depth: 0, split_feature: 0, split_value: 0.5, left: 1, right: 2 },
//!     Node::Leaf { node_id: 1, depth: 1, class: 0 },
//!     Node::Leaf { node_id: 2, depth: 1, class: 1 },
//! ]);
//! let forest = Forest::try_new(vec![tree], 1, 2).unwrap();
//!
//! let reborn = BornAgain::build(&forest).unwrap().reborn_tree().unwrap();
//! assert_eq!(reborn.classify(&[0.2]), forest.majority_class(&[0.2]));
//! ```

pub mod core;
pub mod error;
pub mod io;
