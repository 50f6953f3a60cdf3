//! The tagged node shape shared by every tree in a `Forest` and by the
//! reborn `Tree` the engine produces.
//!
//! Leaves and internal nodes share only `node_id` and `depth`; giving them
//! separate variants (rather than one record with `-1` sentinel fields)
//! keeps `match`es on node kind exhaustive everywhere except at the text
//! format boundary, where the wire format's sentinels are unavoidable.

/// One node of a decision tree.
///
/// Convention: at an `Internal` node, a point goes **left** when
/// `x[split_feature] <= split_value`, else **right**.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf {
        node_id: usize,
        depth: usize,
        class: usize,
    },
    Internal {
        node_id: usize,
        depth: usize,
        split_feature: usize,
        split_value: f64,
        left: usize,
        right: usize,
    },
}

impl Node {
    pub fn node_id(&self) -> usize {
        match self {
            Node::Leaf { node_id, .. } => *node_id,
            Node::Internal { node_id, .. } => *node_id,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { depth, .. } => *depth,
            Node::Internal { depth, .. } => *depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// An ordered list of `Node`s whose first entry (index 0) is the root.
///
/// Child references are indices into `nodes`; the graph is acyclic and
/// every non-root node has exactly one parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Builds a `Tree` from an already-ordered node list without
    /// re-validating structure. Used by the materializer, which constructs
    /// the list in a way that is correct by construction, and by the text
    /// format reader, which validates separately via `Forest::try_new`.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Tree { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The maximum `depth` carried by any node in the tree.
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Walks from the root, branching on `x[split_feature] <= split_value`,
    /// and returns the class of the leaf reached.
    pub fn classify(&self, x: &[f64]) -> usize {
        let mut node = self.root();
        loop {
            match node {
                Node::Leaf { class, .. } => return *class,
                Node::Internal {
                    split_feature,
                    split_value,
                    left,
                    right,
                    ..
                } => {
                    node = if x[*split_feature] <= *split_value {
                        &self.nodes[*left]
                    } else {
                        &self.nodes[*right]
                    };
                }
            }
        }
    }
}
