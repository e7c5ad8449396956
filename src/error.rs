//! Error types for node construction and tree mutation.
//!
//! Both error kinds reject invalid external input and are always
//! recoverable: a failed insert/remove/grow/prune has no effect on the
//! tree, so a sampler can discard the proposal and try another.

use crate::tree::NodeIndex;

/// Violation of a tree structural invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeStructureError {
    /// No node is stored at the requested index.
    #[error("node missing at index {0}")]
    NodeMissing(NodeIndex),

    /// A node is already stored at the target index.
    #[error("node index {0} already exists in tree")]
    DuplicateIndex(NodeIndex),

    /// The first node inserted into an empty tree must be the root.
    #[error("root node must have index zero, got {0}")]
    NonZeroRoot(NodeIndex),

    /// A non-root node was inserted before its parent.
    #[error("node {index} must have a parent node at index {parent}")]
    MissingParent { index: NodeIndex, parent: NodeIndex },

    /// The parent of an inserted node is a leaf, which cannot have children.
    #[error("parent of node {index} at index {parent} must be a split node")]
    LeafParent { index: NodeIndex, parent: NodeIndex },

    /// The node's own index disagrees with the insertion index.
    #[error("node carries index {node_index} but was inserted at index {index}")]
    IndexMismatch { index: NodeIndex, node_index: NodeIndex },

    /// Removing the node would leave a child without a parent.
    #[error("removing node {index} would orphan its child at index {child}")]
    OrphanedChild { index: NodeIndex, child: NodeIndex },

    /// A grow edit targeted a node that is not a leaf.
    #[error("grow target at index {0} must be a leaf node")]
    GrowTargetNotLeaf(NodeIndex),

    /// A prune edit targeted a node that is not a split node with two
    /// leaf children.
    #[error("prune target at index {0} must be a split node with two leaf children")]
    NotPrunable(NodeIndex),
}

/// Invalid arguments when constructing a node.
///
/// Raised before the node ever reaches a tree; the tree never holds an
/// invalid node.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum NodeError {
    /// Leaf prediction values must be finite.
    #[error("leaf node value must be a finite number, got {0}")]
    NonFiniteLeafValue(f64),

    /// Quantitative split thresholds must be finite.
    #[error("quantitative split value must be a finite number, got {0}")]
    NonFiniteSplitValue(f64),

    /// A qualitative split over an empty category set can never be true.
    #[error("qualitative split value must contain at least one category")]
    EmptyCategorySet,
}

/// Umbrella error for edits that can fail either structurally or while
/// constructing the replacement nodes (grow/prune).
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error(transparent)]
    Structure(#[from] TreeStructureError),

    #[error(transparent)]
    Node(#[from] NodeError),
}
