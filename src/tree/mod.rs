//! BART regression tree representation.
//!
//! The tree is stored as a logically complete binary tree: node indices
//! encode structure (root = 0, children of `i` = `2i + 1` and `2i + 2`),
//! so parent/child/sibling navigation is integer arithmetic instead of
//! pointer chasing.

/// Node identifier: the node's position in the implicit
/// complete-binary-tree layout.
pub type NodeIndex = usize;

pub mod address;
pub mod digraph;
pub mod node;
pub mod render;
pub mod sample;
#[allow(clippy::module_inception)]
pub mod tree;

pub use digraph::{DigraphSink, DotWriter, NodeShape};
pub use node::{LeafNode, Node, SplitKind, SplitNode, SplitRule};
pub use sample::FeatureVector;
pub use tree::Tree;
