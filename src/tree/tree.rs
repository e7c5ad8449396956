//! The tree container.
//!
//! Owns the mapping from index to node and enforces the structural
//! invariants on every single-node edit, so the stored structure is a
//! valid, gap-free binary tree between completed edits. The live
//! leaf-index set is maintained incrementally so edit-legality queries
//! scale with leaf count, not tree size.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ndarray::{Array1, ArrayView2};

use crate::error::{NodeError, TreeError, TreeStructureError};

use super::node::{LeafNode, Node, SplitNode, SplitRule};
use super::sample::FeatureVector;
use super::{address, NodeIndex};

/// A BART regression tree.
///
/// Nodes are keyed by their position in the implicit complete-binary-tree
/// layout; the container exclusively owns them and hands out only shared
/// references. A tree starts as a single leaf at index 0 ([`Tree::init`])
/// and changes shape one validated edit at a time.
///
/// `Tree` deliberately implements neither `PartialEq` nor `Hash`: it is a
/// mutable structure and must not be used as a map key. Use
/// [`Tree::structurally_eq`] for comparison.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: BTreeMap<NodeIndex, Node>,
    leaf_indices: BTreeSet<NodeIndex>,
}

impl Tree {
    /// Create an empty tree.
    ///
    /// Prefer [`Tree::init`]; an empty tree only arises transiently in
    /// the middle of a root edit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree holding a single leaf with the given value at the
    /// root.
    pub fn init(leaf_value: f64) -> Result<Self, NodeError> {
        let mut tree = Self::new();
        let root = Node::leaf(0, leaf_value)?;
        // Inserting a leaf root into an empty tree cannot violate any
        // structural invariant.
        tree.store(0, root);
        Ok(tree)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node is stored at `index`.
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.nodes.contains_key(&index)
    }

    /// Get the node at `index`.
    pub fn get(&self, index: NodeIndex) -> Result<&Node, TreeStructureError> {
        self.nodes
            .get(&index)
            .ok_or(TreeStructureError::NodeMissing(index))
    }

    /// Indices currently holding leaf nodes.
    pub fn leaf_indices(&self) -> &BTreeSet<NodeIndex> {
        &self.leaf_indices
    }

    /// Iterate over `(index, node)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().map(|(&index, node)| (index, node))
    }

    /// Insert `node` at `index`.
    ///
    /// Fails, leaving the tree unchanged, when any structural invariant
    /// would be violated:
    ///
    /// - `index` disagrees with the node's own index
    /// - `index` is already occupied
    /// - the tree is empty and `index` is not 0 (root first)
    /// - the tree is non-empty and the parent slot is absent or holds a
    ///   leaf (a leaf cannot have children)
    pub fn insert(&mut self, index: NodeIndex, node: Node) -> Result<(), TreeStructureError> {
        if node.index() != index {
            return Err(TreeStructureError::IndexMismatch {
                index,
                node_index: node.index(),
            });
        }
        if self.nodes.contains_key(&index) {
            return Err(TreeStructureError::DuplicateIndex(index));
        }
        if self.nodes.is_empty() {
            if index != 0 {
                return Err(TreeStructureError::NonZeroRoot(index));
            }
        } else {
            // A non-empty tree always contains its root, so index 0 was
            // already rejected as a duplicate and `index >= 1` here.
            let parent = address::parent(index);
            match self.nodes.get(&parent) {
                None => {
                    return Err(TreeStructureError::MissingParent { index, parent });
                }
                Some(Node::Leaf(_)) => {
                    return Err(TreeStructureError::LeafParent { index, parent });
                }
                Some(Node::Split(_)) => {}
            }
        }
        self.store(index, node);
        Ok(())
    }

    fn store(&mut self, index: NodeIndex, node: Node) {
        if node.is_leaf() {
            self.leaf_indices.insert(index);
        }
        self.nodes.insert(index, node);
    }

    /// Remove and return the node at `index`.
    ///
    /// Fails, leaving the tree unchanged, if the index is absent or if
    /// either child slot is occupied: removal must never orphan a child,
    /// which is what makes prune sequences safe.
    pub fn remove(&mut self, index: NodeIndex) -> Result<Node, TreeStructureError> {
        if !self.nodes.contains_key(&index) {
            return Err(TreeStructureError::NodeMissing(index));
        }
        for child in [address::left_child(index), address::right_child(index)] {
            if self.nodes.contains_key(&child) {
                return Err(TreeStructureError::OrphanedChild { index, child });
            }
        }
        match self.nodes.remove(&index) {
            Some(node) => {
                self.leaf_indices.remove(&index);
                Ok(node)
            }
            None => Err(TreeStructureError::NodeMissing(index)),
        }
    }

    /// Predict the response for one feature vector by descending from
    /// the root along the splitting rules to a leaf.
    ///
    /// # Panics
    ///
    /// Panics if the tree is empty (predicting on a tree mid-edit is a
    /// usage error, not a recoverable condition), or if a splitting rule
    /// indexes past the end of `x`.
    pub fn predict<X: FeatureVector + ?Sized>(&self, x: &X) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[&index] {
                Node::Split(split) => {
                    index = if split.evaluate(x) {
                        address::left_child(index)
                    } else {
                        address::right_child(index)
                    };
                }
                Node::Leaf(leaf) => return leaf.value(),
            }
        }
    }

    /// Predict the response for every row of a feature matrix.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Tree::predict`].
    pub fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        Array1::from_iter(features.rows().into_iter().map(|row| self.predict(&row)))
    }

    /// Indices of split nodes whose children are both leaves.
    ///
    /// These are exactly the nodes that a prune edit can legally collapse
    /// back into a single leaf. Scans the leaf-index set and checks each
    /// leaf's sibling, so the cost is proportional to the number of
    /// leaves.
    pub fn prunable_parents(&self) -> BTreeSet<NodeIndex> {
        let mut prunable = BTreeSet::new();
        if self.len() <= 1 {
            // A lone root leaf has no parent to prune.
            return prunable;
        }
        for &leaf in &self.leaf_indices {
            if self.leaf_indices.contains(&address::sibling(leaf)) {
                prunable.insert(address::parent(leaf));
            }
        }
        prunable
    }

    /// Prior probability of this tree structure under the BART
    /// tree-generating prior: the product over every node of its
    /// per-node term (split nodes contribute the probability the split
    /// happened, leaves the probability the branch terminated).
    pub fn prior_probability(&self, alpha: f64, beta: f64) -> f64 {
        self.nodes
            .values()
            .map(|node| node.prior_probability(alpha, beta))
            .product()
    }

    /// Whether two trees have the same structure: the same node mapping
    /// (variant and fields) and the same leaf-index set.
    pub fn structurally_eq(&self, other: &Tree) -> bool {
        self.nodes == other.nodes && self.leaf_indices == other.leaf_indices
    }

    /// Grow edit: replace the leaf at `leaf_index` with a split node and
    /// two new leaf children.
    ///
    /// Validated up front, so a rejected edit leaves the tree untouched.
    /// Returns the indices of the new left and right leaves.
    pub fn grow(
        &mut self,
        leaf_index: NodeIndex,
        split_variable: usize,
        rule: SplitRule,
        left_value: f64,
        right_value: f64,
    ) -> Result<(NodeIndex, NodeIndex), TreeError> {
        if !self.get(leaf_index)?.is_leaf() {
            return Err(TreeStructureError::GrowTargetNotLeaf(leaf_index).into());
        }
        let left = address::left_child(leaf_index);
        let right = address::right_child(leaf_index);
        let split = SplitNode::new(leaf_index, split_variable, rule)?;
        let left_leaf = LeafNode::new(left, left_value)?;
        let right_leaf = LeafNode::new(right, right_value)?;

        // The target is a leaf, so its child slots are empty and none of
        // these single-node edits can fail.
        self.remove(leaf_index)?;
        self.insert(leaf_index, Node::Split(split))?;
        self.insert(left, Node::Leaf(left_leaf))?;
        self.insert(right, Node::Leaf(right_leaf))?;
        Ok((left, right))
    }

    /// Prune edit: collapse the split node at `split_index`, whose
    /// children must both be leaves, back into a single leaf holding
    /// `leaf_value`.
    ///
    /// Validated up front, so a rejected edit leaves the tree untouched.
    pub fn prune(&mut self, split_index: NodeIndex, leaf_value: f64) -> Result<(), TreeError> {
        let left = address::left_child(split_index);
        let right = address::right_child(split_index);
        let both_children_leaves = self.leaf_indices.contains(&left) && self.leaf_indices.contains(&right);
        if self.get(split_index)?.is_leaf() || !both_children_leaves {
            return Err(TreeStructureError::NotPrunable(split_index).into());
        }
        let leaf = LeafNode::new(split_index, leaf_value)?;

        // The children are leaves, so their own child slots are empty
        // and none of these single-node edits can fail.
        self.remove(left)?;
        self.remove(right)?;
        self.remove(split_index)?;
        self.insert(split_index, Node::Leaf(leaf))?;
        Ok(())
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text())
    }
}
