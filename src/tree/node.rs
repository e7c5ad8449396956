//! Tree node variants.
//!
//! A node is either a [`SplitNode`] carrying a decision rule over one
//! feature, or a [`LeafNode`] carrying a scalar prediction. Every
//! algorithm that branches on node kind matches exhaustively over the
//! closed [`Node`] enum.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::NodeError;

use super::sample::FeatureVector;
use super::{address, NodeIndex};

/// Kind of splitting variable. Display-only alongside [`SplitRule`]:
/// the rule itself already carries the kind-specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// Ordered numeric feature, compared against a threshold.
    Quantitative,
    /// Discrete feature, tested for membership in a category set.
    Qualitative,
}

/// Splitting rule over one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitRule {
    /// Rule is true when `x[var] <= threshold`.
    Quantitative(f64),
    /// Rule is true when `x[var]` is one of the categories.
    Qualitative(BTreeSet<u32>),
}

impl SplitRule {
    /// The kind of variable this rule splits on.
    pub fn kind(&self) -> SplitKind {
        match self {
            SplitRule::Quantitative(_) => SplitKind::Quantitative,
            SplitRule::Qualitative(_) => SplitKind::Qualitative,
        }
    }

    /// Display operator: `<=` for quantitative rules, `in` for
    /// qualitative ones.
    pub fn operator(&self) -> &'static str {
        match self {
            SplitRule::Quantitative(_) => "<=",
            SplitRule::Qualitative(_) => "in",
        }
    }

    fn validate(&self) -> Result<(), NodeError> {
        match self {
            SplitRule::Quantitative(threshold) => {
                if !threshold.is_finite() {
                    return Err(NodeError::NonFiniteSplitValue(*threshold));
                }
            }
            SplitRule::Qualitative(categories) => {
                if categories.is_empty() {
                    return Err(NodeError::EmptyCategorySet);
                }
            }
        }
        Ok(())
    }
}

/// Convert a feature value to a category index.
///
/// Qualitative features are stored as floats in the feature vector but
/// compared as integer categories. Values that cannot name a category
/// (NaN, negative, fractional, or too large) return `None` and are
/// treated as "not in the set" during evaluation.
#[inline]
pub fn float_to_category(value: f64) -> Option<u32> {
    if value.is_nan() || value < 0.0 || value != value.trunc() || value > u32::MAX as f64 {
        None
    } else {
        Some(value as u32)
    }
}

/// Internal node holding a decision rule over one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    index: NodeIndex,
    split_variable: usize,
    rule: SplitRule,
}

impl SplitNode {
    /// Create a split node at `index`, splitting on feature
    /// `split_variable` with the given rule.
    pub fn new(index: NodeIndex, split_variable: usize, rule: SplitRule) -> Result<Self, NodeError> {
        rule.validate()?;
        Ok(Self {
            index,
            split_variable,
            rule,
        })
    }

    /// Position of this node in the implicit layout.
    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Depth, recomputed from the index.
    #[inline]
    pub fn depth(&self) -> usize {
        address::depth(self.index)
    }

    /// Feature index this node splits on.
    #[inline]
    pub fn split_variable(&self) -> usize {
        self.split_variable
    }

    /// The splitting rule.
    #[inline]
    pub fn rule(&self) -> &SplitRule {
        &self.rule
    }

    /// Evaluate the splitting rule against a feature vector.
    ///
    /// Returns true when the sample descends to the left child.
    ///
    /// # Panics
    ///
    /// Panics if `x` has fewer than `split_variable + 1` features.
    pub fn evaluate<X: FeatureVector + ?Sized>(&self, x: &X) -> bool {
        let value = x.feature(self.split_variable);
        match &self.rule {
            SplitRule::Quantitative(threshold) => value <= *threshold,
            SplitRule::Qualitative(categories) => {
                float_to_category(value).is_some_and(|c| categories.contains(&c))
            }
        }
    }

    /// Prior probability, under the BART tree prior, that this node is
    /// split: `alpha * (1 + depth)^-beta`.
    pub fn prior_probability(&self, alpha: f64, beta: f64) -> f64 {
        alpha * (1.0 + self.depth() as f64).powf(-beta)
    }
}

impl fmt::Display for SplitNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x[{}] {} ", self.split_variable, self.rule.operator())?;
        match &self.rule {
            SplitRule::Quantitative(threshold) => write!(f, "{threshold:?}"),
            SplitRule::Qualitative(categories) => {
                write!(f, "{{")?;
                for (i, category) in categories.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{category}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Terminal node holding a scalar prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafNode {
    index: NodeIndex,
    value: f64,
}

impl LeafNode {
    /// Create a leaf node at `index` with the given prediction value.
    pub fn new(index: NodeIndex, value: f64) -> Result<Self, NodeError> {
        if !value.is_finite() {
            return Err(NodeError::NonFiniteLeafValue(value));
        }
        Ok(Self { index, value })
    }

    /// Position of this node in the implicit layout.
    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Depth, recomputed from the index.
    #[inline]
    pub fn depth(&self) -> usize {
        address::depth(self.index)
    }

    /// The prediction value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Prior probability, under the BART tree prior, that this branch
    /// terminated here: `1 - alpha * (1 + depth)^-beta`.
    pub fn prior_probability(&self, alpha: f64, beta: f64) -> f64 {
        1.0 - alpha * (1.0 + self.depth() as f64).powf(-beta)
    }
}

impl fmt::Display for LeafNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

/// A node in a BART regression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Internal split node
    Split(SplitNode),
    /// Leaf node with a prediction value
    Leaf(LeafNode),
}

impl Node {
    /// Create a new split node.
    pub fn split(index: NodeIndex, split_variable: usize, rule: SplitRule) -> Result<Self, NodeError> {
        SplitNode::new(index, split_variable, rule).map(Self::Split)
    }

    /// Create a new leaf node.
    pub fn leaf(index: NodeIndex, value: f64) -> Result<Self, NodeError> {
        LeafNode::new(index, value).map(Self::Leaf)
    }

    /// Position of this node in the implicit layout.
    #[inline]
    pub fn index(&self) -> NodeIndex {
        match self {
            Node::Split(split) => split.index(),
            Node::Leaf(leaf) => leaf.index(),
        }
    }

    /// Depth, recomputed from the index.
    #[inline]
    pub fn depth(&self) -> usize {
        address::depth(self.index())
    }

    /// Returns true if this is a leaf node.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Get the split node, if this is one.
    #[inline]
    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Node::Split(split) => Some(split),
            Node::Leaf(_) => None,
        }
    }

    /// Get the leaf node, if this is one.
    #[inline]
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Split(_) => None,
            Node::Leaf(leaf) => Some(leaf),
        }
    }

    /// Index of this node's parent.
    ///
    /// Must not be called on the root.
    #[inline]
    pub fn parent_index(&self) -> NodeIndex {
        address::parent(self.index())
    }

    /// Index of this node's left child slot.
    #[inline]
    pub fn left_child_index(&self) -> NodeIndex {
        address::left_child(self.index())
    }

    /// Index of this node's right child slot.
    #[inline]
    pub fn right_child_index(&self) -> NodeIndex {
        address::right_child(self.index())
    }

    /// Whether this node is a left child.
    #[inline]
    pub fn is_left_child(&self) -> bool {
        address::is_left_child(self.index())
    }

    /// Index of this node's sibling.
    ///
    /// Must not be called on the root.
    #[inline]
    pub fn sibling_index(&self) -> NodeIndex {
        address::sibling(self.index())
    }

    /// Per-node term of the BART tree prior.
    pub fn prior_probability(&self, alpha: f64, beta: f64) -> f64 {
        match self {
            Node::Split(split) => split.prior_probability(alpha, beta),
            Node::Leaf(leaf) => leaf.prior_probability(alpha, beta),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Split(split) => split.fmt(f),
            Node::Leaf(leaf) => leaf.fmt(f),
        }
    }
}
