//! bartree: regression tree structures for Bayesian Additive Regression
//! Trees (BART).
//!
//! A BART ensemble sums many shallow regression trees. This crate provides
//! the single-tree building block: a complete-binary-tree container whose
//! parent/child/sibling relationships come from integer index arithmetic
//! rather than pointers, with the structural invariants, traversal,
//! edit-legality, prior-probability, and rendering algorithms built on top.
//!
//! # Key Types
//!
//! - [`Tree`] - The tree container with insert/remove/predict
//! - [`Node`] / [`SplitNode`] / [`LeafNode`] - Node variants
//! - [`SplitRule`] - Quantitative or qualitative splitting rule
//! - [`TreeStructureError`] / [`NodeError`] - Rejection of invalid edits
//!
//! # Building a tree
//!
//! A tree starts as a single leaf at index 0 ([`Tree::init`]) and changes
//! shape through grow and prune edits. The container validates every edit
//! against its invariants; a rejected edit leaves the tree untouched, so a
//! sampler can treat errors as "propose something else".
//!
//! ```
//! use bartree::{SplitRule, Tree};
//!
//! let mut tree = Tree::init(0.0).unwrap();
//! tree.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0).unwrap();
//!
//! assert_eq!(tree.predict(&[0.3]), -1.0);
//! assert_eq!(tree.predict(&[0.7]), 1.0);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod error;
pub mod tree;

pub use error::{NodeError, TreeError, TreeStructureError};
pub use tree::digraph::{DigraphSink, DotWriter, NodeShape};
pub use tree::node::{LeafNode, Node, SplitKind, SplitNode, SplitRule};
pub use tree::sample::FeatureVector;
pub use tree::{NodeIndex, Tree};
