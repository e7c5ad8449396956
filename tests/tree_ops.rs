//! End-to-end tests for tree construction, structural edits, prediction,
//! and structure queries through the public API.
//!
//! The edit sequences here mirror what a BART sampler performs: grow a
//! leaf into a split with two leaf children, prune a split whose children
//! are both leaves, and treat every rejected edit as "propose another".

use approx::assert_relative_eq;
use bartree::{Node, SplitRule, Tree, TreeError, TreeStructureError};
use ndarray::array;
use rstest::rstest;

/// A root split on x[0] <= 0.5 built from raw single-node edits, the way
/// a sampler composes a grow.
#[test]
fn grow_by_raw_edits_then_predict() {
    let mut tree = Tree::init(0.0).unwrap();

    tree.remove(0).unwrap();
    tree.insert(0, Node::split(0, 0, SplitRule::Quantitative(0.5)).unwrap())
        .unwrap();
    tree.insert(1, Node::leaf(1, -1.0).unwrap()).unwrap();
    tree.insert(2, Node::leaf(2, 1.0).unwrap()).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.predict(&[0.3]), -1.0);
    assert_eq!(tree.predict(&[0.7]), 1.0);
}

#[test]
fn edit_ordering_violations_are_rejected() {
    let mut tree = Tree::init(0.0).unwrap();

    // Child before its parent is a split node.
    assert!(matches!(
        tree.insert(1, Node::leaf(1, 0.0).unwrap()),
        Err(TreeStructureError::LeafParent { .. })
    ));
    // Grandchild before parent exists at all.
    assert!(matches!(
        tree.insert(4, Node::leaf(4, 0.0).unwrap()),
        Err(TreeStructureError::MissingParent { .. })
    ));
    // Same index twice.
    assert!(matches!(
        tree.insert(0, Node::leaf(0, 0.0).unwrap()),
        Err(TreeStructureError::DuplicateIndex(0))
    ));

    // A rejected edit has no effect.
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.predict(&[0.0]), 0.0);
}

#[test]
fn removing_a_split_with_children_is_rejected() {
    let mut tree = Tree::init(0.0).unwrap();
    tree.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0)
        .unwrap();

    assert!(matches!(
        tree.remove(0),
        Err(TreeStructureError::OrphanedChild { index: 0, .. })
    ));
    assert_eq!(tree.len(), 3);
}

#[test]
fn grow_then_prune_restores_the_initial_shape() {
    let mut tree = Tree::init(1.25).unwrap();
    tree.grow(0, 2, SplitRule::Quantitative(-0.5), -1.0, 1.0)
        .unwrap();
    assert_eq!(tree.len(), 3);

    tree.prune(0, 1.25).unwrap();
    assert!(tree.structurally_eq(&Tree::init(1.25).unwrap()));
}

#[test]
fn prunable_parents_follow_the_frontier() {
    let mut tree = Tree::init(0.0).unwrap();
    assert!(tree.prunable_parents().is_empty());

    tree.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0)
        .unwrap();
    assert_eq!(
        tree.prunable_parents().into_iter().collect::<Vec<_>>(),
        [0]
    );

    tree.grow(1, 1, SplitRule::Quantitative(0.0), -2.0, -0.5)
        .unwrap();
    assert_eq!(
        tree.prunable_parents().into_iter().collect::<Vec<_>>(),
        [1]
    );

    // The sampler consults the prunable set before attempting the edit.
    assert!(matches!(
        tree.prune(0, 0.0),
        Err(TreeError::Structure(TreeStructureError::NotPrunable(0)))
    ));
}

#[rstest]
#[case(0.95, 2.0)]
#[case(0.5, 1.0)]
#[case(0.99, 3.0)]
fn prior_probability_of_single_leaf(#[case] alpha: f64, #[case] beta: f64) {
    let tree = Tree::init(0.0).unwrap();
    assert_relative_eq!(tree.prior_probability(alpha, beta), 1.0 - alpha);
}

#[test]
fn prior_probability_of_grown_tree() {
    let mut tree = Tree::init(0.0).unwrap();
    tree.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0)
        .unwrap();
    tree.grow(1, 1, SplitRule::Quantitative(0.0), -2.0, -0.5)
        .unwrap();

    // Nodes: splits at depths 0 and 1, leaves at depths 1 and 2 (x2).
    let alpha = 0.95;
    let beta = 2.0;
    let p_split = |depth: f64| alpha * (1.0 + depth).powf(-beta);
    let expected = p_split(0.0)
        * p_split(1.0)
        * (1.0 - p_split(1.0))
        * (1.0 - p_split(2.0))
        * (1.0 - p_split(2.0));
    assert_relative_eq!(
        tree.prior_probability(alpha, beta),
        expected,
        max_relative = 1e-12
    );
}

#[test]
fn prediction_is_deterministic_across_queries() {
    let mut tree = Tree::init(0.0).unwrap();
    tree.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0)
        .unwrap();

    let before = tree.predict(&[0.49]);
    tree.prunable_parents();
    tree.prior_probability(0.95, 2.0);
    tree.render_text();
    assert_eq!(tree.predict(&[0.49]), before);
}

#[test]
fn qualitative_and_quantitative_splits_combine() {
    let mut tree = Tree::init(0.0).unwrap();
    tree.grow(0, 0, SplitRule::Quantitative(0.5), 0.0, 0.0)
        .unwrap();
    let colors = [2u32, 5].into_iter().collect();
    tree.grow(1, 1, SplitRule::Qualitative(colors), 10.0, 20.0)
        .unwrap();

    // x[0] <= 0.5 and x[1] in {2, 5}
    assert_eq!(tree.predict(&[0.2, 2.0]), 10.0);
    // x[0] <= 0.5 and x[1] not in {2, 5}
    assert_eq!(tree.predict(&[0.2, 3.0]), 20.0);
    // x[0] > 0.5
    assert_eq!(tree.predict(&[0.8, 2.0]), 0.0);
}

#[test]
fn batch_prediction_matches_row_prediction() {
    let mut tree = Tree::init(0.0).unwrap();
    tree.grow(0, 1, SplitRule::Quantitative(0.0), -3.0, 3.0)
        .unwrap();

    let features = array![[9.0, -1.0], [9.0, 1.0], [9.0, 0.0]];
    let batch = tree.predict_batch(features.view());

    for (row, &prediction) in features.rows().into_iter().zip(batch.iter()) {
        assert_eq!(tree.predict(&row), prediction);
    }
    assert_eq!(batch, array![-3.0, 3.0, -3.0]);
}

#[test]
fn structural_equality_is_shape_and_values() {
    let mut a = Tree::init(0.0).unwrap();
    a.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0).unwrap();

    let mut b = Tree::init(0.0).unwrap();
    b.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0).unwrap();
    assert!(a.structurally_eq(&b));

    let mut c = Tree::init(0.0).unwrap();
    c.grow(0, 0, SplitRule::Quantitative(0.6), -1.0, 1.0).unwrap();
    assert!(!a.structurally_eq(&c));
}
