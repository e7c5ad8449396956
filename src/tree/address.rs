//! Index arithmetic for the implicit complete-binary-tree layout.
//!
//! All functions are pure and exact for indices up to at least `2^31`.
//! Depth is computed with integer bit-length rather than floating-point
//! `log2`, which would round the wrong way near powers of two.

use super::NodeIndex;

/// Parent index of `index`.
///
/// Must not be called on the root (index 0), which has no parent.
#[inline]
pub fn parent(index: NodeIndex) -> NodeIndex {
    debug_assert!(index > 0, "the root node has no parent");
    (index - 1) / 2
}

/// Left child index of `index`.
#[inline]
pub fn left_child(index: NodeIndex) -> NodeIndex {
    index * 2 + 1
}

/// Right child index of `index`.
#[inline]
pub fn right_child(index: NodeIndex) -> NodeIndex {
    left_child(index) + 1
}

/// Whether `index` is a left child. Left children land on odd indices
/// in this layout.
#[inline]
pub fn is_left_child(index: NodeIndex) -> bool {
    index % 2 == 1
}

/// Sibling index of `index`.
///
/// Must not be called on the root (index 0), which has no sibling.
#[inline]
pub fn sibling(index: NodeIndex) -> NodeIndex {
    debug_assert!(index > 0, "the root node has no sibling");
    if is_left_child(index) {
        index + 1
    } else {
        index - 1
    }
}

/// Depth of `index`: 0 for the root, 1 for indices 1-2, and so on.
#[inline]
pub fn depth(index: NodeIndex) -> usize {
    (index + 1).ilog2() as usize
}
