//! Validation helpers that read a tree through [`BinaryTree`] and never
//! mutate it.

use crate::traversal;
use crate::tree::{BinaryTree, NodeId};

/// Checks the BST property by running an in-order traversal and
/// confirming the emitted keys never decrease.
///
/// # Examples
///
/// ```
/// use forest::bst::Tree;
/// use forest::tools;
///
/// let mut tree = Tree::new();
/// for key in [2, 1, 3] {
///     tree.insert(key, ()).unwrap();
/// }
/// assert!(tools::verify_bst_property(&tree));
/// ```
pub fn verify_bst_property<T: BinaryTree>(tree: &T) -> bool {
    let mut previous: Option<&T::Key> = None;
    for (key, _) in traversal::in_order(tree) {
        if let Some(prev) = previous {
            if prev > key {
                return false;
            }
        }
        previous = Some(key);
    }
    true
}

/// Checks that at every node the left and right subtree heights differ
/// by at most one.
pub fn check_balance<T: BinaryTree>(tree: &T) -> bool {
    balanced_height(tree, tree.root()).is_some()
}

/// The height of `node`'s subtree, or `None` if any node below it is
/// unbalanced. Folding the two checks together keeps this a single pass.
fn balanced_height<T: BinaryTree>(tree: &T, node: Option<NodeId>) -> Option<usize> {
    match node {
        None => Some(0),
        Some(id) => {
            let left = balanced_height(tree, tree.left(id))?;
            let right = balanced_height(tree, tree.right(id))?;
            if left.abs_diff(right) > 1 {
                None
            } else {
                Some(left.max(right) + 1)
            }
        }
    }
}
