//! Traversal routines over any [`BinaryTree`].
//!
//! Each depth-first order comes in two forms that emit identical
//! sequences: a lazy iterator driven by an explicit stack (the primary
//! form, safe for pathologically deep trees and cheap to abandon early)
//! and a naturally-recursive reference form that materializes its output.
//! Level-order is a queue-driven iterator.
//!
//! # Examples
//!
//! ```
//! use forest::bst::Tree;
//! use forest::traversal;
//!
//! let mut tree = Tree::new();
//! for key in [2, 1, 3] {
//!     tree.insert(key, key * 10).unwrap();
//! }
//!
//! let keys: Vec<i32> = traversal::in_order(&tree).map(|(k, _)| *k).collect();
//! assert_eq!(keys, [1, 2, 3]);
//!
//! let keys: Vec<i32> = traversal::pre_order(&tree).map(|(k, _)| *k).collect();
//! assert_eq!(keys, [2, 1, 3]);
//! ```

use std::collections::VecDeque;

use crate::tree::{BinaryTree, NodeId};

/// A (key, data) pair borrowed from a tree.
pub type Pair<'a, T> = (&'a <T as BinaryTree>::Key, &'a <T as BinaryTree>::Value);

/// In-order traversal (left subtree, node, right subtree): keys come out
/// in ascending order.
pub fn in_order<T: BinaryTree>(tree: &T) -> InOrder<'_, T> {
    InOrder {
        tree,
        stack: Vec::new(),
        current: tree.root(),
    }
}

/// Reverse in-order ("out-order") traversal (right subtree, node, left
/// subtree): keys come out in descending order.
pub fn out_order<T: BinaryTree>(tree: &T) -> OutOrder<'_, T> {
    OutOrder {
        tree,
        stack: Vec::new(),
        current: tree.root(),
    }
}

/// Pre-order traversal (node, left subtree, right subtree).
pub fn pre_order<T: BinaryTree>(tree: &T) -> PreOrder<'_, T> {
    PreOrder {
        tree,
        stack: tree.root().into_iter().collect(),
    }
}

/// Post-order traversal (left subtree, right subtree, node).
pub fn post_order<T: BinaryTree>(tree: &T) -> PostOrder<'_, T> {
    PostOrder {
        tree,
        stack: Vec::new(),
        current: tree.root(),
        last_emitted: None,
    }
}

/// Level-order (breadth-first) traversal: each level left to right,
/// starting at the root.
pub fn level_order<T: BinaryTree>(tree: &T) -> LevelOrder<'_, T> {
    LevelOrder {
        tree,
        queue: tree.root().into_iter().collect(),
    }
}

/// Recursive form of [`in_order`]; emits the identical sequence.
pub fn in_order_recursive<T: BinaryTree>(tree: &T) -> Vec<Pair<'_, T>> {
    fn walk<'a, T: BinaryTree>(tree: &'a T, node: Option<NodeId>, out: &mut Vec<Pair<'a, T>>) {
        if let Some(id) = node {
            walk(tree, tree.left(id), out);
            out.push((tree.key(id), tree.value(id)));
            walk(tree, tree.right(id), out);
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), &mut out);
    out
}

/// Recursive form of [`out_order`]; emits the identical sequence.
pub fn out_order_recursive<T: BinaryTree>(tree: &T) -> Vec<Pair<'_, T>> {
    fn walk<'a, T: BinaryTree>(tree: &'a T, node: Option<NodeId>, out: &mut Vec<Pair<'a, T>>) {
        if let Some(id) = node {
            walk(tree, tree.right(id), out);
            out.push((tree.key(id), tree.value(id)));
            walk(tree, tree.left(id), out);
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), &mut out);
    out
}

/// Recursive form of [`pre_order`]; emits the identical sequence.
pub fn pre_order_recursive<T: BinaryTree>(tree: &T) -> Vec<Pair<'_, T>> {
    fn walk<'a, T: BinaryTree>(tree: &'a T, node: Option<NodeId>, out: &mut Vec<Pair<'a, T>>) {
        if let Some(id) = node {
            out.push((tree.key(id), tree.value(id)));
            walk(tree, tree.left(id), out);
            walk(tree, tree.right(id), out);
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), &mut out);
    out
}

/// Recursive form of [`post_order`]; emits the identical sequence.
pub fn post_order_recursive<T: BinaryTree>(tree: &T) -> Vec<Pair<'_, T>> {
    fn walk<'a, T: BinaryTree>(tree: &'a T, node: Option<NodeId>, out: &mut Vec<Pair<'a, T>>) {
        if let Some(id) = node {
            walk(tree, tree.left(id), out);
            walk(tree, tree.right(id), out);
            out.push((tree.key(id), tree.value(id)));
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), &mut out);
    out
}

/// Lazy in-order iterator. See [`in_order`].
pub struct InOrder<'a, T: BinaryTree> {
    tree: &'a T,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T: BinaryTree> Iterator for InOrder<'a, T> {
    type Item = Pair<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.left(id);
        }
        let id = self.stack.pop()?;
        self.current = self.tree.right(id);
        Some((self.tree.key(id), self.tree.value(id)))
    }
}

/// Lazy reverse in-order iterator. See [`out_order`].
pub struct OutOrder<'a, T: BinaryTree> {
    tree: &'a T,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T: BinaryTree> Iterator for OutOrder<'a, T> {
    type Item = Pair<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.right(id);
        }
        let id = self.stack.pop()?;
        self.current = self.tree.left(id);
        Some((self.tree.key(id), self.tree.value(id)))
    }
}

/// Lazy pre-order iterator. See [`pre_order`].
pub struct PreOrder<'a, T: BinaryTree> {
    tree: &'a T,
    stack: Vec<NodeId>,
}

impl<'a, T: BinaryTree> Iterator for PreOrder<'a, T> {
    type Item = Pair<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // The stack is LIFO, so push the right child first to visit the
        // left subtree first.
        if let Some(right) = self.tree.right(id) {
            self.stack.push(right);
        }
        if let Some(left) = self.tree.left(id) {
            self.stack.push(left);
        }
        Some((self.tree.key(id), self.tree.value(id)))
    }
}

/// Lazy post-order iterator. See [`post_order`].
pub struct PostOrder<'a, T: BinaryTree> {
    tree: &'a T,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
    last_emitted: Option<NodeId>,
}

impl<'a, T: BinaryTree> Iterator for PostOrder<'a, T> {
    type Item = Pair<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(id) = self.current {
                self.stack.push(id);
                self.current = self.tree.left(id);
            }
            let id = *self.stack.last()?;
            // A node is emitted only once its right subtree has been; the
            // last emitted node tells us whether we are on the way down or
            // back up.
            match self.tree.right(id) {
                Some(right) if self.last_emitted != Some(right) => {
                    self.current = Some(right);
                }
                _ => {
                    self.stack.pop();
                    self.last_emitted = Some(id);
                    return Some((self.tree.key(id), self.tree.value(id)));
                }
            }
        }
    }
}

/// Lazy level-order iterator. See [`level_order`].
pub struct LevelOrder<'a, T: BinaryTree> {
    tree: &'a T,
    queue: VecDeque<NodeId>,
}

impl<'a, T: BinaryTree> Iterator for LevelOrder<'a, T> {
    type Item = Pair<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        if let Some(left) = self.tree.left(id) {
            self.queue.push_back(left);
        }
        if let Some(right) = self.tree.right(id) {
            self.queue.push_back(right);
        }
        Some((self.tree.key(id), self.tree.value(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::Tree;

    fn basic_tree() -> Tree<i32, String> {
        let mut tree = Tree::new();
        for key in [23, 4, 30, 11, 7, 34, 20, 24, 22, 15, 1] {
            tree.insert(key, key.to_string()).unwrap();
        }
        tree
    }

    fn keys<'a>(pairs: impl IntoIterator<Item = (&'a i32, &'a String)>) -> Vec<i32> {
        pairs.into_iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn in_order_is_sorted() {
        let tree = basic_tree();
        assert_eq!(
            keys(in_order(&tree)),
            [1, 4, 7, 11, 15, 20, 22, 23, 24, 30, 34]
        );
    }

    #[test]
    fn out_order_is_reverse_sorted() {
        let tree = basic_tree();
        assert_eq!(
            keys(out_order(&tree)),
            [34, 30, 24, 23, 22, 20, 15, 11, 7, 4, 1]
        );
    }

    #[test]
    fn pre_order_visits_parents_first() {
        let tree = basic_tree();
        assert_eq!(
            keys(pre_order(&tree)),
            [23, 4, 1, 11, 7, 20, 15, 22, 30, 24, 34]
        );
    }

    #[test]
    fn post_order_visits_parents_last() {
        let tree = basic_tree();
        assert_eq!(
            keys(post_order(&tree)),
            [1, 7, 15, 22, 20, 11, 4, 24, 34, 30, 23]
        );
    }

    #[test]
    fn level_order_goes_breadth_first() {
        let tree = basic_tree();
        assert_eq!(
            keys(level_order(&tree)),
            [23, 4, 30, 1, 11, 24, 34, 7, 20, 15, 22]
        );
    }

    #[test]
    fn traversals_are_restartable() {
        let tree = basic_tree();
        let first = keys(in_order(&tree));
        let second = keys(in_order(&tree));
        assert_eq!(first, second);
    }

    #[test]
    fn early_exit_is_cheap_and_correct() {
        let tree = basic_tree();
        let first_three: Vec<i32> = in_order(&tree).take(3).map(|(k, _)| *k).collect();
        assert_eq!(first_three, [1, 4, 7]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: Tree<i32, String> = Tree::new();
        assert!(in_order(&tree).next().is_none());
        assert!(out_order(&tree).next().is_none());
        assert!(pre_order(&tree).next().is_none());
        assert!(post_order(&tree).next().is_none());
        assert!(level_order(&tree).next().is_none());
        assert!(in_order_recursive(&tree).is_empty());
        assert!(post_order_recursive(&tree).is_empty());
    }
}
