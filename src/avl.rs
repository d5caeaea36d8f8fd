//! A self-balancing BST (specifically, an AVL tree). Every node carries the
//! height of its subtree; whenever an insert or delete leaves some node's
//! subtree heights differing by two, a rotation (or a pair of rotations)
//! restores the balance. Searches, inserts, and deletes are all
//! `O(log n)`.
//!
//! # Examples
//!
//! ```
//! use forest::avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // A sorted insertion order would degrade a plain BST to a list;
//! // here rotations keep the height logarithmic.
//! for key in 1..=100 {
//!     tree.insert(key, key * 2).unwrap();
//! }
//!
//! assert_eq!(tree.search(&42), Ok(&84));
//! assert_eq!(tree.height(), 7);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::tree::{BinaryTree, NodeId};
use crate::TreeError;

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    /// Height of the subtree rooted here; a node with no children has
    /// height 1, an absent subtree height 0.
    height: usize,
}

/// A height-balanced Binary Search Tree mapping keys to data.
#[derive(Clone)]
pub struct Tree<K, V> {
    arena: Arena<Node<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: Ord + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(crate::traversal::in_order(self)).finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Generate a `Tree` seeded with a single entry.
    pub fn with_entry(key: K, value: V) -> Self {
        let mut tree = Self::new();
        let root = tree.arena.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            height: 1,
        });
        tree.root = Some(root);
        tree
    }

    /// The number of entries in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Finds the data associated with the given key.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if no node has the key.
    pub fn search(&self, key: &K) -> Result<&V, TreeError>
    where
        K: Ord,
    {
        self.locate(key)
            .map(|id| &self.arena.get(id).value)
            .ok_or(TreeError::KeyNotFound)
    }

    /// Inserts the given data into the tree stored at the given key, then
    /// rebalances. After an insertion a single rebalancing step at the
    /// lowest unbalanced ancestor restores balance globally, so the
    /// fix-up walk stops at the first rotation.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`] if the key is already present; the tree
    /// is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError>
    where
        K: Ord,
    {
        let mut parent = None;
        let mut current = self.root;
        while let Some(id) = current {
            parent = Some(id);
            current = match key.cmp(&self.arena.get(id).key) {
                Ordering::Less => self.arena.get(id).left,
                Ordering::Equal => return Err(TreeError::DuplicateKey),
                Ordering::Greater => self.arena.get(id).right,
            };
        }

        let node = self.arena.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            height: 1,
        });
        match parent {
            None => self.root = Some(node),
            Some(p) => {
                if self.arena.get(node).key < self.arena.get(p).key {
                    self.arena.get_mut(p).left = Some(node);
                } else {
                    self.arena.get_mut(p).right = Some(node);
                }
            }
        }

        // Walk toward the root recomputing heights; one rotation fixes
        // everything, so stop there.
        let mut current = parent;
        while let Some(id) = current {
            self.update_height(id);
            if self.balance_factor(id).abs() >= 2 {
                self.rebalance(id);
                break;
            }
            current = self.arena.get(id).parent;
        }
        Ok(())
    }

    /// Deletes the node containing the given key and returns its data,
    /// then rebalances. Unlike insertion, a deletion can unbalance
    /// several ancestors, so the fix-up walk continues to the root.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the key is absent; the tree is left
    /// unchanged.
    pub fn delete(&mut self, key: &K) -> Result<V, TreeError>
    where
        K: Ord,
    {
        let deleting = self.locate(key).ok_or(TreeError::KeyNotFound)?;

        let (left, right) = {
            let node = self.arena.get(deleting);
            (node.left, node.right)
        };
        // The lowest node whose subtree changed; heights are stale from
        // here upward.
        let fix_start;
        match (left, right) {
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                if self.arena.get(successor).parent == Some(deleting) {
                    fix_start = Some(successor);
                } else {
                    fix_start = self.arena.get(successor).parent;
                    let successor_right = self.arena.get(successor).right;
                    self.transplant(successor, successor_right);
                    self.arena.get_mut(successor).right = Some(right);
                    self.arena.get_mut(right).parent = Some(successor);
                }
                self.transplant(deleting, Some(successor));
                self.arena.get_mut(successor).left = Some(left);
                self.arena.get_mut(left).parent = Some(successor);
            }
            _ => {
                fix_start = self.arena.get(deleting).parent;
                self.transplant(deleting, left.or(right));
            }
        }

        let mut current = fix_start;
        while let Some(id) = current {
            self.update_height(id);
            current = if self.balance_factor(id).abs() >= 2 {
                let subroot = self.rebalance(id);
                self.arena.get(subroot).parent
            } else {
                self.arena.get(id).parent
            };
        }

        Ok(self.arena.remove(deleting).value)
    }

    /// The smallest entry in the tree.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree is empty.
    pub fn min(&self) -> Result<(&K, &V), TreeError> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let node = self.arena.get(self.leftmost(root));
        Ok((&node.key, &node.value))
    }

    /// The largest entry in the tree.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree is empty.
    pub fn max(&self) -> Result<(&K, &V), TreeError> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let node = self.arena.get(self.rightmost(root));
        Ok((&node.key, &node.value))
    }

    /// The node with the smallest key in the subtree rooted at `subtree`.
    pub fn leftmost(&self, subtree: NodeId) -> NodeId {
        let mut current = subtree;
        while let Some(left) = self.arena.get(current).left {
            current = left;
        }
        current
    }

    /// The node with the largest key in the subtree rooted at `subtree`.
    pub fn rightmost(&self, subtree: NodeId) -> NodeId {
        let mut current = subtree;
        while let Some(right) = self.arena.get(current).right {
            current = right;
        }
        current
    }

    /// The in-order successor of `node`, if it has one.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        if let Some(right) = self.arena.get(node).right {
            return Some(self.leftmost(right));
        }
        let mut current = node;
        let mut parent = self.arena.get(current).parent;
        while let Some(p) = parent {
            if self.arena.get(p).right != Some(current) {
                break;
            }
            current = p;
            parent = self.arena.get(p).parent;
        }
        parent
    }

    /// The in-order predecessor of `node`, if it has one.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        if let Some(left) = self.arena.get(node).left {
            return Some(self.rightmost(left));
        }
        let mut current = node;
        let mut parent = self.arena.get(current).parent;
        while let Some(p) = parent {
            if self.arena.get(p).left != Some(current) {
                break;
            }
            current = p;
            parent = self.arena.get(p).parent;
        }
        parent
    }

    /// The height of the tree, read from the root's stored height:
    /// 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Whether every node's subtree heights differ by at most one. Holds
    /// after every completed insert and delete.
    pub fn is_balanced(&self) -> bool
    where
        K: Ord,
    {
        crate::tools::check_balance(self)
    }

    fn locate(&self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        let mut current = self.root;
        while let Some(id) = current {
            current = match key.cmp(&self.arena.get(id).key) {
                Ordering::Less => self.arena.get(id).left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => self.arena.get(id).right,
            };
        }
        None
    }

    fn height_of(&self, node: Option<NodeId>) -> usize {
        node.map_or(0, |id| self.arena.get(id).height)
    }

    fn update_height(&mut self, id: NodeId) {
        let left = self.height_of(self.arena.get(id).left);
        let right = self.height_of(self.arena.get(id).right);
        self.arena.get_mut(id).height = left.max(right) + 1;
    }

    /// `height(left) - height(right)`; AVL requires this stays in
    /// `-1..=1` for every node.
    fn balance_factor(&self, id: NodeId) -> isize {
        let left = self.height_of(self.arena.get(id).left);
        let right = self.height_of(self.arena.get(id).right);
        left as isize - right as isize
    }

    /// Restores balance at `id`, which must have a balance factor of ±2.
    /// The four rotation cases are distinguished by which grandchild
    /// subtree is the tall one. Returns the node now rooting the subtree.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        if self.balance_factor(id) > 0 {
            let left = self.arena.get(id).left.expect("left-heavy node has a left child");
            if self.balance_factor(left) < 0 {
                // Left-right: the left child's right subtree is tall.
                self.rotate_left(left);
            }
            self.rotate_right(id)
        } else {
            let right = self.arena.get(id).right.expect("right-heavy node has a right child");
            if self.balance_factor(right) > 0 {
                // Right-left: the right child's left subtree is tall.
                self.rotate_right(right);
            }
            self.rotate_left(id)
        }
    }

    /// Rotate the subtree rooted at `node` to the left: its right child
    /// moves up, `node` moves down, and only those two nodes plus the
    /// child's old left subtree are re-linked. Returns the new subtree
    /// root.
    ///
    /// ```text
    ///    node                temp
    ///    /  \                /  \
    ///   x   temp    ->    node   z
    ///       /  \          /  \
    ///      y    z        x    y
    /// ```
    fn rotate_left(&mut self, node: NodeId) -> NodeId {
        let temp = self.arena.get(node).right.expect("rotate left requires a right child");
        let middle = self.arena.get(temp).left;

        self.arena.get_mut(node).right = middle;
        if let Some(m) = middle {
            self.arena.get_mut(m).parent = Some(node);
        }

        let parent = self.arena.get(node).parent;
        self.arena.get_mut(temp).parent = parent;
        match parent {
            None => self.root = Some(temp),
            Some(p) => {
                if self.arena.get(p).left == Some(node) {
                    self.arena.get_mut(p).left = Some(temp);
                } else {
                    self.arena.get_mut(p).right = Some(temp);
                }
            }
        }

        self.arena.get_mut(temp).left = Some(node);
        self.arena.get_mut(node).parent = Some(temp);

        self.update_height(node);
        self.update_height(temp);
        temp
    }

    /// Mirror image of [`Self::rotate_left`].
    fn rotate_right(&mut self, node: NodeId) -> NodeId {
        let temp = self.arena.get(node).left.expect("rotate right requires a left child");
        let middle = self.arena.get(temp).right;

        self.arena.get_mut(node).left = middle;
        if let Some(m) = middle {
            self.arena.get_mut(m).parent = Some(node);
        }

        let parent = self.arena.get(node).parent;
        self.arena.get_mut(temp).parent = parent;
        match parent {
            None => self.root = Some(temp),
            Some(p) => {
                if self.arena.get(p).right == Some(node) {
                    self.arena.get_mut(p).right = Some(temp);
                } else {
                    self.arena.get_mut(p).left = Some(temp);
                }
            }
        }

        self.arena.get_mut(temp).right = Some(node);
        self.arena.get_mut(node).parent = Some(temp);

        self.update_height(node);
        self.update_height(temp);
        temp
    }

    /// Replaces the subtree rooted at `deleting` with the subtree rooted
    /// at `replacement` in `deleting`'s parent's child slot.
    fn transplant(&mut self, deleting: NodeId, replacement: Option<NodeId>) {
        let parent = self.arena.get(deleting).parent;
        match parent {
            None => self.root = replacement,
            Some(p) => {
                if self.arena.get(p).left == Some(deleting) {
                    self.arena.get_mut(p).left = replacement;
                } else {
                    self.arena.get_mut(p).right = replacement;
                }
            }
        }
        if let Some(r) = replacement {
            self.arena.get_mut(r).parent = parent;
        }
    }
}

impl<K: Ord, V> BinaryTree for Tree<K, V> {
    type Key = K;
    type Value = V;

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn key(&self, node: NodeId) -> &K {
        &self.arena.get(node).key
    }

    fn value(&self, node: NodeId) -> &V {
        &self.arena.get(node).value
    }

    fn left(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).left
    }

    fn right(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).right
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::{do_ops, Op};

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = Tree::new();
            let mut map = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut map, Tree::insert, Tree::delete);
            map.keys().all(|key| tree.search(key).ok() == map.get(key))
                && crate::tools::verify_bst_property(&tree)
                && crate::tools::check_balance(&tree)
        }
    }

    quickcheck::quickcheck! {
        fn contains(xs: Vec<i8>) -> bool {
            let mut tree = Tree::new();
            for x in &xs {
                let _ = tree.insert(*x, *x);
            }

            xs.iter().all(|x| tree.search(x) == Ok(x))
        }
    }
}
