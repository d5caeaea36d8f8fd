//! BSTs whose unused child slots are repurposed as "threads".
//!
//! In an ordinary BST roughly half of all child pointers are empty. A
//! threaded tree reuses them: a node with no right child stores a thread
//! to its in-order successor, and/or a node with no left child stores a
//! thread to its in-order predecessor. An ordered walk then needs
//! neither recursion nor an explicit stack, just pointer chasing.
//!
//! Three variants are provided:
//!
//! - [`RightThreaded`]: successor threads only; stackless [in-order]
//!   traversal.
//! - [`LeftThreaded`]: predecessor threads only; stackless [out-order]
//!   (reverse in-order) traversal.
//! - [`DoubleThreaded`]: both; stackless traversal in either direction.
//!
//! Each node carries a flag per threaded side so a thread is never
//! mistaken for a child. The [`BinaryTree`] impls expose structural
//! children only, so the stack-based routines in [`crate::traversal`]
//! and the checkers in [`crate::tools`] also work on these trees and
//! agree with the stackless walks.
//!
//! [in-order]: RightThreaded::in_order
//! [out-order]: LeftThreaded::out_order
//!
//! # Examples
//!
//! ```
//! use forest::threaded::RightThreaded;
//!
//! let mut tree = RightThreaded::new();
//! for key in [23, 4, 30, 11, 7, 34, 20, 24, 22, 15, 1] {
//!     tree.insert(key, key.to_string())?;
//! }
//!
//! let keys: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
//! assert_eq!(keys, [1, 4, 7, 11, 15, 20, 22, 23, 24, 30, 34]);
//! # Ok::<(), forest::TreeError>(())
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::tree::{BinaryTree, NodeId};
use crate::TreeError;

#[derive(Clone)]
struct RightNode<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    /// A child when `right_thread` is unset, otherwise a thread to the
    /// in-order successor (`None` only for the last node).
    right: Option<NodeId>,
    parent: Option<NodeId>,
    right_thread: bool,
}

/// A BST storing a thread to each node's in-order successor wherever the
/// node has no right child.
#[derive(Clone)]
pub struct RightThreaded<K, V> {
    arena: Arena<RightNode<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for RightThreaded<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RightThreaded<K, V> {
    /// Generate a new, empty tree.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Generate a tree seeded with a single entry.
    pub fn with_entry(key: K, value: V) -> Self {
        let mut tree = Self::new();
        let root = tree.arena.insert(RightNode {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            right_thread: true,
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

    /// Inserts the given data into the tree stored at the given key.
    ///
    /// A node inserted as a left child threads to its parent (its
    /// successor); a node inserted as a right child inherits its
    /// parent's old thread and becomes the parent's child.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`] if the key is already present; the
    /// tree is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError>
    where
        K: Ord,
    {
        let Some(mut current) = self.root else {
            *self = Self::with_entry(key, value);
            return Ok(());
        };
        loop {
            match key.cmp(&self.arena.get(current).key) {
                Ordering::Less => match self.arena.get(current).left {
                    Some(left) => current = left,
                    None => {
                        let node = self.arena.insert(RightNode {
                            key,
                            value,
                            left: None,
                            right: Some(current),
                            parent: Some(current),
                            right_thread: true,
                        });
                        self.arena.get_mut(current).left = Some(node);
                        return Ok(());
                    }
                },
                Ordering::Equal => return Err(TreeError::DuplicateKey),
                Ordering::Greater => {
                    if self.arena.get(current).right_thread {
                        let thread = self.arena.get(current).right;
                        let node = self.arena.insert(RightNode {
                            key,
                            value,
                            left: None,
                            right: thread,
                            parent: Some(current),
                            right_thread: true,
                        });
                        let parent = self.arena.get_mut(current);
                        parent.right = Some(node);
                        parent.right_thread = false;
                        return Ok(());
                    }
                    current = self.arena.get(current).right.expect("structural right child");
                }
            }
        }
    }

    /// Deletes the node containing the given key and returns its data.
    ///
    /// Besides the usual BST restructuring, any thread that pointed at
    /// the removed node is repointed at the node that takes its place in
    /// the ordering.
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
            (node.left, (!node.right_thread).then_some(node.right))
        };
        let right = right.map(|r| r.expect("structural right child"));

        match (left, right) {
            (None, None) => match self.arena.get(deleting).parent {
                None => self.root = None,
                Some(p) => {
                    if self.arena.get(p).left == Some(deleting) {
                        self.arena.get_mut(p).left = None;
                    } else {
                        // The parent's slot inherits the removed node's
                        // thread.
                        let thread = self.arena.get(deleting).right;
                        let parent = self.arena.get_mut(p);
                        parent.right = thread;
                        parent.right_thread = true;
                    }
                }
            },
            (None, Some(right)) => self.transplant(deleting, right),
            (Some(left), None) => {
                // The predecessor's thread skips over the removed node.
                let pred = self.rightmost(left);
                self.arena.get_mut(pred).right = self.arena.get(deleting).right;
                self.transplant(deleting, left);
            }
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                let pred = self.rightmost(left);
                self.arena.get_mut(pred).right = Some(successor);
                if self.arena.get(successor).parent != Some(deleting) {
                    let sp = self
                        .arena
                        .get(successor)
                        .parent
                        .expect("deep successor has a parent");
                    if self.arena.get(successor).right_thread {
                        self.arena.get_mut(sp).left = None;
                    } else {
                        let child = self
                            .arena
                            .get(successor)
                            .right
                            .expect("structural right child");
                        self.arena.get_mut(sp).left = Some(child);
                        self.arena.get_mut(child).parent = Some(sp);
                    }
                    let s = self.arena.get_mut(successor);
                    s.right = Some(right);
                    s.right_thread = false;
                    self.arena.get_mut(right).parent = Some(successor);
                }
                self.arena.get_mut(successor).left = Some(left);
                self.arena.get_mut(left).parent = Some(successor);
                self.transplant(deleting, successor);
            }
        }
        Ok(self.arena.remove(deleting).value)
    }

    /// Visits every entry in ascending key order without a stack, by
    /// following right children and threads.
    pub fn in_order(&self) -> ThreadedInOrder<'_, K, V> {
        ThreadedInOrder {
            tree: self,
            next: self.root.map(|root| self.leftmost(root)),
        }
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
        while !self.arena.get(current).right_thread {
            current = self.arena.get(current).right.expect("structural right child");
        }
        current
    }

    /// The in-order successor of `node`, if it has one. Follows the
    /// thread when the node has no right child.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.right_thread {
            n.right
        } else {
            Some(self.leftmost(n.right.expect("structural right child")))
        }
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

    /// The height of the tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize
    where
        K: Ord,
    {
        height_of(self, self.root())
    }

    /// Whether no node's subtrees differ in height by more than one.
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
            let node = self.arena.get(id);
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => (!node.right_thread)
                    .then(|| node.right.expect("structural right child")),
            };
        }
        None
    }

    /// Replaces `deleting` with `replacement` in its parent's child
    /// slot. `deleting` is always a structural child of its parent.
    fn transplant(&mut self, deleting: NodeId, replacement: NodeId) {
        let parent = self.arena.get(deleting).parent;
        match parent {
            None => self.root = Some(replacement),
            Some(p) => {
                if self.arena.get(p).left == Some(deleting) {
                    self.arena.get_mut(p).left = Some(replacement);
                } else {
                    self.arena.get_mut(p).right = Some(replacement);
                }
            }
        }
        self.arena.get_mut(replacement).parent = parent;
    }
}

impl<K: Ord, V> BinaryTree for RightThreaded<K, V> {
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
        let n = self.arena.get(node);
        (!n.right_thread).then(|| n.right.expect("structural right child"))
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for RightThreaded<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}

/// Lazily yields the entries of a [`RightThreaded`] or
/// [`DoubleThreaded`] tree in ascending key order.
pub struct ThreadedInOrder<'a, K, V> {
    tree: &'a dyn InOrderThreads<K, V>,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for ThreadedInOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.thread_successor(current);
        Some(self.tree.entry(current))
    }
}

/// Lazily yields the entries of a [`LeftThreaded`] or [`DoubleThreaded`]
/// tree in descending key order.
pub struct ThreadedOutOrder<'a, K, V> {
    tree: &'a dyn OutOrderThreads<K, V>,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for ThreadedOutOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.thread_predecessor(current);
        Some(self.tree.entry(current))
    }
}

trait InOrderThreads<K, V> {
    fn thread_successor(&self, node: NodeId) -> Option<NodeId>;
    fn entry(&self, node: NodeId) -> (&K, &V);
}

trait OutOrderThreads<K, V> {
    fn thread_predecessor(&self, node: NodeId) -> Option<NodeId>;
    fn entry(&self, node: NodeId) -> (&K, &V);
}

impl<K, V> InOrderThreads<K, V> for RightThreaded<K, V> {
    fn thread_successor(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.right_thread {
            n.right
        } else {
            Some(self.leftmost(n.right.expect("structural right child")))
        }
    }

    fn entry(&self, node: NodeId) -> (&K, &V) {
        let n = self.arena.get(node);
        (&n.key, &n.value)
    }
}

#[derive(Clone)]
struct LeftNode<K, V> {
    key: K,
    value: V,
    /// A child when `left_thread` is unset, otherwise a thread to the
    /// in-order predecessor (`None` only for the first node).
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    left_thread: bool,
}

/// A BST storing a thread to each node's in-order predecessor wherever
/// the node has no left child.
#[derive(Clone)]
pub struct LeftThreaded<K, V> {
    arena: Arena<LeftNode<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for LeftThreaded<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LeftThreaded<K, V> {
    /// Generate a new, empty tree.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Generate a tree seeded with a single entry.
    pub fn with_entry(key: K, value: V) -> Self {
        let mut tree = Self::new();
        let root = tree.arena.insert(LeftNode {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            left_thread: true,
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

    /// Inserts the given data into the tree stored at the given key.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`] if the key is already present; the
    /// tree is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError>
    where
        K: Ord,
    {
        let Some(mut current) = self.root else {
            *self = Self::with_entry(key, value);
            return Ok(());
        };
        loop {
            match key.cmp(&self.arena.get(current).key) {
                Ordering::Less => {
                    if self.arena.get(current).left_thread {
                        let thread = self.arena.get(current).left;
                        let node = self.arena.insert(LeftNode {
                            key,
                            value,
                            left: thread,
                            right: None,
                            parent: Some(current),
                            left_thread: true,
                        });
                        let parent = self.arena.get_mut(current);
                        parent.left = Some(node);
                        parent.left_thread = false;
                        return Ok(());
                    }
                    current = self.arena.get(current).left.expect("structural left child");
                }
                Ordering::Equal => return Err(TreeError::DuplicateKey),
                Ordering::Greater => match self.arena.get(current).right {
                    Some(right) => current = right,
                    None => {
                        let node = self.arena.insert(LeftNode {
                            key,
                            value,
                            left: Some(current),
                            right: None,
                            parent: Some(current),
                            left_thread: true,
                        });
                        self.arena.get_mut(current).right = Some(node);
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Deletes the node containing the given key and returns its data.
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
            ((!node.left_thread).then_some(node.left), node.right)
        };
        let left = left.map(|l| l.expect("structural left child"));

        match (left, right) {
            (None, None) => match self.arena.get(deleting).parent {
                None => self.root = None,
                Some(p) => {
                    if self.arena.get(p).right == Some(deleting) {
                        self.arena.get_mut(p).right = None;
                    } else {
                        let thread = self.arena.get(deleting).left;
                        let parent = self.arena.get_mut(p);
                        parent.left = thread;
                        parent.left_thread = true;
                    }
                }
            },
            (Some(left), None) => self.transplant(deleting, left),
            (None, Some(right)) => {
                // The successor's thread skips over the removed node.
                let succ = self.leftmost(right);
                self.arena.get_mut(succ).left = self.arena.get(deleting).left;
                self.transplant(deleting, right);
            }
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                if self.arena.get(successor).parent == Some(deleting) {
                    // The successor absorbs the left subtree; its thread
                    // slot becomes a real child pointer.
                    let s = self.arena.get_mut(successor);
                    s.left = Some(left);
                    s.left_thread = false;
                } else {
                    let sp = self
                        .arena
                        .get(successor)
                        .parent
                        .expect("deep successor has a parent");
                    match self.arena.get(successor).right {
                        Some(child) => {
                            self.arena.get_mut(sp).left = Some(child);
                            self.arena.get_mut(child).parent = Some(sp);
                        }
                        None => {
                            // The successor stays the parent's in-order
                            // predecessor from its new position.
                            let parent = self.arena.get_mut(sp);
                            parent.left = Some(successor);
                            parent.left_thread = true;
                        }
                    }
                    let s = self.arena.get_mut(successor);
                    s.left = Some(left);
                    s.left_thread = false;
                    s.right = Some(right);
                    self.arena.get_mut(right).parent = Some(successor);
                }
                self.arena.get_mut(left).parent = Some(successor);
                self.transplant(deleting, successor);
            }
        }
        Ok(self.arena.remove(deleting).value)
    }

    /// Visits every entry in descending key order without a stack, by
    /// following left children and threads.
    pub fn out_order(&self) -> ThreadedOutOrder<'_, K, V> {
        ThreadedOutOrder {
            tree: self,
            next: self.root.map(|root| self.rightmost(root)),
        }
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
        while !self.arena.get(current).left_thread {
            current = self.arena.get(current).left.expect("structural left child");
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

    /// The in-order predecessor of `node`, if it has one. Follows the
    /// thread when the node has no left child.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.left_thread {
            n.left
        } else {
            Some(self.rightmost(n.left.expect("structural left child")))
        }
    }

    /// The height of the tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize
    where
        K: Ord,
    {
        height_of(self, self.root())
    }

    /// Whether no node's subtrees differ in height by more than one.
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
            let node = self.arena.get(id);
            current = match key.cmp(&node.key) {
                Ordering::Less => {
                    (!node.left_thread).then(|| node.left.expect("structural left child"))
                }
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    fn transplant(&mut self, deleting: NodeId, replacement: NodeId) {
        let parent = self.arena.get(deleting).parent;
        match parent {
            None => self.root = Some(replacement),
            Some(p) => {
                if self.arena.get(p).right == Some(deleting) {
                    self.arena.get_mut(p).right = Some(replacement);
                } else {
                    self.arena.get_mut(p).left = Some(replacement);
                }
            }
        }
        self.arena.get_mut(replacement).parent = parent;
    }
}

impl<K: Ord, V> BinaryTree for LeftThreaded<K, V> {
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
        let n = self.arena.get(node);
        (!n.left_thread).then(|| n.left.expect("structural left child"))
    }

    fn right(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).right
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for LeftThreaded<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(crate::traversal::in_order(self))
            .finish()
    }
}

impl<K, V> OutOrderThreads<K, V> for LeftThreaded<K, V> {
    fn thread_predecessor(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.left_thread {
            n.left
        } else {
            Some(self.rightmost(n.left.expect("structural left child")))
        }
    }

    fn entry(&self, node: NodeId) -> (&K, &V) {
        let n = self.arena.get(node);
        (&n.key, &n.value)
    }
}

#[derive(Clone)]
struct DoubleNode<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    left_thread: bool,
    right_thread: bool,
}

/// A BST threaded on both sides: unused left slots point at
/// predecessors and unused right slots at successors, so ordered walks
/// run stackless in either direction.
///
/// # Examples
///
/// ```
/// use forest::threaded::DoubleThreaded;
///
/// let mut tree = DoubleThreaded::new();
/// for key in [4, 1, 7, 3, 5, 8, 2, 6] {
///     tree.insert(key, ())?;
/// }
///
/// let ascending: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
/// let descending: Vec<i32> = tree.out_order().map(|(key, _)| *key).collect();
/// assert_eq!(ascending, [1, 2, 3, 4, 5, 6, 7, 8]);
/// assert_eq!(descending, [8, 7, 6, 5, 4, 3, 2, 1]);
/// # Ok::<(), forest::TreeError>(())
/// ```
#[derive(Clone)]
pub struct DoubleThreaded<K, V> {
    arena: Arena<DoubleNode<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for DoubleThreaded<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> DoubleThreaded<K, V> {
    /// Generate a new, empty tree.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Generate a tree seeded with a single entry.
    pub fn with_entry(key: K, value: V) -> Self {
        let mut tree = Self::new();
        let root = tree.arena.insert(DoubleNode {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            left_thread: true,
            right_thread: true,
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

    /// Inserts the given data into the tree stored at the given key.
    ///
    /// A new node inherits one of its parent's old threads and threads
    /// back at the parent on the other side.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`] if the key is already present; the
    /// tree is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError>
    where
        K: Ord,
    {
        let Some(mut current) = self.root else {
            *self = Self::with_entry(key, value);
            return Ok(());
        };
        loop {
            match key.cmp(&self.arena.get(current).key) {
                Ordering::Less => {
                    if self.arena.get(current).left_thread {
                        let thread = self.arena.get(current).left;
                        let node = self.arena.insert(DoubleNode {
                            key,
                            value,
                            left: thread,
                            right: Some(current),
                            parent: Some(current),
                            left_thread: true,
                            right_thread: true,
                        });
                        let parent = self.arena.get_mut(current);
                        parent.left = Some(node);
                        parent.left_thread = false;
                        return Ok(());
                    }
                    current = self.arena.get(current).left.expect("structural left child");
                }
                Ordering::Equal => return Err(TreeError::DuplicateKey),
                Ordering::Greater => {
                    if self.arena.get(current).right_thread {
                        let thread = self.arena.get(current).right;
                        let node = self.arena.insert(DoubleNode {
                            key,
                            value,
                            left: Some(current),
                            right: thread,
                            parent: Some(current),
                            left_thread: true,
                            right_thread: true,
                        });
                        let parent = self.arena.get_mut(current);
                        parent.right = Some(node);
                        parent.right_thread = false;
                        return Ok(());
                    }
                    current = self.arena.get(current).right.expect("structural right child");
                }
            }
        }
    }

    /// Deletes the node containing the given key and returns its data.
    ///
    /// Threads on both sides that pointed at the removed node are
    /// repointed at its in-order neighbors.
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
            (
                (!node.left_thread).then_some(node.left),
                (!node.right_thread).then_some(node.right),
            )
        };
        let left = left.map(|l| l.expect("structural left child"));
        let right = right.map(|r| r.expect("structural right child"));

        match (left, right) {
            (None, None) => match self.arena.get(deleting).parent {
                None => self.root = None,
                Some(p) => {
                    if self.arena.get(p).left == Some(deleting) && !self.arena.get(p).left_thread {
                        let thread = self.arena.get(deleting).left;
                        let parent = self.arena.get_mut(p);
                        parent.left = thread;
                        parent.left_thread = true;
                    } else {
                        let thread = self.arena.get(deleting).right;
                        let parent = self.arena.get_mut(p);
                        parent.right = thread;
                        parent.right_thread = true;
                    }
                }
            },
            (Some(left), None) => {
                // The predecessor's successor thread skips the removed
                // node.
                let pred = self.rightmost(left);
                self.arena.get_mut(pred).right = self.arena.get(deleting).right;
                self.transplant(deleting, left);
            }
            (None, Some(right)) => {
                let succ = self.leftmost(right);
                self.arena.get_mut(succ).left = self.arena.get(deleting).left;
                self.transplant(deleting, right);
            }
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                let pred = self.rightmost(left);
                self.arena.get_mut(pred).right = Some(successor);
                if self.arena.get(successor).parent != Some(deleting) {
                    let sp = self
                        .arena
                        .get(successor)
                        .parent
                        .expect("deep successor has a parent");
                    if self.arena.get(successor).right_thread {
                        let parent = self.arena.get_mut(sp);
                        parent.left = Some(successor);
                        parent.left_thread = true;
                    } else {
                        let child = self
                            .arena
                            .get(successor)
                            .right
                            .expect("structural right child");
                        self.arena.get_mut(sp).left = Some(child);
                        self.arena.get_mut(child).parent = Some(sp);
                    }
                    let s = self.arena.get_mut(successor);
                    s.right = Some(right);
                    s.right_thread = false;
                    self.arena.get_mut(right).parent = Some(successor);
                }
                let s = self.arena.get_mut(successor);
                s.left = Some(left);
                s.left_thread = false;
                self.arena.get_mut(left).parent = Some(successor);
                self.transplant(deleting, successor);
            }
        }
        Ok(self.arena.remove(deleting).value)
    }

    /// Visits every entry in ascending key order without a stack.
    pub fn in_order(&self) -> ThreadedInOrder<'_, K, V> {
        ThreadedInOrder {
            tree: self,
            next: self.root.map(|root| self.leftmost(root)),
        }
    }

    /// Visits every entry in descending key order without a stack.
    pub fn out_order(&self) -> ThreadedOutOrder<'_, K, V> {
        ThreadedOutOrder {
            tree: self,
            next: self.root.map(|root| self.rightmost(root)),
        }
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
        while !self.arena.get(current).left_thread {
            current = self.arena.get(current).left.expect("structural left child");
        }
        current
    }

    /// The node with the largest key in the subtree rooted at `subtree`.
    pub fn rightmost(&self, subtree: NodeId) -> NodeId {
        let mut current = subtree;
        while !self.arena.get(current).right_thread {
            current = self.arena.get(current).right.expect("structural right child");
        }
        current
    }

    /// The in-order successor of `node`, if it has one.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.right_thread {
            n.right
        } else {
            Some(self.leftmost(n.right.expect("structural right child")))
        }
    }

    /// The in-order predecessor of `node`, if it has one.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.left_thread {
            n.left
        } else {
            Some(self.rightmost(n.left.expect("structural left child")))
        }
    }

    /// The height of the tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize
    where
        K: Ord,
    {
        height_of(self, self.root())
    }

    /// Whether no node's subtrees differ in height by more than one.
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
            let node = self.arena.get(id);
            current = match key.cmp(&node.key) {
                Ordering::Less => {
                    (!node.left_thread).then(|| node.left.expect("structural left child"))
                }
                Ordering::Equal => return Some(id),
                Ordering::Greater => {
                    (!node.right_thread).then(|| node.right.expect("structural right child"))
                }
            };
        }
        None
    }

    fn transplant(&mut self, deleting: NodeId, replacement: NodeId) {
        let parent = self.arena.get(deleting).parent;
        match parent {
            None => self.root = Some(replacement),
            Some(p) => {
                let parent_node = self.arena.get(p);
                if parent_node.left == Some(deleting) && !parent_node.left_thread {
                    self.arena.get_mut(p).left = Some(replacement);
                } else {
                    self.arena.get_mut(p).right = Some(replacement);
                }
            }
        }
        self.arena.get_mut(replacement).parent = parent;
    }
}

impl<K: Ord, V> BinaryTree for DoubleThreaded<K, V> {
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
        let n = self.arena.get(node);
        (!n.left_thread).then(|| n.left.expect("structural left child"))
    }

    fn right(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        (!n.right_thread).then(|| n.right.expect("structural right child"))
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for DoubleThreaded<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}

impl<K, V> InOrderThreads<K, V> for DoubleThreaded<K, V> {
    fn thread_successor(&self, node: NodeId) -> Option<NodeId> {
        self.successor(node)
    }

    fn entry(&self, node: NodeId) -> (&K, &V) {
        let n = self.arena.get(node);
        (&n.key, &n.value)
    }
}

impl<K, V> OutOrderThreads<K, V> for DoubleThreaded<K, V> {
    fn thread_predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor(node)
    }

    fn entry(&self, node: NodeId) -> (&K, &V) {
        let n = self.arena.get(node);
        (&n.key, &n.value)
    }
}

fn height_of<T: BinaryTree>(tree: &T, node: Option<NodeId>) -> usize {
    match node {
        None => 0,
        Some(id) => height_of(tree, tree.left(id)).max(height_of(tree, tree.right(id))) + 1,
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::{do_ops, Op};

    quickcheck::quickcheck! {
        fn right_threaded_matches_btreemap(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = RightThreaded::new();
            let mut map = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut map, RightThreaded::insert, RightThreaded::delete);
            tree.in_order().map(|(k, v)| (*k, *v)).eq(map.iter().map(|(k, v)| (*k, *v)))
        }
    }

    quickcheck::quickcheck! {
        fn left_threaded_matches_btreemap(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = LeftThreaded::new();
            let mut map = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut map, LeftThreaded::insert, LeftThreaded::delete);
            tree.out_order().map(|(k, v)| (*k, *v)).eq(map.iter().rev().map(|(k, v)| (*k, *v)))
        }
    }

    quickcheck::quickcheck! {
        fn double_threaded_matches_btreemap(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = DoubleThreaded::new();
            let mut map = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut map, DoubleThreaded::insert, DoubleThreaded::delete);
            tree.in_order().map(|(k, v)| (*k, *v)).eq(map.iter().map(|(k, v)| (*k, *v)))
                && tree.out_order().map(|(k, v)| (*k, *v)).eq(map.iter().rev().map(|(k, v)| (*k, *v)))
        }
    }

    quickcheck::quickcheck! {
        fn stackless_and_stack_walks_agree(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = DoubleThreaded::new();
            let mut map = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut map, DoubleThreaded::insert, DoubleThreaded::delete);
            tree.in_order().eq(crate::traversal::in_order(&tree))
                && crate::tools::verify_bst_property(&tree)
        }
    }
}
