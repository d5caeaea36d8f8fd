//! An unbalanced BST. This is the baseline the balanced variants build on:
//! no rebalancing ever happens, so the height is only bounded by the number
//! of nodes and a sorted insertion order degrades it to a linked list.
//!
//! # Examples
//!
//! ```
//! use forest::bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(&1).is_err());
//!
//! tree.insert(1, "one").unwrap();
//! assert_eq!(tree.search(&1), Ok(&"one"));
//!
//! // Inserting an existing key is an error, not an overwrite.
//! assert!(tree.insert(1, "uno").is_err());
//!
//! // Deleting a node returns its data.
//! assert_eq!(tree.delete(&1), Ok("one"));
//! assert!(tree.search(&1).is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::tree::{BinaryTree, NodeId};
use crate::TreeError;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

/// An unbalanced Binary Search Tree mapping keys to data.
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
    ///
    /// # Examples
    ///
    /// ```
    /// use forest::bst::Tree;
    ///
    /// let tree = Tree::with_entry(1, "one");
    /// assert_eq!(tree.search(&1), Ok(&"one"));
    /// ```
    pub fn with_entry(key: K, value: V) -> Self {
        let mut tree = Self::new();
        let root = tree.arena.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent: None,
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
    ///
    /// # Examples
    ///
    /// ```
    /// use forest::{bst::Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2).unwrap();
    ///
    /// assert_eq!(tree.search(&1), Ok(&2));
    /// assert_eq!(tree.search(&42), Err(TreeError::KeyNotFound));
    /// ```
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
        Ok(())
    }

    /// Deletes the node containing the given key and returns its data.
    ///
    /// A node with two children is replaced by its in-order successor
    /// (the leftmost node of its right subtree), which is transplanted
    /// into its position.
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
        self.remove_node(deleting);
        Ok(self.arena.remove(deleting).value)
    }

    /// Unlinks `deleting` from the structure. The node itself stays in the
    /// arena so the caller can take its data out.
    fn remove_node(&mut self, deleting: NodeId)
    where
        K: Ord,
    {
        let (left, right) = {
            let node = self.arena.get(deleting);
            (node.left, node.right)
        };
        match (left, right) {
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                if self.arena.get(successor).parent != Some(deleting) {
                    let successor_right = self.arena.get(successor).right;
                    self.transplant(successor, successor_right);
                    self.arena.get_mut(successor).right = Some(right);
                    self.arena.get_mut(right).parent = Some(successor);
                }
                self.transplant(deleting, Some(successor));
                self.arena.get_mut(successor).left = Some(left);
                self.arena.get_mut(left).parent = Some(successor);
            }
            // Zero or one child: splice the child (if any) into our slot.
            _ => self.transplant(deleting, left.or(right)),
        }
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

    /// The smallest entry in the tree.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use forest::bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2, "two").unwrap();
    /// tree.insert(1, "one").unwrap();
    ///
    /// assert_eq!(tree.min(), Ok((&1, &"one")));
    /// assert_eq!(tree.max(), Ok((&2, &"two")));
    /// ```
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
    ///
    /// When `node` has no right child this walks parent pointers upward
    /// until it leaves a left subtree.
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

    /// The height of the tree: 0 when empty, 1 for a single node, else
    /// one more than the taller subtree.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, node: Option<NodeId>) -> usize {
        match node {
            None => 0,
            Some(id) => {
                let node = self.arena.get(id);
                self.height_of(node.left).max(self.height_of(node.right)) + 1
            }
        }
    }

    /// Whether every node's subtree heights differ by at most one.
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
