//! A self-balancing BST (specifically, a red-black tree). Every node is
//! colored red or black, and the tree maintains the classic invariants:
//!
//! 1. The root is black.
//! 2. Absent children count as black leaves (NIL).
//! 3. A red node has only black children.
//! 4. Every path from a node down to a NIL contains the same number of
//!    black nodes.
//!
//! Together these bound the height at twice the black-height, so
//! searches, inserts, and deletes are all `O(log n)`. NIL is represented
//! as `None`: there is no data-bearing sentinel node, and "is NIL" is an
//! `Option` check rather than a structural comparison.
//!
//! # Examples
//!
//! ```
//! use forest::red_black::Tree;
//!
//! let mut tree = Tree::new();
//! for key in 1..=100 {
//!     tree.insert(key, key * 2).unwrap();
//! }
//!
//! assert_eq!(tree.search(&42), Ok(&84));
//! assert!(tree.height() <= 14); // 2 * log2(101)
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::tree::{BinaryTree, NodeId};
use crate::TreeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    color: Color,
}

/// A color-balanced Binary Search Tree mapping keys to data.
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
            color: Color::Black,
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
    /// The new node starts red; the fix-up walk recolors (red uncle) or
    /// rotates (black uncle) until no red node has a red parent, then
    /// forces the root black.
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
            color: Color::Red,
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

        self.insert_fixup(node);
        Ok(())
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        while self.color_of(self.arena.get(node).parent) == Color::Red {
            let parent = self
                .arena
                .get(node)
                .parent
                .expect("fixup node has a red parent");
            let grandparent = self
                .arena
                .get(parent)
                .parent
                .expect("a red node is never the root");

            if self.arena.get(grandparent).left == Some(parent) {
                let uncle = self.arena.get(grandparent).right;
                if self.color_of(uncle) == Color::Red {
                    // Red uncle: push the blackness down from the
                    // grandparent and continue from there.
                    self.arena.get_mut(parent).color = Color::Black;
                    self.arena.get_mut(uncle.expect("red uncle exists")).color = Color::Black;
                    self.arena.get_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if self.arena.get(parent).right == Some(node) {
                        // Inner grandchild: straighten the path first.
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self
                        .arena
                        .get(node)
                        .parent
                        .expect("rotation keeps the parent");
                    let grandparent = self
                        .arena
                        .get(parent)
                        .parent
                        .expect("rotation keeps the grandparent");
                    self.arena.get_mut(parent).color = Color::Black;
                    self.arena.get_mut(grandparent).color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.arena.get(grandparent).left;
                if self.color_of(uncle) == Color::Red {
                    self.arena.get_mut(parent).color = Color::Black;
                    self.arena.get_mut(uncle.expect("red uncle exists")).color = Color::Black;
                    self.arena.get_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if self.arena.get(parent).left == Some(node) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self
                        .arena
                        .get(node)
                        .parent
                        .expect("rotation keeps the parent");
                    let grandparent = self
                        .arena
                        .get(parent)
                        .parent
                        .expect("rotation keeps the grandparent");
                    self.arena.get_mut(parent).color = Color::Black;
                    self.arena.get_mut(grandparent).color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root.expect("fixup runs on a non-empty tree");
        self.arena.get_mut(root).color = Color::Black;
    }

    /// Deletes the node containing the given key and returns its data.
    ///
    /// A node with two children is replaced by its in-order successor,
    /// which inherits its color; if the color physically removed from the
    /// tree was black, the fix-up walk restores the black-height
    /// invariant starting from the node that took the removed node's
    /// place (possibly NIL, so its parent is tracked explicitly).
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
        let mut removed_color = self.arena.get(deleting).color;
        let fixup;
        let fixup_parent;
        match (left, right) {
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                removed_color = self.arena.get(successor).color;
                fixup = self.arena.get(successor).right;
                if self.arena.get(successor).parent == Some(deleting) {
                    fixup_parent = Some(successor);
                } else {
                    fixup_parent = self.arena.get(successor).parent;
                    let successor_right = self.arena.get(successor).right;
                    self.transplant(successor, successor_right);
                    self.arena.get_mut(successor).right = Some(right);
                    self.arena.get_mut(right).parent = Some(successor);
                }
                self.transplant(deleting, Some(successor));
                self.arena.get_mut(successor).left = Some(left);
                self.arena.get_mut(left).parent = Some(successor);
                self.arena.get_mut(successor).color = self.arena.get(deleting).color;
            }
            _ => {
                fixup = left.or(right);
                fixup_parent = self.arena.get(deleting).parent;
                self.transplant(deleting, fixup);
            }
        }

        if removed_color == Color::Black {
            self.delete_fixup(fixup, fixup_parent);
        }
        Ok(self.arena.remove(deleting).value)
    }

    /// Restores the black-height invariant after a black node was
    /// removed. `node` carries an "extra black" and may be NIL, which is
    /// why its parent travels alongside it.
    fn delete_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.root && self.color_of(node) == Color::Black {
            let p = parent.expect("non-root fixup node has a parent");
            if self.arena.get(p).left == node {
                let mut sibling = self
                    .arena
                    .get(p)
                    .right
                    .unwrap_or_else(|| panic!("black-height invariant broken: missing sibling"));

                // Case 1: red sibling. Rotate it up to get a black one.
                if self.arena.get(sibling).color == Color::Red {
                    self.arena.get_mut(sibling).color = Color::Black;
                    self.arena.get_mut(p).color = Color::Red;
                    self.rotate_left(p);
                    sibling = self
                        .arena
                        .get(p)
                        .right
                        .unwrap_or_else(|| panic!("black-height invariant broken: missing sibling"));
                }

                let sibling_left = self.arena.get(sibling).left;
                let sibling_right = self.arena.get(sibling).right;
                if self.color_of(sibling_left) == Color::Black
                    && self.color_of(sibling_right) == Color::Black
                {
                    // Case 2: black sibling, black nephews. Move the
                    // extra black up.
                    self.arena.get_mut(sibling).color = Color::Red;
                    node = Some(p);
                    parent = self.arena.get(p).parent;
                } else {
                    if self.color_of(sibling_right) == Color::Black {
                        // Case 3: near nephew red, far nephew black.
                        let near = sibling_left.expect("red near nephew exists");
                        self.arena.get_mut(near).color = Color::Black;
                        self.arena.get_mut(sibling).color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = self
                            .arena
                            .get(p)
                            .right
                            .expect("rotation placed a sibling");
                    }
                    // Case 4: far nephew red. One rotation finishes.
                    self.arena.get_mut(sibling).color = self.arena.get(p).color;
                    self.arena.get_mut(p).color = Color::Black;
                    let far = self.arena.get(sibling).right.expect("red far nephew exists");
                    self.arena.get_mut(far).color = Color::Black;
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self
                    .arena
                    .get(p)
                    .left
                    .unwrap_or_else(|| panic!("black-height invariant broken: missing sibling"));

                if self.arena.get(sibling).color == Color::Red {
                    self.arena.get_mut(sibling).color = Color::Black;
                    self.arena.get_mut(p).color = Color::Red;
                    self.rotate_right(p);
                    sibling = self
                        .arena
                        .get(p)
                        .left
                        .unwrap_or_else(|| panic!("black-height invariant broken: missing sibling"));
                }

                let sibling_left = self.arena.get(sibling).left;
                let sibling_right = self.arena.get(sibling).right;
                if self.color_of(sibling_left) == Color::Black
                    && self.color_of(sibling_right) == Color::Black
                {
                    self.arena.get_mut(sibling).color = Color::Red;
                    node = Some(p);
                    parent = self.arena.get(p).parent;
                } else {
                    if self.color_of(sibling_left) == Color::Black {
                        let near = sibling_right.expect("red near nephew exists");
                        self.arena.get_mut(near).color = Color::Black;
                        self.arena.get_mut(sibling).color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = self
                            .arena
                            .get(p)
                            .left
                            .expect("rotation placed a sibling");
                    }
                    self.arena.get_mut(sibling).color = self.arena.get(p).color;
                    self.arena.get_mut(p).color = Color::Black;
                    let far = self.arena.get(sibling).left.expect("red far nephew exists");
                    self.arena.get_mut(far).color = Color::Black;
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }
        if let Some(id) = node {
            self.arena.get_mut(id).color = Color::Black;
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

    /// The height of the tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Whether no node's subtrees differ in height by more than one.
    ///
    /// Red-black balancing only bounds the height within twice the
    /// black-height, so unlike an AVL tree this can legitimately be
    /// `false`.
    pub fn is_balanced(&self) -> bool
    where
        K: Ord,
    {
        crate::tools::check_balance(self)
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

    /// NIL children count as black.
    fn color_of(&self, node: Option<NodeId>) -> Color {
        node.map_or(Color::Black, |id| self.arena.get(id).color)
    }

    fn rotate_left(&mut self, node: NodeId) {
        let temp = self
            .arena
            .get(node)
            .right
            .expect("rotate left requires a right child");
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
    }

    fn rotate_right(&mut self, node: NodeId) {
        let temp = self
            .arena
            .get(node)
            .left
            .expect("rotate right requires a left child");
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
mod tests {
    use super::*;
    use crate::traversal;

    /// Checks all four red-black invariants plus parent-pointer
    /// consistency, returning the black-height.
    pub(super) fn assert_red_black<K: Ord, V>(tree: &Tree<K, V>) {
        fn walk<K: Ord, V>(tree: &Tree<K, V>, node: Option<NodeId>) -> usize {
            match node {
                None => 1,
                Some(id) => {
                    let n = tree.arena.get(id);
                    if n.color == Color::Red {
                        assert_eq!(tree.color_of(n.left), Color::Black, "red-red edge");
                        assert_eq!(tree.color_of(n.right), Color::Black, "red-red edge");
                    }
                    for child in [n.left, n.right].into_iter().flatten() {
                        assert_eq!(tree.arena.get(child).parent, Some(id), "bad parent link");
                    }
                    let left = walk(tree, n.left);
                    let right = walk(tree, n.right);
                    assert_eq!(left, right, "unequal black-heights");
                    left + (n.color == Color::Black) as usize
                }
            }
        }

        if let Some(root) = tree.root {
            assert_eq!(tree.arena.get(root).color, Color::Black, "red root");
        }
        walk(tree, tree.root);
    }

    fn basic_tree() -> Tree<i32, String> {
        let mut tree = Tree::new();
        for key in [23, 4, 30, 11, 7, 34, 20, 24, 22, 15, 1] {
            tree.insert(key, key.to_string()).unwrap();
        }
        tree
    }

    #[test]
    fn inserts_preserve_invariants() {
        let mut tree = Tree::new();
        for key in [23, 4, 30, 11, 7, 34, 20, 24, 22, 15, 1] {
            tree.insert(key, key.to_string()).unwrap();
            assert_red_black(&tree);
        }

        assert_eq!(tree.min(), Ok((&1, &"1".to_string())));
        assert_eq!(tree.search(&24), Ok(&"24".to_string()));
    }

    #[test]
    fn sorted_inserts_stay_logarithmic() {
        let mut tree = Tree::new();
        for key in 1..=1000 {
            tree.insert(key, ()).unwrap();
        }
        assert_red_black(&tree);
        // Height is at most 2 * log2(n + 1).
        assert!(tree.height() <= 20, "height {}", tree.height());
    }

    #[test]
    fn deletion_sequence_from_basic_tree() {
        let mut tree = basic_tree();

        // No children.
        tree.delete(&15).unwrap();
        assert_red_black(&tree);
        let keys: Vec<i32> = traversal::in_order(&tree).map(|(k, _)| *k).collect();
        assert_eq!(keys, [1, 4, 7, 11, 20, 22, 23, 24, 30, 34]);

        tree.delete(&20).unwrap();
        assert_red_black(&tree);
        let keys: Vec<i32> = traversal::in_order(&tree).map(|(k, _)| *k).collect();
        assert_eq!(keys, [1, 4, 7, 11, 22, 23, 24, 30, 34]);

        tree.insert(17, "17".to_string()).unwrap();
        tree.delete(&22).unwrap();
        assert_red_black(&tree);
        let keys: Vec<i32> = traversal::in_order(&tree).map(|(k, _)| *k).collect();
        assert_eq!(keys, [1, 4, 7, 11, 17, 23, 24, 30, 34]);

        // Two children.
        tree.delete(&11).unwrap();
        assert_red_black(&tree);
        let keys: Vec<i32> = traversal::in_order(&tree).map(|(k, _)| *k).collect();
        assert_eq!(keys, [1, 4, 7, 17, 23, 24, 30, 34]);
    }

    #[test]
    fn delete_root_with_two_children() {
        let mut tree = basic_tree();
        assert_eq!(tree.delete(&23), Ok("23".to_string()));
        assert_red_black(&tree);
        assert_eq!(tree.search(&23), Err(TreeError::KeyNotFound));
        assert!(crate::tools::verify_bst_property(&tree));
    }

    #[test]
    fn drain_completely() {
        let mut tree = Tree::new();
        for key in [23, 4, 30, 11, 7, 34, 20, 24, 22, 15, 1] {
            tree.insert(key, key).unwrap();
        }
        for key in [15, 22, 7, 20, 23, 1, 34, 4, 30, 24, 11] {
            assert_eq!(tree.delete(&key), Ok(key));
            assert_red_black(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.min(), Err(TreeError::EmptyTree));
    }

    #[test]
    fn delete_missing_key() {
        let mut tree = Tree::with_entry(1, ());
        assert_eq!(tree.delete(&2), Err(TreeError::KeyNotFound));
        assert_eq!(tree.len(), 1);
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
        }
    }

    quickcheck::quickcheck! {
        fn invariants_hold_after_every_op(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = Tree::new();
            for op in &ops {
                match op {
                    Op::Insert(k, v) => {
                        let _ = tree.insert(*k, *v);
                    }
                    Op::Remove(k) => {
                        let _ = tree.delete(k);
                    }
                }
                super::tests::assert_red_black(&tree);
            }
            true
        }
    }
}
