use std::fmt;

/// Handle to a node inside one tree's arena.
///
/// A `NodeId` is only meaningful for the tree that produced it, and only
/// until that node is deleted. Subtree-rooted queries (`leftmost`,
/// `successor`, ...) take and return these handles.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Read-only structural view of a binary tree.
///
/// Every tree variant in this crate implements this trait, which is all
/// the [`traversal`](crate::traversal) engine and [`tools`](crate::tools)
/// need: a root and a way to read a node's key, data, and structural
/// children. Implementations for threaded trees expose structural
/// children only; thread links are never reported as children, so
/// generic traversal sees the same shape a plain BST would have.
pub trait BinaryTree {
    /// Key type; totally ordered, unique within a tree.
    type Key: Ord;
    /// Payload type stored alongside each key.
    type Value;

    /// The root node, or `None` for an empty tree.
    fn root(&self) -> Option<NodeId>;

    /// The key stored at `node`.
    fn key(&self, node: NodeId) -> &Self::Key;

    /// The data stored at `node`.
    fn value(&self, node: NodeId) -> &Self::Value;

    /// Structural left child of `node`.
    fn left(&self, node: NodeId) -> Option<NodeId>;

    /// Structural right child of `node`.
    fn right(&self, node: NodeId) -> Option<NodeId>;
}
