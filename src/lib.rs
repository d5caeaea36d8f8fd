//! This crate exposes several Binary Search Tree (BST) variants
//! mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, search, and delete stored records. BSTs are typically defined
//! recursively using the notion of a node. A node stores a key, the data
//! associated with that key, and up to two child nodes. The most important
//! invariants of a BST are:
//!
//! 1. For every node in a BST, all the nodes in its left subtree have a
//!    key less than its own key.
//! 2. For every node in a BST, all the nodes in its right subtree have a
//!    key greater than its own key.
//!
//! Searching for a key takes `O(height)`, so the variants in this crate
//! differ mainly in how (and whether) they bound the height:
//!
//! - [`bst::Tree`] performs no rebalancing; the height is unbounded.
//! - [`avl::Tree`] keeps the tree height-balanced with rotations.
//! - [`red_black::Tree`] keeps the tree color-balanced with rotations
//!   and recoloring.
//! - The [`threaded`] trees trade rebalancing for pre-linked successor
//!   (and/or predecessor) pointers, so an in-order walk needs neither
//!   recursion nor a stack.
//!
//! Nodes are stored in a per-tree arena and linked by [`NodeId`] indices,
//! which keeps the pervasive parent pointers and thread links non-owning.
//! Every variant implements the [`BinaryTree`] trait, so the functions in
//! [`traversal`] and [`tools`] work over any of them.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod bst;
pub mod red_black;
pub mod threaded;
pub mod tools;
pub mod traversal;

mod arena;
mod error;
mod tree;

pub use error::TreeError;
pub use tree::{BinaryTree, NodeId};

#[cfg(test)]
mod test;
