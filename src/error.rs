use thiserror::Error;

/// The ways a tree operation can fail.
///
/// Every failure leaves the tree exactly as it was: an operation either
/// completes or has no effect.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Returned by `insert` when the key is already present.
    #[error("duplicate key")]
    DuplicateKey,
    /// Returned by `search` and `delete` when the key is absent.
    #[error("key not found")]
    KeyNotFound,
    /// Returned by queries like `min` and `max` on an empty tree.
    #[error("tree is empty")]
    EmptyTree,
}
