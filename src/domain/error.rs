//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors. The tree operations themselves never fail; these cover
/// values coming in from outside the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown traversal kind: {0} (expected preOrder, inOrder or postOrder)")]
    UnknownTraversal(String),

    #[error("snapshot has {0} roots, a tree holds at most one")]
    MultipleRoots(usize),
}
