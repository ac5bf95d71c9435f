//! Domain layer: the named tree and its traversals
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod tree_traits;

pub use arena::{InOrderIterator, NamedTree, PostOrderIterator, PreOrderIterator, TreeNode};
pub use entities::{NewNode, Node, TraversalKind};
pub use error::DomainError;
pub use tree_traits::TreeNodeConvert;
