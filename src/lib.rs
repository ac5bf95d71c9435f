//! Named-node general tree.
//!
//! [`domain::NamedTree`] is the core: insertion under the first pre-order
//! match of a parent name, multi-match subtree deletion, and pre-, in- and
//! post-order traversal. The application, config and cli layers wrap it in a
//! scriptable command-line front end.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{NamedTree, NewNode, Node, TraversalKind};
