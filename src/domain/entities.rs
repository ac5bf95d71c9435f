//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Owned, nested view of a tree node.
///
/// This is the shape handed to renderers and serializers; the live tree keeps
/// its nodes in an arena (see [`crate::domain::NamedTree`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// Drops nested children iteratively so deep snapshots do not overflow the stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value)
    }
}

/// Payload for an insertion. Children always start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub name: String,
    pub value: String,
}

impl NewNode {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Traversal order selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalKind {
    PreOrder,
    InOrder,
    PostOrder,
}

impl TraversalKind {
    pub const ALL: [TraversalKind; 3] = [
        TraversalKind::PreOrder,
        TraversalKind::InOrder,
        TraversalKind::PostOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalKind::PreOrder => "preOrder",
            TraversalKind::InOrder => "inOrder",
            TraversalKind::PostOrder => "postOrder",
        }
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalKind {
    type Err = DomainError;

    /// Accepts `preOrder`, `pre-order`, `pre_order`, `pre` (any case), and the
    /// same forms for in/post.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "pre" | "preorder" => Ok(TraversalKind::PreOrder),
            "in" | "inorder" => Ok(TraversalKind::InOrder),
            "post" | "postorder" => Ok(TraversalKind::PostOrder),
            _ => Err(DomainError::UnknownTraversal(s.to_string())),
        }
    }
}
