use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument};

use crate::domain::entities::{NewNode, Node, TraversalKind};
use crate::domain::error::DomainError;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub value: String,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value)
    }
}

/// Mutable tree of named nodes.
///
/// Names are not unique. Insertion targets the first pre-order match of the
/// parent name; deletion removes every non-root match. Holds zero or one root.
#[derive(Debug, Clone)]
pub struct NamedTree {
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for NamedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamedTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Tree with a single root node.
    pub fn with_root(node: NewNode) -> Self {
        let mut tree = Self::new();
        tree.attach(node, None);
        tree
    }

    /// Rebuilds a tree from a forest of zero or one nested nodes.
    #[instrument(level = "debug", skip(forest))]
    pub fn from_forest(forest: Vec<Node>) -> Result<Self, DomainError> {
        if forest.len() > 1 {
            return Err(DomainError::MultipleRoots(forest.len()));
        }
        let mut tree = Self::new();
        let mut stack: Vec<(Node, Option<Index>)> =
            forest.into_iter().map(|root| (root, None)).collect();

        while let Some((mut node, parent_idx)) = stack.pop() {
            let children = std::mem::take(&mut node.children);
            let new_node = NewNode {
                name: std::mem::take(&mut node.name),
                value: std::mem::take(&mut node.value),
            };
            let idx = tree.attach(new_node, parent_idx);
            // reversed so children are attached left-to-right
            for child in children.into_iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        Ok(tree)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    fn attach(&mut self, node: NewNode, parent: Option<Index>) -> Index {
        let NewNode { name, value } = node;
        let node_idx = self.arena.insert(TreeNode {
            name,
            value,
            parent,
            children: Vec::new(),
        });

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// First node named `name` in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn find_first(&self, name: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.name == name)
            .map(|(idx, _)| idx)
    }

    /// Inserts `node` as the last child of the first pre-order match of
    /// `parent_name`, or as the root when the tree is empty and `parent_name`
    /// is empty. Anything else is a no-op.
    ///
    /// Returns whether the tree changed.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, parent_name: &str, node: NewNode) -> bool {
        if self.is_empty() {
            if parent_name.is_empty() {
                debug!("Empty tree, {} becomes root", node.name);
                self.attach(node, None);
                return true;
            }
            debug!("Empty tree, parent {:?} cannot match", parent_name);
            return false;
        }

        match self.find_first(parent_name) {
            Some(parent_idx) => {
                self.attach(node, Some(parent_idx));
                true
            }
            None => {
                debug!("Parent {:?} not found, tree unchanged", parent_name);
                false
            }
        }
    }

    /// Deletes nodes named `name` together with their subtrees.
    ///
    /// A matching root clears the whole tree. Otherwise every direct child
    /// named `name` is removed at every level in a single pass.
    /// Returns the number of nodes removed, descendants included.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, name: &str) -> usize {
        let Some(root_idx) = self.root else {
            return 0;
        };

        if self.arena.get(root_idx).is_some_and(|root| root.name == name) {
            let removed = self.arena.len();
            self.arena.clear();
            self.root = None;
            debug!("Root {:?} deleted, removed {} nodes", name, removed);
            return removed;
        }

        let mut removed = 0;
        let mut stack = vec![root_idx];
        while let Some(current_idx) = stack.pop() {
            let children = match self.arena.get_mut(current_idx) {
                Some(node) => std::mem::take(&mut node.children),
                None => continue,
            };

            let (doomed, kept): (Vec<Index>, Vec<Index>) =
                children.into_iter().partition(|&child| {
                    self.arena
                        .get(child)
                        .is_some_and(|child| child.name == name)
                });

            for child in doomed {
                removed += self.remove_subtree(child);
            }
            // reversed so siblings are processed left-to-right
            stack.extend(kept.iter().rev().copied());
            if let Some(node) = self.arena.get_mut(current_idx) {
                node.children = kept;
            }
        }

        debug!("Removed {} nodes named {:?} or below", removed, name);
        removed
    }

    fn remove_subtree(&mut self, idx: Index) -> usize {
        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(current_idx) = stack.pop() {
            if let Some(node) = self.arena.remove(current_idx) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        removed
    }

    pub fn iter(&self) -> PreOrderIterator {
        PreOrderIterator::new(self)
    }

    pub fn iter_inorder(&self) -> InOrderIterator {
        InOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn traverse_pre_order(&self) -> Vec<String> {
        self.iter().map(|(_, node)| node.name.clone()).collect()
    }

    /// Binary-style in-order over `children[0]` and `children[1]` only.
    /// Further children and their subtrees are not visited.
    #[instrument(level = "debug", skip(self))]
    pub fn traverse_in_order(&self) -> Vec<String> {
        self.iter_inorder()
            .map(|(_, node)| node.name.clone())
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn traverse_post_order(&self) -> Vec<String> {
        self.iter_postorder()
            .map(|(_, node)| node.name.clone())
            .collect()
    }

    pub fn traverse(&self, kind: TraversalKind) -> Vec<String> {
        match kind {
            TraversalKind::PreOrder => self.traverse_pre_order(),
            TraversalKind::InOrder => self.traverse_in_order(),
            TraversalKind::PostOrder => self.traverse_post_order(),
        }
    }

    /// Nested copy of the current tree as a forest of zero or one root.
    #[instrument(level = "debug", skip(self))]
    pub fn snapshot(&self) -> Vec<Node> {
        // post-order: a node's children are the last entries on the stack
        let mut built: Vec<Node> = Vec::new();
        for (_, node) in self.iter_postorder() {
            let children = built.split_off(built.len().saturating_sub(node.children.len()));
            built.push(Node::leaf(node.name.clone(), node.value.clone()).with_children(children));
        }
        built
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a NamedTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a NamedTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// In-order walk treating `children[0]` as the left and `children[1]` as the
/// right subtree.
pub struct InOrderIterator<'a> {
    tree: &'a NamedTree,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a NamedTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            current: tree.root(),
        }
    }

    fn child_at(&self, idx: Index, slot: usize) -> Option<Index> {
        self.tree
            .get_node(idx)
            .and_then(|node| node.children.get(slot).copied())
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.current {
            self.stack.push(current_idx);
            self.current = self.child_at(current_idx, 0);
        }
        let current_idx = self.stack.pop()?;
        self.current = self.child_at(current_idx, 1);
        let node = self.tree.get_node(current_idx)?;
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a NamedTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a NamedTree) -> Self {
        Self {
            tree,
            stack: tree.root().map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      A
    //    / | \
    //   B  C  D
    //   |
    //   E
    fn sample() -> NamedTree {
        let mut tree = NamedTree::new();
        tree.insert("", NewNode::new("A", "1"));
        tree.insert("A", NewNode::new("B", "2"));
        tree.insert("A", NewNode::new("C", "3"));
        tree.insert("A", NewNode::new("D", "4"));
        tree.insert("B", NewNode::new("E", "5"));
        tree
    }

    #[test]
    fn given_children_when_inserting_then_parent_links_are_set() {
        let tree = sample();
        let root = tree.root().unwrap();
        let b = tree.find_first("B").unwrap();
        let e = tree.find_first("E").unwrap();
        assert_eq!(tree.get_node(b).unwrap().parent, Some(root));
        assert_eq!(tree.get_node(e).unwrap().parent, Some(b));
        assert_eq!(tree.get_node(root).unwrap().parent, None);
    }

    #[test]
    fn given_subtree_delete_when_done_then_arena_slots_are_freed() {
        let mut tree = sample();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.delete("B"), 2);
        assert_eq!(tree.len(), 3);
        assert!(tree.find_first("E").is_none());
    }

    #[test]
    fn given_deleted_slot_when_reinserting_then_old_index_stays_dead() {
        let mut tree = sample();
        let old_e = tree.find_first("E").unwrap();
        tree.delete("E");
        tree.insert("C", NewNode::new("E", "new"));
        let new_e = tree.find_first("E").unwrap();
        assert_ne!(old_e, new_e);
        assert!(tree.get_node(old_e).is_none());
    }

    #[test]
    fn given_sample_when_iterating_in_order_then_skips_third_child() {
        let tree = sample();
        assert_eq!(tree.traverse_in_order(), vec!["E", "B", "A", "C"]);
    }

    #[test]
    fn given_deep_chain_when_traversing_then_does_not_recurse() {
        let mut tree = NamedTree::new();
        let mut idx = tree.attach(NewNode::new("n0", "v"), None);
        for i in 1..50_000 {
            // attach directly, insert() would rescan the chain every time
            idx = tree.attach(NewNode::new(format!("n{i}"), "v"), Some(idx));
        }
        assert_eq!(tree.traverse_pre_order().len(), 50_000);
        assert_eq!(tree.traverse_post_order().first().unwrap(), "n49999");
        assert_eq!(tree.traverse_in_order().first().unwrap(), "n49999");
    }

    #[test]
    fn given_deep_chain_when_snapshotting_then_nests_every_level() {
        let mut tree = NamedTree::new();
        let mut idx = tree.attach(NewNode::new("n0", "v"), None);
        for i in 1..100_000 {
            idx = tree.attach(NewNode::new(format!("n{i}"), "v"), Some(idx));
        }

        let snapshot = tree.snapshot();

        assert_eq!(snapshot.len(), 1);
        let mut depth = 0;
        let mut current = &snapshot[0];
        while let Some(child) = current.children.first() {
            assert_eq!(current.children.len(), 1);
            current = child;
            depth += 1;
        }
        assert_eq!(depth, 99_999);
        assert_eq!(current.name, "n99999");

        let rebuilt = NamedTree::from_forest(snapshot).unwrap();
        assert_eq!(rebuilt.len(), 100_000);
    }

    #[test]
    fn given_sample_when_snapshotting_then_children_keep_order() {
        let snapshot = sample().snapshot();
        let root = &snapshot[0];
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "D"]);
        assert_eq!(root.children[0].children[0].name, "E");
    }
}
