use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::NamedTree;
use crate::domain::entities::Node;

/// Conversion into a printable `termtree` hierarchy.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.to_string()).with_leaves(leaves)
    }
}

impl TreeNodeConvert for NamedTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        // built bottom-up in post-order, children are the top of the stack
        let mut built: Vec<Tree<String>> = Vec::new();
        for (_, node) in self.iter_postorder() {
            let leaves = built.split_off(built.len().saturating_sub(node.children.len()));
            built.push(Tree::new(node.to_string()).with_leaves(leaves));
        }
        built
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}
