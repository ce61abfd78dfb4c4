//! Text tree rendering for terminal output

use termtree::Tree;

use crate::domain::entities::TreeNode;
use crate::domain::layout::RenderNode;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.node.to_string()).with_leaves(leaves)
    }
}

impl TreeDisplay for RenderNode {
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!(
            "{} [{}x{} @{}]",
            self.node, self.box_width, self.box_height, self.font_size
        );
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label).with_leaves(leaves)
    }
}
