//! Domain entities: chart records and the assembled tree

use std::fmt;

use serde::{Deserialize, Serialize};

/// One chart record as delivered by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartNode {
    /// Stable identity across assembly calls
    pub id: i64,
    /// Display label
    pub title: String,
    /// Parent record id; `None` marks a root candidate
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Sort key among siblings (not globally unique)
    #[serde(default)]
    pub order: i64,
    /// Carried through untouched; the assembler never filters on it
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ChartNode {
    pub fn new(id: i64, title: impl Into<String>, parent_id: Option<i64>, order: i64) -> Self {
        Self {
            id,
            title: title.into(),
            parent_id,
            order,
            is_active: true,
        }
    }
}

impl fmt::Display for ChartNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.title, self.id)
    }
}

/// A chart record together with the subtree it owns.
///
/// Children are owned outright, so the structure cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: ChartNode,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(node: ChartNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.node.id
    }

    /// Child ids in their current order.
    pub fn child_ids(&self) -> Vec<i64> {
        self.children.iter().map(TreeNode::id).collect()
    }

    /// Pre-order walk over this subtree.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including self.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Deepest level below this node; a leaf is 0.
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((current, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(current.children.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// Split into the record and its children.
    pub fn into_parts(mut self) -> (ChartNode, Vec<TreeNode>) {
        let children = std::mem::take(&mut self.children);
        let node = std::mem::replace(&mut self.node, ChartNode::new(0, String::new(), None, 0));
        (node, children)
    }
}

// Unlinks children level by level so long chains do not exhaust the stack
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut child) = stack.pop() {
            stack.append(&mut child.children);
        }
    }
}

/// Pre-order iterator over a [`TreeNode`] subtree.
pub struct TreeIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}
