//! Layout annotator: attaches depth-derived box and connector geometry.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::entities::{ChartNode, TreeNode};

/// Box dimensions and label size for one chart level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxGeometry {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl BoxGeometry {
    const fn new(width: u32, height: u32, font_size: u32) -> Self {
        Self {
            width,
            height,
            font_size,
        }
    }
}

/// Geometry per depth; the last row covers every deeper level.
pub const GEOMETRY_TIERS: [BoxGeometry; 6] = [
    BoxGeometry::new(200, 60, 16),
    BoxGeometry::new(160, 50, 14),
    BoxGeometry::new(140, 45, 13),
    BoxGeometry::new(120, 40, 12),
    BoxGeometry::new(100, 35, 11),
    BoxGeometry::new(90, 30, 10),
];

/// Vertical link length between the root level and depth 1.
pub const ROOT_CONNECTOR_HEIGHT: u32 = 50;

/// Vertical link length for every deeper transition.
pub const CONNECTOR_HEIGHT: u32 = 40;

pub fn geometry_for_depth(depth: usize) -> BoxGeometry {
    GEOMETRY_TIERS[depth.min(GEOMETRY_TIERS.len() - 1)]
}

/// Connector length to the parent; roots have none.
pub fn connector_height(depth: usize) -> Option<u32> {
    match depth {
        0 => None,
        1 => Some(ROOT_CONNECTOR_HEIGHT),
        _ => Some(CONNECTOR_HEIGHT),
    }
}

/// A chart record with everything a rendering surface needs to draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    #[serde(flatten)]
    pub node: ChartNode,
    pub depth: usize,
    pub box_width: u32,
    pub box_height: u32,
    pub font_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_height: Option<u32>,
    /// Draw one horizontal bar spanning all children
    pub sibling_bar: bool,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    fn new(node: ChartNode, depth: usize, children: Vec<RenderNode>) -> Self {
        let geometry = geometry_for_depth(depth);
        Self {
            node,
            depth,
            box_width: geometry.width,
            box_height: geometry.height,
            font_size: geometry.font_size,
            connector_height: connector_height(depth),
            sibling_bar: children.len() > 1,
            children,
        }
    }

    pub fn id(&self) -> i64 {
        self.node.id
    }

    pub fn geometry(&self) -> BoxGeometry {
        BoxGeometry::new(self.box_width, self.box_height, self.font_size)
    }

    /// Pre-order walk over this subtree.
    pub fn iter(&self) -> RenderIter<'_> {
        RenderIter { stack: vec![self] }
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Deepest depth reached in this subtree.
    pub fn max_depth(&self) -> usize {
        self.iter().map(|n| n.depth).max().unwrap_or(self.depth)
    }
}

// Unlinks children level by level so long chains do not exhaust the stack
impl Drop for RenderNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut child) = stack.pop() {
            stack.append(&mut child.children);
        }
    }
}

/// Pre-order iterator over a [`RenderNode`] subtree.
pub struct RenderIter<'a> {
    stack: Vec<&'a RenderNode>,
}

impl<'a> Iterator for RenderIter<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

struct Pending {
    node: ChartNode,
    depth: usize,
    children: Vec<usize>,
}

/// Annotate an assembled forest, each root starting at depth 0.
///
/// Uses an explicit stack, so chain length is bounded by memory only.
#[instrument(level = "debug", skip_all, fields(roots = forest.len()))]
pub fn annotate(forest: Vec<TreeNode>) -> Vec<RenderNode> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut roots = Vec::with_capacity(forest.len());
    let mut stack: Vec<(TreeNode, usize, Option<usize>)> =
        forest.into_iter().rev().map(|tree| (tree, 0, None)).collect();

    while let Some((tree, depth, parent)) = stack.pop() {
        let slot = pending.len();
        let (node, children) = tree.into_parts();
        pending.push(Pending {
            node,
            depth,
            children: Vec::with_capacity(children.len()),
        });
        match parent {
            Some(parent) => pending[parent].children.push(slot),
            None => roots.push(slot),
        }
        stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, depth + 1, Some(slot))),
        );
    }
    debug!(nodes = pending.len(), "annotating chart nodes");

    // Slots are in pre-order, so every child slot is built before its parent
    let mut built: Vec<Option<RenderNode>> = pending.iter().map(|_| None).collect();
    for (slot, entry) in pending.into_iter().enumerate().rev() {
        let children = entry
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[slot] = Some(RenderNode::new(entry.node, entry.depth, children));
    }

    roots
        .into_iter()
        .filter_map(|slot| built[slot].take())
        .collect()
}
