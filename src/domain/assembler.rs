//! Tree assembler: rebuilds the chart hierarchy from flat parent-linked records.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::domain::entities::{ChartNode, TreeNode};
use crate::domain::roles::{NodeRole, RoleRules};

/// What the assembler tolerated or discarded while building a forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Ids whose parent reference did not resolve
    pub orphans: Vec<i64>,
    /// Ids that named themselves as parent
    pub self_references: Vec<i64>,
    /// Ids seen more than once, each listed once
    pub duplicate_ids: Vec<i64>,
    /// Direct children dropped by the terminal rule
    pub pruned: Vec<i64>,
    /// Root candidates dropped by the single-root rule
    pub discarded_roots: Vec<i64>,
    /// Input records absent from the output forest
    pub unreachable: usize,
    /// Id of the root-role record chosen by the single-root rule
    pub selected_root: Option<i64>,
}

impl AssemblyReport {
    /// True when the input links were fully consistent.
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.self_references.is_empty() && self.duplicate_ids.is_empty()
    }
}

/// Builds normalized chart forests from record snapshots.
///
/// Holds no state between calls; every call owns its lookup index.
#[derive(Debug, Clone, Default)]
pub struct TreeAssembler {
    rules: RoleRules,
}

impl TreeAssembler {
    pub fn new(rules: RoleRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RoleRules {
        &self.rules
    }

    /// Assemble records into a forest.
    ///
    /// Returns a single tree when a root-role record is among the root
    /// candidates, otherwise every root candidate in input order.
    pub fn assemble(&self, nodes: Vec<ChartNode>) -> Vec<TreeNode> {
        self.assemble_with_report(nodes).0
    }

    /// Same as [`assemble`](Self::assemble), also reporting what was tolerated.
    #[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
    pub fn assemble_with_report(&self, nodes: Vec<ChartNode>) -> (Vec<TreeNode>, AssemblyReport) {
        let mut report = AssemblyReport::default();
        let total = nodes.len();

        // Last insertion wins for colliding ids
        let mut index: HashMap<i64, usize> = HashMap::with_capacity(total);
        let mut repeated = HashSet::new();
        for (pos, node) in nodes.iter().enumerate() {
            if index.insert(node.id, pos).is_some() && repeated.insert(node.id) {
                warn!(id = node.id, "duplicate chart node id");
                report.duplicate_ids.push(node.id);
            }
        }

        let roles: Vec<NodeRole> = nodes
            .iter()
            .map(|n| self.rules.classify(&n.title))
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); total];
        let mut candidates = Vec::new();
        for (pos, node) in nodes.iter().enumerate() {
            match node.parent_id {
                None => candidates.push(pos),
                Some(parent_id) if parent_id == node.id => {
                    warn!(id = node.id, "chart node references itself as parent");
                    report.self_references.push(node.id);
                    candidates.push(pos);
                }
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&parent) => children[parent].push(pos),
                    None => {
                        warn!(id = node.id, parent_id, "parent not found, treating as root");
                        report.orphans.push(node.id);
                        candidates.push(pos);
                    }
                },
            }
        }

        for (pos, role) in roles.iter().enumerate() {
            if *role == NodeRole::Terminal && !children[pos].is_empty() {
                debug!(
                    id = nodes[pos].id,
                    dropped = children[pos].len(),
                    "clearing children of terminal node"
                );
                report
                    .pruned
                    .extend(children[pos].iter().map(|&c| nodes[c].id));
                children[pos].clear();
            }
        }

        let roots = match candidates
            .iter()
            .copied()
            .find(|&pos| roles[pos] == NodeRole::Root)
        {
            Some(selected) => {
                report.selected_root = Some(nodes[selected].id);
                report.discarded_roots = candidates
                    .iter()
                    .filter(|&&pos| pos != selected)
                    .map(|&pos| nodes[pos].id)
                    .collect();
                vec![selected]
            }
            None => candidates,
        };

        // Lists hold positions in input order, so a stable sort keeps ties in input order
        for list in children.iter_mut() {
            list.sort_by_key(|&pos| nodes[pos].order);
        }

        let (forest, placed) = materialize(&roots, &children, nodes);
        report.unreachable = total - placed;
        debug!(
            roots = forest.len(),
            placed,
            unreachable = report.unreachable,
            "assembled chart forest"
        );

        (forest, report)
    }
}

/// Assemble with the default role rules.
pub fn assemble(nodes: Vec<ChartNode>) -> Vec<TreeNode> {
    TreeAssembler::default().assemble(nodes)
}

/// Move records into owned trees, leaves first.
///
/// Returns the forest and the number of records placed in it.
fn materialize(
    roots: &[usize],
    children: &[Vec<usize>],
    nodes: Vec<ChartNode>,
) -> (Vec<TreeNode>, usize) {
    let mut preorder = Vec::with_capacity(nodes.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(pos) = stack.pop() {
        preorder.push(pos);
        stack.extend(children[pos].iter().rev().copied());
    }

    let mut records: Vec<Option<ChartNode>> = nodes.into_iter().map(Some).collect();
    let mut built: Vec<Option<TreeNode>> = records.iter().map(|_| None).collect();
    for &pos in preorder.iter().rev() {
        let Some(node) = records[pos].take() else {
            continue;
        };
        let kids = children[pos]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[pos] = Some(TreeNode {
            node,
            children: kids,
        });
    }

    let forest = roots.iter().filter_map(|&pos| built[pos].take()).collect();
    (forest, preorder.len())
}
