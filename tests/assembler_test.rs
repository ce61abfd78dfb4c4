//! Tests for TreeAssembler

use std::collections::HashSet;

use rstest::rstest;

use orgchart::domain::{assemble, ChartNode, RoleRules, TreeAssembler, TreeNode};
use orgchart::util::testing;

fn node(id: i64, title: &str, parent_id: Option<i64>, order: i64) -> ChartNode {
    ChartNode::new(id, title, parent_id, order)
}

/// Walks the forest with a loop detector; panics on a revisited id.
fn visit_all(forest: &[TreeNode]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut visited = Vec::new();
    let mut stack: Vec<&TreeNode> = forest.iter().rev().collect();
    while let Some(current) = stack.pop() {
        assert!(seen.insert(current.id()), "revisited id {}", current.id());
        visited.push(current.id());
        stack.extend(current.children.iter().rev());
    }
    visited
}

fn association() -> Vec<ChartNode> {
    vec![
        node(10, "YÖNETİM KURULU", Some(1), 1),
        node(1, "GENEL KURUL", None, 0),
        node(11, "DENETİM KURULU", Some(1), 2),
        node(12, "Denetim Raportörü", Some(11), 0),
        node(13, "Genel Sekreter", Some(10), 0),
        node(14, "Muhasebe", Some(13), 1),
        node(15, "İletişim", Some(13), 0),
        node(20, "ESKİ YAPI", None, 0),
    ]
}

// ============================================================
// Single-root rule
// ============================================================

#[test]
fn given_root_title_among_candidates_when_assembling_then_returns_only_that_tree() {
    testing::init_test_setup();

    let forest = assemble(vec![
        node(1, "GENEL KURUL", None, 0),
        node(2, "OTHER ROOT", None, 0),
        node(3, "CHILD", Some(1), 0),
    ]);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id(), 1);
    assert_eq!(forest[0].child_ids(), vec![3]);
    assert!(forest[0].children[0].children.is_empty());
    assert!(!visit_all(&forest).contains(&2));
}

#[test]
fn given_no_root_title_when_assembling_then_returns_all_candidates_in_input_order() {
    let forest = assemble(vec![
        node(5, "B", None, 9),
        node(4, "A", None, 1),
        node(6, "C", Some(4), 0),
    ]);

    let roots: Vec<i64> = forest.iter().map(TreeNode::id).collect();
    assert_eq!(roots, vec![5, 4]);
    assert_eq!(forest[1].child_ids(), vec![6]);
}

#[test]
fn given_root_title_below_another_node_when_assembling_then_rule_does_not_apply() {
    let forest = assemble(vec![
        node(1, "Federasyon", None, 0),
        node(2, "GENEL KURUL", Some(1), 0),
        node(3, "Bağımsız", None, 0),
    ]);

    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].child_ids(), vec![2]);
}

#[test]
fn given_two_root_titles_when_assembling_then_first_candidate_wins() {
    let forest = assemble(vec![
        node(7, "GENEL KURUL", None, 0),
        node(8, "GENEL KURUL", None, 0),
    ]);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id(), 7);
}

// ============================================================
// Terminal-node rule
// ============================================================

#[test]
fn given_terminal_node_with_children_when_assembling_then_children_are_dropped() {
    let forest = assemble(association());

    let audit = forest[0]
        .iter()
        .find(|n| n.node.title == "DENETİM KURULU")
        .expect("terminal node kept");
    assert!(audit.children.is_empty());

    let ids = visit_all(&forest);
    assert!(!ids.contains(&12), "dropped child must not be reparented");
}

#[test]
fn given_terminal_node_with_deep_subtree_when_assembling_then_whole_subtree_is_dropped() {
    let forest = assemble(vec![
        node(1, "DENETİM KURULU", None, 0),
        node(2, "a", Some(1), 0),
        node(3, "b", Some(2), 0),
        node(4, "c", Some(3), 0),
    ]);

    assert_eq!(visit_all(&forest), vec![1]);
}

#[test]
fn given_terminal_title_with_different_case_when_assembling_then_children_are_kept() {
    let forest = assemble(vec![
        node(1, "Denetim Kurulu", None, 0),
        node(2, "a", Some(1), 0),
    ]);

    assert_eq!(forest[0].child_ids(), vec![2]);
}

#[test]
fn given_custom_rules_when_assembling_then_applies_configured_titles() {
    let assembler = TreeAssembler::new(RoleRules::new("Board", "Audit"));
    let forest = assembler.assemble(vec![
        node(1, "Board", None, 0),
        node(2, "Audit", Some(1), 0),
        node(3, "Auditor", Some(2), 0),
        node(4, "GENEL KURUL", None, 0),
    ]);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id(), 1);
    assert_eq!(visit_all(&forest), vec![1, 2]);
}

// ============================================================
// Ordering
// ============================================================

#[test]
fn given_children_with_unsorted_order_when_assembling_then_sorted_ascending() {
    let forest = assemble(vec![
        node(1, "parent", None, 0),
        node(30, "third", Some(1), 3),
        node(10, "first", Some(1), 1),
        node(20, "second", Some(1), 2),
    ]);

    let orders: Vec<i64> = forest[0].children.iter().map(|c| c.node.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[rstest]
#[case(vec![0, 0, 0], vec![2, 3, 4])]
#[case(vec![1, 0, 1], vec![3, 2, 4])]
#[case(vec![5, 5, -1], vec![4, 2, 3])]
fn given_order_ties_when_assembling_then_input_order_breaks_ties(
    #[case] orders: Vec<i64>,
    #[case] expected: Vec<i64>,
) {
    let mut nodes = vec![node(1, "parent", None, 0)];
    for (i, order) in orders.into_iter().enumerate() {
        nodes.push(node(2 + i as i64, "child", Some(1), order));
    }

    let forest = assemble(nodes);

    assert_eq!(forest[0].child_ids(), expected);
}

#[test]
fn given_children_listed_before_parent_when_assembling_then_still_linked() {
    let forest = assemble(association());

    assert_eq!(forest[0].child_ids(), vec![10, 11]);
    let secretary = forest[0].iter().find(|n| n.id() == 13).expect("secretary");
    assert_eq!(secretary.child_ids(), vec![15, 14]);
}

// ============================================================
// Malformed input
// ============================================================

#[test]
fn given_dangling_parent_when_assembling_then_node_becomes_root() {
    let forest = assemble(vec![node(1, "A", None, 0), node(2, "B", Some(999), 0)]);

    let roots: Vec<i64> = forest.iter().map(TreeNode::id).collect();
    assert_eq!(roots, vec![1, 2]);
    assert_eq!(forest[1].node.parent_id, Some(999));
}

#[test]
fn given_self_reference_when_assembling_then_node_becomes_root() {
    let (forest, report) = TreeAssembler::default().assemble_with_report(vec![
        node(1, "A", Some(1), 0),
        node(2, "B", Some(1), 0),
    ]);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id(), 1);
    assert_eq!(forest[0].child_ids(), vec![2]);
    assert_eq!(report.self_references, vec![1]);
}

#[test]
fn given_orphans_when_assembling_with_report_then_lists_them() {
    let (_, report) = TreeAssembler::default().assemble_with_report(vec![
        node(1, "A", Some(404), 0),
        node(2, "B", None, 0),
        node(3, "C", Some(405), 0),
    ]);

    assert_eq!(report.orphans, vec![1, 3]);
    assert!(!report.is_clean());
    assert_eq!(report.unreachable, 0);
}

#[test]
fn given_mutual_parent_links_when_assembling_then_output_has_no_cycle() {
    let forest = assemble(vec![
        node(1, "root", None, 0),
        node(2, "x", Some(3), 0),
        node(3, "y", Some(2), 0),
        node(4, "z", Some(1), 0),
    ]);

    assert_eq!(visit_all(&forest), vec![1, 4]);
}

#[test]
fn given_every_reachable_node_when_assembling_then_parent_id_matches_structure() {
    let forest = assemble(association());

    let mut stack: Vec<(&TreeNode, Option<i64>)> = forest.iter().map(|t| (t, None)).collect();
    while let Some((current, parent)) = stack.pop() {
        if let Some(parent) = parent {
            assert_eq!(current.node.parent_id, Some(parent));
        }
        stack.extend(current.children.iter().map(|c| (c, Some(current.id()))));
    }
}

#[test]
fn given_inactive_nodes_when_assembling_then_they_are_kept() {
    let mut inactive = node(2, "Pasif Birim", Some(1), 0);
    inactive.is_active = false;

    let forest = assemble(vec![node(1, "A", None, 0), inactive]);

    assert_eq!(forest[0].child_ids(), vec![2]);
    assert!(!forest[0].children[0].node.is_active);
}

#[test]
fn given_empty_input_when_assembling_then_returns_empty_forest() {
    assert!(assemble(Vec::new()).is_empty());
}

#[test]
fn given_long_chain_when_assembling_then_builds_without_recursion() {
    let depth = 200_000;
    let mut nodes = vec![node(0, "top", None, 0)];
    nodes.extend((1..depth).map(|id| node(id, "link", Some(id - 1), 0)));

    let forest = assemble(nodes);

    assert_eq!(forest.len(), 1);
    assert_eq!(visit_all(&forest).len(), depth as usize);

    drop(forest);
}
