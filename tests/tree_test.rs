//! Tree construction and ordering through the public API.

use rstest::rstest;

use treevis::domain::{DomainError, NodeKey, Tree, TreeNode};
use treevis::util::testing;

type Entry = (NodeKey<&'static str, ()>, Vec<NodeKey<&'static str, ()>>);

fn adjacency(entries: &[(&'static str, &[&'static str])]) -> Vec<Entry> {
    entries
        .iter()
        .map(|(key, children)| {
            (
                NodeKey::Id(*key),
                children.iter().map(|c| NodeKey::Id(*c)).collect(),
            )
        })
        .collect()
}

fn child_ids<I: Clone, P>(node: &TreeNode<I, P>) -> Vec<I> {
    node.children.iter().map(|c| c.id.clone()).collect()
}

// ============================================================
// Adjacency construction
// ============================================================

#[test]
fn given_adjacency_without_root_when_building_then_first_entry_is_root() {
    testing::init_test_setup();
    let tree: Tree<&str> = Tree::from_adjacency(
        adjacency(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &[]), ("D", &[])]),
        None,
    )
    .unwrap();

    let root = tree.root.as_ref().unwrap();
    assert_eq!(root.id, "A");
    assert_eq!(child_ids(root), vec!["B", "C"]);
    assert_eq!(child_ids(&root.children[0]), vec!["D"]);
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.height(), 3);
    assert_eq!(tree.leaves(), vec![&"D", &"C"]);
}

#[test]
fn given_explicit_root_when_building_then_only_its_subtree_kept() {
    let tree: Tree<&str> = Tree::from_adjacency(
        adjacency(&[("A", &["B"]), ("B", &["C", "D"]), ("C", &[]), ("D", &[])]),
        Some("B"),
    )
    .unwrap();

    assert_eq!(tree.root.as_ref().unwrap().id, "B");
    assert_eq!(tree.len(), 3);
    assert!(tree.find(&"A").is_none());
}

#[test]
fn given_children_without_own_entries_when_building_then_they_become_leaves() {
    let tree: Tree<&str> =
        Tree::from_adjacency(adjacency(&[("A", &["B", "C"])]), None).unwrap();
    let root = tree.root.as_ref().unwrap();
    assert!(root.children.iter().all(TreeNode::is_leaf));
}

#[rstest]
#[case::empty(vec![], None, DomainError::EmptyAdjacency)]
#[case::absent_root(vec![("A", vec!["B"])], Some("Z"), DomainError::RootNotFound("\"Z\"".into()))]
fn given_invalid_adjacency_when_building_then_construction_error(
    #[case] entries: Vec<(&'static str, Vec<&'static str>)>,
    #[case] root: Option<&'static str>,
    #[case] expected: DomainError,
) {
    let entries: Vec<_> = entries
        .into_iter()
        .map(|(key, children)| {
            (
                NodeKey::<_, ()>::Id(key),
                children.into_iter().map(NodeKey::Id).collect::<Vec<_>>(),
            )
        })
        .collect();
    let err = Tree::from_adjacency(entries, root).unwrap_err();
    assert!(err.is_missing_root());
    assert_eq!(err, expected);
}

#[test]
fn given_payloads_in_keys_and_refs_when_building_then_key_payload_wins() {
    let tree: Tree<&str, i32> = Tree::from_adjacency(
        vec![
            (
                NodeKey::WithPayload("A", 1),
                vec![NodeKey::WithPayload("B", 20), NodeKey::WithPayload("C", 30)],
            ),
            (NodeKey::WithPayload("B", 2), vec![]),
        ],
        None,
    )
    .unwrap();

    assert_eq!(tree.find(&"A").unwrap().payload, Some(1));
    assert_eq!(tree.find(&"B").unwrap().payload, Some(2));
    assert_eq!(tree.find(&"C").unwrap().payload, Some(30));
}

#[test]
fn given_falsy_payload_when_building_then_distinct_from_absent() {
    let tree: Tree<&str, i32> = Tree::from_adjacency(
        vec![(NodeKey::WithPayload("A", 0), vec![NodeKey::Id("B")])],
        None,
    )
    .unwrap();
    assert_eq!(tree.find(&"A").unwrap().payload, Some(0));
    assert_eq!(tree.find(&"B").unwrap().payload, None);
}

// ============================================================
// Binary-tree arrays
// ============================================================

#[test]
fn given_array_with_missing_left_child_when_building_then_only_right_child() {
    let tree = Tree::<i32>::from_binary_tree(vec![Some(1), None, Some(3)]);
    let root = tree.root.as_ref().unwrap();
    assert_eq!(root.id, 1);
    assert_eq!(child_ids(root), vec![3]);
}

#[test]
fn given_complete_array_when_building_then_level_order_layout() {
    let tree = Tree::<i32>::from_binary_tree((1..=7).map(Some));
    let root = tree.root.as_ref().unwrap();
    assert_eq!(child_ids(root), vec![2, 3]);
    assert_eq!(child_ids(&root.children[0]), vec![4, 5]);
    assert_eq!(child_ids(&root.children[1]), vec![6, 7]);
    assert!(root.children.iter().all(|c| c.payload.is_none()));
}

#[test]
fn given_values_under_missing_parent_when_building_then_skipped() {
    // index 3 and 4 hang below the missing index 1
    let tree = Tree::<i32>::from_binary_tree(vec![Some(1), None, Some(3), Some(4), Some(5)]);
    assert_eq!(tree.len(), 2);
    assert!(tree.find(&4).is_none());
}

#[rstest]
#[case::empty(vec![])]
#[case::missing_root(vec![None, Some(2)])]
fn given_array_without_root_when_building_then_empty_tree(#[case] values: Vec<Option<i32>>) {
    let tree = Tree::<i32>::from_binary_tree(values);
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), 0);
}

// ============================================================
// Ordering
// ============================================================

fn unordered() -> Tree<&'static str, i32> {
    Tree::from(
        TreeNode::with_payload("root", 0).with_children(vec![
            TreeNode::with_payload("c", 1).with_children(vec![
                TreeNode::with_payload("z", 9),
                TreeNode::with_payload("y", 8),
            ]),
            TreeNode::with_payload("a", 3),
            TreeNode::with_payload("b", 2),
        ]),
    )
}

#[test]
fn given_unordered_tree_when_ordering_by_id_then_every_level_sorted() {
    let mut tree = unordered();
    tree.order();
    let root = tree.root.as_ref().unwrap();
    assert_eq!(child_ids(root), vec!["a", "b", "c"]);
    assert_eq!(child_ids(&root.children[2]), vec!["y", "z"]);
}

#[test]
fn given_unordered_tree_when_ordering_by_payload_then_sorted_by_payload() {
    let mut tree = unordered();
    tree.order_by_key(|node| node.payload);
    let root = tree.root.as_ref().unwrap();
    assert_eq!(child_ids(root), vec!["c", "b", "a"]);
}

#[test]
fn given_custom_comparator_when_ordering_then_reversed() {
    let mut tree = unordered();
    tree.order_by(|a, b| b.id.cmp(&a.id));
    assert_eq!(child_ids(tree.root.as_ref().unwrap()), vec!["c", "b", "a"]);
}

#[test]
fn given_ordered_tree_when_ordering_again_then_unchanged() {
    let mut once = unordered();
    once.order_by_key(|node| node.payload);
    let mut twice = once.clone();
    twice.order_by_key(|node| node.payload);
    assert_eq!(once, twice);
    assert_eq!(once.len(), unordered().len());
}

#[test]
fn given_empty_tree_when_ordering_then_noop() {
    let mut tree: Tree<&str> = Tree::default();
    tree.order();
    assert!(tree.is_empty());
}

// ============================================================
// Deep trees
// ============================================================

fn deep_chain(levels: usize) -> Tree<usize, usize> {
    let mut node = TreeNode::with_payload(levels - 1, levels - 1);
    for id in (0..levels - 1).rev() {
        node = TreeNode::with_payload(id, id).with_children(vec![node]);
    }
    Tree::from(node)
}

#[test]
fn given_very_deep_chain_when_cloning_and_comparing_then_no_stack_overflow() {
    let tree = deep_chain(100_001);
    let copy = tree.clone();
    assert!(copy == tree);
    assert_eq!(copy.height(), 100_001);

    let mut altered = copy.clone();
    altered.root.as_mut().unwrap().payload = None;
    assert!(altered != tree);
}
