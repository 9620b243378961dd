use treeselect_core::{
    Click, IdentityStrategy, MemoryTree, NodeId, SelectionEntry, SelectionKey, SelectionManager,
    SelectionSet, TreeItem, TreePath,
};

fn tree() -> MemoryTree {
    MemoryTree::new(vec![
        TreeItem::new("Cow")
            .with_id(2)
            .child(TreeItem::new("Milk").with_id(6)),
        TreeItem::new("Sheep")
            .with_id(3)
            .child(TreeItem::new("Wool").with_id(7)),
        TreeItem::new("Pig").with_id(4),
    ])
    .unwrap()
}

fn select(manager: &SelectionManager, tree: &MemoryTree, clicks: &[Click]) -> SelectionSet {
    clicks.iter().fold(SelectionSet::new(), |set, click| {
        manager.next_selection(&set, tree, click).unwrap()
    })
}

#[test]
fn deleted_nodes_drop_out_of_stable_id_selection() {
    let mut tree = tree();
    let manager = SelectionManager::new(IdentityStrategy::StableId);
    let set = select(&manager, &tree, &[Click::plain([0, 0]), Click::toggle([2])]);

    tree.remove(&TreePath::new([0])).unwrap();
    let next = manager.reconcile(&set, &tree);
    assert_eq!(next.keys(), vec![SelectionKey::Id(NodeId(4))]);
}

#[test]
fn stable_ids_survive_reordering() {
    let mut tree = tree();
    let manager = SelectionManager::new(IdentityStrategy::StableId);
    let set = select(&manager, &tree, &[Click::plain([2]), Click::toggle([1, 0])]);

    tree.move_node(&TreePath::new([2]), None, 0).unwrap();
    let next = manager.reconcile(&set, &tree);
    assert_eq!(next, set);
    let located: Vec<_> = next.iter().filter_map(|e| e.locate(&tree)).collect();
    assert_eq!(located, vec![TreePath::new([0]), TreePath::new([2, 0])]);
}

#[test]
fn path_entries_go_stale_when_a_different_node_takes_the_slot() {
    let mut tree = tree();
    let manager = SelectionManager::new(IdentityStrategy::Path);
    let set = select(&manager, &tree, &[Click::plain([1])]);
    assert!(matches!(set.entries(), [SelectionEntry::Path { node, .. }] if node.title == "Sheep"));

    // Pig moves in front of Sheep; path [1] now holds Pig.
    tree.move_node(&TreePath::new([2]), None, 1).unwrap();
    assert!(manager.reconcile(&set, &tree).is_empty());
}

#[test]
fn untracked_path_entries_drop_when_a_sibling_lands_in_front() {
    let mut tree = MemoryTree::new(vec![TreeItem::new("a"), TreeItem::new("b")]).unwrap();
    let manager = SelectionManager::new(IdentityStrategy::Path);
    let set = select(&manager, &tree, &[Click::plain([1])]);

    tree.insert(None, 0, TreeItem::new("c")).unwrap();
    assert!(manager.reconcile(&set, &tree).is_empty());
}

#[test]
fn untracked_path_entries_survive_edits_below_them() {
    let mut tree = MemoryTree::new(vec![TreeItem::new("a"), TreeItem::new("b")]).unwrap();
    let manager = SelectionManager::new(IdentityStrategy::Path);
    let set = select(&manager, &tree, &[Click::plain([0])]);

    tree.insert(None, 2, TreeItem::new("c")).unwrap();
    assert_eq!(manager.reconcile(&set, &tree), set);
}

#[test]
fn moving_a_selected_node_under_another_keeps_the_ancestor() {
    let mut tree = tree();
    let manager = SelectionManager::new(IdentityStrategy::StableId);
    let set = select(&manager, &tree, &[Click::plain([0]), Click::toggle([2])]);

    // Pig dragged under Cow: Cow now covers Pig.
    tree.move_node(&TreePath::new([2]), Some(&TreePath::new([0])), 0).unwrap();
    let next = manager.reconcile(&set, &tree);
    assert_eq!(next.keys(), vec![SelectionKey::Id(NodeId(2))]);
    manager.check_exclusive(&next, &tree).unwrap();
}

#[test]
fn reconcile_is_identity_on_a_healthy_selection() {
    let tree = tree();
    for strategy in [IdentityStrategy::StableId, IdentityStrategy::Path] {
        let manager = SelectionManager::new(strategy);
        let set = select(
            &manager,
            &tree,
            &[Click::plain([0, 0]), Click::toggle([1]), Click::toggle([2])],
        );
        assert_eq!(set.len(), 3);
        assert_eq!(manager.reconcile(&set, &tree), set);
    }
}
