//! Fixtures and assertions shared by the treeselect test suites.

use treeselect_core::{
    Click, Identity, MemoryTree, SelectionManager, SelectionSet, TreeIndex, TreeItem, TreePath,
};

/// The farm forest used by the demo: eight animals, each with one product.
/// Chicken (id 1) has drag and rename disabled.
pub fn farm_tree() -> MemoryTree {
    let animals = [
        ("Chicken", 1, "Egg", 5),
        ("Cow", 2, "Milk", 6),
        ("Sheep", 3, "Wool", 7),
        ("Pig", 4, "Meat", 8),
        ("Chicken 2", 9, "Egg 2", 13),
        ("Cow 2", 10, "Milk 2", 14),
        ("Sheep 2", 11, "Wool 2", 15),
        ("Pig 2", 12, "Meat 2", 16),
    ];
    let roots = animals
        .into_iter()
        .map(|(animal, id, product, product_id)| {
            TreeItem::new(animal)
                .with_id(id)
                .expanded(true)
                .drag_disabled(id == 1)
                .editing_disabled(id == 1)
                .child(TreeItem::new(product).with_id(product_id))
        })
        .collect();
    MemoryTree::new(roots).expect("farm ids are unique")
}

/// Four levels deep with ids: `root(1) > branch(2) > twig(3) > leaf(4)` plus a sibling
/// `other(5)` at the top level.
pub fn nested_tree() -> MemoryTree {
    MemoryTree::new(vec![
        TreeItem::new("root").with_id(1).expanded(true).child(
            TreeItem::new("branch")
                .with_id(2)
                .child(TreeItem::new("twig").with_id(3).child(TreeItem::new("leaf").with_id(4))),
        ),
        TreeItem::new("other").with_id(5),
    ])
    .expect("nested ids are unique")
}

/// Same shape as [`nested_tree`] without ids, for path-keyed selection.
pub fn untracked_tree() -> MemoryTree {
    MemoryTree::new(vec![
        TreeItem::new("root").child(
            TreeItem::new("branch").child(TreeItem::new("twig").child(TreeItem::new("leaf"))),
        ),
        TreeItem::new("other"),
    ])
    .expect("no ids to collide")
}

pub fn path(indices: &[usize]) -> TreePath {
    TreePath::from(indices)
}

/// Fold `clicks` over an empty selection, checking exclusivity after every step.
pub fn apply_clicks<I: Identity, T: TreeIndex>(
    manager: &SelectionManager<I>,
    tree: &T,
    clicks: &[Click],
) -> SelectionSet {
    clicks.iter().fold(SelectionSet::new(), |set, click| {
        let next = manager
            .next_selection(&set, tree, click)
            .unwrap_or_else(|e| panic!("click at {} failed: {e}", click.path));
        assert_exclusive(manager, tree, &next);
        next
    })
}

pub fn assert_exclusive<I: Identity, T: TreeIndex>(
    manager: &SelectionManager<I>,
    tree: &T,
    set: &SelectionSet,
) {
    if let Err(e) = manager.check_exclusive(set, tree) {
        panic!("selection {set:?} violates exclusivity: {e}");
    }
}

/// Titles of the selected nodes, in selection order.
pub fn selected_titles<T: TreeIndex>(tree: &T, set: &SelectionSet) -> Vec<String> {
    set.iter()
        .filter_map(|entry| entry.locate(tree))
        .filter_map(|p| tree.node_at(&p).map(|n| n.title.clone()))
        .collect()
}
