use proptest::prelude::*;
use treeselect_core::{
    Click, Identity, IdentityStrategy, Membership, MemoryTree, Modifiers, SelectionManager, SelectionSet,
    TreeItem, TreePath,
};

// Three levels, fan-out three: 3 + 9 + 27 nodes.
fn wide_tree(with_ids: bool) -> MemoryTree {
    let mut next_id = 0u64;
    let mut make = |title: String| {
        next_id += 1;
        let item = TreeItem::new(title).expanded(true);
        if with_ids {
            item.with_id(next_id)
        } else {
            item
        }
    };
    let mut roots = Vec::new();
    for a in 0..3 {
        let mut top = make(format!("{a}"));
        for b in 0..3 {
            let mut mid = make(format!("{a}.{b}"));
            for c in 0..3 {
                mid = mid.child(make(format!("{a}.{b}.{c}")));
            }
            top = top.child(mid);
        }
        roots.push(top);
    }
    MemoryTree::new(roots).unwrap()
}

fn all_paths(tree: &MemoryTree) -> Vec<TreePath> {
    tree.walk().into_iter().map(|(path, _)| path).collect()
}

fn clicks() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..39, any::<bool>()), 1..40)
}

fn run(strategy: IdentityStrategy, with_ids: bool, clicks: &[(usize, bool)]) -> Result<(), TestCaseError> {
    let tree = wide_tree(with_ids);
    let paths = all_paths(&tree);
    let manager = SelectionManager::new(strategy);
    let mut set = SelectionSet::new();
    for &(idx, toggle) in clicks {
        let click = Click {
            path: paths[idx].clone(),
            modifiers: Modifiers {
                ctrl: toggle,
                meta: false,
            },
        };
        let next = manager.next_selection(&set, &tree, &click).unwrap();
        prop_assert!(manager.check_exclusive(&next, &tree).is_ok());

        if !toggle {
            prop_assert!(next.len() <= 1);
        }
        // The clicked node is either selected now or was deselected by this click.
        let membership = manager.membership(&next, &tree, &click.path).unwrap();
        prop_assert_ne!(membership, Membership::Covered);
        set = next;
    }
    Ok(())
}

proptest! {
    #[test]
    fn stable_id_selection_stays_exclusive(clicks in clicks()) {
        run(IdentityStrategy::StableId, true, &clicks)?;
    }

    #[test]
    fn path_selection_stays_exclusive(clicks in clicks()) {
        run(IdentityStrategy::Path, false, &clicks)?;
    }

    #[test]
    fn toggle_click_twice_restores_membership(clicks in clicks(), target in 0usize..39) {
        let tree = wide_tree(true);
        let paths = all_paths(&tree);
        let manager = SelectionManager::new(IdentityStrategy::StableId);
        let mut set = SelectionSet::new();
        for (idx, _) in clicks {
            set = manager.next_selection(&set, &tree, &Click::toggle(paths[idx].clone())).unwrap();
        }
        let path = &paths[target];
        if manager.membership(&set, &tree, path).unwrap() == Membership::Selected {
            let removed = manager.next_selection(&set, &tree, &Click::toggle(path.clone())).unwrap();
            prop_assert_eq!(removed.len(), set.len() - 1);
            let restored = manager.next_selection(&removed, &tree, &Click::toggle(path.clone())).unwrap();
            let key = manager.identity().key_of(&tree, path).unwrap();
            prop_assert_eq!(restored.len(), set.len());
            prop_assert_eq!(restored.last().map(|e| e.key()), Some(key));
        }
    }
}
