use treeselect_core::{GestureHub, IdentityStrategy, SelectionConfig, TreeIndex, TreeView};
use treeselect_demo::render::render_rows;
use treeselect_demo::script::{default_script, run_script, Action, StepReport, TREE_REGION};
use treeselect_test_support::{farm_tree, path};

fn run(config: &SelectionConfig) -> (TreeView, Vec<StepReport>) {
    let hub = GestureHub::new();
    let mut view = TreeView::from_config(farm_tree(), config);
    let _watch = view.attach_outside_watcher(&hub, TREE_REGION);
    let reports = run_script(&mut view, &hub, &default_script());
    (view, reports)
}

fn selection_after(reports: &[StepReport], step: usize) -> Vec<&str> {
    reports[step].selection.iter().map(String::as_str).collect()
}

#[test]
fn bundled_json_matches_fixture() {
    let loaded = treeselect_demo::load_farm().unwrap();
    assert_eq!(loaded.roots(), farm_tree().roots());
}

#[test]
fn scripted_session_walks_through_selection_rules() {
    let (view, reports) = run(&SelectionConfig::default());

    assert_eq!(selection_after(&reports, 0), ["Cow"]);
    assert_eq!(selection_after(&reports, 1), ["Cow", "Sheep"]);
    assert_eq!(selection_after(&reports, 2), ["Cow", "Wool"]);
    assert_eq!(selection_after(&reports, 3), ["Milk"]);
    assert_eq!(selection_after(&reports, 4), ["Milk", "Pig"]);

    // Pig dragged while two nodes are selected; the selection follows it.
    assert!(reports[5].multi_drag_indicator);
    assert!(reports[5].outcome.is_ok());
    assert_eq!(selection_after(&reports, 5), ["Milk", "Pig"]);

    // Chicken is locked.
    assert!(reports[6].outcome.is_err());
    assert!(!reports[6].multi_drag_indicator);

    // Renaming clears the selection first.
    assert!(reports[7].selection.is_empty());
    assert!(reports[7].rows.iter().any(|r| r.contains("Egg (editing)")));
    assert!(reports[8].rows.iter().any(|r| r.ends_with("Omelette")));

    // Collapsed trees show only the top level.
    assert_eq!(reports[9].rows.len(), 7);

    assert_eq!(selection_after(&reports, 13), ["Sheep", "Sheep 2"]);
    assert_eq!(selection_after(&reports, 14), ["Sheep 2"]);
    // Click inside the tree keeps the selection, Escape clears it.
    assert_eq!(selection_after(&reports, 15), ["Sheep 2"]);
    assert!(reports[16].selection.is_empty());

    assert!(matches!(reports[17].action, Action::DoubleClick(_)));
    assert!(reports[17].outcome.as_ref().unwrap_err().contains("editing is disabled"));
    assert_eq!(view.tree().node_at(&path(&[0])).unwrap().title, "Chicken");
}

#[test]
fn path_identity_session_drops_entries_that_move() {
    let config = SelectionConfig {
        identity: IdentityStrategy::Path,
        ..SelectionConfig::default()
    };
    let (_, reports) = run(&config);

    assert_eq!(selection_after(&reports, 4), ["Milk", "Pig"]);
    // Pig's old path no longer holds Pig after the drag.
    assert_eq!(selection_after(&reports, 5), ["Milk"]);
}

#[test]
fn rows_mark_selected_and_covered_nodes() {
    let hub = GestureHub::new();
    let mut view = TreeView::from_config(farm_tree(), &SelectionConfig::default());
    run_script(&mut view, &hub, &[Action::click([1]), Action::ctrl_click([2])]);
    let dragged = path(&[1]);
    let rows = render_rows(&view, Some(&dragged)).unwrap();
    assert_eq!(rows[0], "- [ ] Chicken (locked)");
    assert_eq!(rows[2], "- [x] Cow  <- multiple nodes are being dragged");
    assert_eq!(rows[3], "    [~] Milk (dimmed)");
    assert_eq!(rows[4], "- [x] Sheep");
}
