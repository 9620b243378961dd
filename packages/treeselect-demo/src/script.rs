use std::fmt;

use treeselect_core::{
    Gesture, GestureHub, Identity, Key, Modifiers, RegionId, TreeIndex, TreePath, TreeView,
};

use crate::render::render_rows;

pub const TREE_REGION: RegionId = RegionId(1);
pub const TOOLBAR_REGION: RegionId = RegionId(2);

/// A user action against the tree view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Click { path: TreePath, modifiers: Modifiers },
    /// Double click: enter rename mode.
    DoubleClick(TreePath),
    Rename { path: TreePath, title: String },
    CancelRename(TreePath),
    Gesture(Gesture),
    ExpandAll,
    CollapseAll,
    ToggleExpanded(TreePath),
    Drag {
        from: TreePath,
        to_parent: Option<TreePath>,
        position: usize,
    },
    Delete(TreePath),
}

impl Action {
    pub fn click(path: impl Into<TreePath>) -> Self {
        Self::Click {
            path: path.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn ctrl_click(path: impl Into<TreePath>) -> Self {
        Self::Click {
            path: path.into(),
            modifiers: Modifiers::CTRL,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click { path, modifiers } if modifiers.toggle() => write!(f, "ctrl+click {path}"),
            Self::Click { path, .. } => write!(f, "click {path}"),
            Self::DoubleClick(path) => write!(f, "double click {path}"),
            Self::Rename { path, title } => write!(f, "rename {path} to {title:?}"),
            Self::CancelRename(path) => write!(f, "cancel rename {path}"),
            Self::Gesture(Gesture::Click { hit }) if hit.is_empty() => f.write_str("click on page background"),
            Self::Gesture(Gesture::Click { hit }) => write!(f, "click in regions {hit:?}"),
            Self::Gesture(Gesture::Key(key)) => write!(f, "press {key:?}"),
            Self::ExpandAll => f.write_str("expand all"),
            Self::CollapseAll => f.write_str("collapse all"),
            Self::ToggleExpanded(path) => write!(f, "toggle {path}"),
            Self::Drag {
                from,
                to_parent: Some(parent),
                position,
            } => write!(f, "drag {from} into {parent} at {position}"),
            Self::Drag { from, position, .. } => write!(f, "drag {from} to top level at {position}"),
            Self::Delete(path) => write!(f, "delete {path}"),
        }
    }
}

/// State of the view after one action.
#[derive(Clone, Debug)]
pub struct StepReport {
    pub action: Action,
    /// Rejection reason when the view refused the action.
    pub outcome: Result<(), String>,
    /// Titles of the selected nodes, in selection order.
    pub selection: Vec<String>,
    /// Whether the multiple-nodes drag indicator showed while a drag was in flight.
    pub multi_drag_indicator: bool,
    pub rows: Vec<String>,
}

/// Replay of the interactions the farm demo supports.
pub fn default_script() -> Vec<Action> {
    vec![
        Action::click([1]),
        Action::ctrl_click([2]),
        // Wool is under the selected Sheep: Sheep is retracted.
        Action::ctrl_click([2, 0]),
        // Milk is under the selected Cow: plain click replaces the selection.
        Action::click([1, 0]),
        Action::ctrl_click([3]),
        Action::Drag {
            from: TreePath::new([3]),
            to_parent: Some(TreePath::new([5])),
            position: 0,
        },
        Action::Drag {
            from: TreePath::new([0]),
            to_parent: None,
            position: 3,
        },
        Action::DoubleClick(TreePath::new([0, 0])),
        Action::Rename {
            path: TreePath::new([0, 0]),
            title: "Omelette".into(),
        },
        Action::CollapseAll,
        Action::ToggleExpanded(TreePath::new([1])),
        Action::ExpandAll,
        Action::click([2]),
        Action::ctrl_click([5]),
        Action::Delete(TreePath::new([2])),
        Action::Gesture(Gesture::click([TREE_REGION])),
        Action::Gesture(Gesture::Key(Key::Escape)),
        Action::DoubleClick(TreePath::new([0])),
    ]
}

/// Apply `actions` in order. Refused actions are reported and the session continues.
pub fn run_script<I: Identity>(
    view: &mut TreeView<I>,
    hub: &GestureHub,
    actions: &[Action],
) -> Vec<StepReport> {
    let mut reports = Vec::with_capacity(actions.len());
    for action in actions {
        let _span = tracing::info_span!("demo_step", %action).entered();

        let mut multi_drag_indicator = false;
        let outcome = apply(view, hub, action, &mut multi_drag_indicator);
        if let Err(reason) = &outcome {
            tracing::warn!(%reason, "action refused");
        }
        let rows = render_rows(view, None).unwrap_or_else(|e| vec![format!("render failed: {e}")]);
        let selection = selected_titles(view);
        tracing::info!(?selection, "step applied");

        reports.push(StepReport {
            action: action.clone(),
            outcome,
            selection,
            multi_drag_indicator,
            rows,
        });
    }
    reports
}

fn apply<I: Identity>(
    view: &mut TreeView<I>,
    hub: &GestureHub,
    action: &Action,
    multi_drag_indicator: &mut bool,
) -> Result<(), String> {
    let result = match action {
        Action::Click { path, modifiers } => view.click(path, *modifiers).map(|_| ()),
        Action::DoubleClick(path) => view.begin_edit(path),
        Action::Rename { path, title } => view.commit_edit(path, title.clone()),
        Action::CancelRename(path) => view.cancel_edit(path),
        Action::Gesture(gesture) => {
            hub.dispatch(gesture);
            view.apply_pending_clear();
            Ok(())
        }
        Action::ExpandAll => {
            view.expand_all();
            Ok(())
        }
        Action::CollapseAll => {
            view.collapse_all();
            Ok(())
        }
        Action::ToggleExpanded(path) => view.toggle_expanded(path).map(|_| ()),
        Action::Drag {
            from,
            to_parent,
            position,
        } => {
            if let Ok(row) = view.row_state(from, Some(from)) {
                *multi_drag_indicator = row.can_drag && row.multiple_dragging;
            }
            view.move_node(from, to_parent.as_ref(), *position).map(|_| ())
        }
        Action::Delete(path) => view.remove(path).map(|_| ()),
    };
    result.map_err(|e| e.to_string())
}

fn selected_titles<I: Identity>(view: &TreeView<I>) -> Vec<String> {
    view.selected_paths()
        .iter()
        .filter_map(|path| view.tree().node_at(path))
        .map(|node| node.title.clone())
        .collect()
}
