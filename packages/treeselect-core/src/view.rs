use std::cell::Cell;
use std::rc::Rc;

use crate::config::SelectionConfig;
use crate::error::{Error, Result};
use crate::gesture::{GestureHub, RegionId, WatchGuard, WatchMode};
use crate::identity::{Identity, IdentityStrategy};
use crate::ids::TreePath;
use crate::node::TreeItem;
use crate::selection::{Click, Membership, Modifiers, SelectionManager, SelectionSet};
use crate::traits::TreeIndex;
use crate::tree::MemoryTree;

/// Everything a row needs to pick its styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowState {
    pub membership: Membership,
    pub can_drag: bool,
    pub is_editing: bool,
    pub expanded: bool,
    /// This row is the dragged node and more than one node is selected.
    pub multiple_dragging: bool,
    /// This row sits inside the subtree being dragged.
    pub dragged_descendant: bool,
}

/// Host-side session: a tree, its selection, and the rename/expand state around them.
pub struct TreeView<I = IdentityStrategy> {
    tree: MemoryTree,
    selection: SelectionSet,
    manager: SelectionManager<I>,
    clear_selection_on_edit: bool,
    outside_watch: WatchMode,
    pending_clear: Rc<Cell<bool>>,
}

impl TreeView<IdentityStrategy> {
    pub fn from_config(tree: MemoryTree, config: &SelectionConfig) -> Self {
        let manager = SelectionManager::new(config.identity).with_policy(config.covered_click);
        let mut view = Self::with_manager(tree, manager);
        view.clear_selection_on_edit = config.clear_selection_on_edit;
        view.outside_watch = config.outside_watch;
        view
    }
}

impl<I: Identity> TreeView<I> {
    pub fn with_manager(tree: MemoryTree, manager: SelectionManager<I>) -> Self {
        Self {
            tree,
            selection: SelectionSet::new(),
            manager,
            clear_selection_on_edit: true,
            outside_watch: WatchMode::Persistent,
            pending_clear: Rc::new(Cell::new(false)),
        }
    }

    pub fn tree(&self) -> &MemoryTree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn manager(&self) -> &SelectionManager<I> {
        &self.manager
    }

    /// Current paths of the selected nodes, in selection order.
    pub fn selected_paths(&self) -> Vec<TreePath> {
        self.selection
            .iter()
            .filter_map(|entry| entry.locate(&self.tree))
            .collect()
    }

    pub fn click(&mut self, path: &TreePath, modifiers: Modifiers) -> Result<&SelectionSet> {
        let click = Click {
            path: path.clone(),
            modifiers,
        };
        self.selection = self.manager.next_selection(&self.selection, &self.tree, &click)?;
        Ok(&self.selection)
    }

    pub fn clear_selection(&mut self) {
        self.selection = self.manager.clear();
    }

    /// Clear the selection and leave rename mode on every node.
    pub fn deselect_all(&mut self) {
        self.clear_selection();
        let _ended = self.tree.end_editing_all();

        #[cfg(feature = "tracing")]
        tracing::debug!(ended_edits = _ended, "deselected all");
    }

    /// Attach an outside-activation watcher for `region`. Triggers are queued and applied by
    /// [`TreeView::apply_pending_clear`]; dropping the guard stops them.
    pub fn attach_outside_watcher(&self, hub: &GestureHub, region: RegionId) -> WatchGuard {
        let pending = self.pending_clear.clone();
        hub.watch_outside(region, self.outside_watch, move |_| pending.set(true))
    }

    /// Run a queued outside-activation clear. Returns whether one was pending.
    pub fn apply_pending_clear(&mut self) -> bool {
        if !self.pending_clear.replace(false) {
            return false;
        }
        self.deselect_all();
        true
    }

    pub fn begin_edit(&mut self, path: &TreePath) -> Result<()> {
        let node = self.node(path)?;
        if node.editing_disabled {
            return Err(Error::EditingDisabled(path.clone()));
        }
        if self.clear_selection_on_edit {
            self.clear_selection();
        }
        // One rename at a time.
        self.tree.end_editing_all();
        self.tree.change_node_at_path(path, |node| {
            node.prev_title = Some(node.title.clone());
            node.is_editing = true;
            node.drag_temporarily_disabled = true;
        })
    }

    pub fn commit_edit(&mut self, path: &TreePath, title: impl Into<String>) -> Result<()> {
        self.ensure_editing(path)?;
        let title = title.into();
        self.tree.change_node_at_path(path, |node| {
            node.title = title;
            node.prev_title = None;
            node.is_editing = false;
            node.drag_temporarily_disabled = false;
        })
    }

    pub fn cancel_edit(&mut self, path: &TreePath) -> Result<()> {
        self.ensure_editing(path)?;
        self.tree.change_node_at_path(path, |node| {
            if let Some(prev) = node.prev_title.take() {
                node.title = prev;
            }
            node.is_editing = false;
            node.drag_temporarily_disabled = false;
        })
    }

    pub fn toggle_expanded(&mut self, path: &TreePath) -> Result<bool> {
        let expanded = !self.node(path)?.expanded;
        self.tree.set_expanded(path, expanded)?;
        Ok(expanded)
    }

    pub fn expand_all(&mut self) {
        self.tree.toggle_expanded_for_all(true);
    }

    pub fn collapse_all(&mut self) {
        self.tree.toggle_expanded_for_all(false);
    }

    pub fn insert(
        &mut self,
        parent: Option<&TreePath>,
        position: usize,
        item: TreeItem,
    ) -> Result<TreePath> {
        let path = self.tree.insert(parent, position, item)?;
        self.reconcile();
        Ok(path)
    }

    pub fn move_node(
        &mut self,
        from: &TreePath,
        new_parent: Option<&TreePath>,
        position: usize,
    ) -> Result<TreePath> {
        if !self.node(from)?.can_drag() {
            return Err(Error::InvalidMove(format!("node at {from} cannot be dragged")));
        }
        let path = self.tree.move_node(from, new_parent, position)?;
        self.reconcile();
        Ok(path)
    }

    pub fn remove(&mut self, path: &TreePath) -> Result<TreeItem> {
        let removed = self.tree.remove(path)?;
        self.reconcile();
        Ok(removed)
    }

    pub fn can_drag(&self, path: &TreePath) -> Result<bool> {
        Ok(self.node(path)?.can_drag())
    }

    pub fn row_state(&self, path: &TreePath, dragged: Option<&TreePath>) -> Result<RowState> {
        let node = self.node(path)?;
        let membership = self.manager.membership(&self.selection, &self.tree, path)?;
        let multiple_dragging = match dragged {
            Some(dragged) => {
                self.manager
                    .multiple_nodes_dragging(&self.selection, &self.tree, dragged, path)?
            }
            None => false,
        };
        Ok(RowState {
            membership,
            can_drag: node.can_drag(),
            is_editing: node.is_editing,
            expanded: node.expanded,
            multiple_dragging,
            dragged_descendant: dragged.is_some_and(|d| d.is_strict_prefix_of(path)),
        })
    }

    fn reconcile(&mut self) {
        self.selection = self.manager.reconcile(&self.selection, &self.tree);
    }

    fn node(&self, path: &TreePath) -> Result<&TreeItem> {
        self.tree
            .node_at(path)
            .ok_or_else(|| Error::UnresolvedPath(path.clone()))
    }

    fn ensure_editing(&self, path: &TreePath) -> Result<()> {
        if self.node(path)?.is_editing {
            Ok(())
        } else {
            Err(Error::NotEditing(path.clone()))
        }
    }
}
