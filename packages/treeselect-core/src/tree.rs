use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ids::{NodeId, TreePath};
use crate::node::TreeItem;
use crate::traits::TreeIndex;

#[derive(Clone, Debug)]
struct IndexEntry {
    parent: Option<NodeId>,
    path: TreePath,
}

/// In-memory forest with an id index that is rebuilt after every structural change.
///
/// Nodes without an id are reachable by path only.
#[derive(Clone, Debug, Default)]
pub struct MemoryTree {
    roots: Vec<TreeItem>,
    index: HashMap<NodeId, IndexEntry>,
}

impl MemoryTree {
    pub fn new(roots: Vec<TreeItem>) -> Result<Self> {
        let index = build_index(&roots)?;
        Ok(Self { roots, index })
    }

    pub fn roots(&self) -> &[TreeItem] {
        &self.roots
    }

    /// Number of nodes carrying an id.
    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }

    /// Every node in pre-order with its path.
    pub fn walk(&self) -> Vec<(TreePath, &TreeItem)> {
        let mut out = Vec::new();
        let mut stack: Vec<(TreePath, &TreeItem)> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, item)| (TreePath::root_level(i), item))
            .collect();
        while let Some((path, item)) = stack.pop() {
            for (i, child) in item.children.iter().enumerate().rev() {
                stack.push((path.child(i), child));
            }
            out.push((path, item));
        }
        out
    }

    /// Apply `update` to the node at `path`. Changes that would duplicate an id are rolled back.
    pub fn change_node_at_path(
        &mut self,
        path: &TreePath,
        update: impl FnOnce(&mut TreeItem),
    ) -> Result<()> {
        let node = node_at_mut(&mut self.roots, path)
            .ok_or_else(|| Error::UnresolvedPath(path.clone()))?;
        let before = node.clone();
        update(node);
        let id_changed = before.id != node.id;
        if id_changed {
            if let Err(err) = self.rebuild_index() {
                if let Some(node) = node_at_mut(&mut self.roots, path) {
                    *node = before;
                }
                self.rebuild_index()?;
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn set_expanded(&mut self, path: &TreePath, expanded: bool) -> Result<()> {
        self.change_node_at_path(path, |node| node.expanded = expanded)
    }

    /// Set `expanded` on every node.
    pub fn toggle_expanded_for_all(&mut self, expanded: bool) {
        fn apply(items: &mut [TreeItem], expanded: bool) {
            for item in items {
                item.expanded = expanded;
                apply(&mut item.children, expanded);
            }
        }
        apply(&mut self.roots, expanded);
    }

    /// Leave rename mode everywhere. Returns how many nodes were editing.
    pub fn end_editing_all(&mut self) -> usize {
        fn apply(items: &mut [TreeItem]) -> usize {
            let mut ended = 0;
            for item in items {
                if item.is_editing {
                    item.is_editing = false;
                    item.drag_temporarily_disabled = false;
                    item.prev_title = None;
                    ended += 1;
                }
                ended += apply(&mut item.children);
            }
            ended
        }
        apply(&mut self.roots)
    }

    /// Insert `item` as the `position`-th child of `parent` (top level when `None`).
    /// Positions past the end append.
    pub fn insert(
        &mut self,
        parent: Option<&TreePath>,
        position: usize,
        item: TreeItem,
    ) -> Result<TreePath> {
        let mut ids = Vec::new();
        collect_ids(std::slice::from_ref(&item), &mut ids);
        for id in ids {
            if self.index.contains_key(&id) {
                return Err(Error::DuplicateKey(id.to_string()));
            }
        }
        let path = self.attach(parent, position, item)?;
        self.rebuild_index()?;
        Ok(path)
    }

    /// Detach the subtree rooted at `path`.
    pub fn remove(&mut self, path: &TreePath) -> Result<TreeItem> {
        let removed = self.detach(path)?;
        self.rebuild_index()?;
        Ok(removed)
    }

    /// Move the subtree at `from` to be the `position`-th child of `new_parent`.
    ///
    /// `new_parent` is interpreted against the tree before the move; `position` against the
    /// sibling list after the node has been detached. Moving a node under itself is rejected.
    pub fn move_node(
        &mut self,
        from: &TreePath,
        new_parent: Option<&TreePath>,
        position: usize,
    ) -> Result<TreePath> {
        if self.node_at(from).is_none() {
            return Err(Error::UnresolvedPath(from.clone()));
        }
        if let Some(parent) = new_parent {
            if introduces_cycle(from, parent) {
                return Err(Error::InvalidMove(format!(
                    "cannot move {from} under its own subtree at {parent}"
                )));
            }
            if self.node_at(parent).is_none() {
                return Err(Error::UnresolvedPath(parent.clone()));
            }
        }
        let adjusted_parent = new_parent.map(|parent| shift_after_detach(from, parent));
        let node = self.detach(from)?;
        let path = self.attach(adjusted_parent.as_ref(), position, node)?;
        self.rebuild_index()?;
        Ok(path)
    }

    /// Validate invariants: unique ids and an index that agrees with the structure.
    /// Intended for tests and debugging.
    pub fn validate_invariants(&self) -> Result<()> {
        let rebuilt = build_index(&self.roots)?;
        if rebuilt.len() != self.index.len() {
            return Err(Error::InconsistentState("index size mismatch".into()));
        }
        for (id, entry) in &self.index {
            let node = self
                .node_at(&entry.path)
                .ok_or_else(|| Error::InconsistentState(format!("{id} indexed at dangling path")))?;
            if node.id != Some(*id) {
                return Err(Error::InconsistentState(format!("{id} indexed at wrong path")));
            }
            let expected_parent = entry
                .path
                .parent()
                .and_then(|p| self.node_at(&p))
                .and_then(|p| p.id);
            if entry.parent != expected_parent {
                return Err(Error::InconsistentState(format!("{id} parent mismatch")));
            }
        }
        Ok(())
    }

    fn rebuild_index(&mut self) -> Result<()> {
        self.index = build_index(&self.roots)?;
        Ok(())
    }

    fn siblings_mut(&mut self, parent: Option<&TreePath>) -> Result<&mut Vec<TreeItem>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(path) => node_at_mut(&mut self.roots, path)
                .map(|node| &mut node.children)
                .ok_or_else(|| Error::UnresolvedPath(path.clone())),
        }
    }

    fn detach(&mut self, path: &TreePath) -> Result<TreeItem> {
        let idx = path
            .last()
            .ok_or_else(|| Error::UnresolvedPath(path.clone()))?;
        let parent = path.parent();
        let siblings = self.siblings_mut(parent.as_ref())?;
        if idx >= siblings.len() {
            return Err(Error::UnresolvedPath(path.clone()));
        }
        Ok(siblings.remove(idx))
    }

    fn attach(
        &mut self,
        parent: Option<&TreePath>,
        position: usize,
        item: TreeItem,
    ) -> Result<TreePath> {
        let siblings = self.siblings_mut(parent)?;
        let idx = position.min(siblings.len());
        siblings.insert(idx, item);
        Ok(match parent {
            Some(p) => p.child(idx),
            None => TreePath::root_level(idx),
        })
    }
}

impl TreeIndex for MemoryTree {
    fn node_at(&self, path: &TreePath) -> Option<&TreeItem> {
        let (first, rest) = path.as_slice().split_first()?;
        let mut node = self.roots.get(*first)?;
        for idx in rest {
            node = node.children.get(*idx)?;
        }
        Some(node)
    }

    fn path_of(&self, node: NodeId) -> Option<TreePath> {
        self.index.get(&node).map(|entry| entry.path.clone())
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.index.get(&node).and_then(|entry| entry.parent)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }
}

fn node_at_mut<'a>(roots: &'a mut [TreeItem], path: &TreePath) -> Option<&'a mut TreeItem> {
    let (first, rest) = path.as_slice().split_first()?;
    let mut node = roots.get_mut(*first)?;
    for idx in rest {
        node = node.children.get_mut(*idx)?;
    }
    Some(node)
}

fn build_index(roots: &[TreeItem]) -> Result<HashMap<NodeId, IndexEntry>> {
    let mut index = HashMap::new();
    let mut stack: Vec<(TreePath, Option<NodeId>, &TreeItem)> = roots
        .iter()
        .enumerate()
        .map(|(i, item)| (TreePath::root_level(i), None, item))
        .collect();
    while let Some((path, parent, item)) = stack.pop() {
        if let Some(id) = item.id {
            let entry = IndexEntry {
                parent,
                path: path.clone(),
            };
            if index.insert(id, entry).is_some() {
                return Err(Error::DuplicateKey(id.to_string()));
            }
        }
        for (i, child) in item.children.iter().enumerate() {
            stack.push((path.child(i), item.id, child));
        }
    }
    Ok(index)
}

fn collect_ids(items: &[TreeItem], out: &mut Vec<NodeId>) {
    for item in items {
        out.extend(item.id);
        collect_ids(&item.children, out);
    }
}

fn introduces_cycle(node: &TreePath, potential_parent: &TreePath) -> bool {
    node == potential_parent || node.is_strict_prefix_of(potential_parent)
}

/// Re-express `target` for the tree in which `removed` has been detached.
fn shift_after_detach(removed: &TreePath, target: &TreePath) -> TreePath {
    let removed = removed.as_slice();
    let level = removed.len() - 1;
    let mut indices = target.as_slice().to_vec();
    if indices.len() > level
        && indices[..level] == removed[..level]
        && indices[level] > removed[level]
    {
        indices[level] -= 1;
    }
    TreePath::new(indices)
}
