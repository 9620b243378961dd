//! Selection state transitions for a tree view.
//!
//! The selection set lives with the host. Every click is turned into the next set by
//! [`SelectionManager::next_selection`], which never mutates its inputs. Transitions keep the
//! exclusivity invariant: no entry is a strict ancestor or a strict descendant of another.

use crate::error::{Error, Result};
use crate::identity::{Identity, IdentityStrategy, SelectionKey};
use crate::ids::{NodeId, TreePath};
use crate::node::NodeSnapshot;
use crate::traits::TreeIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One selected node, recorded in the shape its identity scheme needs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SelectionEntry {
    Id(NodeId),
    Path { node: NodeSnapshot, path: TreePath },
}

impl SelectionEntry {
    pub fn key(&self) -> SelectionKey {
        match self {
            Self::Id(id) => SelectionKey::Id(*id),
            Self::Path { path, .. } => SelectionKey::Path(path.clone()),
        }
    }

    /// Where the entry currently sits in `tree`, if anywhere.
    pub fn locate<T: TreeIndex + ?Sized>(&self, tree: &T) -> Option<TreePath> {
        match self {
            Self::Id(id) => tree.path_of(*id),
            Self::Path { path, .. } => tree.node_at(path).map(|_| path.clone()),
        }
    }
}

/// Selected nodes in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SelectionSet(Vec<SelectionEntry>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(entry: SelectionEntry) -> Self {
        Self(vec![entry])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectionEntry> {
        self.0.iter()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.0
    }

    /// Most recently added entry.
    pub fn last(&self) -> Option<&SelectionEntry> {
        self.0.last()
    }

    pub fn keys(&self) -> Vec<SelectionKey> {
        self.0.iter().map(SelectionEntry::key).collect()
    }

    pub fn contains_key(&self, key: &SelectionKey) -> bool {
        self.0.iter().any(|entry| &entry.key() == key)
    }

    fn without_key(&self, key: &SelectionKey) -> Self {
        Self(
            self.0
                .iter()
                .filter(|entry| &entry.key() != key)
                .cloned()
                .collect(),
        )
    }
}

impl FromIterator<SelectionEntry> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = SelectionEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a SelectionEntry;
    type IntoIter = std::slice::Iter<'a, SelectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Keyboard modifiers held during a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Command key on macOS, treated like ctrl.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
    };

    /// Whether the click adds to / removes from the selection instead of replacing it.
    pub fn toggle(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Click {
    pub path: TreePath,
    pub modifiers: Modifiers,
}

impl Click {
    pub fn plain(path: impl Into<TreePath>) -> Self {
        Self {
            path: path.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn toggle(path: impl Into<TreePath>) -> Self {
        Self {
            path: path.into(),
            modifiers: Modifiers::CTRL,
        }
    }
}

/// Derived per-node selection state used for styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    Unselected,
    Selected,
    /// Not selected itself, but some ancestor is.
    Covered,
}

/// What a plain click does on a node whose ancestor is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum CoveredPlainClick {
    /// Selection becomes exactly the clicked node.
    #[default]
    Replace,
    Ignore,
}

/// What a toggle click does on a node whose ancestor is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum CoveredToggleClick {
    /// The covering ancestor is dropped and the clicked node appended.
    #[default]
    Retract,
    Ignore,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct CoveredClickPolicy {
    pub plain: CoveredPlainClick,
    pub toggle: CoveredToggleClick,
}

/// Pure selection transitions over a host-owned [`SelectionSet`].
#[derive(Clone, Debug, Default)]
pub struct SelectionManager<I = IdentityStrategy> {
    identity: I,
    policy: CoveredClickPolicy,
}

impl<I: Identity> SelectionManager<I> {
    pub fn new(identity: I) -> Self {
        Self {
            identity,
            policy: CoveredClickPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CoveredClickPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn policy(&self) -> CoveredClickPolicy {
        self.policy
    }

    /// Compute the selection that results from `click`.
    ///
    /// `current` must already satisfy the exclusivity invariant; the result does too.
    /// Fails when the click path does not resolve or the identity scheme cannot key the node.
    pub fn next_selection<T: TreeIndex + ?Sized>(
        &self,
        current: &SelectionSet,
        tree: &T,
        click: &Click,
    ) -> Result<SelectionSet> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "selection_transition",
            path = %click.path,
            toggle = click.modifiers.toggle(),
            selected = current.len()
        )
        .entered();

        let node_key = self.identity.key_of(tree, &click.path)?;
        let is_selected = current.contains_key(&node_key);
        let ancestors = self.identity.ancestors_of(tree, &node_key)?;
        let is_any_parent_selected = current.iter().any(|entry| ancestors.contains(&entry.key()));
        let toggle = click.modifiers.toggle();

        if is_any_parent_selected && !is_selected {
            let ignore = if toggle {
                self.policy.toggle == CoveredToggleClick::Ignore
            } else {
                self.policy.plain == CoveredPlainClick::Ignore
            };
            if ignore {
                #[cfg(feature = "tracing")]
                tracing::debug!("click under a selected ancestor ignored");
                return Ok(current.clone());
            }
            if !toggle {
                return Ok(SelectionSet::single(self.identity.entry_for(tree, &click.path)?));
            }
        }

        if !toggle {
            if is_selected && current.len() == 1 {
                return Ok(SelectionSet::new());
            }
            return Ok(SelectionSet::single(self.identity.entry_for(tree, &click.path)?));
        }

        if is_selected {
            return Ok(current.without_key(&node_key));
        }

        let entry = self.identity.entry_for(tree, &click.path)?;
        let mut next = Vec::with_capacity(current.len() + 1);
        for existing in current {
            let key = existing.key();
            if ancestors.contains(&key) {
                continue;
            }
            // Selecting a node covers its subtree, so selected descendants drop out too.
            if self.identity.ancestors_of(tree, &key)?.contains(&node_key) {
                continue;
            }
            next.push(existing.clone());
        }
        next.push(entry);
        Ok(SelectionSet(next))
    }

    pub fn clear(&self) -> SelectionSet {
        SelectionSet::new()
    }

    pub fn membership<T: TreeIndex + ?Sized>(
        &self,
        set: &SelectionSet,
        tree: &T,
        path: &TreePath,
    ) -> Result<Membership> {
        let key = self.identity.key_of(tree, path)?;
        if set.contains_key(&key) {
            return Ok(Membership::Selected);
        }
        let ancestors = self.identity.ancestors_of(tree, &key)?;
        if set.iter().any(|entry| ancestors.contains(&entry.key())) {
            return Ok(Membership::Covered);
        }
        Ok(Membership::Unselected)
    }

    pub fn is_member_or_descendant_of_member<T: TreeIndex + ?Sized>(
        &self,
        set: &SelectionSet,
        tree: &T,
        path: &TreePath,
    ) -> Result<bool> {
        Ok(self.membership(set, tree, path)? != Membership::Unselected)
    }

    /// Whether the row at `row` should show the "multiple nodes are being dragged" indicator.
    pub fn multiple_nodes_dragging<T: TreeIndex + ?Sized>(
        &self,
        set: &SelectionSet,
        tree: &T,
        dragged: &TreePath,
        row: &TreePath,
    ) -> Result<bool> {
        if set.len() <= 1 {
            return Ok(false);
        }
        Ok(self.identity.key_of(tree, dragged)? == self.identity.key_of(tree, row)?)
    }

    /// Bring `set` back in line with `tree` after a structural mutation.
    ///
    /// Entries that no longer resolve are dropped, then entries now covered by another
    /// selected ancestor. Order of the survivors is kept.
    pub fn reconcile<T: TreeIndex + ?Sized>(&self, set: &SelectionSet, tree: &T) -> SelectionSet {
        let resolved: Vec<(SelectionEntry, Vec<SelectionKey>)> = set
            .iter()
            .filter(|entry| self.identity.resolves(tree, entry))
            .filter_map(|entry| {
                let ancestors = self.identity.ancestors_of(tree, &entry.key()).ok()?;
                Some((entry.clone(), ancestors))
            })
            .collect();
        let keys: Vec<SelectionKey> = resolved.iter().map(|(entry, _)| entry.key()).collect();
        let next: SelectionSet = resolved
            .into_iter()
            .filter(|(_, ancestors)| !ancestors.iter().any(|a| keys.contains(a)))
            .map(|(entry, _)| entry)
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dropped = set.len() - next.len(),
            kept = next.len(),
            "reconciled selection after tree mutation"
        );
        next
    }

    /// Verify the exclusivity invariant and key uniqueness. Intended for tests and debugging.
    pub fn check_exclusive<T: TreeIndex + ?Sized>(&self, set: &SelectionSet, tree: &T) -> Result<()> {
        let keys = set.keys();
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(Error::DuplicateKey(format!("{key:?}")));
            }
            let ancestors = self.identity.ancestors_of(tree, key)?;
            if let Some(ancestor) = ancestors.iter().find(|a| keys.contains(a)) {
                return Err(Error::InconsistentState(format!(
                    "{key:?} is selected together with its ancestor {ancestor:?}"
                )));
            }
        }
        Ok(())
    }
}
