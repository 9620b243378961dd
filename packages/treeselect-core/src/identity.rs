use crate::error::{Error, Result};
use crate::ids::{NodeId, TreePath};
use crate::node::{NodeSnapshot, TreeItem};
use crate::selection::SelectionEntry;
use crate::traits::TreeIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Comparable identity of a selected node.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SelectionKey {
    Id(NodeId),
    Path(TreePath),
}

/// Pluggable node identity: how a node is keyed and how its ancestry is answered.
pub trait Identity {
    fn key_of<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionKey>;

    /// The entry recorded in a selection set when the node at `path` is selected.
    fn entry_for<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionEntry>;

    /// Keys of every strict ancestor of the node `key` identifies, outermost first.
    fn ancestors_of<T: TreeIndex + ?Sized>(
        &self,
        tree: &T,
        key: &SelectionKey,
    ) -> Result<Vec<SelectionKey>>;

    /// Whether `entry` still names a node of `tree`.
    fn resolves<T: TreeIndex + ?Sized>(&self, tree: &T, entry: &SelectionEntry) -> bool;
}

fn resolve<'a, T: TreeIndex + ?Sized>(tree: &'a T, path: &TreePath) -> Result<&'a TreeItem> {
    tree.node_at(path)
        .ok_or_else(|| Error::UnresolvedPath(path.clone()))
}

// Without ids on both sides the title captured at selection time is the only witness that the
// path still names the same node.
fn path_entry_resolves<T: TreeIndex + ?Sized>(
    tree: &T,
    snapshot: &NodeSnapshot,
    path: &TreePath,
) -> bool {
    match tree.node_at(path) {
        Some(node) => match (snapshot.id, node.id) {
            (Some(expected), Some(actual)) => expected == actual,
            _ => node.title == snapshot.title,
        },
        None => false,
    }
}

/// Keys nodes by their path. Needs no node metadata, but keys shift when siblings are
/// inserted, removed or reordered above a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathIdentity;

impl Identity for PathIdentity {
    fn key_of<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionKey> {
        resolve(tree, path)?;
        Ok(SelectionKey::Path(path.clone()))
    }

    fn entry_for<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionEntry> {
        let node = resolve(tree, path)?;
        Ok(SelectionEntry::Path {
            node: node.snapshot(),
            path: path.clone(),
        })
    }

    fn ancestors_of<T: TreeIndex + ?Sized>(
        &self,
        tree: &T,
        key: &SelectionKey,
    ) -> Result<Vec<SelectionKey>> {
        let path = match key {
            SelectionKey::Path(path) => path.clone(),
            SelectionKey::Id(id) => tree.path_of(*id).ok_or(Error::UnknownNode(*id))?,
        };
        Ok(path.strict_prefixes().map(SelectionKey::Path).collect())
    }

    fn resolves<T: TreeIndex + ?Sized>(&self, tree: &T, entry: &SelectionEntry) -> bool {
        match entry {
            SelectionEntry::Path { node, path } => path_entry_resolves(tree, node, path),
            SelectionEntry::Id(id) => tree.contains(*id),
        }
    }
}

/// Keys nodes by their persistent id. Survives structural edits as long as the tree keeps
/// ids unique and stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StableIdIdentity;

impl StableIdIdentity {
    fn id_at<T: TreeIndex + ?Sized>(tree: &T, path: &TreePath) -> Result<NodeId> {
        resolve(tree, path)?
            .id
            .ok_or_else(|| Error::MissingNodeId(path.clone()))
    }
}

impl Identity for StableIdIdentity {
    fn key_of<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionKey> {
        Self::id_at(tree, path).map(SelectionKey::Id)
    }

    fn entry_for<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionEntry> {
        Self::id_at(tree, path).map(SelectionEntry::Id)
    }

    fn ancestors_of<T: TreeIndex + ?Sized>(
        &self,
        tree: &T,
        key: &SelectionKey,
    ) -> Result<Vec<SelectionKey>> {
        let start = match key {
            SelectionKey::Id(id) => *id,
            SelectionKey::Path(path) => Self::id_at(tree, path)?,
        };
        let path = tree.path_of(start).ok_or(Error::UnknownNode(start))?;
        // Every node on the chain must carry an id, or ancestry silently stops at the gap.
        let chain: Result<Vec<_>> = path
            .strict_prefixes()
            .map(|prefix| Self::id_at(tree, &prefix).map(SelectionKey::Id))
            .collect();
        chain
    }

    fn resolves<T: TreeIndex + ?Sized>(&self, tree: &T, entry: &SelectionEntry) -> bool {
        match entry {
            SelectionEntry::Id(id) => tree.contains(*id),
            SelectionEntry::Path { node, path } => {
                node.id.is_some_and(|id| tree.contains(id)) || path_entry_resolves(tree, node, path)
            }
        }
    }
}

/// Identity scheme chosen by the host at configuration time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum IdentityStrategy {
    Path,
    #[default]
    StableId,
}

impl Identity for IdentityStrategy {
    fn key_of<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionKey> {
        match self {
            Self::Path => PathIdentity.key_of(tree, path),
            Self::StableId => StableIdIdentity.key_of(tree, path),
        }
    }

    fn entry_for<T: TreeIndex + ?Sized>(&self, tree: &T, path: &TreePath) -> Result<SelectionEntry> {
        match self {
            Self::Path => PathIdentity.entry_for(tree, path),
            Self::StableId => StableIdIdentity.entry_for(tree, path),
        }
    }

    fn ancestors_of<T: TreeIndex + ?Sized>(
        &self,
        tree: &T,
        key: &SelectionKey,
    ) -> Result<Vec<SelectionKey>> {
        match self {
            Self::Path => PathIdentity.ancestors_of(tree, key),
            Self::StableId => StableIdIdentity.ancestors_of(tree, key),
        }
    }

    fn resolves<T: TreeIndex + ?Sized>(&self, tree: &T, entry: &SelectionEntry) -> bool {
        match self {
            Self::Path => PathIdentity.resolves(tree, entry),
            Self::StableId => StableIdIdentity.resolves(tree, entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    fn tree() -> MemoryTree {
        MemoryTree::new(vec![
            TreeItem::new("Sheep")
                .with_id(3)
                .child(TreeItem::new("Wool").with_id(7).child(TreeItem::new("Yarn").with_id(20))),
            TreeItem::new("untracked"),
        ])
        .unwrap()
    }

    #[test]
    fn stable_id_ancestors_cover_the_whole_chain() {
        let tree = tree();
        let key = StableIdIdentity.key_of(&tree, &TreePath::new([0, 0, 0])).unwrap();
        assert_eq!(key, SelectionKey::Id(NodeId(20)));
        let ancestors = StableIdIdentity.ancestors_of(&tree, &key).unwrap();
        assert_eq!(
            ancestors,
            vec![SelectionKey::Id(NodeId(3)), SelectionKey::Id(NodeId(7))]
        );
    }

    #[test]
    fn path_ancestors_are_prefixes() {
        let tree = tree();
        let key = PathIdentity.key_of(&tree, &TreePath::new([0, 0, 0])).unwrap();
        let ancestors = PathIdentity.ancestors_of(&tree, &key).unwrap();
        assert_eq!(
            ancestors,
            vec![
                SelectionKey::Path(TreePath::new([0])),
                SelectionKey::Path(TreePath::new([0, 0]))
            ]
        );
    }

    #[test]
    fn stable_id_requires_an_id() {
        let tree = tree();
        let err = StableIdIdentity.key_of(&tree, &TreePath::new([1])).unwrap_err();
        assert_eq!(err, Error::MissingNodeId(TreePath::new([1])));
        assert!(PathIdentity.key_of(&tree, &TreePath::new([1])).is_ok());
    }

    #[test]
    fn unresolved_paths_fail_fast() {
        let tree = tree();
        for strategy in [IdentityStrategy::Path, IdentityStrategy::StableId] {
            let err = strategy.key_of(&tree, &TreePath::new([0, 4])).unwrap_err();
            assert_eq!(err, Error::UnresolvedPath(TreePath::new([0, 4])));
        }
    }

    #[test]
    fn stable_id_ancestry_rejects_a_gap_in_the_chain() {
        let tree = MemoryTree::new(vec![TreeItem::new("Cow")
            .with_id(1)
            .child(TreeItem::new("Milk").child(TreeItem::new("Cheese").with_id(3)))])
        .unwrap();
        let err = StableIdIdentity
            .ancestors_of(&tree, &SelectionKey::Id(NodeId(3)))
            .unwrap_err();
        assert_eq!(err, Error::MissingNodeId(TreePath::new([0, 0])));
    }

    #[test]
    fn untracked_path_entry_checks_the_title() {
        let tree = tree();
        let same = SelectionEntry::Path {
            node: TreeItem::new("untracked").snapshot(),
            path: TreePath::new([1]),
        };
        let moved = SelectionEntry::Path {
            node: TreeItem::new("Goat").snapshot(),
            path: TreePath::new([1]),
        };
        assert!(PathIdentity.resolves(&tree, &same));
        assert!(!PathIdentity.resolves(&tree, &moved));
    }

    #[test]
    fn path_entry_with_mismatched_id_does_not_resolve() {
        let tree = tree();
        let entry = SelectionEntry::Path {
            node: TreeItem::new("Wool").with_id(99).snapshot(),
            path: TreePath::new([0, 0]),
        };
        assert!(!PathIdentity.resolves(&tree, &entry));
    }
}
