use crate::ids::{NodeId, TreePath};
use crate::node::TreeItem;

/// Structural queries the selection core needs from whoever owns the tree.
///
/// Implementations must keep `path_of` and `parent_of` consistent with `node_at` for every node
/// that carries an id.
pub trait TreeIndex {
    fn node_at(&self, path: &TreePath) -> Option<&TreeItem>;
    fn path_of(&self, node: NodeId) -> Option<TreePath>;
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    fn contains(&self, node: NodeId) -> bool {
        self.path_of(node).is_some()
    }
}
