#![forbid(unsafe_code)]
//! Selection state for sortable tree views.
//! The core turns clicks into the next selection set while keeping selected nodes free of
//! ancestor/descendant overlap. Node identity is pluggable (path-keyed or stable-id-keyed), and
//! the tree itself stays behind the [`TreeIndex`] trait so any host store can plug in.

pub mod config;
pub mod error;
pub mod gesture;
pub mod identity;
pub mod ids;
pub mod node;
pub mod selection;
pub mod traits;
pub mod tree;
pub mod view;

pub use config::SelectionConfig;
pub use error::{Error, Result};
pub use gesture::{Gesture, GestureHub, Key, RegionId, WatchGuard, WatchMode};
pub use identity::{Identity, IdentityStrategy, PathIdentity, SelectionKey, StableIdIdentity};
pub use ids::{NodeId, TreePath};
pub use node::{NodeSnapshot, TreeItem};
pub use selection::{
    Click, CoveredClickPolicy, CoveredPlainClick, CoveredToggleClick, Membership, Modifiers,
    SelectionEntry, SelectionManager, SelectionSet,
};
pub use traits::TreeIndex;
pub use tree::MemoryTree;
pub use view::{RowState, TreeView};
