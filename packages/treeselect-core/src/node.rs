use crate::ids::NodeId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node as the host tree stores it.
///
/// The selection core reads `id` and the child structure only. The remaining flags belong to
/// the host session (expand state, rename mode, drag gating).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TreeItem {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub id: Option<NodeId>,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub subtitle: Option<String>,
    pub children: Vec<TreeItem>,
    pub expanded: bool,
    pub is_editing: bool,
    pub drag_disabled: bool,
    pub drag_temporarily_disabled: bool,
    pub editing_disabled: bool,
    /// Title before the current rename started; restored on cancel.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub prev_title: Option<String>,
}

impl TreeItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(NodeId(id));
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeItem>) -> Self {
        self.children = children;
        self
    }

    pub fn child(mut self, child: TreeItem) -> Self {
        self.children.push(child);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn drag_disabled(mut self, disabled: bool) -> Self {
        self.drag_disabled = disabled;
        self
    }

    pub fn editing_disabled(mut self, disabled: bool) -> Self {
        self.editing_disabled = disabled;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Drag is allowed unless disabled permanently or for the duration of a rename.
    pub fn can_drag(&self) -> bool {
        !self.drag_disabled && !self.drag_temporarily_disabled
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// The node half of a path-keyed selection entry, captured at selection time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSnapshot {
    pub id: Option<NodeId>,
    pub title: String,
}
