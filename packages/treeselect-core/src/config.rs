use crate::gesture::WatchMode;
use crate::identity::IdentityStrategy;
use crate::selection::CoveredClickPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host-chosen behaviour of a tree view's selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SelectionConfig {
    pub identity: IdentityStrategy,
    /// Entering rename mode clears the selection first.
    pub clear_selection_on_edit: bool,
    pub outside_watch: WatchMode,
    pub covered_click: CoveredClickPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            identity: IdentityStrategy::StableId,
            clear_selection_on_edit: true,
            outside_watch: WatchMode::Persistent,
            covered_click: CoveredClickPolicy::default(),
        }
    }
}

#[cfg(feature = "serde")]
impl SelectionConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_json_string(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
