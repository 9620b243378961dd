//! Example session for the treeselect core: the farm tree, a scripted set of user actions,
//! and a plain-text row rendering of the result after each action.

pub mod render;
pub mod script;

use anyhow::Context;
use treeselect_core::{MemoryTree, TreeItem};

const FARM_JSON: &str = include_str!("../data/farm.json");

/// The demo forest, parsed from the bundled JSON.
pub fn load_farm() -> anyhow::Result<MemoryTree> {
    parse_tree(FARM_JSON).context("bundled farm data")
}

pub fn parse_tree(json: &str) -> anyhow::Result<MemoryTree> {
    let roots: Vec<TreeItem> = serde_json::from_str(json).context("parsing tree JSON")?;
    Ok(MemoryTree::new(roots)?)
}
