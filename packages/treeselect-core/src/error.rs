use thiserror::Error;

use crate::ids::{NodeId, TreePath};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("path {0} does not resolve to a node")]
    UnresolvedPath(TreePath),
    #[error("node at {0} has no stable id")]
    MissingNodeId(TreePath),
    #[error("duplicate node key: {0}")]
    DuplicateKey(String),
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("editing is disabled for node at {0}")]
    EditingDisabled(TreePath),
    #[error("node at {0} is not being edited")]
    NotEditing(TreePath),
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
    #[error("config error: {0}")]
    Config(String),
}
