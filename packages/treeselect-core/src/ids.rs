use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier carried by a node when the host configures id-based identity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Child indices from the top-level forest down to a node.
///
/// Every non-final prefix of a path locates an ancestor of the node the full path locates.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TreePath(Vec<usize>);

impl TreePath {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// Path of the `index`-th top-level node.
    pub fn root_level(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<TreePath> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(Self(self.0[..n - 1].to_vec())),
        }
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// True when `self` locates a strict ancestor of the node `other` locates.
    pub fn is_strict_prefix_of(&self, other: &TreePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Paths of every strict ancestor, outermost first.
    pub fn strict_prefixes(&self) -> impl Iterator<Item = TreePath> + '_ {
        (1..self.0.len()).map(move |len| Self(self.0[..len].to_vec()))
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl From<&[usize]> for TreePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<empty>");
        }
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}
