//! Node paths
//!
//! A path is the list of sibling indices from the document root to a node, written as
//! semicolon separated integers (`"1;0;2"`). The empty path addresses the root. When the last
//! step lands on a command, one extra index addresses one of its arguments.
//!
//! Paths order lexicographically, which is document (pre-order) order.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath(Vec<usize>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path `{input}`: `{segment}` is not a non-negative integer")]
pub struct PathParseError {
    pub input: String,
    pub segment: String,
}

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the parent container, `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Sibling index of the addressed node, `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Same parent, different sibling index.
    pub fn with_last(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        match indices.last_mut() {
            Some(last) => *last = index,
            None => indices.push(index),
        }
        Self(indices)
    }

    /// True when `other` lies strictly below `self`.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_sibling_of(&self, other: &NodePath) -> bool {
        !self.is_root() && !other.is_root() && self.parent() == other.parent()
    }

    /// Where this path points once a node has been inserted at `inserted`.
    ///
    /// Later siblings of the inserted node, and everything below them, move one index up at
    /// the insertion depth. Every other path is unchanged.
    pub fn after_insert(&self, inserted: &NodePath) -> NodePath {
        let mut indices = self.0.clone();
        if let Some((level, at)) = Self::shift_level(&self.0, inserted) {
            if indices[level] >= at {
                indices[level] += 1;
            }
        }
        Self(indices)
    }

    /// Where this path points once the node at `removed` is gone. `None` when this path is
    /// the removed node or lies below it.
    pub fn after_removal(&self, removed: &NodePath) -> Option<NodePath> {
        if self == removed || removed.is_ancestor_of(self) {
            return None;
        }
        let mut indices = self.0.clone();
        if let Some((level, at)) = Self::shift_level(&self.0, removed) {
            if indices[level] > at {
                indices[level] -= 1;
            }
        }
        Some(Self(indices))
    }

    /// Inverse of [`after_removal`](Self::after_removal): the path, in the tree that still
    /// holds `removed`, of a node addressed in the tree without it.
    pub fn before_removal(&self, removed: &NodePath) -> NodePath {
        let mut indices = self.0.clone();
        if let Some((level, at)) = Self::shift_level(&self.0, removed) {
            if indices[level] >= at {
                indices[level] += 1;
            }
        }
        Self(indices)
    }

    /// The level at which an edit at `at` shifts `path`, with the edited sibling index.
    fn shift_level(path: &[usize], at: &NodePath) -> Option<(usize, usize)> {
        let (index, parent) = at.0.split_last()?;
        if path.len() > parent.len() && path.starts_with(parent) {
            Some((parent.len(), *index))
        } else {
            None
        }
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        f.write_str(&parts.join(";"))
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split(';')
            .map(|segment| {
                segment.trim().parse::<usize>().map_err(|_| PathParseError {
                    input: s.to_string(),
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
