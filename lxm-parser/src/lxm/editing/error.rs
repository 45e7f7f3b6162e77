//! Errors of tree mutations
//!
//! Every mutation validates its input before touching the tree, so an error always leaves the
//! document as it was.

use crate::lxm::ast::NodePath;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no node at path `{0}`")]
    InvalidPath(NodePath),
    #[error("node at `{0}` cannot hold children")]
    NotAContainer(NodePath),
    #[error("index {index} is out of range for `{parent}` with {len} children")]
    IndexOutOfRange {
        parent: NodePath,
        index: usize,
        len: usize,
    },
    #[error("paths `{0}` and `{1}` do not share a parent")]
    NotSiblings(NodePath, NodePath),
    #[error("no nodes given")]
    EmptySelection,
    #[error("node at `{0}` is not a block")]
    NotABlock(NodePath),
    #[error("node at `{0}` is not a command")]
    NotACommand(NodePath),
    #[error("block at `{path}` has {found} children, expected {expected}")]
    ChildCountMismatch {
        path: NodePath,
        expected: usize,
        found: usize,
    },
    #[error("command at `{path}` has no argument {index}")]
    ArgumentOutOfRange { path: NodePath, index: usize },
}
