//! The macro tree
//!
//! A [`MacroDocument`] owns an ordered list of top level [`Node`]s. A node is either a
//! [`Command`] (a leaf holding its [`Argument`]s) or a [`Block`] (a named group of nodes).
//! Every node carries a [`NodeHeader`] with the user metadata that must survive a round trip:
//! comments, suppression, display name, free form metadata and the selection flag.
//!
//! Nodes are addressed by [`NodePath`], the sibling indices from the root down. Paths shift
//! whenever a sibling before them is inserted or removed, so they are recomputed after every
//! mutation and never cached across one.

pub mod argument;
pub mod document;
pub mod node;
pub mod path;

pub use argument::Argument;
pub use document::{FileFormat, MacroDocument};
pub use node::{Block, Command, Node, NodeHeader, NodeRef, Prefix};
pub use path::{NodePath, PathParseError};
