//! Undo and redo
//!
//!     Every user edit is an [`UndoableEdit`]: an object that applies one logical change to a
//!     [`MacroDocument`](crate::lxm::ast::MacroDocument) and can take it back. Edits record
//!     paths and detached nodes, never references into the tree, because later edits shift
//!     paths underneath them. Forward and reverse strictly alternate; an edit tracks its own
//!     phase and refuses calls out of turn.
//!
//!     - [`structural`]: insert, delete, collapse, move and wrap
//!     - [`attributes`]: swapping a single node attribute
//!     - [`group`]: several edits applied as one, all or nothing
//!     - [`stack`]: the bounded history with a clean point

pub mod attributes;
pub mod edit;
pub mod group;
pub mod stack;
pub mod structural;

pub use attributes::{Attribute, SetAttribute};
pub use edit::{Phase, UndoConsistencyError, UndoableEdit};
pub use group::EditGroup;
pub use stack::UndoStack;
pub use structural::{CollapseBlock, DeleteNodes, InsertNodes, MoveNode, WrapNodes};
