//! Editing
//!
//!     Mutations and selection are methods on [`MacroDocument`](crate::lxm::ast::MacroDocument),
//!     grouped here by concern:
//!
//!     - [`mutations`]: structural edits (insert, delete, collapse, move, wrap, unwrap) and
//!       attribute setters. Each one checks its arguments first and either applies completely
//!       or returns an [`EditError`] with the tree untouched.
//!     - [`selection`]: selected flags and the primary node used as the insertion anchor.
//!
//!     Paths handed in are resolved against the tree at call time and never cached. Setters
//!     return the value they replaced, which is what the undo edits store.

pub mod error;
pub mod mutations;
pub mod selection;

pub use error::EditError;
pub use mutations::CollapsedBlock;
