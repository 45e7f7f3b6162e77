//! The undoable edit contract

use crate::lxm::ast::MacroDocument;
use crate::lxm::editing::EditError;
use std::fmt;
use thiserror::Error;

/// Where an edit stands in its forward/reverse alternation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Built, never applied.
    #[default]
    Pending,
    Applied,
    Reverted,
}

impl Phase {
    /// Check that a forward application is due.
    pub fn begin_forward(&self, label: &str) -> Result<(), UndoConsistencyError> {
        match self {
            Phase::Pending | Phase::Reverted => Ok(()),
            Phase::Applied => Err(UndoConsistencyError::OutOfSequence {
                edit: label.to_string(),
                direction: "forward",
            }),
        }
    }

    pub fn begin_reverse(&self, label: &str) -> Result<(), UndoConsistencyError> {
        match self {
            Phase::Applied => Ok(()),
            Phase::Pending | Phase::Reverted => Err(UndoConsistencyError::OutOfSequence {
                edit: label.to_string(),
                direction: "reverse",
            }),
        }
    }
}

/// The tree no longer matches what an edit recorded, or an edit was driven out of turn.
///
/// Both are bugs in the caller. The failing call leaves the document unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoConsistencyError {
    #[error("`{edit}` cannot be applied {direction} now")]
    OutOfSequence {
        edit: String,
        direction: &'static str,
    },
    #[error("document no longer matches the edit: {0}")]
    ShapeMismatch(#[from] EditError),
}

pub trait UndoableEdit: fmt::Debug {
    /// Short user facing description, e.g. "Delete".
    fn label(&self) -> &str;

    fn phase(&self) -> Phase;

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError>;

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError>;
}
