//! Composite edits

use super::edit::{Phase, UndoConsistencyError, UndoableEdit};
use crate::lxm::ast::MacroDocument;

/// Several edits that undo and redo as one.
///
/// Children are applied in order and reversed in reverse order. When one of them fails, the
/// ones already applied in this call are rolled back before the error is returned.
#[derive(Debug)]
pub struct EditGroup {
    label: String,
    edits: Vec<Box<dyn UndoableEdit>>,
    phase: Phase,
}

impl EditGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edits: Vec::new(),
            phase: Phase::Pending,
        }
    }

    pub fn with_edit(mut self, edit: impl UndoableEdit + 'static) -> Self {
        self.edits.push(Box::new(edit));
        self
    }

    pub fn push(&mut self, edit: Box<dyn UndoableEdit>) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl UndoableEdit for EditGroup {
    fn label(&self) -> &str {
        &self.label
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(&self.label)?;
        for done in 0..self.edits.len() {
            if let Err(error) = self.edits[done].apply_forward(doc) {
                for edit in self.edits[..done].iter_mut().rev() {
                    if let Err(rollback) = edit.apply_reverse(doc) {
                        log::error!("rolling back `{}` failed: {}", edit.label(), rollback);
                    }
                }
                return Err(error);
            }
        }
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(&self.label)?;
        let count = self.edits.len();
        for done in 0..count {
            let index = count - 1 - done;
            if let Err(error) = self.edits[index].apply_reverse(doc) {
                for edit in self.edits[index + 1..].iter_mut() {
                    if let Err(rollback) = edit.apply_forward(doc) {
                        log::error!("reapplying `{}` failed: {}", edit.label(), rollback);
                    }
                }
                return Err(error);
            }
        }
        self.phase = Phase::Reverted;
        Ok(())
    }
}
