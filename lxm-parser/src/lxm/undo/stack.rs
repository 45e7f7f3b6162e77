//! Undo history
//!
//! A linear history of applied edits. Executing an edit clears the redo side. The oldest
//! edits fall off once `max_undo` is reached.
//!
//! The clean point is the undo depth at which the document was last saved. The document's
//! `unsaved_changes` flag is kept in sync with it after every operation, so undoing back to
//! the saved state makes the document clean again.

use super::edit::{UndoConsistencyError, UndoableEdit};
use crate::lxm::ast::MacroDocument;

pub const DEFAULT_MAX_UNDO: usize = 100;

#[derive(Debug)]
pub struct UndoStack {
    undo_stack: Vec<Box<dyn UndoableEdit>>,
    redo_stack: Vec<Box<dyn UndoableEdit>>,
    max_undo: usize,
    /// Undo depth of the saved state. Can exceed the undo depth while the saved state is on
    /// the redo side, and is `None` once that state can no longer be reached.
    clean_index: Option<usize>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl UndoStack {
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo,
            clean_index: Some(0),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the edit the next undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|edit| edit.label())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|edit| edit.label())
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    /// Record the current state as saved.
    pub fn mark_clean(&mut self, doc: &mut MacroDocument) {
        self.clean_index = Some(self.undo_stack.len());
        self.sync(doc);
    }

    pub fn clear(&mut self, doc: &mut MacroDocument) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = if doc.unsaved_changes { None } else { Some(0) };
    }

    /// Apply `edit` and record it.
    pub fn execute<E>(&mut self, doc: &mut MacroDocument, edit: E) -> Result<(), UndoConsistencyError>
    where
        E: UndoableEdit + 'static,
    {
        self.execute_boxed(doc, Box::new(edit))
    }

    pub fn execute_boxed(
        &mut self,
        doc: &mut MacroDocument,
        mut edit: Box<dyn UndoableEdit>,
    ) -> Result<(), UndoConsistencyError> {
        edit.apply_forward(doc)?;
        log::debug!("executed `{}`", edit.label());
        self.clear_redo_and_adjust_clean();

        if self.max_undo == 0 {
            self.clean_index = None;
        } else {
            if self.undo_stack.len() >= self.max_undo {
                self.undo_stack.remove(0);
                self.clean_index = match self.clean_index {
                    Some(0) | None => None,
                    Some(index) => Some(index - 1),
                };
            }
            self.undo_stack.push(edit);
        }
        self.sync(doc);
        Ok(())
    }

    /// Revert the most recent edit. `Ok(false)` when there is nothing to undo.
    ///
    /// A failing reverse leaves the edit on the undo side and the document as it was.
    pub fn undo(&mut self, doc: &mut MacroDocument) -> Result<bool, UndoConsistencyError> {
        let Some(mut edit) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(error) = edit.apply_reverse(doc) {
            self.undo_stack.push(edit);
            return Err(error);
        }
        log::debug!("undid `{}`", edit.label());
        self.redo_stack.push(edit);
        self.sync(doc);
        Ok(true)
    }

    /// Reapply the most recently undone edit. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut MacroDocument) -> Result<bool, UndoConsistencyError> {
        let Some(mut edit) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(error) = edit.apply_forward(doc) {
            self.redo_stack.push(edit);
            return Err(error);
        }
        log::debug!("redid `{}`", edit.label());
        self.undo_stack.push(edit);
        self.sync(doc);
        Ok(true)
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        // A clean point on the redo side becomes unreachable
        if self
            .clean_index
            .is_some_and(|index| index > self.undo_stack.len())
        {
            self.clean_index = None;
        }
        self.redo_stack.clear();
    }

    fn sync(&self, doc: &mut MacroDocument) {
        doc.unsaved_changes = !self.is_clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::ast::NodePath;
    use crate::lxm::testing::sample_document;
    use crate::lxm::undo::{CollapseBlock, DeleteNodes, SetAttribute};

    #[test]
    fn test_undo_redo_cycle() {
        let original = sample_document();
        let mut doc = original.clone();
        let mut stack = UndoStack::default();

        stack
            .execute(&mut doc, DeleteNodes::new(vec![NodePath::from([0])]))
            .unwrap();
        stack
            .execute(&mut doc, SetAttribute::suppressed(NodePath::from([0]), true))
            .unwrap();
        let edited = doc.clone();
        assert_eq!(stack.undo_label(), Some("Suppress"));

        assert_eq!(stack.undo(&mut doc), Ok(true));
        assert_eq!(stack.undo(&mut doc), Ok(true));
        assert_eq!(stack.undo(&mut doc), Ok(false));
        assert_eq!(doc.children, original.children);
        assert!(!doc.unsaved_changes);

        assert_eq!(stack.redo(&mut doc), Ok(true));
        assert_eq!(stack.redo(&mut doc), Ok(true));
        assert_eq!(doc.children, edited.children);
        assert!(doc.unsaved_changes);
    }

    #[test]
    fn test_new_edit_clears_redo_and_unreachable_clean_point() {
        let mut doc = sample_document();
        let mut stack = UndoStack::default();
        stack
            .execute(&mut doc, SetAttribute::display_name(NodePath::from([0]), "a"))
            .unwrap();
        stack.mark_clean(&mut doc);
        stack.undo(&mut doc).unwrap();
        assert!(doc.unsaved_changes);

        stack
            .execute(&mut doc, SetAttribute::display_name(NodePath::from([0]), "b"))
            .unwrap();
        assert!(!stack.can_redo());
        stack.undo(&mut doc).unwrap();
        // The saved state was only reachable through the discarded redo
        assert!(doc.unsaved_changes);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut doc = sample_document();
        let mut stack = UndoStack::new(2);
        for name in ["a", "b", "c"] {
            stack
                .execute(&mut doc, SetAttribute::display_name(NodePath::from([0]), name))
                .unwrap();
        }
        assert_eq!(stack.undo_depth(), 2);
        stack.undo(&mut doc).unwrap();
        stack.undo(&mut doc).unwrap();
        assert_eq!(doc.children[0].header().display_name, "a");
        assert!(doc.unsaved_changes);
    }

    #[test]
    fn test_failed_edit_is_not_recorded() {
        let mut doc = sample_document();
        let mut stack = UndoStack::default();
        assert!(stack
            .execute(&mut doc, CollapseBlock::new(NodePath::from([0])))
            .is_err());
        assert!(!stack.can_undo());
        assert!(!doc.unsaved_changes);
    }

    #[test]
    fn test_failed_undo_keeps_edit() {
        let mut doc = sample_document();
        let mut stack = UndoStack::default();
        stack
            .execute(&mut doc, SetAttribute::block_name(NodePath::from([1]), "New"))
            .unwrap();
        // Pull the block away behind the stack's back
        doc.delete(&NodePath::from([1])).unwrap();
        assert!(stack.undo(&mut doc).is_err());
        assert_eq!(stack.undo_depth(), 1);
        assert_eq!(stack.redo_depth(), 0);
    }
}
