//! Scripted edits run by `lxm edit`
//!
//! Steps go through the configured undo history, the same way an interactive host applies
//! them, so `--undo` takes back whole steps and the document's saved state follows the
//! history's clean point. Paths of each step address the tree as the previous steps left it.

use lxm_parser::lxm::undo::{
    DeleteNodes, EditGroup, SetAttribute, UndoConsistencyError, UndoStack, WrapNodes,
};
use lxm_parser::lxm::{MacroDocument, NodePath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    Suppress { paths: Vec<NodePath>, suppressed: bool },
    Delete(Vec<NodePath>),
    Wrap { name: String, paths: Vec<NodePath> },
}

impl EditStep {
    fn execute(
        self,
        stack: &mut UndoStack,
        doc: &mut MacroDocument,
    ) -> Result<(), UndoConsistencyError> {
        match self {
            EditStep::Suppress { paths, suppressed } => {
                let label = if suppressed { "Suppress" } else { "Unsuppress" };
                let group = paths.into_iter().fold(EditGroup::new(label), |group, path| {
                    group.with_edit(SetAttribute::suppressed(path, suppressed))
                });
                stack.execute(doc, group)
            }
            EditStep::Delete(paths) => stack.execute(doc, DeleteNodes::new(paths)),
            EditStep::Wrap { name, paths } => stack.execute(doc, WrapNodes::new(paths, name)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditReport {
    pub applied: usize,
    pub undone: usize,
}

/// Apply `steps` in order, then undo up to `undo` of them.
///
/// Fewer steps are undone when the history has dropped them.
pub fn run_edits(
    doc: &mut MacroDocument,
    stack: &mut UndoStack,
    steps: Vec<EditStep>,
    undo: usize,
) -> Result<EditReport, UndoConsistencyError> {
    let applied = steps.len();
    for step in steps {
        step.execute(stack, doc)?;
    }
    let mut undone = 0;
    while undone < undo && stack.undo(doc)? {
        undone += 1;
    }
    Ok(EditReport { applied, undone })
}
