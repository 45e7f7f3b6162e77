//! Structural edits
//!
//! Each edit records paths in the coordinates of the tree it is applied to, plus whatever
//! nodes are detached from the tree while it is in effect (deleted nodes, a collapsed block's
//! shell). Reverse puts those back at the recorded paths.

use super::edit::{Phase, UndoConsistencyError, UndoableEdit};
use crate::lxm::ast::{Block, MacroDocument, Node, NodePath};
use crate::lxm::editing::mutations::normalize_paths;
use crate::lxm::editing::{CollapsedBlock, EditError};

/// Insert consecutive nodes into one container. Inserting N lines is one edit.
#[derive(Debug)]
pub struct InsertNodes {
    parent: NodePath,
    index: usize,
    count: usize,
    /// Held while the edit is not applied.
    nodes: Vec<Node>,
    phase: Phase,
}

impl InsertNodes {
    pub fn new(parent: NodePath, index: usize, nodes: Vec<Node>) -> Self {
        Self {
            parent,
            index,
            count: nodes.len(),
            nodes,
            phase: Phase::Pending,
        }
    }

    /// Insert after the primary node, or at the end of the document.
    pub fn at_insertion_point(doc: &MacroDocument, nodes: Vec<Node>) -> Self {
        let (parent, index) = doc.insertion_point();
        Self::new(parent, index, nodes)
    }

    /// Paths of the inserted nodes while the edit is applied.
    pub fn paths(&self) -> Vec<NodePath> {
        (self.index..self.index + self.count)
            .map(|i| self.parent.child(i))
            .collect()
    }
}

impl UndoableEdit for InsertNodes {
    fn label(&self) -> &str {
        "Insert"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(self.label())?;
        doc.check_insert(&self.parent, self.index)?;
        doc.insert_many(&self.parent, self.index, std::mem::take(&mut self.nodes))?;
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(self.label())?;
        if self.count > 0 {
            let removed = doc.delete_many(&self.paths())?;
            self.nodes = removed.into_iter().map(|(_, node)| node).collect();
        }
        self.phase = Phase::Reverted;
        Ok(())
    }
}

/// Delete nodes with their descendants. The nodes need not be siblings.
#[derive(Debug)]
pub struct DeleteNodes {
    paths: Vec<NodePath>,
    removed: Vec<(NodePath, Node)>,
    phase: Phase,
}

impl DeleteNodes {
    pub fn new(paths: Vec<NodePath>) -> Self {
        Self {
            paths: normalize_paths(&paths),
            removed: Vec::new(),
            phase: Phase::Pending,
        }
    }
}

impl UndoableEdit for DeleteNodes {
    fn label(&self) -> &str {
        "Delete"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(self.label())?;
        self.removed = doc.delete_many(&self.paths)?;
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(self.label())?;
        if let Err(failure) = doc.restore_nodes(std::mem::take(&mut self.removed)) {
            self.removed = failure.entries;
            return Err(failure.error.into());
        }
        self.phase = Phase::Reverted;
        Ok(())
    }
}

/// Remove a block but keep its children in its place.
#[derive(Debug)]
pub struct CollapseBlock {
    path: NodePath,
    collapsed: Option<CollapsedBlock>,
    phase: Phase,
}

impl CollapseBlock {
    pub fn new(path: NodePath) -> Self {
        Self {
            path,
            collapsed: None,
            phase: Phase::Pending,
        }
    }
}

impl UndoableEdit for CollapseBlock {
    fn label(&self) -> &str {
        "Collapse Block"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(self.label())?;
        self.collapsed = Some(doc.collapse(&self.path)?);
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(self.label())?;
        let collapsed = self
            .collapsed
            .as_ref()
            .ok_or_else(|| EditError::InvalidPath(self.path.clone()))?;
        doc.group_range(&self.path, collapsed.child_count, collapsed.shell.clone())?;
        self.collapsed = None;
        self.phase = Phase::Reverted;
        Ok(())
    }
}

/// Move one node, subtree included. The destination is addressed as in
/// [`MacroDocument::move_node`].
#[derive(Debug)]
pub struct MoveNode {
    from: NodePath,
    to_parent: NodePath,
    to_index: usize,
    landed: Option<NodePath>,
    phase: Phase,
}

impl MoveNode {
    pub fn new(from: NodePath, to_parent: NodePath, to_index: usize) -> Self {
        Self {
            from,
            to_parent,
            to_index,
            landed: None,
            phase: Phase::Pending,
        }
    }

    /// Path of the moved node while the edit is applied.
    pub fn landed(&self) -> Option<&NodePath> {
        self.landed.as_ref()
    }
}

impl UndoableEdit for MoveNode {
    fn label(&self) -> &str {
        "Move"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(self.label())?;
        self.landed = Some(doc.move_node(&self.from, &self.to_parent, self.to_index)?);
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(self.label())?;
        let invalid = || EditError::InvalidPath(self.from.clone());
        let landed = self.landed.as_ref().ok_or_else(invalid)?;
        // Taking the node out again leaves the tree it was originally removed from, where
        // its old parent path is unchanged
        let parent = self.from.parent().ok_or_else(invalid)?;
        let index = self.from.last().ok_or_else(invalid)?;
        doc.move_node(landed, &parent, index)?;
        self.landed = None;
        self.phase = Phase::Reverted;
        Ok(())
    }
}

/// Group siblings into a new block; reverse puts each one back where it was.
#[derive(Debug)]
pub struct WrapNodes {
    paths: Vec<NodePath>,
    shell: Block,
    block_path: Option<NodePath>,
    phase: Phase,
}

impl WrapNodes {
    pub fn new(paths: Vec<NodePath>, name: impl Into<String>) -> Self {
        let mut paths = paths;
        paths.sort();
        paths.dedup();
        Self {
            paths,
            shell: Block::new(name),
            block_path: None,
            phase: Phase::Pending,
        }
    }

    /// Path of the new block while the edit is applied.
    pub fn block_path(&self) -> Option<&NodePath> {
        self.block_path.as_ref()
    }
}

impl UndoableEdit for WrapNodes {
    fn label(&self) -> &str {
        "Wrap In Block"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(self.label())?;
        self.block_path = Some(doc.wrap_with(&self.paths, self.shell.clone())?);
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(self.label())?;
        let block_path = self
            .block_path
            .as_ref()
            .ok_or_else(|| EditError::EmptySelection)?;
        // Keep edits made to the block while it existed, for redo
        self.shell = doc.unwrap(block_path, &self.paths)?;
        self.block_path = None;
        self.phase = Phase::Reverted;
        Ok(())
    }
}
