//! Attribute edits
//!
//! Changing one attribute is a swap: the edit holds the value not currently in the tree and
//! exchanges it with the tree's value. Forward and reverse are the same operation, only the
//! phase check differs.

use super::edit::{Phase, UndoConsistencyError, UndoableEdit};
use crate::lxm::ast::{MacroDocument, NodePath, Prefix};
use crate::lxm::editing::EditError;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Suppressed(bool),
    Argument {
        index: usize,
        value: Option<String>,
        as_string: bool,
    },
    Prefix(Prefix),
    BlockName(String),
    DisplayName(String),
    Comments(Vec<String>),
    Metadata(Map<String, Value>),
}

impl Attribute {
    /// Store `self` at `path` and return the value it replaced.
    fn swap_into(self, doc: &mut MacroDocument, path: &NodePath) -> Result<Attribute, EditError> {
        Ok(match self {
            Attribute::Suppressed(value) => Attribute::Suppressed(doc.set_suppressed(path, value)?),
            Attribute::Argument {
                index,
                value,
                as_string,
            } => {
                let (value, as_string) = doc.set_argument(path, index, value, as_string)?;
                Attribute::Argument {
                    index,
                    value,
                    as_string,
                }
            }
            Attribute::Prefix(prefix) => Attribute::Prefix(doc.set_prefix(path, prefix)?),
            Attribute::BlockName(name) => Attribute::BlockName(doc.rename_block(path, name)?),
            Attribute::DisplayName(name) => {
                Attribute::DisplayName(doc.set_display_name(path, name)?)
            }
            Attribute::Comments(comments) => Attribute::Comments(doc.set_comments(path, comments)?),
            Attribute::Metadata(metadata) => Attribute::Metadata(doc.set_metadata(path, metadata)?),
        })
    }
}

#[derive(Debug)]
pub struct SetAttribute {
    label: String,
    path: NodePath,
    /// The value that is not in the tree right now.
    held: Option<Attribute>,
    phase: Phase,
}

impl SetAttribute {
    pub fn new(label: impl Into<String>, path: NodePath, value: Attribute) -> Self {
        Self {
            label: label.into(),
            path,
            held: Some(value),
            phase: Phase::Pending,
        }
    }

    pub fn suppressed(path: NodePath, suppressed: bool) -> Self {
        let label = if suppressed { "Suppress" } else { "Unsuppress" };
        Self::new(label, path, Attribute::Suppressed(suppressed))
    }

    pub fn argument(path: NodePath, index: usize, value: Option<String>, as_string: bool) -> Self {
        Self::new(
            "Edit Argument",
            path,
            Attribute::Argument {
                index,
                value,
                as_string,
            },
        )
    }

    pub fn prefix(path: NodePath, prefix: Prefix) -> Self {
        Self::new("Change Prefix", path, Attribute::Prefix(prefix))
    }

    pub fn block_name(path: NodePath, name: impl Into<String>) -> Self {
        Self::new("Rename Block", path, Attribute::BlockName(name.into()))
    }

    pub fn display_name(path: NodePath, name: impl Into<String>) -> Self {
        Self::new("Rename", path, Attribute::DisplayName(name.into()))
    }

    pub fn comments(path: NodePath, comments: Vec<String>) -> Self {
        Self::new("Edit Comments", path, Attribute::Comments(comments))
    }

    pub fn metadata(path: NodePath, metadata: Map<String, Value>) -> Self {
        Self::new("Edit Metadata", path, Attribute::Metadata(metadata))
    }

    fn swap(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        let value = self
            .held
            .take()
            .ok_or_else(|| EditError::InvalidPath(self.path.clone()))?;
        match value.clone().swap_into(doc, &self.path) {
            Ok(previous) => {
                self.held = Some(previous);
                Ok(())
            }
            Err(error) => {
                self.held = Some(value);
                Err(error.into())
            }
        }
    }
}

impl UndoableEdit for SetAttribute {
    fn label(&self) -> &str {
        &self.label
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn apply_forward(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_forward(&self.label)?;
        self.swap(doc)?;
        self.phase = Phase::Applied;
        Ok(())
    }

    fn apply_reverse(&mut self, doc: &mut MacroDocument) -> Result<(), UndoConsistencyError> {
        self.phase.begin_reverse(&self.label)?;
        self.swap(doc)?;
        self.phase = Phase::Reverted;
        Ok(())
    }
}
