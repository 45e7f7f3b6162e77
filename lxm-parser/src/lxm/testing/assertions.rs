//! Fluent assertions over macro trees

use crate::lxm::ast::{Block, Command, FileFormat, MacroDocument, Node, NodePath, Prefix};
use serde_json::Value;

pub fn assert_macro(doc: &MacroDocument) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

pub struct DocumentAssertion<'a> {
    doc: &'a MacroDocument,
}

impl<'a> DocumentAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        assert_eq!(
            self.doc.children.len(),
            expected,
            "expected {} top level nodes, found {}",
            expected,
            self.doc.children.len()
        );
        self
    }

    pub fn format(self, expected: FileFormat) -> Self {
        assert_eq!(self.doc.file_format, Some(expected));
        self
    }

    /// Check the top level node at `index`.
    pub fn node<F, R>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        self.at(NodePath::from([index]), check)
    }

    /// Check the node at any path.
    pub fn at<F, R>(self, path: impl Into<NodePath>, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let path = path.into();
        let node = self
            .doc
            .node_at(&path)
            .unwrap_or_else(|| panic!("no node at `{}`", path));
        let effective = self.doc.effective_suppression(&path).unwrap_or_default();
        check(NodeAssertion {
            node,
            path,
            effective,
        });
        self
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    path: NodePath,
    effective: bool,
}

impl<'a> NodeAssertion<'a> {
    pub fn suppressed(self, expected: bool) -> Self {
        assert_eq!(
            self.node.header().suppressed_directly,
            expected,
            "suppression of `{}`",
            self.path
        );
        self
    }

    pub fn effectively_suppressed(self, expected: bool) -> Self {
        assert_eq!(
            self.effective, expected,
            "effective suppression of `{}`",
            self.path
        );
        self
    }

    pub fn comments(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.node.header().comments_before,
            expected,
            "comments of `{}`",
            self.path
        );
        self
    }

    pub fn display_name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.header().display_name,
            expected,
            "display name of `{}`",
            self.path
        );
        self
    }

    pub fn meta(self, key: &str, expected: Value) -> Self {
        assert_eq!(
            self.node.header().metadata.get(key),
            Some(&expected),
            "metadata `{}` of `{}`",
            key,
            self.path
        );
        self
    }

    pub fn selected(self, expected: bool) -> Self {
        assert_eq!(self.node.header().selected, expected, "selection of `{}`", self.path);
        self
    }

    pub fn assert_command(self) -> CommandAssertion<'a> {
        match self.node {
            Node::Command(command) => CommandAssertion {
                command,
                path: self.path,
            },
            Node::Block(block) => panic!(
                "expected a command at `{}`, found block `{}`",
                self.path, block.name
            ),
        }
    }

    pub fn assert_block(self) -> BlockAssertion<'a> {
        match self.node {
            Node::Block(block) => BlockAssertion {
                block,
                path: self.path,
                effective: self.effective,
            },
            Node::Command(command) => panic!(
                "expected a block at `{}`, found command `{}`",
                self.path, command.name
            ),
        }
    }
}

pub struct CommandAssertion<'a> {
    command: &'a Command,
    path: NodePath,
}

impl CommandAssertion<'_> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(self.command.name, expected, "command name at `{}`", self.path);
        self
    }

    pub fn prefix(self, expected: Prefix) -> Self {
        assert_eq!(self.command.prefix, expected, "prefix at `{}`", self.path);
        self
    }

    /// Value of the named argument; `None` expects it unset.
    pub fn argument(self, name: &str, expected: Option<&str>) -> Self {
        let argument = self
            .command
            .argument(name)
            .unwrap_or_else(|| panic!("`{}` has no argument `{}`", self.command.name, name));
        assert_eq!(
            argument.value.as_deref(),
            expected,
            "argument `{}` at `{}`",
            name,
            self.path
        );
        self
    }

    pub fn as_string(self, name: &str, expected: bool) -> Self {
        let argument = self
            .command
            .argument(name)
            .unwrap_or_else(|| panic!("`{}` has no argument `{}`", self.command.name, name));
        assert_eq!(argument.as_string_override, expected, "string override of `{}`", name);
        self
    }

    /// Number of argument slots, set or not.
    pub fn argument_count(self, expected: usize) -> Self {
        assert_eq!(self.command.arguments.len(), expected);
        self
    }

    pub fn set_argument_count(self, expected: usize) -> Self {
        let set = self.command.arguments.iter().filter(|arg| arg.is_set()).count();
        assert_eq!(set, expected, "set arguments at `{}`", self.path);
        self
    }
}

pub struct BlockAssertion<'a> {
    block: &'a Block,
    path: NodePath,
    effective: bool,
}

impl<'a> BlockAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(self.block.name, expected, "block name at `{}`", self.path);
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.block.children.len(),
            expected,
            "children of `{}`",
            self.path
        );
        self
    }

    pub fn child<F, R>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let node = self
            .block
            .children
            .get(index)
            .unwrap_or_else(|| panic!("block `{}` has no child {}", self.block.name, index));
        check(NodeAssertion {
            node,
            path: self.path.child(index),
            effective: self.effective || node.header().suppressed_directly,
        });
        self
    }
}
