//! Macro document
//!
//! The document is the root container. It owns the top level nodes and the bookkeeping a host
//! needs around them: where the macro was loaded from, in which format, and whether it has
//! changed since. There is no process wide document: callers own a `MacroDocument` value and
//! pass it to every operation.

use super::node::{Node, NodeRef};
use super::path::NodePath;
use std::fmt;
use std::path::PathBuf;

/// The serialized representations a macro can be read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// `#LXMacro#` command script.
    Script,
    /// `# python` script made of eval calls.
    EmbeddedScript,
    /// Structured records as JSON.
    Json,
    /// Structured records as YAML.
    Yaml,
}

impl FileFormat {
    /// Registry name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Script => "lxm",
            FileFormat::EmbeddedScript => "python",
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroDocument {
    pub children: Vec<Node>,
    pub file_path: Option<PathBuf>,
    pub file_format: Option<FileFormat>,
    pub unsaved_changes: bool,
}

impl MacroDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in the tree (arguments excluded).
    pub fn node_count(&self) -> usize {
        self.children.iter().map(Node::subtree_len).sum()
    }

    /// Walk the root by sibling indices. The root path resolves to nothing.
    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for index in rest {
            node = node.children_mut()?.get_mut(*index)?;
        }
        Some(node)
    }

    /// Resolve a path to a node or, when the last index steps into a command, to an argument.
    pub fn resolve(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        if let Some(node) = self.node_at(path) {
            return Some(node.into());
        }
        let parent = path.parent()?;
        let index = path.last()?;
        let command = self.node_at(&parent)?.as_command()?;
        command.arguments.get(index).map(NodeRef::Argument)
    }

    /// Children of the container at `path`: the root's children for the root path, a block's
    /// children otherwise. `None` when the path does not resolve to a container.
    pub fn children_at(&self, path: &NodePath) -> Option<&[Node]> {
        if path.is_root() {
            return Some(&self.children);
        }
        self.node_at(path)?.as_block().map(|block| block.children.as_slice())
    }

    pub(crate) fn children_at_mut(&mut self, path: &NodePath) -> Option<&mut Vec<Node>> {
        if path.is_root() {
            return Some(&mut self.children);
        }
        self.node_at_mut(path)?.children_mut()
    }

    /// Path of a node borrowed from this document.
    ///
    /// The tree holds no parent links, so the node is located by identity.
    pub fn path_of(&self, target: &Node) -> Option<NodePath> {
        fn search(nodes: &[Node], target: &Node, prefix: &mut Vec<usize>) -> bool {
            for (index, node) in nodes.iter().enumerate() {
                prefix.push(index);
                if std::ptr::eq(node, target) || search(node.children(), target, prefix) {
                    return true;
                }
                prefix.pop();
            }
            false
        }

        let mut prefix = Vec::new();
        if search(&self.children, target, &mut prefix) {
            Some(NodePath::new(prefix))
        } else {
            None
        }
    }

    /// First node, in document order, for which `predicate` holds.
    pub fn find_path<F>(&self, predicate: F) -> Option<NodePath>
    where
        F: Fn(&Node) -> bool,
    {
        let mut found = None;
        self.visit(|path, node, _| {
            if found.is_none() && predicate(node) {
                found = Some(path.clone());
            }
        });
        found
    }

    /// Suppressed directly or through any enclosing block.
    pub fn effective_suppression(&self, path: &NodePath) -> Option<bool> {
        let indices = path.indices();
        if indices.is_empty() {
            return None;
        }
        let mut suppressed = false;
        let mut nodes: &[Node] = &self.children;
        for index in indices {
            let node = nodes.get(*index)?;
            suppressed |= node.header().suppressed_directly;
            nodes = node.children();
        }
        Some(suppressed)
    }

    /// Visit every node in pre-order with its path and effective suppression.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&NodePath, &Node, bool),
    {
        fn walk<F>(nodes: &[Node], prefix: &NodePath, inherited: bool, visitor: &mut F)
        where
            F: FnMut(&NodePath, &Node, bool),
        {
            for (index, node) in nodes.iter().enumerate() {
                let path = prefix.child(index);
                let suppressed = inherited || node.header().suppressed_directly;
                visitor(&path, node, suppressed);
                walk(node.children(), &path, suppressed, visitor);
            }
        }

        walk(&self.children, &NodePath::root(), false, &mut visitor);
    }

    /// All node paths in document order.
    pub fn paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        self.visit(|path, _, _| paths.push(path.clone()));
        paths
    }

    /// A copy containing only the nodes `keep` accepts.
    ///
    /// An accepted block is kept whole. A rejected block survives, pruned, when any of its
    /// descendants is accepted. Serializing the result is how a subset gets exported.
    pub fn filtered<F>(&self, keep: F) -> MacroDocument
    where
        F: Fn(&NodePath, &Node) -> bool,
    {
        fn prune<F>(nodes: &[Node], prefix: &NodePath, keep: &F) -> Vec<Node>
        where
            F: Fn(&NodePath, &Node) -> bool,
        {
            let mut kept = Vec::new();
            for (index, node) in nodes.iter().enumerate() {
                let path = prefix.child(index);
                if keep(&path, node) {
                    kept.push(node.clone());
                } else if let Node::Block(block) = node {
                    let children = prune(&block.children, &path, keep);
                    if !children.is_empty() {
                        let mut pruned = block.clone();
                        pruned.children = children;
                        kept.push(Node::Block(pruned));
                    }
                }
            }
            kept
        }

        MacroDocument {
            children: prune(&self.children, &NodePath::root(), &keep),
            file_path: None,
            file_format: self.file_format,
            unsaved_changes: false,
        }
    }

    /// Subset made of the selected nodes.
    pub fn selection_subset(&self) -> MacroDocument {
        self.filtered(|_, node| node.header().selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::ast::{Block, Command, Prefix};
    use crate::lxm::schema::{ArgumentDescriptor, CommandSchema};

    fn command(name: &str) -> Node {
        let schema = CommandSchema::new(name, vec![ArgumentDescriptor::new("value")]);
        Node::Command(Command::from_schema(&schema))
    }

    fn sample() -> MacroDocument {
        let mut inner = Block::with_children("Inner", vec![command("c.inner")]);
        inner.header.suppressed_directly = true;
        MacroDocument::with_children(vec![
            command("c.zero"),
            Node::Block(Block::with_children(
                "Outer",
                vec![command("c.one"), Node::Block(inner)],
            )),
            command("c.two"),
        ])
    }

    #[test]
    fn test_node_at_walks_indices() {
        let doc = sample();
        assert_eq!(doc.node_at(&NodePath::from([1, 1, 0])).unwrap().name(), "c.inner");
        assert!(doc.node_at(&NodePath::from([1, 5])).is_none());
        assert!(doc.node_at(&NodePath::from([0, 0])).is_none());
        assert!(doc.node_at(&NodePath::root()).is_none());
        assert_eq!(doc.node_count(), 6);
    }

    #[test]
    fn test_resolve_reaches_arguments() {
        let doc = sample();
        match doc.resolve(&NodePath::from([0, 0])) {
            Some(NodeRef::Argument(arg)) => assert_eq!(arg.name(), "value"),
            other => panic!("expected argument, got {:?}", other),
        }
        assert!(doc.resolve(&NodePath::from([0, 1])).is_none());
        assert!(matches!(
            doc.resolve(&NodePath::from([1])),
            Some(NodeRef::Block(_))
        ));
    }

    #[test]
    fn test_path_of_round_trips_node_at() {
        let doc = sample();
        for path in doc.paths() {
            let node = doc.node_at(&path).unwrap();
            assert_eq!(doc.path_of(node), Some(path));
        }
        let stranger = command("c.zero");
        assert_eq!(doc.path_of(&stranger), None);
    }

    #[test]
    fn test_effective_suppression_inherits() {
        let doc = sample();
        assert_eq!(doc.effective_suppression(&NodePath::from([1])), Some(false));
        assert_eq!(doc.effective_suppression(&NodePath::from([1, 1])), Some(true));
        assert_eq!(doc.effective_suppression(&NodePath::from([1, 1, 0])), Some(true));
        assert_eq!(doc.effective_suppression(&NodePath::from([9])), None);
    }

    #[test]
    fn test_filtered_keeps_structure_of_selected_descendants() {
        let mut doc = sample();
        doc.node_at_mut(&NodePath::from([1, 0])).unwrap().header_mut().selected = true;
        doc.node_at_mut(&NodePath::from([2])).unwrap().header_mut().selected = true;

        let subset = doc.selection_subset();
        assert_eq!(subset.children.len(), 2);
        assert_eq!(subset.children[0].name(), "Outer");
        assert_eq!(subset.children[0].children().len(), 1);
        assert_eq!(subset.children[0].children()[0].name(), "c.one");
        assert_eq!(subset.children[1].name(), "c.two");
    }

    #[test]
    fn test_find_path() {
        let mut doc = sample();
        if let Some(Node::Command(c)) = doc.node_at_mut(&NodePath::from([2])) {
            c.prefix = Prefix::Bang;
        }
        let path = doc.find_path(|node| {
            node.as_command()
                .map(|c| c.prefix == Prefix::Bang)
                .unwrap_or(false)
        });
        assert_eq!(path, Some(NodePath::from([2])));
    }
}
