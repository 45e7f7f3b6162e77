//! Commands, blocks and their shared header

use super::argument::Argument;
use crate::lxm::schema::CommandSchema;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// User metadata shared by every node kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeHeader {
    pub selected: bool,
    /// Anchor for "insert after". Only one node per document carries it, see
    /// [`MacroDocument::set_primary`](super::MacroDocument::set_primary).
    pub(crate) primary: bool,
    /// Local suppression flag. Effective suppression also looks at the ancestors.
    pub suppressed_directly: bool,
    pub comments_before: Vec<String>,
    pub metadata: Map<String, Value>,
    pub display_name: String,
}

impl NodeHeader {
    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

/// Execution prefix of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Prefix {
    #[default]
    None,
    /// `!` suppress dialogs
    Bang,
    /// `!!` suppress dialogs and errors
    DoubleBang,
    /// `+` show dialogs
    Plus,
    /// `++` show dialogs and errors
    DoublePlus,
    /// `?` query
    Query,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::None => "",
            Prefix::Bang => "!",
            Prefix::DoubleBang => "!!",
            Prefix::Plus => "+",
            Prefix::DoublePlus => "++",
            Prefix::Query => "?",
        }
    }

    /// Split a leading prefix off a command line. Longest prefix wins.
    pub fn split(line: &str) -> (Prefix, &str) {
        for prefix in [
            Prefix::DoubleBang,
            Prefix::DoublePlus,
            Prefix::Bang,
            Prefix::Plus,
            Prefix::Query,
        ] {
            if let Some(rest) = line.strip_prefix(prefix.as_str()) {
                return (prefix, rest);
            }
        }
        (Prefix::None, line)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Prefix::split(s) {
            (prefix, "") => Ok(prefix),
            _ => Err(format!("`{}` is not a command prefix", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub prefix: Prefix,
    /// One entry per schema slot, in schema order.
    pub arguments: Vec<Argument>,
    pub header: NodeHeader,
}

impl Command {
    /// A command with every schema argument present and unset.
    pub fn from_schema(schema: &CommandSchema) -> Self {
        Self {
            name: schema.name.clone(),
            prefix: Prefix::None,
            arguments: schema.arguments.iter().cloned().map(Argument::new).collect(),
            header: NodeHeader::default(),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name() == name)
    }

    pub fn argument_mut(&mut self, name: &str) -> Option<&mut Argument> {
        self.arguments.iter_mut().find(|arg| arg.name() == name)
    }

    /// Set the value of a named argument. Returns false when the schema has no such slot.
    pub fn set_argument(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.argument_mut(name) {
            Some(arg) => {
                arg.value = Some(value.into());
                true
            }
            None => false,
        }
    }

    pub fn with_argument(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_argument(name, value);
        self
    }

    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = prefix;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub children: Vec<Node>,
    pub header: NodeHeader,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            header: NodeHeader::default(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            children,
            header: NodeHeader::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Command(Command),
    Block(Block),
}

impl Node {
    pub fn header(&self) -> &NodeHeader {
        match self {
            Node::Command(command) => &command.header,
            Node::Block(block) => &block.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut NodeHeader {
        match self {
            Node::Command(command) => &mut command.header,
            Node::Block(block) => &mut block.header,
        }
    }

    /// Child nodes. Commands have none (their arguments are not nodes of the tree).
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Command(_) => &[],
            Node::Block(block) => &block.children,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Command(_) => None,
            Node::Block(block) => Some(&mut block.children),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Command(command) => &command.name,
            Node::Block(block) => &block.name,
        }
    }

    /// Display name when one is set, name otherwise.
    pub fn label(&self) -> &str {
        let header = self.header();
        if header.display_name.is_empty() {
            self.name()
        } else {
            &header.display_name
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Command(_) => "Command",
            Node::Block(_) => "Block",
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Node::Command(command) => Some(command),
            Node::Block(_) => None,
        }
    }

    pub fn as_command_mut(&mut self) -> Option<&mut Command> {
        match self {
            Node::Command(command) => Some(command),
            Node::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Command(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Command(_) => None,
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }
}

impl From<Command> for Node {
    fn from(command: Command) -> Self {
        Node::Command(command)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

/// Borrowed view of whatever a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Command(&'a Command),
    Block(&'a Block),
    Argument(&'a Argument),
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Command(command) => NodeRef::Command(command),
            Node::Block(block) => NodeRef::Block(block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::schema::ArgumentDescriptor;

    #[test]
    fn test_prefix_split_prefers_longest() {
        assert_eq!(Prefix::split("!!tool.set"), (Prefix::DoubleBang, "tool.set"));
        assert_eq!(Prefix::split("!tool.set"), (Prefix::Bang, "tool.set"));
        assert_eq!(Prefix::split("++x"), (Prefix::DoublePlus, "x"));
        assert_eq!(Prefix::split("?x"), (Prefix::Query, "x"));
        assert_eq!(Prefix::split("x"), (Prefix::None, "x"));
    }

    #[test]
    fn test_prefix_from_str() {
        assert_eq!("".parse::<Prefix>(), Ok(Prefix::None));
        assert_eq!("++".parse::<Prefix>(), Ok(Prefix::DoublePlus));
        assert!("!?".parse::<Prefix>().is_err());
    }

    #[test]
    fn test_command_from_schema_has_unset_slots() {
        let schema = CommandSchema::new(
            "tool.set",
            vec![ArgumentDescriptor::new("preset"), ArgumentDescriptor::new("mode")],
        );
        let command = Command::from_schema(&schema).with_argument("mode", "on");
        assert_eq!(command.arguments.len(), 2);
        assert!(!command.arguments[0].is_set());
        assert_eq!(command.argument("mode").unwrap().value.as_deref(), Some("on"));
        assert!(!command.clone().set_argument("nope", "x"));
    }

    #[test]
    fn test_label_prefers_display_name() {
        let mut node = Node::Block(Block::new("Setup"));
        assert_eq!(node.label(), "Setup");
        node.header_mut().display_name = "Scene setup".into();
        assert_eq!(node.label(), "Scene setup");
    }
}
