//! Line serializer for the two script dialects
//!
//!     Nodes are written in document order. Each node emits its header lines first, then its
//!     body:
//!
//!         # <comment>                  one per entry of comments_before
//!         # replay name:"<display>"    when the display name is set
//!         # replay <key>:<json>        one per metadata entry, in insertion order
//!         # replay asString:[...]      arguments whose string override the quotes cannot show
//!         # replay suppress:           when suppressed_directly is set
//!         <body>
//!
//!     The body of a command is its command line, wrapped in an eval call for the embedded
//!     dialect. The body of a block is its begin marker, its children and its end marker.
//!
//!     Suppression is written as comment depth: a suppressed node's whole body, including
//!     every line inside a suppressed block, gets one more leading `#` than its header. Each
//!     line is checked against the line classifier before it is written, so text that would
//!     read back as a different kind of line is refused instead of silently corrupted.

use crate::common::{check_metadata, check_single_line};
use crate::error::FormatError;
use lxm_parser::lxm::lexing::line_classification::{
    render_comment, BLOCK_BEGIN_MARKER, BLOCK_END_MARKER, METADATA_PREFIX, SCRIPT_SHEBANG,
    SUPPRESS_MARKER,
};
use lxm_parser::lxm::lexing::{
    classify_line, override_hidden_by_quoting, render_command_line, split_command_line, LineType,
};
use lxm_parser::lxm::parsing::eval_call::quote_python_string;
use lxm_parser::lxm::parsing::tree_builder::{DISPLAY_NAME_KEY, STRING_ARGS_KEY};
use lxm_parser::lxm::{Block, Command, MacroDocument, Node, NodeHeader};

/// Shebang written by the embedded dialect.
pub const PYTHON_SHEBANG: &str = "# python";

/// How command lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStyle {
    /// `tool.set mode:on`
    Plain,
    /// `lx.eval("tool.set mode:on")`
    Eval { callee: String },
}

pub struct ScriptSerializer {
    style: CommandStyle,
    out: String,
}

impl ScriptSerializer {
    pub fn new(style: CommandStyle) -> Self {
        Self {
            style,
            out: String::new(),
        }
    }

    pub fn serialize(mut self, doc: &MacroDocument) -> Result<String, FormatError> {
        let shebang = match self.style {
            CommandStyle::Plain => SCRIPT_SHEBANG,
            CommandStyle::Eval { .. } => PYTHON_SHEBANG,
        };
        self.push_line(0, shebang);
        for node in &doc.children {
            self.write_node(node, 0)?;
        }
        Ok(self.out)
    }

    fn push_line(&mut self, depth: usize, line: &str) {
        for _ in 0..depth {
            self.out.push('#');
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn write_node(&mut self, node: &Node, depth: usize) -> Result<(), FormatError> {
        self.write_header(node.header(), depth)?;
        if let Node::Command(command) = node {
            let hidden: Vec<serde_json::Value> = command
                .arguments
                .iter()
                .filter(|argument| override_hidden_by_quoting(argument))
                .map(|argument| serde_json::Value::String(argument.name().to_string()))
                .collect();
            if !hidden.is_empty() {
                self.write_meta(depth, STRING_ARGS_KEY, &serde_json::Value::Array(hidden))?;
            }
        }
        let body_depth = if node.header().suppressed_directly {
            self.push_line(depth, SUPPRESS_MARKER);
            depth + 1
        } else {
            depth
        };
        match node {
            Node::Command(command) => self.write_command(command, body_depth),
            Node::Block(block) => self.write_block(block, body_depth),
        }
    }

    fn write_header(&mut self, header: &NodeHeader, depth: usize) -> Result<(), FormatError> {
        for comment in &header.comments_before {
            check_single_line(comment, "comment")?;
            let line = render_comment(comment);
            if !matches!(classify_line(&line), LineType::Comment(_)) {
                return Err(FormatError::Serialization(format!(
                    "comment {:?} would read back as a marker",
                    comment
                )));
            }
            self.push_line(depth, &line);
        }

        check_metadata(header)?;
        if !header.display_name.is_empty() {
            let value = serde_json::Value::String(header.display_name.clone());
            self.write_meta(depth, DISPLAY_NAME_KEY, &value)?;
        }
        for (key, value) in &header.metadata {
            self.write_meta(depth, key, value)?;
        }
        Ok(())
    }

    fn write_meta(
        &mut self,
        depth: usize,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), FormatError> {
        let json = serde_json::to_string(value)
            .map_err(|e| FormatError::Serialization(e.to_string()))?;
        let line = format!("{}{}:{}", METADATA_PREFIX, key, json);
        match classify_line(&line) {
            LineType::Metadata { key: read, .. } if read == key => {
                self.push_line(depth, &line);
                Ok(())
            }
            _ => Err(FormatError::Serialization(format!(
                "`{}` is not a valid metadata key",
                key
            ))),
        }
    }

    fn write_command(&mut self, command: &Command, depth: usize) -> Result<(), FormatError> {
        let line = render_command_line(command).ok_or_else(|| {
            FormatError::Serialization(format!(
                "an argument of `{}` holds every quote character",
                command.name
            ))
        })?;
        check_single_line(&line, "command line")?;
        if !reads_back(command, &line) {
            return Err(FormatError::Serialization(format!(
                "command line {:?} would read back with different arguments",
                line
            )));
        }
        let body = match &self.style {
            CommandStyle::Plain => {
                if !matches!(classify_line(&line), LineType::Command(_)) {
                    return Err(FormatError::Serialization(format!(
                        "command line {:?} would not read back as a command",
                        line
                    )));
                }
                line
            }
            CommandStyle::Eval { callee } => format!("{}({})", callee, quote_python_string(&line)),
        };
        self.push_line(depth, &body);
        Ok(())
    }

    fn write_block(&mut self, block: &Block, depth: usize) -> Result<(), FormatError> {
        check_single_line(&block.name, "block name")?;
        if block.name.trim() != block.name || block.name.is_empty() {
            return Err(FormatError::Serialization(format!(
                "block name {:?} is empty or has surrounding whitespace",
                block.name
            )));
        }
        self.push_line(depth, &format!("{}{}", BLOCK_BEGIN_MARKER, block.name));
        for child in &block.children {
            self.write_node(child, depth)?;
        }
        self.push_line(depth, &format!("{}{}", BLOCK_END_MARKER, block.name));
        Ok(())
    }
}

/// Whether splitting `line` gives back the command's prefix, name and set values.
fn reads_back(command: &Command, line: &str) -> bool {
    let Ok(parsed) = split_command_line(line) else {
        return false;
    };
    let expected = command
        .arguments
        .iter()
        .filter_map(|argument| Some((argument.name(), argument.value.as_deref()?)));
    let found = parsed
        .arguments
        .iter()
        .map(|word| (word.name.as_deref().unwrap_or_default(), word.value.as_str()));
    parsed.prefix == command.prefix && parsed.name == command.name && expected.eq(found)
}
