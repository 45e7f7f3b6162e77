//! Tree construction from builder events
//!
//!     [`DocumentBuilder`] keeps a stack of open blocks. Commands and closed blocks are appended
//!     to the innermost open block, or to the root when none is open.
//!
//!     Header lines arrive before the node they belong to, so comments and metadata are held
//!     as pending until the next node is created. A paragraph break drops pending comments.
//!     Whatever is still pending when a block closes (or the input ends) has no node to attach
//!     to and is dropped with a warning.
//!
//!     The metadata key `name` carries the node's display name and `asString` lists the
//!     arguments of the next command whose string override the quoting cannot show. Every
//!     other key lands in the node's metadata map.

use super::builder::MacroBuilder;
use crate::lxm::ast::{Block, Command, FileFormat, MacroDocument, Node, NodeHeader};
use crate::lxm::error::{ArgumentParseError, BuildError};
use crate::lxm::lexing::{assign_arguments, CommandLine};
use crate::lxm::schema::CommandSchemaProvider;
use serde_json::{Map, Value};

/// Metadata key reserved for the display name.
pub const DISPLAY_NAME_KEY: &str = "name";

/// Metadata key listing arguments with a string override.
pub const STRING_ARGS_KEY: &str = "asString";

/// Whether a metadata entry is read as something other than plain metadata.
pub fn is_reserved_meta(key: &str, value: &Value) -> bool {
    match value {
        Value::String(_) => key == DISPLAY_NAME_KEY,
        Value::Array(items) => key == STRING_ARGS_KEY && items.iter().all(Value::is_string),
        _ => false,
    }
}

pub struct DocumentBuilder<'s, P: CommandSchemaProvider + ?Sized> {
    schema: &'s P,
    format: Option<FileFormat>,
    root: Vec<Node>,
    open_blocks: Vec<Block>,
    pending_comments: Vec<String>,
    pending_meta: Map<String, Value>,
    pending_display_name: Option<String>,
    pending_string_args: Vec<String>,
}

impl<'s, P: CommandSchemaProvider + ?Sized> DocumentBuilder<'s, P> {
    pub fn new(schema: &'s P) -> Self {
        Self {
            schema,
            format: None,
            root: Vec::new(),
            open_blocks: Vec::new(),
            pending_comments: Vec::new(),
            pending_meta: Map::new(),
            pending_display_name: None,
            pending_string_args: Vec::new(),
        }
    }

    /// Close whatever is still open and return the document.
    pub fn finish(mut self) -> MacroDocument {
        self.drop_pending("end of input");
        while let Some(block) = self.open_blocks.pop() {
            log::warn!("closing block `{}` left open at end of input", block.name);
            self.attach(Node::Block(block));
        }
        MacroDocument {
            children: self.root,
            file_path: None,
            file_format: self.format,
            unsaved_changes: false,
        }
    }

    fn take_header(&mut self, suppressed: bool) -> NodeHeader {
        NodeHeader {
            suppressed_directly: suppressed,
            comments_before: std::mem::take(&mut self.pending_comments),
            metadata: std::mem::take(&mut self.pending_meta),
            display_name: self.pending_display_name.take().unwrap_or_default(),
            ..NodeHeader::default()
        }
    }

    fn attach(&mut self, node: Node) {
        match self.open_blocks.last_mut() {
            Some(block) => block.children.push(node),
            None => self.root.push(node),
        }
    }

    fn drop_pending(&mut self, place: &str) {
        if !self.pending_comments.is_empty() {
            log::warn!(
                "dropping {} comment line(s) with no following node at {}",
                self.pending_comments.len(),
                place
            );
            self.pending_comments.clear();
        }
        if !self.pending_meta.is_empty()
            || self.pending_display_name.is_some()
            || !self.pending_string_args.is_empty()
        {
            log::warn!("dropping metadata with no following node at {}", place);
            self.pending_meta.clear();
            self.pending_display_name = None;
            self.pending_string_args.clear();
        }
    }
}

impl<P: CommandSchemaProvider + ?Sized> MacroBuilder for DocumentBuilder<'_, P> {
    fn build_type(&mut self, format: FileFormat) {
        self.format = Some(format);
    }

    fn build_meta(&mut self, key: &str, value: Value) {
        if !is_reserved_meta(key, &value) {
            self.pending_meta.insert(key.to_string(), value);
            return;
        }
        match value {
            Value::String(name) => self.pending_display_name = Some(name),
            Value::Array(names) => self
                .pending_string_args
                .extend(names.into_iter().filter_map(|name| match name {
                    Value::String(name) => Some(name),
                    _ => None,
                })),
            value => {
                self.pending_meta.insert(key.to_string(), value);
            }
        }
    }

    fn build_comment(&mut self, text: &str) {
        self.pending_comments.push(text.to_string());
    }

    fn build_paragraph_break(&mut self) {
        self.pending_comments.clear();
    }

    fn build_block_start(&mut self, name: &str, suppressed: bool) {
        if !self.pending_string_args.is_empty() {
            log::warn!("ignoring `{}` metadata on block `{}`", STRING_ARGS_KEY, name);
            self.pending_string_args.clear();
        }
        let mut block = Block::new(name);
        block.header = self.take_header(suppressed);
        self.open_blocks.push(block);
    }

    fn build_block_end(&mut self, name: &str) {
        let place = format!("end of block `{}`", name);
        self.drop_pending(&place);
        if let Some(block) = self.open_blocks.pop() {
            self.attach(Node::Block(block));
        }
    }

    fn build_command(&mut self, line: CommandLine, suppressed: bool) -> Result<(), BuildError> {
        // The header belongs to this line even when the line is rejected
        let header = self.take_header(suppressed);
        let string_args = std::mem::take(&mut self.pending_string_args);

        let schema = self.schema.schema_for(&line.name)?;
        let mut arguments = assign_arguments(&schema, line.arguments)?;
        for name in string_args {
            let slot = arguments
                .iter_mut()
                .find(|argument| argument.name() == name)
                .ok_or_else(|| ArgumentParseError::UnknownArgument {
                    command: schema.name.clone(),
                    name,
                })?;
            slot.as_string_override = true;
        }

        let command = Command {
            name: line.name,
            prefix: line.prefix,
            arguments,
            header,
        };
        self.attach(Node::Command(command));
        Ok(())
    }

    fn build_skip(&mut self) {
        self.pending_comments.clear();
        self.pending_meta.clear();
        self.pending_display_name = None;
        self.pending_string_args.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::ast::Prefix;
    use crate::lxm::error::SchemaLookupError;
    use crate::lxm::lexing::RawArgument;
    use crate::lxm::testing::sample_schema;
    use serde_json::json;

    fn line(name: &str, args: Vec<RawArgument>) -> CommandLine {
        CommandLine {
            prefix: Prefix::None,
            name: name.to_string(),
            arguments: args,
        }
    }

    #[test]
    fn test_header_attaches_to_next_node() {
        let schema = sample_schema();
        let mut builder = DocumentBuilder::new(&schema);
        builder.build_type(FileFormat::Script);
        builder.build_comment("first");
        builder.build_meta("name", json!("Pretty"));
        builder.build_meta("color", json!([1, 2]));
        builder
            .build_command(line("select.drop", vec![RawArgument::positional("item")]), true)
            .unwrap();
        let doc = builder.finish();

        assert_eq!(doc.file_format, Some(FileFormat::Script));
        let header = doc.children[0].header();
        assert_eq!(header.comments_before, vec!["first".to_string()]);
        assert_eq!(header.display_name, "Pretty");
        assert_eq!(header.metadata.get("color"), Some(&json!([1, 2])));
        assert!(header.suppressed_directly);
    }

    #[test]
    fn test_blocks_nest() {
        let schema = sample_schema();
        let mut builder = DocumentBuilder::new(&schema);
        builder.build_block_start("Outer", false);
        builder.build_block_start("Inner", true);
        builder
            .build_command(line("select.drop", vec![]), false)
            .unwrap();
        builder.build_block_end("Inner");
        builder.build_block_end("Outer");
        let doc = builder.finish();

        let outer = doc.children[0].as_block().unwrap();
        let inner = outer.children[0].as_block().unwrap();
        assert!(inner.header.suppressed_directly);
        assert_eq!(inner.children[0].name(), "select.drop");
    }

    #[test]
    fn test_paragraph_break_and_block_end_drop_comments() {
        let schema = sample_schema();
        let mut builder = DocumentBuilder::new(&schema);
        builder.build_comment("lost");
        builder.build_paragraph_break();
        builder.build_block_start("B", false);
        builder.build_comment("dangling");
        builder.build_block_end("B");
        let doc = builder.finish();

        assert!(doc.children[0].header().comments_before.is_empty());
        assert!(doc.children[0].children().is_empty());
    }

    #[test]
    fn test_reserved_metadata() {
        assert!(is_reserved_meta("name", &json!("Shown")));
        assert!(!is_reserved_meta("name", &json!(3)));
        assert!(is_reserved_meta("asString", &json!(["mode"])));
        assert!(!is_reserved_meta("asString", &json!([1])));
        assert!(!is_reserved_meta("color", &json!(["red"])));
    }

    #[test]
    fn test_failed_command_consumes_its_header() {
        let schema = sample_schema();
        let mut builder = DocumentBuilder::new(&schema);
        builder.build_comment("for the bad line");
        builder.build_meta("name", json!("Bad"));
        assert!(builder
            .build_command(line("select.drop", vec![RawArgument::named("nope", "x")]), false)
            .is_err());
        builder.build_meta("asString", json!(["type"]));
        builder.build_skip();
        builder.build_command(line("tool.doApply", vec![]), false).unwrap();
        let doc = builder.finish();

        let header = doc.children[0].header();
        assert!(header.comments_before.is_empty());
        assert_eq!(header.display_name, "");
    }

    #[test]
    fn test_unknown_command_fails() {
        let schema = sample_schema();
        let mut builder = DocumentBuilder::new(&schema);
        let err = builder
            .build_command(line("no.such", vec![]), false)
            .unwrap_err();
        assert_eq!(err, BuildError::Schema(SchemaLookupError::new("no.such")));
    }
}
