//! Builder interface
//!
//!     The line engine and the structured record reader do not construct nodes themselves.
//!     They report what they recognise, in document order, to a [`MacroBuilder`]:
//!
//!     - `build_type` once, with the dialect of the source
//!     - `build_comment` and `build_meta` for header lines, which belong to the next node
//!     - `build_paragraph_break` for a blank line
//!     - `build_block_start` / `build_block_end` around a block's contents
//!     - `build_command` for each command line, already split into prefix, name and words
//!     - `build_skip` for a command line dropped by a permissive parse, whose header lines
//!       must not carry over to the next node
//!
//!     [`DocumentBuilder`](super::tree_builder::DocumentBuilder) turns the events into a
//!     [`MacroDocument`](crate::lxm::ast::MacroDocument). [`EventLog`] just records them, which
//!     is what the grammar tests assert against.

use crate::lxm::ast::FileFormat;
use crate::lxm::error::BuildError;
use crate::lxm::lexing::CommandLine;
use serde_json::Value;

pub trait MacroBuilder {
    fn build_type(&mut self, format: FileFormat);
    fn build_meta(&mut self, key: &str, value: Value);
    fn build_comment(&mut self, text: &str);
    fn build_paragraph_break(&mut self);
    fn build_block_start(&mut self, name: &str, suppressed: bool);
    fn build_block_end(&mut self, name: &str);
    /// Only this callback can fail: the command must be known and its words must fit the
    /// command's argument slots.
    fn build_command(&mut self, line: CommandLine, suppressed: bool) -> Result<(), BuildError>;
    fn build_skip(&mut self);
}

/// One builder callback, as recorded by [`EventLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Type(FileFormat),
    Meta(String, Value),
    Comment(String),
    ParagraphBreak,
    BlockStart { name: String, suppressed: bool },
    BlockEnd(String),
    Command { line: CommandLine, suppressed: bool },
    Skip,
}

/// A builder that records every callback.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<BuildEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MacroBuilder for EventLog {
    fn build_type(&mut self, format: FileFormat) {
        self.events.push(BuildEvent::Type(format));
    }

    fn build_meta(&mut self, key: &str, value: Value) {
        self.events.push(BuildEvent::Meta(key.to_string(), value));
    }

    fn build_comment(&mut self, text: &str) {
        self.events.push(BuildEvent::Comment(text.to_string()));
    }

    fn build_paragraph_break(&mut self) {
        self.events.push(BuildEvent::ParagraphBreak);
    }

    fn build_block_start(&mut self, name: &str, suppressed: bool) {
        self.events.push(BuildEvent::BlockStart {
            name: name.to_string(),
            suppressed,
        });
    }

    fn build_block_end(&mut self, name: &str) {
        self.events.push(BuildEvent::BlockEnd(name.to_string()));
    }

    fn build_command(&mut self, line: CommandLine, suppressed: bool) -> Result<(), BuildError> {
        self.events.push(BuildEvent::Command { line, suppressed });
        Ok(())
    }

    fn build_skip(&mut self) {
        self.events.push(BuildEvent::Skip);
    }
}
