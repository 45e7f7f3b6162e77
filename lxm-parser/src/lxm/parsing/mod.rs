//! Parsing
//!
//!     Text becomes a tree in two decoupled steps: the [`engine`] reads lines and reports
//!     structure to a [`builder::MacroBuilder`], and [`tree_builder::DocumentBuilder`] turns
//!     those reports into a [`MacroDocument`]. Other readers (the structured record formats)
//!     drive the same builder, so every format shares one tree construction path.
//!
//!     [`parse_macro`] wires the two together for the script dialects.

pub mod builder;
pub mod engine;
pub mod eval_call;
pub mod tree_builder;

pub use builder::{BuildEvent, EventLog, MacroBuilder};
pub use engine::LineEngine;
pub use tree_builder::DocumentBuilder;

use crate::lxm::ast::MacroDocument;
use crate::lxm::error::{ArgumentParseError, LxmError};
use crate::lxm::schema::CommandSchemaProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Argument errors abort the parse when set, skip the line otherwise.
    pub strict_arguments: bool,
    /// Name used in error positions.
    pub file_name: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_arguments: true,
            file_name: None,
        }
    }
}

impl ParseOptions {
    pub fn permissive() -> Self {
        Self {
            strict_arguments: false,
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// A command line dropped by a permissive parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub error: ArgumentParseError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub document: MacroDocument,
    pub skipped: Vec<SkippedLine>,
}

/// Parse a script or embedded-script macro. The dialect comes from the shebang.
pub fn parse_macro<P>(
    source: &str,
    schema: &P,
    options: &ParseOptions,
) -> Result<ParseOutput, LxmError>
where
    P: CommandSchemaProvider + ?Sized,
{
    let mut builder = DocumentBuilder::new(schema);
    let skipped = LineEngine::new(source, options).run(&mut builder)?;
    Ok(ParseOutput {
        document: builder.finish(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::ast::{FileFormat, Prefix};
    use crate::lxm::error::SyntaxErrorKind;
    use crate::lxm::lexing::{CommandLine, RawArgument};
    use crate::lxm::testing::{assert_macro, sample_schema};

    fn events(source: &str) -> Result<Vec<BuildEvent>, LxmError> {
        let mut log = EventLog::new();
        LineEngine::new(source, &ParseOptions::default()).run(&mut log)?;
        Ok(log.events)
    }

    fn syntax_kind(source: &str) -> (SyntaxErrorKind, usize) {
        match parse_macro(source, &sample_schema(), &ParseOptions::default()) {
            Err(LxmError::Syntax(e)) => (e.kind, e.line),
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_event_stream() {
        let source = "#LXMacro#\n# note\n# replay name:\"Drop\"\n!select.drop item\n";
        assert_eq!(
            events(source).unwrap(),
            vec![
                BuildEvent::Type(FileFormat::Script),
                BuildEvent::Comment("note".into()),
                BuildEvent::Meta("name".into(), serde_json::json!("Drop")),
                BuildEvent::Command {
                    line: CommandLine {
                        prefix: Prefix::Bang,
                        name: "select.drop".into(),
                        arguments: vec![RawArgument::positional("item")],
                    },
                    suppressed: false,
                },
            ]
        );
    }

    #[test]
    fn test_suppressed_block_raises_skip_depth() {
        let source = "#LXMacro#\n\
                      # replay suppress:\n\
                      ## Command Block Begin: Off\n\
                      ## inner note\n\
                      #select.drop item\n\
                      ## Command Block End: Off\n\
                      select.drop item\n";
        let events = events(source).unwrap();
        assert_eq!(
            events[1],
            BuildEvent::BlockStart {
                name: "Off".into(),
                suppressed: true
            }
        );
        assert_eq!(events[2], BuildEvent::Comment("inner note".into()));
        assert!(matches!(events[3], BuildEvent::Command { suppressed: false, .. }));
        assert_eq!(events[4], BuildEvent::BlockEnd("Off".into()));
        assert!(matches!(events[5], BuildEvent::Command { suppressed: false, .. }));
    }

    #[test]
    fn test_embedded_dialect() {
        let source = "# python\n# replay suppress:\n#lx.eval(\"select.drop item\")\n";
        let doc = parse_macro(source, &sample_schema(), &ParseOptions::default())
            .unwrap()
            .document;
        assert_eq!(doc.file_format, Some(FileFormat::EmbeddedScript));
        assert!(doc.children[0].header().suppressed_directly);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(syntax_kind("tool.set\n"), (SyntaxErrorKind::MissingShebang, 1));
        assert_eq!(syntax_kind(""), (SyntaxErrorKind::MissingShebang, 1));
        assert_eq!(
            syntax_kind("#LXMacro#\n# Command Block Begin: A\n# Command Block End: B\n"),
            (
                SyntaxErrorKind::MismatchedBlockEnd {
                    expected: "A".into(),
                    found: "B".into()
                },
                3
            )
        );
        assert_eq!(
            syntax_kind("#LXMacro#\n# Command Block End: B\n"),
            (SyntaxErrorKind::UnexpectedBlockEnd("B".into()), 2)
        );
        assert_eq!(
            syntax_kind("#LXMacro#\n# Command Block Begin: A\nselect.drop item\n"),
            (SyntaxErrorKind::UnterminatedBlock("A".into()), 2)
        );
        assert_eq!(
            syntax_kind("#LXMacro#\n# replay suppress:\nselect.drop item\n"),
            (SyntaxErrorKind::MalformedSuppressedLine, 3)
        );
        assert_eq!(
            syntax_kind("#LXMacro#\n# replay suppress:\n"),
            (SyntaxErrorKind::DanglingSuppressMarker, 2)
        );
        assert_eq!(
            syntax_kind("# python\nprint(1)\n").0,
            SyntaxErrorKind::UnrecognizedLine
        );
        assert!(matches!(
            syntax_kind("#LXMacro#\n# replay color:[1,\n").0,
            SyntaxErrorKind::MalformedMetadata { .. }
        ));
    }

    #[test]
    fn test_error_carries_file_and_context() {
        let options = ParseOptions::default().with_file_name("setup.LXM");
        let err = parse_macro("#LXMacro#\n# Command Block End: B\n", &sample_schema(), &options)
            .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("setup.LXM:2:"));
        assert!(text.contains(">>"));
    }

    #[test]
    fn test_permissive_mode_skips_argument_errors() {
        let source = "#LXMacro#\nselect.drop a b c d\nselect.drop item\n";
        let strict = parse_macro(source, &sample_schema(), &ParseOptions::default());
        assert!(matches!(strict, Err(LxmError::Argument { line: 2, .. })));

        let output = parse_macro(source, &sample_schema(), &ParseOptions::permissive()).unwrap();
        assert_eq!(output.document.children.len(), 1);
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].line, 2);
    }

    #[test]
    fn test_skipped_line_takes_its_header_along() {
        let source = "#LXMacro#\n\
                      # bad one\n\
                      # replay name:\"Bad\"\n\
                      # replay color:[1]\n\
                      select.drop a b\n\
                      # replay name:\"Open\"\n\
                      tool.set preset:'open\n\
                      tool.doApply\n";
        let output = parse_macro(source, &sample_schema(), &ParseOptions::permissive()).unwrap();
        assert_eq!(output.skipped.len(), 2);
        assert_macro(&output.document)
            .item_count(1)
            .node(0, |n| n.comments(&[]).display_name(""));
        assert!(output.document.children[0].header().metadata.is_empty());
    }

    #[test]
    fn test_string_args_metadata_sets_override() {
        let source = "#LXMacro#\n# replay asString:[\"mode\"]\ntool.set mode:\"-1\"\n";
        let doc = parse_macro(source, &sample_schema(), &ParseOptions::default())
            .unwrap()
            .document;
        assert_macro(&doc).node(0, |n| {
            n.assert_command()
                .argument("mode", Some("-1"))
                .as_string("mode", true)
        });
        assert!(doc.children[0].header().metadata.is_empty());

        let unknown = "#LXMacro#\n# replay asString:[\"colour\"]\ntool.set mode:on\n";
        let result = parse_macro(unknown, &sample_schema(), &ParseOptions::default());
        assert!(matches!(result, Err(LxmError::Argument { line: 3, .. })));
    }

    #[test]
    fn test_skip_is_reported_to_the_builder() {
        let mut log = EventLog::new();
        LineEngine::new("#LXMacro#\nselect.drop 'open\n", &ParseOptions::permissive())
            .run(&mut log)
            .unwrap();
        assert_eq!(log.events.last(), Some(&BuildEvent::Skip));
    }

    #[test]
    fn test_unknown_command_is_fatal_even_when_permissive() {
        let source = "#LXMacro#\nno.such.command\n";
        let result = parse_macro(source, &sample_schema(), &ParseOptions::permissive());
        assert!(matches!(result, Err(LxmError::Schema { line: 2, .. })));
    }

    #[test]
    fn test_crlf_input() {
        let source = "#LXMacro#\r\n# hello\r\nselect.drop item\r\n";
        let doc = parse_macro(source, &sample_schema(), &ParseOptions::default())
            .unwrap()
            .document;
        assert_eq!(doc.children[0].header().comments_before, vec!["hello"]);
    }
}
