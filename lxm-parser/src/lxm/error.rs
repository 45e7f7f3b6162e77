//! Error types for parsing macros
//!
//! Three families of failure are distinguished:
//!
//! - [`SyntaxError`]: the text is not a well formed macro (bad shebang, unbalanced blocks,
//!   malformed metadata). Always fatal to the parse.
//! - [`ArgumentParseError`]: a single command line could not be split into arguments. Fatal in
//!   strict mode, skips the line in permissive mode.
//! - [`SchemaLookupError`]: the registry does not know the command. Always fatal, the engine
//!   never guesses a schema.
//!
//! [`LxmError`] unifies them and carries the file and line the failure was found on.

use std::fmt;
use thiserror::Error;

/// Name used for sources that do not come from a file
pub const ANONYMOUS_SOURCE: &str = "<input>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("missing or malformed shebang, expected `#LXMacro#` or `# python`")]
    MissingShebang,
    #[error("block end `{found}` does not match the open block `{expected}`")]
    MismatchedBlockEnd { expected: String, found: String },
    #[error("block end `{0}` without a matching block begin")]
    UnexpectedBlockEnd(String),
    #[error("block `{0}` is never closed")]
    UnterminatedBlock(String),
    #[error("malformed metadata for key `{key}`: {reason}")]
    MalformedMetadata { key: String, reason: String },
    #[error("suppressed content must be commented out one level deeper")]
    MalformedSuppressedLine,
    #[error("suppress marker is not followed by a command or a block")]
    DanglingSuppressMarker,
    #[error("expected a comment, a block marker or an eval call with a literal command string")]
    UnrecognizedLine,
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// A fatal grammar error, positioned by file and 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub file: String,
    pub line: usize,
    /// Numbered excerpt of the source around `line`, empty when the source is unavailable.
    pub context: String,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, file: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            file: file.into(),
            line,
            context: String::new(),
        }
    }

    pub fn with_context(mut self, source: &str) -> Self {
        self.context = format_source_context(source, self.line);
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.kind)?;
        if !self.context.is_empty() {
            writeln!(f)?;
            write!(f, "{}", self.context.trim_end())?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentParseError {
    #[error("unterminated {quote} quote starting at column {column}")]
    UnterminatedQuote { quote: char, column: usize },
    #[error("command `{command}` has no argument named `{name}`")]
    UnknownArgument { command: String, name: String },
    #[error("too many arguments for `{command}`: no free slot for `{value}`")]
    TooManyArguments { command: String, value: String },
    #[error("argument `{name}` of `{command}` is given more than once")]
    DuplicateArgument { command: String, name: String },
    #[error("missing command name")]
    MissingCommandName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command `{command}`")]
pub struct SchemaLookupError {
    pub command: String,
}

impl SchemaLookupError {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Failure to turn one command line into a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Argument(#[from] ArgumentParseError),
    #[error(transparent)]
    Schema(#[from] SchemaLookupError),
}

/// Any error surfaced by a parse, with positional context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LxmError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("{file}:{line}: {error}")]
    Argument {
        file: String,
        line: usize,
        error: ArgumentParseError,
    },
    #[error("{file}:{line}: {error}")]
    Schema {
        file: String,
        line: usize,
        error: SchemaLookupError,
    },
}

impl LxmError {
    pub fn from_build(error: BuildError, file: impl Into<String>, line: usize) -> Self {
        match error {
            BuildError::Argument(error) => LxmError::Argument {
                file: file.into(),
                line,
                error,
            },
            BuildError::Schema(error) => LxmError::Schema {
                file: file.into(),
                line,
                error,
            },
        }
    }

    /// The 1-based line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            LxmError::Syntax(e) => e.line,
            LxmError::Argument { line, .. } | LxmError::Schema { line, .. } => *line,
        }
    }
}

/// Format source code context around an error line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// `line` is 1-based, as reported in errors.
pub fn format_source_context(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if line == 0 || lines.is_empty() {
        return String::new();
    }
    let error_line = line - 1;
    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for line_num in start_line..end_line {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!(
            "{} {:3} | {}\n",
            marker,
            line_num + 1,
            lines[line_num]
        ));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, 4);

        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
    }

    #[test]
    fn test_context_out_of_range_is_empty() {
        assert_eq!(format_source_context("", 3), "");
        assert_eq!(format_source_context("a\nb", 0), "");
    }

    #[test]
    fn test_syntax_error_display_includes_position() {
        let err = SyntaxError::new(SyntaxErrorKind::UnterminatedBlock("Setup".into()), "a.LXM", 7);
        assert_eq!(err.to_string(), "a.LXM:7: block `Setup` is never closed");
    }

    #[test]
    fn test_build_error_gets_position() {
        let err = LxmError::from_build(
            BuildError::Schema(SchemaLookupError::new("no.such")),
            ANONYMOUS_SOURCE,
            3,
        );
        assert_eq!(err.line(), 3);
        assert_eq!(err.to_string(), "<input>:3: unknown command `no.such`");
    }
}
