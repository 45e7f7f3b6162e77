//! Lexing
//!
//!     Two independent pieces of lexical analysis feed the parser:
//!
//!     - [`tokens`] and [`arguments`]: a command line is split into prefix, command name and
//!       argument tokens. Tokens are produced by a logos lexer; adjacent tokens (no whitespace
//!       in between) form one argument word, which is then read as `name:value` or as a
//!       positional value.
//!     - [`line_classification`]: each physical line of a script is classified as a marker,
//!       metadata, comment or command line before the parser state machine sees it.

pub mod arguments;
pub mod line_classification;
pub mod tokens;

pub use arguments::{
    assign_arguments, needs_quoting, override_hidden_by_quoting, quote_value, render_command_line,
    split_command_line, tokenize_arguments, CommandLine, RawArgument,
};
pub use line_classification::{classify_line, strip_comment_depth, LineType};
pub use tokens::ArgToken;
