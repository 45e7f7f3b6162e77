//! Command line splitting and argument slot assignment
//!
//!     A command line reads `[prefix]name arg arg ...`. Each argument word is either named,
//!     `name:value`, or positional. A word is named when it starts with a bare piece holding a
//!     colon, so no quote or brace can come before the colon: `"a:b"` is a positional value.
//!
//!     Splitting needs no schema. Assigning the words to argument slots does: named words go to
//!     their slot, positional words fill the next free slot in schema order.
//!
//!     Rendering is the inverse: set arguments are written in named form, in schema order,
//!     quoted with `"` when the value has whitespace or non word characters (or when the
//!     argument is forced to render as a string). Quotes around a value that needs none mark
//!     the string override; for a value that needs quoting anyway the override is carried by
//!     an `asString` metadata line on the command instead.

use super::tokens::ArgToken;
use crate::lxm::ast::{Argument, Command, Prefix};
use crate::lxm::error::ArgumentParseError;
use crate::lxm::schema::CommandSchema;
use logos::Logos;

/// One argument word before slot assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    pub name: Option<String>,
    pub value: String,
    /// Quoted although the value would not need it.
    pub as_string: bool,
}

impl RawArgument {
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
            as_string: false,
        }
    }

    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
            as_string: false,
        }
    }
}

/// A command line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub prefix: Prefix,
    pub name: String,
    pub arguments: Vec<RawArgument>,
}

/// Split a command line into prefix, name and argument words.
pub fn split_command_line(line: &str) -> Result<CommandLine, ArgumentParseError> {
    let lead = line.len() - line.trim_start().len();
    let trimmed = line.trim();
    let (prefix, after_prefix) = Prefix::split(trimmed);
    let rest = after_prefix.trim_start();
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = &rest[..name_end];
    if name.is_empty() {
        return Err(ArgumentParseError::MissingCommandName);
    }
    let base = lead + (trimmed.len() - rest.len()) + name_end;
    let arguments = tokenize_at(&rest[name_end..], base)?;
    Ok(CommandLine {
        prefix,
        name: name.to_string(),
        arguments,
    })
}

/// Split an argument string into words.
pub fn tokenize_arguments(text: &str) -> Result<Vec<RawArgument>, ArgumentParseError> {
    tokenize_at(text, 0)
}

#[derive(Default)]
struct Word {
    pieces: Vec<(bool, String)>,
}

impl Word {
    fn push(&mut self, token: &ArgToken, slice: &str) {
        self.pieces
            .push((token.is_quoted(), token.content(slice).to_string()));
    }

    fn finish(self) -> RawArgument {
        let mut pieces = self.pieces.into_iter();
        let mut name = None;
        let mut value = String::new();
        let mut quoted = false;

        if let Some((first_quoted, first)) = pieces.next() {
            match first.find(':') {
                Some(colon) if !first_quoted && colon > 0 => {
                    name = Some(first[..colon].to_string());
                    value.push_str(&first[colon + 1..]);
                }
                _ => {
                    quoted |= first_quoted;
                    value.push_str(&first);
                }
            }
        }
        for (piece_quoted, piece) in pieces {
            quoted |= piece_quoted;
            value.push_str(&piece);
        }

        let as_string = quoted && !needs_quoting(&value);
        RawArgument {
            name,
            value,
            as_string,
        }
    }
}

fn tokenize_at(text: &str, base: usize) -> Result<Vec<RawArgument>, ArgumentParseError> {
    let mut lexer = ArgToken::lexer(text);
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    while let Some(token) = lexer.next() {
        match token {
            Err(()) => {
                let start = lexer.span().start;
                let quote = text[start..].chars().next().unwrap_or('"');
                return Err(ArgumentParseError::UnterminatedQuote {
                    quote,
                    column: base + start + 1,
                });
            }
            Ok(ArgToken::Whitespace) => {
                if let Some(word) = current.take() {
                    words.push(word.finish());
                }
            }
            Ok(token) => current
                .get_or_insert_with(Word::default)
                .push(&token, lexer.slice()),
        }
    }
    if let Some(word) = current {
        words.push(word.finish());
    }
    Ok(words)
}

/// Assign argument words to the schema's slots.
///
/// The result has one [`Argument`] per slot, in schema order; slots no word reached stay unset.
pub fn assign_arguments(
    schema: &CommandSchema,
    raw: Vec<RawArgument>,
) -> Result<Vec<Argument>, ArgumentParseError> {
    let mut slots: Vec<Argument> = schema
        .arguments
        .iter()
        .cloned()
        .map(Argument::new)
        .collect();

    for word in raw {
        let index = match &word.name {
            Some(name) => {
                let index =
                    schema
                        .position(name)
                        .ok_or_else(|| ArgumentParseError::UnknownArgument {
                            command: schema.name.clone(),
                            name: name.clone(),
                        })?;
                if slots[index].is_set() {
                    return Err(ArgumentParseError::DuplicateArgument {
                        command: schema.name.clone(),
                        name: name.clone(),
                    });
                }
                index
            }
            None => slots.iter().position(|slot| !slot.is_set()).ok_or_else(|| {
                ArgumentParseError::TooManyArguments {
                    command: schema.name.clone(),
                    value: word.value.clone(),
                }
            })?,
        };
        let slot = &mut slots[index];
        slot.value = Some(word.value);
        slot.as_string_override = word.as_string;
    }

    Ok(slots)
}

/// Whether a value must be quoted to survive tokenizing.
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty() || value.chars().any(|c| !(c.is_alphanumeric() || c == '_'))
}

/// Quote a value with the first delimiter that does not occur in it. A value holding all
/// three delimiters has no quoted form.
pub fn quote_value(value: &str) -> Option<String> {
    if !value.contains('"') {
        Some(format!("\"{}\"", value))
    } else if !value.contains('\'') {
        Some(format!("'{}'", value))
    } else if !value.contains('}') {
        Some(format!("{{{}}}", value))
    } else {
        None
    }
}

fn render_value(value: &str, as_string: bool) -> Option<String> {
    if as_string || needs_quoting(value) {
        quote_value(value)
    } else {
        Some(value.to_string())
    }
}

/// True when the argument's string override cannot be read off its quotes: the value is
/// quoted anyway, so the override has to travel outside the command line.
pub fn override_hidden_by_quoting(argument: &Argument) -> bool {
    argument.as_string_override && argument.value.as_deref().is_some_and(needs_quoting)
}

/// Render a command as a single command line. `None` when a value cannot be quoted.
pub fn render_command_line(command: &Command) -> Option<String> {
    let mut line = format!("{}{}", command.prefix, command.name);
    for arg in &command.arguments {
        if let Some(value) = &arg.value {
            line.push(' ');
            line.push_str(arg.name());
            line.push(':');
            line.push_str(&render_value(value, arg.as_string_override)?);
        }
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::schema::ArgumentDescriptor;

    fn tool_set() -> CommandSchema {
        CommandSchema::new(
            "tool.set",
            vec![
                ArgumentDescriptor::new("preset"),
                ArgumentDescriptor::new("mode"),
                ArgumentDescriptor::new("task"),
            ],
        )
    }

    #[test]
    fn test_split_named_arguments() {
        let line = split_command_line(r#"tool.set preset:"prim.cube" mode:on"#).unwrap();
        assert_eq!(line.prefix, Prefix::None);
        assert_eq!(line.name, "tool.set");
        assert_eq!(
            line.arguments,
            vec![
                RawArgument::named("preset", "prim.cube"),
                RawArgument::named("mode", "on")
            ]
        );
    }

    #[test]
    fn test_split_prefix_and_positional() {
        let line = split_command_line("!!select.drop polygon").unwrap();
        assert_eq!(line.prefix, Prefix::DoubleBang);
        assert_eq!(line.name, "select.drop");
        assert_eq!(line.arguments, vec![RawArgument::positional("polygon")]);
    }

    #[test]
    fn test_quoted_colon_is_positional() {
        let args = tokenize_arguments(r#""a:b" {x y}"#).unwrap();
        assert_eq!(args[0].name, None);
        assert_eq!(args[0].value, "a:b");
        assert_eq!(args[1].value, "x y");
    }

    #[test]
    fn test_needlessly_quoted_value_sets_as_string() {
        let args = tokenize_arguments(r#"mode:"on" size:"1 2""#).unwrap();
        assert!(args[0].as_string);
        assert!(!args[1].as_string);
    }

    #[test]
    fn test_unterminated_quote_reports_column() {
        let err = split_command_line("tool.set preset:'open").unwrap_err();
        assert_eq!(
            err,
            ArgumentParseError::UnterminatedQuote {
                quote: '\'',
                column: 17
            }
        );
    }

    #[test]
    fn test_missing_command_name() {
        assert_eq!(
            split_command_line("!!   ").unwrap_err(),
            ArgumentParseError::MissingCommandName
        );
    }

    #[test]
    fn test_positional_fills_next_free_slot() {
        let raw = vec![
            RawArgument::named("preset", "x"),
            RawArgument::positional("on"),
            RawArgument::positional("t"),
        ];
        let args = assign_arguments(&tool_set(), raw).unwrap();
        assert_eq!(args[0].value.as_deref(), Some("x"));
        assert_eq!(args[1].value.as_deref(), Some("on"));
        assert_eq!(args[2].value.as_deref(), Some("t"));
    }

    #[test]
    fn test_assignment_errors() {
        let too_many = vec![
            RawArgument::positional("a"),
            RawArgument::positional("b"),
            RawArgument::positional("c"),
            RawArgument::positional("d"),
        ];
        assert!(matches!(
            assign_arguments(&tool_set(), too_many),
            Err(ArgumentParseError::TooManyArguments { value, .. }) if value == "d"
        ));

        let unknown = vec![RawArgument::named("colour", "red")];
        assert!(matches!(
            assign_arguments(&tool_set(), unknown),
            Err(ArgumentParseError::UnknownArgument { name, .. }) if name == "colour"
        ));

        let twice = vec![
            RawArgument::named("mode", "on"),
            RawArgument::named("mode", "off"),
        ];
        assert!(matches!(
            assign_arguments(&tool_set(), twice),
            Err(ArgumentParseError::DuplicateArgument { .. })
        ));
    }

    #[test]
    fn test_quoting_rules() {
        assert!(!needs_quoting("on"));
        assert!(!needs_quoting("prim_cube2"));
        assert!(needs_quoting("prim.cube"));
        assert!(needs_quoting("500 500"));
        assert!(needs_quoting(""));
        assert_eq!(quote_value("a b").as_deref(), Some("\"a b\""));
        assert_eq!(quote_value("say \"hi\"").as_deref(), Some("'say \"hi\"'"));
        assert_eq!(quote_value("it's \"x\"").as_deref(), Some("{it's \"x\"}"));
        assert_eq!(quote_value("a\"b'c}"), None);
    }

    #[test]
    fn test_render_command_line() {
        let args = assign_arguments(
            &tool_set(),
            tokenize_arguments(r#"preset:"prim.cube" mode:"on""#).unwrap(),
        )
        .unwrap();
        let command = Command {
            name: "tool.set".into(),
            prefix: Prefix::Bang,
            arguments: args,
            header: Default::default(),
        };
        assert_eq!(
            render_command_line(&command).as_deref(),
            Some(r#"!tool.set preset:"prim.cube" mode:"on""#)
        );
    }
}
