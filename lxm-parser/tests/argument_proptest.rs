//! Property-based tests for argument quoting
//!
//! Whatever value an argument holds, rendering the command and reading it back must give the
//! same value, and the same string override, unless the value holds every quote character
//! and has no written form at all.

use lxm_parser::lxm::lexing::{assign_arguments, needs_quoting, render_command_line, split_command_line};
use lxm_parser::lxm::testing::{command, sample_schema};
use lxm_parser::lxm::{CommandSchemaProvider, Node};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_]{1,12}",
        "[a-zA-Z0-9_ .:/-]{0,16}",
        "[a-z \"'{}]{0,10}",
        "[0-9]{1,4} [0-9]{1,4}",
    ]
}

fn holds_every_quote(value: &str) -> bool {
    value.contains('"') && value.contains('\'') && value.contains('}')
}

/// Render `tool.attr value:<value>` and read it back. `None` when there is no written form.
fn reparse(value: &str, as_string: bool) -> Option<(Option<String>, bool)> {
    let mut node = command("tool.attr");
    if let Node::Command(cmd) = &mut node {
        cmd.set_argument("value", value);
        if let Some(arg) = cmd.argument_mut("value") {
            arg.as_string_override = as_string;
        }
    }
    let line = match &node {
        Node::Command(cmd) => render_command_line(cmd)?,
        Node::Block(_) => unreachable!(),
    };

    let parsed = split_command_line(&line).unwrap();
    let schema = sample_schema().schema_for(&parsed.name).unwrap();
    let args = assign_arguments(&schema, parsed.arguments).unwrap();
    Some((args[2].value.clone(), args[2].as_string_override))
}

proptest! {
    #[test]
    fn test_rendered_value_reads_back(value in value_strategy()) {
        match reparse(&value, false) {
            Some((read, _)) => prop_assert_eq!(read, Some(value)),
            None => prop_assert!(holds_every_quote(&value)),
        }
    }

    #[test]
    fn test_string_override_survives(value in "[a-zA-Z0-9_]{1,12}") {
        prop_assert!(!needs_quoting(&value));
        prop_assert_eq!(reparse(&value, true), Some((Some(value.clone()), true)));
        prop_assert_eq!(reparse(&value, false), Some((Some(value), false)));
    }
}

#[test]
fn test_space_separated_value_keeps_quotes() {
    let mut node = command("tool.attr");
    if let Node::Command(cmd) = &mut node {
        cmd.set_argument("value", "500 500");
        assert_eq!(
            render_command_line(cmd).as_deref(),
            Some(r#"tool.attr value:"500 500""#)
        );
    }
}
