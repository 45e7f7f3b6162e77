//! Eval call expressions of the embedded-script dialect
//!
//! A command line in that dialect is a call such as `lx.eval("tool.set mode:on")`. Only calls
//! whose single argument is a string literal are understood; the literal is the command line.

/// Callees that evaluate a command string. Longest first, they share a prefix.
pub const EVAL_CALLEES: [&str; 3] = ["lx.evalN", "lx.eval1", "lx.eval"];

/// The command string passed to an eval call, or `None` when the line is not such a call.
pub fn extract_command_string(line: &str) -> Option<String> {
    let line = line.trim();
    let rest = EVAL_CALLEES
        .iter()
        .find_map(|callee| line.strip_prefix(callee))?;
    let rest = rest.trim_start().strip_prefix('(')?.trim_start();

    let mut chars = rest.char_indices();
    let (_, quote) = chars.next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }

    let mut value = String::new();
    let mut end = None;
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '\\' | '"' | '\'' => value.push(escaped),
                    other => {
                        value.push('\\');
                        value.push(other);
                    }
                }
            }
            c if c == quote => {
                end = Some(index + c.len_utf8());
                break;
            }
            c => value.push(c),
        }
    }

    let tail = rest[end?..].trim();
    if tail == ")" {
        Some(value)
    } else {
        None
    }
}

/// Quote a command string as a double quoted literal.
pub fn quote_python_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
