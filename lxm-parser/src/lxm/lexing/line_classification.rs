//! Line Classification
//!
//!     Every physical line after the shebang is classified on its own, in priority order:
//!
//!     1. blank line
//!     2. suppress marker `# replay suppress:`
//!     3. metadata `# replay <key>:<json value>`
//!     4. block begin `# Command Block Begin: <name>`
//!     5. block end `# Command Block End: <name>`
//!     6. any other line starting with `#` is a comment
//!     7. everything else is a command line
//!
//!     Classification is stateless. The comment-skip depth of suppressed content is removed
//!     beforehand with [`strip_comment_depth`]; the parser engine owns that state.

use crate::lxm::ast::FileFormat;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SCRIPT_SHEBANG: &str = "#LXMacro#";
pub const SUPPRESS_MARKER: &str = "# replay suppress:";
pub const METADATA_PREFIX: &str = "# replay ";
pub const BLOCK_BEGIN_MARKER: &str = "# Command Block Begin: ";
pub const BLOCK_END_MARKER: &str = "# Command Block End: ";

static PYTHON_SHEBANG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*python\s*$").expect("valid shebang pattern"));

static METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^# replay ([A-Za-z_][A-Za-z0-9_.\-]*):(.*)$").expect("valid metadata pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType<'a> {
    Blank,
    SuppressMarker,
    Metadata { key: &'a str, value: &'a str },
    BlockBegin(&'a str),
    BlockEnd(&'a str),
    /// Comment text, without the `#` and one following space.
    Comment(&'a str),
    Command(&'a str),
}

/// Detect the dialect announced by a shebang line.
pub fn detect_shebang(line: &str) -> Option<FileFormat> {
    let line = line.trim_end();
    if line == SCRIPT_SHEBANG {
        Some(FileFormat::Script)
    } else if PYTHON_SHEBANG.is_match(line) {
        Some(FileFormat::EmbeddedScript)
    } else {
        None
    }
}

/// Classify one line whose comment-skip depth has already been removed.
pub fn classify_line(line: &str) -> LineType<'_> {
    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return LineType::Blank;
    }
    if line == SUPPRESS_MARKER {
        return LineType::SuppressMarker;
    }
    if let Some(captures) = METADATA.captures(line) {
        if let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) {
            return LineType::Metadata {
                key: key.as_str(),
                value: value.as_str(),
            };
        }
    }
    if let Some(name) = line.strip_prefix(BLOCK_BEGIN_MARKER) {
        return LineType::BlockBegin(name);
    }
    if let Some(name) = line.strip_prefix(BLOCK_END_MARKER) {
        return LineType::BlockEnd(name);
    }
    if let Some(text) = line.strip_prefix('#') {
        return LineType::Comment(text.strip_prefix(' ').unwrap_or(text));
    }
    LineType::Command(line.trim_start())
}

/// Remove `depth` leading `#` characters. `None` when the line has fewer.
pub fn strip_comment_depth(line: &str, depth: usize) -> Option<&str> {
    let mut rest = line;
    for _ in 0..depth {
        rest = rest.strip_prefix('#')?;
    }
    Some(rest)
}

/// Render a comment line from its stored text.
pub fn render_comment(text: &str) -> String {
    if text.is_empty() {
        "#".to_string()
    } else {
        format!("# {}", text)
    }
}
