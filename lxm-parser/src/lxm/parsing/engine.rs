//! Line engine
//!
//!     The engine is a two state machine, `ExpectShebang -> Scanning`. The first line selects
//!     the dialect: `#LXMacro#` for command scripts, `# python` for eval-call scripts. Every
//!     further line is classified and reported to a [`MacroBuilder`].
//!
//!     Suppression is encoded by commenting out. A suppress marker arms a one line lookahead:
//!     the next line carries one extra leading `#` and is reported as suppressed. When that
//!     line opens a block, the whole block (markers and contents) is commented one level
//!     deeper, so the comment-skip depth is raised until its end marker.
//!
//!     Block names are checked against a stack of open blocks. A block end that does not
//!     match, or input that ends with blocks still open, is a syntax error.
//!
//!     Argument errors are fatal in strict mode. Otherwise the offending line is skipped and
//!     reported back to the caller.

use super::builder::MacroBuilder;
use super::eval_call::extract_command_string;
use super::{ParseOptions, SkippedLine};
use crate::lxm::ast::FileFormat;
use crate::lxm::error::{BuildError, LxmError, SyntaxError, SyntaxErrorKind, ANONYMOUS_SOURCE};
use crate::lxm::lexing::line_classification::detect_shebang;
use crate::lxm::lexing::{classify_line, split_command_line, strip_comment_depth, LineType};

struct OpenBlock {
    name: String,
    suppressed: bool,
    line: usize,
}

pub struct LineEngine<'a> {
    source: &'a str,
    file: String,
    strict_arguments: bool,
    format: FileFormat,
    depth: usize,
    /// Line number of a suppress marker waiting for its line.
    armed: Option<usize>,
    open_blocks: Vec<OpenBlock>,
    skipped: Vec<SkippedLine>,
}

impl<'a> LineEngine<'a> {
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        Self {
            source,
            file: options
                .file_name
                .clone()
                .unwrap_or_else(|| ANONYMOUS_SOURCE.to_string()),
            strict_arguments: options.strict_arguments,
            format: FileFormat::Script,
            depth: 0,
            armed: None,
            open_blocks: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Drive `builder` over the whole source. Returns the lines skipped in permissive mode.
    pub fn run<B: MacroBuilder + ?Sized>(
        mut self,
        builder: &mut B,
    ) -> Result<Vec<SkippedLine>, LxmError> {
        let mut lines = self.source.lines().enumerate().map(|(i, l)| (i + 1, l));

        let shebang = lines.next().map(|(_, line)| line).unwrap_or_default();
        self.format = detect_shebang(shebang)
            .ok_or_else(|| self.syntax_error(SyntaxErrorKind::MissingShebang, 1))?;
        log::debug!("{}: detected {} dialect", self.file, self.format);
        builder.build_type(self.format);

        for (number, line) in lines {
            self.scan_line(builder, number, line)?;
        }

        if let Some(marker) = self.armed {
            return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, marker));
        }
        if let Some(block) = self.open_blocks.last() {
            let kind = SyntaxErrorKind::UnterminatedBlock(block.name.clone());
            return Err(self.syntax_error(kind, block.line));
        }
        Ok(self.skipped)
    }

    fn scan_line<B: MacroBuilder + ?Sized>(
        &mut self,
        builder: &mut B,
        number: usize,
        line: &str,
    ) -> Result<(), LxmError> {
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            if self.armed.is_some() {
                return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, number));
            }
            builder.build_paragraph_break();
            return Ok(());
        }

        let suppressed = self.armed.take().is_some();
        let depth = self.depth + usize::from(suppressed);
        let content = strip_comment_depth(line, depth)
            .ok_or_else(|| self.syntax_error(SyntaxErrorKind::MalformedSuppressedLine, number))?;

        match classify_line(content) {
            LineType::Blank => {
                // Nothing left once the skip depth is removed
                if suppressed {
                    return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, number));
                }
                builder.build_paragraph_break();
            }
            LineType::SuppressMarker => {
                if suppressed {
                    return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, number));
                }
                self.armed = Some(number);
            }
            LineType::Metadata { key, value } => {
                if suppressed {
                    return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, number));
                }
                let value = serde_json::from_str(value.trim()).map_err(|e| {
                    let kind = SyntaxErrorKind::MalformedMetadata {
                        key: key.to_string(),
                        reason: e.to_string(),
                    };
                    self.syntax_error(kind, number)
                })?;
                builder.build_meta(key, value);
            }
            LineType::BlockBegin(name) => {
                builder.build_block_start(name, suppressed);
                self.open_blocks.push(OpenBlock {
                    name: name.to_string(),
                    suppressed,
                    line: number,
                });
                if suppressed {
                    self.depth += 1;
                }
            }
            LineType::BlockEnd(name) => {
                if suppressed {
                    return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, number));
                }
                self.close_block(name, number)?;
                builder.build_block_end(name);
            }
            LineType::Comment(text) => {
                if suppressed {
                    return Err(self.syntax_error(SyntaxErrorKind::DanglingSuppressMarker, number));
                }
                builder.build_comment(text);
            }
            LineType::Command(text) => self.command_line(builder, number, text, suppressed)?,
        }
        Ok(())
    }

    fn close_block(&mut self, name: &str, number: usize) -> Result<(), LxmError> {
        match self.open_blocks.pop() {
            Some(open) if open.name == name => {
                if open.suppressed {
                    self.depth -= 1;
                }
                Ok(())
            }
            Some(open) => {
                let kind = SyntaxErrorKind::MismatchedBlockEnd {
                    expected: open.name,
                    found: name.to_string(),
                };
                Err(self.syntax_error(kind, number))
            }
            None => {
                let kind = SyntaxErrorKind::UnexpectedBlockEnd(name.to_string());
                Err(self.syntax_error(kind, number))
            }
        }
    }

    fn command_line<B: MacroBuilder + ?Sized>(
        &mut self,
        builder: &mut B,
        number: usize,
        text: &str,
        suppressed: bool,
    ) -> Result<(), LxmError> {
        let command = match self.format {
            FileFormat::EmbeddedScript => extract_command_string(text)
                .ok_or_else(|| self.syntax_error(SyntaxErrorKind::UnrecognizedLine, number))?,
            _ => text.to_string(),
        };

        let result = split_command_line(&command)
            .map_err(BuildError::from)
            .and_then(|line| builder.build_command(line, suppressed));

        match result {
            Ok(()) => Ok(()),
            Err(BuildError::Argument(error)) if !self.strict_arguments => {
                log::warn!("{}:{}: skipping line: {}", self.file, number, error);
                builder.build_skip();
                self.skipped.push(SkippedLine {
                    line: number,
                    error,
                });
                Ok(())
            }
            Err(error) => Err(LxmError::from_build(error, self.file.clone(), number)),
        }
    }

    fn syntax_error(&self, kind: SyntaxErrorKind, line: usize) -> LxmError {
        SyntaxError::new(kind, self.file.clone(), line)
            .with_context(self.source)
            .into()
    }
}
