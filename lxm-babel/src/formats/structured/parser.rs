//! Reading structured records
//!
//! Records are replayed into the parser crate's [`MacroBuilder`] in document order, the same
//! way the line engine reports a script. Positions in errors are 1-based record ordinals
//! (counted in document order, nested records included), since the records carry no lines.

use super::records::{ArgRecord, BlockRecord, CommandRecord, Record};
use lxm_parser::lxm::error::ANONYMOUS_SOURCE;
use lxm_parser::lxm::lexing::{CommandLine, RawArgument};
use lxm_parser::lxm::parsing::tree_builder::DISPLAY_NAME_KEY;
use lxm_parser::lxm::parsing::{DocumentBuilder, MacroBuilder, SkippedLine};
use lxm_parser::lxm::{
    BuildError, CommandSchemaProvider, FileFormat, LxmError, ParseOptions, ParseOutput, Prefix,
    SyntaxError, SyntaxErrorKind,
};
use serde_json::Value;

pub struct RecordReader<'o> {
    options: &'o ParseOptions,
    ordinal: usize,
    skipped: Vec<SkippedLine>,
}

impl<'o> RecordReader<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            ordinal: 0,
            skipped: Vec::new(),
        }
    }

    fn file(&self) -> String {
        self.options
            .file_name
            .clone()
            .unwrap_or_else(|| ANONYMOUS_SOURCE.to_string())
    }

    /// Replay `records` into `builder`. Returns the records skipped by a permissive read.
    pub fn run<B: MacroBuilder + ?Sized>(
        mut self,
        format: FileFormat,
        records: Vec<Record>,
        builder: &mut B,
    ) -> Result<Vec<SkippedLine>, LxmError> {
        builder.build_type(format);
        self.read_records(records, builder)?;
        Ok(self.skipped)
    }

    fn read_records<B: MacroBuilder + ?Sized>(
        &mut self,
        records: Vec<Record>,
        builder: &mut B,
    ) -> Result<(), LxmError> {
        for record in records {
            self.ordinal += 1;
            match record {
                Record::Command(command) => self.read_command(command, builder)?,
                Record::Block(block) => self.read_block(block, builder)?,
            }
        }
        Ok(())
    }

    fn read_header<B: MacroBuilder + ?Sized>(
        comment: Vec<String>,
        display_name: String,
        meta: serde_json::Map<String, Value>,
        builder: &mut B,
    ) {
        for line in &comment {
            builder.build_comment(line);
        }
        if !display_name.is_empty() {
            builder.build_meta(DISPLAY_NAME_KEY, Value::String(display_name));
        }
        for (key, value) in meta {
            builder.build_meta(&key, value);
        }
    }

    fn read_block<B: MacroBuilder + ?Sized>(
        &mut self,
        block: BlockRecord,
        builder: &mut B,
    ) -> Result<(), LxmError> {
        if block.name.is_empty() {
            return Err(self.malformed("block without a name"));
        }
        Self::read_header(block.comment, block.display_name, block.meta, builder);
        builder.build_block_start(&block.name, block.suppress);
        self.read_records(block.commands, builder)?;
        builder.build_block_end(&block.name);
        Ok(())
    }

    fn read_command<B: MacroBuilder + ?Sized>(
        &mut self,
        command: CommandRecord,
        builder: &mut B,
    ) -> Result<(), LxmError> {
        let prefix: Prefix = command
            .prefix
            .parse()
            .map_err(|reason: String| self.malformed(&reason))?;
        if command.name.is_empty() {
            return Err(self.malformed("command without a name"));
        }
        Self::read_header(command.comment, command.display_name, command.meta, builder);

        let line = CommandLine {
            prefix,
            name: command.name,
            arguments: command.args.into_iter().filter_map(raw_argument).collect(),
        };
        match builder.build_command(line, command.suppress) {
            Ok(()) => Ok(()),
            Err(BuildError::Argument(error)) if !self.options.strict_arguments => {
                log::warn!("{}: record {}: skipped: {}", self.file(), self.ordinal, error);
                builder.build_skip();
                self.skipped.push(SkippedLine {
                    line: self.ordinal,
                    error,
                });
                Ok(())
            }
            Err(error) => Err(LxmError::from_build(error, self.file(), self.ordinal)),
        }
    }

    fn malformed(&self, reason: &str) -> LxmError {
        SyntaxError::new(
            SyntaxErrorKind::MalformedRecord(reason.to_string()),
            self.file(),
            self.ordinal,
        )
        .into()
    }
}

fn raw_argument(arg: ArgRecord) -> Option<RawArgument> {
    let value = arg.value?;
    Some(RawArgument {
        name: Some(arg.arg_name),
        value,
        as_string: arg.as_string,
    })
}

/// Build a document from records.
pub fn parse_records<P>(
    format: FileFormat,
    records: Vec<Record>,
    schema: &P,
    options: &ParseOptions,
) -> Result<ParseOutput, LxmError>
where
    P: CommandSchemaProvider + ?Sized,
{
    let mut builder = DocumentBuilder::new(schema);
    let skipped = RecordReader::new(options).run(format, records, &mut builder)?;
    Ok(ParseOutput {
        document: builder.finish(),
        skipped,
    })
}

/// The error for a document that does not deserialize into records.
pub fn malformed_document(reason: String, line: usize, options: &ParseOptions) -> LxmError {
    let file = options
        .file_name
        .clone()
        .unwrap_or_else(|| ANONYMOUS_SOURCE.to_string());
    SyntaxError::new(SyntaxErrorKind::MalformedRecord(reason), file, line).into()
}
