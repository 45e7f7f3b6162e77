//! Embedded script format implementation
//!
//! A `# python` script whose command lines are eval calls, `lx.eval("tool.set mode:on")`.
//! The calls are read without being executed: only a literal command string is accepted as
//! the call's argument.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::lxm::{CommandStyle, ScriptSerializer};
use lxm_parser::lxm::parsing::eval_call::EVAL_CALLEES;
use lxm_parser::lxm::{
    parse_macro, CommandSchemaProvider, FileFormat, MacroDocument, ParseOptions, ParseOutput,
};

/// Callee written when none is configured.
pub const DEFAULT_EVAL_CALL: &str = "lx.eval";

/// Format implementation for the embedded script dialect
#[derive(Debug, Clone)]
pub struct PythonFormat {
    callee: String,
}

impl PythonFormat {
    /// Write command lines with `callee`. Unknown callees fall back to the default, since
    /// the parser would not read them back.
    pub fn with_callee(callee: &str) -> Self {
        let callee = if EVAL_CALLEES.contains(&callee) {
            callee
        } else {
            log::warn!(
                "unknown eval call `{}`, using `{}`",
                callee,
                DEFAULT_EVAL_CALL
            );
            DEFAULT_EVAL_CALL
        };
        Self {
            callee: callee.to_string(),
        }
    }

    pub fn callee(&self) -> &str {
        &self.callee
    }
}

impl Default for PythonFormat {
    fn default() -> Self {
        Self::with_callee(DEFAULT_EVAL_CALL)
    }
}

impl Format for PythonFormat {
    fn name(&self) -> &str {
        "python"
    }

    fn description(&self) -> &str {
        "Embedded script of eval calls (# python)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["py"]
    }

    fn file_format(&self) -> Option<FileFormat> {
        Some(FileFormat::EmbeddedScript)
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(
        &self,
        source: &str,
        schema: &dyn CommandSchemaProvider,
        options: &ParseOptions,
    ) -> Result<ParseOutput, FormatError> {
        Ok(parse_macro(source, schema, options)?)
    }

    fn serialize(&self, doc: &MacroDocument) -> Result<String, FormatError> {
        let style = CommandStyle::Eval {
            callee: self.callee.clone(),
        };
        ScriptSerializer::new(style).serialize(doc)
    }
}
