//! LXM script format implementation
//!
//! The `#LXMacro#` command script is the native format. Parsing delegates to the parser
//! crate's line engine; serialization is shared with the embedded dialect through
//! [`ScriptSerializer`].

pub mod serializer;

pub use serializer::{CommandStyle, ScriptSerializer};

use crate::error::FormatError;
use crate::format::Format;
use lxm_parser::lxm::{
    parse_macro, CommandSchemaProvider, FileFormat, MacroDocument, ParseOptions, ParseOutput,
};

/// Format implementation for LXM command scripts
pub struct LxmFormat;

impl Format for LxmFormat {
    fn name(&self) -> &str {
        "lxm"
    }

    fn description(&self) -> &str {
        "LXM command script (#LXMacro#)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["lxm"]
    }

    fn file_format(&self) -> Option<FileFormat> {
        Some(FileFormat::Script)
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
        ScriptSerializer::new(CommandStyle::Plain).serialize(doc)
    }
}
