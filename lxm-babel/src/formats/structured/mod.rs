//! Structured record formats
//!
//! The tree as a sequence of records, one per node, in JSON or YAML. Unlike the script
//! dialects there is no comment encoding: suppression, comments, display names and metadata
//! are explicit fields. Both encodings share the record types and the reader; they differ
//! only in the serde backend.

pub mod parser;
pub mod records;
pub mod serializer;

pub use records::{ArgRecord, BlockRecord, CommandRecord, Record};

use crate::error::FormatError;
use crate::format::Format;
use lxm_parser::lxm::{CommandSchemaProvider, FileFormat, MacroDocument, ParseOptions, ParseOutput};

/// Records as a JSON array
#[derive(Debug, Clone)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Structured records as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn file_format(&self) -> Option<FileFormat> {
        Some(FileFormat::Json)
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
        let records: Vec<Record> = serde_json::from_str(source)
            .map_err(|e| parser::malformed_document(e.to_string(), e.line(), options))?;
        Ok(parser::parse_records(FileFormat::Json, records, schema, options)?)
    }

    fn serialize(&self, doc: &MacroDocument) -> Result<String, FormatError> {
        let records = serializer::to_records(doc)?;
        let mut output = if self.pretty {
            serde_json::to_string_pretty(&records)
        } else {
            serde_json::to_string(&records)
        }
        .map_err(|e| FormatError::Serialization(e.to_string()))?;
        output.push('\n');
        Ok(output)
    }
}

/// Records as a YAML sequence
#[derive(Debug, Clone, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        "Structured records as YAML"
    }

    fn file_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn file_format(&self) -> Option<FileFormat> {
        Some(FileFormat::Yaml)
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
        let records: Vec<Record> = serde_yaml::from_str(source).map_err(|e| {
            let line = e.location().map(|at| at.line()).unwrap_or(0);
            parser::malformed_document(e.to_string(), line, options)
        })?;
        Ok(parser::parse_records(FileFormat::Yaml, records, schema, options)?)
    }

    fn serialize(&self, doc: &MacroDocument) -> Result<String, FormatError> {
        let records = serializer::to_records(doc)?;
        serde_yaml::to_string(&records).map_err(|e| FormatError::Serialization(e.to_string()))
    }
}
