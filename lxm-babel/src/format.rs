//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing macro documents.

use crate::error::FormatError;
use lxm_parser::lxm::{
    CommandSchemaProvider, FileFormat, MacroDocument, ParseOptions, ParseOutput,
};

/// Trait for macro formats
///
/// Implementors provide conversion between a string representation and a [`MacroDocument`].
/// Formats can support parsing, serialization, or both. Parsing needs the command schema,
/// because argument slots are only known to the host's command registry.
///
/// # Examples
///
/// ```ignore
/// struct Listing;
///
/// impl Format for Listing {
///     fn name(&self) -> &str {
///         "listing"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &MacroDocument) -> Result<String, FormatError> {
///         Ok(doc.paths().iter().map(|p| format!("{}\n", p)).collect())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "lxm", "python", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions (lowercase, without the dot) this format is chosen for
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// The document format tag this format reads and writes, if it is one of the built in ones
    fn file_format(&self) -> Option<FileFormat> {
        None
    }

    /// Whether this format supports parsing (source → MacroDocument)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (MacroDocument → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(
        &self,
        _source: &str,
        _schema: &dyn CommandSchemaProvider,
        _options: &ParseOptions,
    ) -> Result<ParseOutput, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &MacroDocument) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
