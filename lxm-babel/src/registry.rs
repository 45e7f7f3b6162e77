//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats. Formats can be
//! retrieved by name, by file extension, or by sniffing a source text.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{JsonFormat, LxmFormat, PythonFormat, YamlFormat};
use lxm_parser::lxm::lexing::line_classification::detect_shebang;
use lxm_parser::lxm::{CommandSchemaProvider, MacroDocument, ParseOptions, ParseOutput};
use std::collections::HashMap;
use std::path::Path;

/// Registry of macro formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let output = registry.parse(source, "lxm", &schema, &ParseOptions::default())?;
/// let json = registry.serialize(&output.document, "json")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Select a format by the extension of `path` (case insensitive)
    pub fn for_path(&self, path: &Path) -> Result<&dyn Format, FormatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.as_ref())
            .ok_or(FormatError::UnknownExtension(extension))
    }

    /// Guess the format of a source text
    ///
    /// Script dialects are recognised by their shebang, structured records by the first
    /// significant character (`[` for JSON, a `-` sequence entry for YAML).
    pub fn detect(&self, source: &str) -> Option<&dyn Format> {
        let first = source.lines().find(|line| !line.trim().is_empty())?;
        let name = match detect_shebang(first) {
            Some(format) => format.name(),
            None => {
                let first = first.trim_start();
                if first.starts_with('[') {
                    "json"
                } else if first == "---" || first.starts_with("- ") {
                    "yaml"
                } else {
                    return None;
                }
            }
        };
        self.get(name).ok()
    }

    /// Parse source text using the specified format
    pub fn parse(
        &self,
        source: &str,
        format: &str,
        schema: &dyn CommandSchemaProvider,
        options: &ParseOptions,
    ) -> Result<ParseOutput, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support parsing",
                format
            )));
        }
        fmt.parse(source, schema, options)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &MacroDocument, format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                format
            )));
        }
        fmt.serialize(doc)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(LxmFormat);
        registry.register(PythonFormat::default());
        registry.register(JsonFormat::default());
        registry.register(YamlFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lxm_parser::lxm::testing::{sample_document, sample_schema};
    use rstest::rstest;

    // Test format
    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn serialize(&self, _doc: &MacroDocument) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let result = registry.serialize(&sample_document(), "test");
        assert_eq!(result.unwrap(), "test output");
    }

    #[test]
    fn test_registry_parse_not_supported() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let result = registry.parse("input", "test", &sample_schema(), &ParseOptions::default());
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "lxm", "python", "yaml"]);
    }

    #[rstest]
    #[case("macro.LXM", "lxm")]
    #[case("dir/macro.py", "python")]
    #[case("macro.json", "json")]
    #[case("macro.yml", "yaml")]
    #[case("macro.YAML", "yaml")]
    fn test_for_path(#[case] path: &str, #[case] expected: &str) {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.for_path(Path::new(path)).unwrap().name(), expected);
    }

    #[test]
    fn test_for_path_unknown_extension() {
        let registry = FormatRegistry::with_defaults();
        assert!(matches!(
            registry.for_path(Path::new("macro.txt")),
            Err(FormatError::UnknownExtension(ext)) if ext == "txt"
        ));
    }

    #[rstest]
    #[case("#LXMacro#\ntool.doApply\n", Some("lxm"))]
    #[case("\n#python\nlx.eval('tool.doApply')\n", Some("python"))]
    #[case("[\n  {\"command\": {\"name\": \"tool.doApply\"}}\n]\n", Some("json"))]
    #[case("- command:\n    name: tool.doApply\n", Some("yaml"))]
    #[case("tool.doApply\n", None)]
    #[case("", None)]
    fn test_detect(#[case] source: &str, #[case] expected: Option<&str>) {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.detect(source).map(|f| f.name()), expected);
    }
}
