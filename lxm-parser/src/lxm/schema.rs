//! Command schema collaborator
//!
//!     The host application owns the registry that knows, for every command, which arguments
//!     it takes, in which order, and of which type. The engine never reimplements that
//!     registry. It queries it through [`CommandSchemaProvider`] to:
//!
//!     - assign positional argument values to slots (see [`crate::lxm::lexing::arguments`])
//!     - create commands with every declared argument present (and unset)
//!     - format values for display (hinted integers render as their label)
//!
//!     [`InMemorySchemaProvider`] is a plain map based provider. It backs the tests and the
//!     command line tool, which loads it from a JSON or YAML schema file:
//!
//!     ```json
//!     { "commands": { "tool.set": [ { "name": "preset", "type": "string" } ] } }
//!     ```

use crate::lxm::error::SchemaLookupError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Value type tag of an argument, as reported by the host registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Vector,
    /// Integer with a label table, e.g. `0 = off`, `1 = on`.
    Hinted,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::Vector => "vector",
            ValueType::Hinted => "hinted",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an integer/label hint table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub value: i64,
    pub label: String,
}

impl Hint {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Describes one argument slot of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDescriptor {
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "type", default)]
    pub value_type: ValueType,
    /// Host specific type name (e.g. `axis`, `&item`), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub example: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl ArgumentDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username: String::new(),
            value_type: ValueType::String,
            type_name: None,
            desc: String::new(),
            example: String::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn with_hints(mut self, hints: Vec<Hint>) -> Self {
        self.hints = hints;
        self
    }

    /// The user facing name, falling back to the internal one.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.name
        } else {
            &self.username
        }
    }

    /// Format a raw value for display.
    ///
    /// Hinted integers render as their label unless `as_string` forces the raw text.
    pub fn format_value(&self, value: &str, as_string: bool) -> String {
        if as_string || self.hints.is_empty() {
            return value.to_string();
        }
        match value.trim().parse::<i64>() {
            Ok(number) => self
                .hints
                .iter()
                .find(|hint| hint.value == number)
                .map(|hint| hint.label.clone())
                .unwrap_or_else(|| value.to_string()),
            Err(_) => value.to_string(),
        }
    }

    /// Map a hint label back to its integer value.
    pub fn parse_hint(&self, label: &str) -> Option<i64> {
        self.hints
            .iter()
            .find(|hint| hint.label.eq_ignore_ascii_case(label))
            .map(|hint| hint.value)
    }
}

/// The ordered argument slots of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSchema {
    pub name: String,
    pub arguments: Vec<ArgumentDescriptor>,
}

impl CommandSchema {
    pub fn new(name: impl Into<String>, arguments: Vec<ArgumentDescriptor>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Slot index of the argument called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.arguments.iter().position(|arg| arg.name == name)
    }
}

/// Source of command schemas. Implemented by the host, faked in tests.
pub trait CommandSchemaProvider {
    /// Ordered argument descriptors for `command`.
    fn schema_for(&self, command: &str) -> Result<CommandSchema, SchemaLookupError>;
}

impl<T: CommandSchemaProvider + ?Sized> CommandSchemaProvider for &T {
    fn schema_for(&self, command: &str) -> Result<CommandSchema, SchemaLookupError> {
        (**self).schema_for(command)
    }
}

#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error("cannot read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Map backed schema provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemorySchemaProvider {
    #[serde(default)]
    commands: HashMap<String, Vec<ArgumentDescriptor>>,
}

impl InMemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the schema for `command`.
    pub fn register(&mut self, command: impl Into<String>, arguments: Vec<ArgumentDescriptor>) {
        self.commands.insert(command.into(), arguments);
    }

    pub fn with_command(
        mut self,
        command: impl Into<String>,
        arguments: Vec<ArgumentDescriptor>,
    ) -> Self {
        self.register(command, arguments);
        self
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn from_json_str(source: &str) -> Result<Self, SchemaFileError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, SchemaFileError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Load a schema file, picking YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaFileError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml_str(&source)
        } else {
            Self::from_json_str(&source)
        }
    }
}

impl CommandSchemaProvider for InMemorySchemaProvider {
    fn schema_for(&self, command: &str) -> Result<CommandSchema, SchemaLookupError> {
        self.commands
            .get(command)
            .map(|arguments| CommandSchema::new(command, arguments.clone()))
            .ok_or_else(|| SchemaLookupError::new(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_descriptor() -> ArgumentDescriptor {
        ArgumentDescriptor::new("mode")
            .with_type(ValueType::Hinted)
            .with_hints(vec![Hint::new(0, "off"), Hint::new(1, "on")])
    }

    #[test]
    fn test_hinted_value_formats_as_label() {
        let mode = mode_descriptor();
        assert_eq!(mode.format_value("1", false), "on");
        assert_eq!(mode.format_value("1", true), "1");
        assert_eq!(mode.format_value("7", false), "7");
        assert_eq!(mode.format_value("on", false), "on");
    }

    #[test]
    fn test_parse_hint_is_case_insensitive() {
        let mode = mode_descriptor();
        assert_eq!(mode.parse_hint("ON"), Some(1));
        assert_eq!(mode.parse_hint("maybe"), None);
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let plain = ArgumentDescriptor::new("preset");
        assert_eq!(plain.display_name(), "preset");
        let named = plain.with_username("Preset");
        assert_eq!(named.display_name(), "Preset");
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let provider = InMemorySchemaProvider::new();
        let err = provider.schema_for("tool.set").unwrap_err();
        assert_eq!(err.command, "tool.set");
    }

    #[test]
    fn test_schema_from_json() {
        let provider = InMemorySchemaProvider::from_json_str(
            r#"{ "commands": { "tool.set": [
                { "name": "preset", "username": "Preset" },
                { "name": "mode", "type": "hinted", "hints": [ { "value": 1, "label": "on" } ] }
            ] } }"#,
        )
        .unwrap();

        let schema = provider.schema_for("tool.set").unwrap();
        assert_eq!(schema.arguments.len(), 2);
        assert_eq!(schema.position("mode"), Some(1));
        assert_eq!(schema.arguments[1].value_type, ValueType::Hinted);
        assert_eq!(schema.arguments[0].value_type, ValueType::String);
    }

    #[test]
    fn test_schema_from_yaml() {
        let provider = InMemorySchemaProvider::from_yaml_str(
            "commands:\n  select.drop:\n    - name: type\n      example: polygon\n",
        )
        .unwrap();
        let schema = provider.schema_for("select.drop").unwrap();
        assert_eq!(schema.arguments[0].example, "polygon");
    }
}
