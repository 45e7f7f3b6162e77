//! Shared configuration loader for the LXM toolchain.
//!
//! `defaults/lxm.default.toml` is embedded into every binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`LxmConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use lxm_babel::formats::{JsonFormat, PythonFormat};
use lxm_babel::FormatRegistry;
use lxm_parser::lxm::undo::UndoStack;
use lxm_parser::lxm::ParseOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lxm.default.toml");

/// Top-level configuration consumed by LXM applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LxmConfig {
    pub parsing: ParsingConfig,
    pub export: ExportConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    pub strict_arguments: bool,
}

/// Serializer knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub pretty_structured: bool,
    pub eval_call: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub max_undo: usize,
}

impl LxmConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_arguments: self.parsing.strict_arguments,
            ..ParseOptions::default()
        }
    }

    /// The default formats, with the serializers configured.
    pub fn registry(&self) -> FormatRegistry {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(PythonFormat::with_callee(&self.export.eval_call));
        registry.register(JsonFormat {
            pretty: self.export.pretty_structured,
        });
        registry
    }

    pub fn undo_stack(&self) -> UndoStack {
        UndoStack::new(self.history.max_undo)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LxmConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LxmConfig, ConfigError> {
    Loader::new().build()
}
