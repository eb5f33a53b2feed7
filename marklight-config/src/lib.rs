//! Shared configuration loader for the marklight toolchain.
//!
//! `defaults/marklight.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`MarklightConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use marklight_core::{ParseOptions, SerializerOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/marklight.default.toml");

/// Top-level configuration consumed by marklight applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarklightConfig {
    pub parser: ParserConfig,
    pub serializer: SerializerConfig,
    pub inspect: InspectConfig,
}

/// Markdown extension toggles.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub math: bool,
    pub definition_lists: bool,
    pub superscript: bool,
    pub strikethrough: bool,
    pub highlight: bool,
    pub subscript: bool,
    pub abbreviations: bool,
    pub task_lists: bool,
}

impl From<&ParserConfig> for ParseOptions {
    fn from(config: &ParserConfig) -> Self {
        ParseOptions {
            tables: config.tables,
            footnotes: config.footnotes,
            math: config.math,
            definition_lists: config.definition_lists,
            superscript: config.superscript,
            strikethrough: config.strikethrough,
            highlight: config.highlight,
            subscript: config.subscript,
            abbreviations: config.abbreviations,
            task_lists: config.task_lists,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializerConfig {
    pub bullet_marker: char,
}

impl From<&SerializerConfig> for SerializerOptions {
    fn from(config: &SerializerConfig) -> Self {
        SerializerOptions {
            bullet_marker: config.bullet_marker,
        }
    }
}

/// Controls `inspect` output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub pretty_json: bool,
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

    /// Apply a single key/value override, e.g. `parser.math = false`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<MarklightConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarklightConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.parser.tables);
        assert!(config.parser.abbreviations);
        assert_eq!(config.serializer.bullet_marker, '-');
        assert!(config.inspect.pretty_json);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parser.math", false)
            .expect("override to apply")
            .set_override("serializer.bullet_marker", "*")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.parser.math);
        assert_eq!(config.serializer.bullet_marker, '*');
    }

    #[test]
    fn defaults_match_core_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: ParseOptions = (&config.parser).into();
        assert_eq!(options, ParseOptions::default());
        let serializer: SerializerOptions = (&config.serializer).into();
        assert_eq!(serializer.bullet_marker, SerializerOptions::default().bullet_marker);
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[parser]\nhighlight = false\n").expect("write config");
        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert!(!config.parser.highlight);
        assert!(config.parser.subscript);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/marklight.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/marklight.toml")
            .build()
            .expect("config to build");
        assert!(config.parser.footnotes);
    }
}
