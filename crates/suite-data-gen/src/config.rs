//! Generator configuration
//!
//! Settings can come from a YAML file; every field has a default so a
//! partial file (or none at all) is fine.

use crate::engine::Generator;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::writer::{FileWriter, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_directory() -> PathBuf {
    PathBuf::from("tests/suites")
}

fn default_caller() -> String {
    "suite-data".to_string()
}

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output directory for destination files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
    /// Number carried by the first case of every target
    #[serde(default)]
    pub first_case_number: usize,
    /// Generator name written into `.data` headers
    #[serde(default = "default_caller")]
    pub caller: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            format: OutputFormat::default(),
            first_case_number: 0,
            caller: default_caller(),
        }
    }
}

impl GeneratorConfig {
    /// Load config from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::from)
    }

    /// Check field values
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty directory or caller, or a caller
    /// spanning several lines.
    pub fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(Error::Config("directory must not be empty".to_string()));
        }
        if self.caller.is_empty() || self.caller.contains('\n') {
            return Err(Error::Config(format!(
                "caller must be a single non-empty line, got {:?}",
                self.caller
            )));
        }
        Ok(())
    }

    /// Writer configured from these settings
    #[must_use]
    pub fn writer(&self) -> FileWriter {
        FileWriter::new(&self.directory)
            .with_format(self.format)
            .with_caller(&self.caller)
    }

    /// Generator over `registry` configured from these settings
    #[must_use]
    pub const fn generator<'r>(&self, registry: &'r Registry) -> Generator<'r> {
        Generator::new(registry).with_first_case_number(self.first_case_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.directory, PathBuf::from("tests/suites"));
        assert_eq!(config.format, OutputFormat::Data);
        assert_eq!(config.first_case_number, 0);
        assert_eq!(config.caller, "suite-data");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = GeneratorConfig::from_yaml("first_case_number: 1\nformat: json\n").unwrap();
        assert_eq!(config.first_case_number, 1);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.directory, PathBuf::from("tests/suites"));
    }

    #[test]
    fn test_from_yaml_empty_mapping() {
        let config = GeneratorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_from_yaml_unknown_field() {
        assert!(GeneratorConfig::from_yaml("colour: blue\n").is_err());
    }

    #[test]
    fn test_from_yaml_invalid_caller() {
        let err = GeneratorConfig::from_yaml("caller: \"\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.aborts_run());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = GeneratorConfig {
            directory: PathBuf::from("out"),
            format: OutputFormat::Yaml,
            first_case_number: 3,
            caller: "gen_bignum".to_string(),
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(GeneratorConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("suite-data.yaml");
        std::fs::write(&path, "directory: generated\n").unwrap();
        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.directory, PathBuf::from("generated"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = GeneratorConfig::from_file("/nonexistent/suite-data.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_writer_and_generator_follow_config() {
        let config = GeneratorConfig {
            format: OutputFormat::Json,
            ..GeneratorConfig::default()
        };
        assert_eq!(config.writer().format(), OutputFormat::Json);
        let registry = Registry::new();
        assert!(config.generator(&registry).registry().is_empty());
    }
}
