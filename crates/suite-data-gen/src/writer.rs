//! Writers
//!
//! The engine hands each destination's complete case list to a [`Writer`].
//! [`FileWriter`] renders it in one of the supported formats and commits it
//! with write-then-rename, so a destination file is either the previous
//! version or the complete new one.

use crate::error::{Error, Result};
use crate::test_case::{TestCase, render_data_file};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Consumer of generated cases
pub trait Writer {
    /// Persist the cases of `destination`
    ///
    /// # Errors
    ///
    /// Returns an error if the cases cannot be serialized or stored.
    fn write(&mut self, destination: &str, cases: Vec<TestCase>) -> Result<()>;
}

/// Serialization format of destination files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Line-oriented `.data` test suite format
    #[default]
    Data,
    /// Pretty-printed JSON array
    Json,
    /// YAML documents separated by `---`
    Yaml,
}

impl OutputFormat {
    /// Get all formats
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Data, Self::Json, Self::Yaml]
    }

    /// File extension, without the dot
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "data" => Ok(Self::Data),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::Config(format!("Unknown output format: {s}"))),
        }
    }
}

/// Render `cases` in `format`
///
/// # Errors
///
/// Returns an error if a case is incomplete or serialization fails.
pub fn render(format: OutputFormat, caller: &str, cases: &[TestCase]) -> Result<String> {
    match format {
        OutputFormat::Data => render_data_file(caller, cases),
        OutputFormat::Json => {
            for case in cases {
                case.check_completeness()?;
            }
            let mut json = serde_json::to_string_pretty(cases)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => {
            let mut output = String::new();
            for case in cases {
                case.check_completeness()?;
                output.push_str("---\n");
                output.push_str(&serde_yaml::to_string(case)?);
            }
            Ok(output)
        }
    }
}

/// Write `contents` to `path` through a sibling `.new` file
///
/// # Errors
///
/// Returns an IO error if either step fails; the temporary file is removed
/// in both cases.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".new");
    let tmp = PathBuf::from(tmp);
    let committed = std::fs::write(&tmp, contents).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = committed {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Writes one file per destination into a directory
#[derive(Debug, Clone)]
pub struct FileWriter {
    directory: PathBuf,
    format: OutputFormat,
    caller: String,
}

impl FileWriter {
    /// Create a writer for `directory`
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            format: OutputFormat::default(),
            caller: "suite-data".to_string(),
        }
    }

    /// Set the output format
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the generator name written into `.data` headers
    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = caller.into();
        self
    }

    /// Output directory
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Output format
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// File path of `destination`
    #[must_use]
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.directory
            .join(format!("{destination}.{}", self.format.extension()))
    }

    /// Render `cases` exactly as [`Writer::write`] would store them
    ///
    /// # Errors
    ///
    /// Returns an error if a case is incomplete or serialization fails.
    pub fn render(&self, cases: &[TestCase]) -> Result<String> {
        render(self.format, &self.caller, cases)
    }
}

impl Writer for FileWriter {
    fn write(&mut self, destination: &str, cases: Vec<TestCase>) -> Result<()> {
        let contents = self.render(&cases)?;
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(destination);
        atomic_write(&path, &contents)?;
        info!(destination, cases = cases.len(), path = %path.display(), "wrote destination");
        Ok(())
    }
}
