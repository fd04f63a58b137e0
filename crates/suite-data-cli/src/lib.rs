//! Suite Data CLI Library
//!
//! Selection and run logic behind the `suite-data` binary, kept here so it
//! can be tested without spawning processes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use std::path::{Path, PathBuf};
use suite_data_gen::{
    FileWriter, Freshness, Generator, GeneratorConfig, OutputFormat, Registry, Result, Writer,
    check_destination,
};
use tracing::{error, info, warn};

/// Command-line overrides applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Output directory
    pub directory: Option<PathBuf>,
    /// Output format name
    pub format: Option<String>,
    /// First case number
    pub first_case_number: Option<usize>,
}

/// Load the config file (if any) and apply overrides
pub fn build_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(directory) = &overrides.directory {
        config.directory.clone_from(directory);
    }
    if let Some(format) = &overrides.format {
        config.format = format.parse::<OutputFormat>()?;
    }
    if let Some(n) = overrides.first_case_number {
        config.first_case_number = n;
    }
    config.validate()?;
    Ok(config)
}

/// What to generate
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Requested destination names
    pub targets: Vec<String>,
    /// Generate every registered destination
    pub all: bool,
    /// Compare with files on disk instead of writing
    pub check: bool,
}

/// Turn a command-line target into a destination id
///
/// `-` is a placeholder and yields `None`. Directory components and a
/// trailing `.{extension}` are dropped, so `tests/suites/foo.data` and
/// `foo` name the same destination.
pub fn normalize_target(name: &str, extension: &str) -> Option<String> {
    if name == "-" || name.is_empty() {
        return None;
    }
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let suffix = format!(".{extension}");
    let id = base.strip_suffix(suffix.as_str()).unwrap_or(base);
    Some(id.to_string())
}

/// Destination ids a run will process, in order, without repeats
pub fn select_destinations(registry: &Registry, options: &RunOptions, extension: &str) -> Vec<String> {
    if options.all {
        return registry
            .list_destinations()
            .into_iter()
            .map(String::from)
            .collect();
    }
    let mut selected: Vec<String> = Vec::new();
    for id in options
        .targets
        .iter()
        .filter_map(|t| normalize_target(t, extension))
    {
        if !selected.contains(&id) {
            selected.push(id);
        }
    }
    selected
}

/// Output file of every registered destination, in registration order
pub fn destination_paths(registry: &Registry, writer: &FileWriter) -> Vec<PathBuf> {
    registry
        .list_destinations()
        .into_iter()
        .map(|id| writer.path_for(id))
        .collect()
}

/// One path per line
pub fn format_listing(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("{}\n", p.display()))
        .collect()
}

/// Paths joined with `;`, no trailing newline
pub fn format_cmake_listing(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Result for one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File written
    Written {
        /// Number of cases written
        cases: usize,
    },
    /// Freshness compared, nothing written
    Checked(Freshness),
    /// Generation failed; nothing was written for this destination
    Failed(String),
}

impl Outcome {
    /// Whether this outcome lets the run succeed
    pub const fn is_success(&self) -> bool {
        match self {
            Self::Written { .. } => true,
            Self::Checked(freshness) => freshness.is_fresh(),
            Self::Failed(_) => false,
        }
    }
}

/// Outcome of one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationReport {
    /// Destination id
    pub destination: String,
    /// Output file path
    pub path: PathBuf,
    /// What happened
    pub outcome: Outcome,
}

/// Outcomes of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Per-destination reports, in processing order
    pub reports: Vec<DestinationReport>,
}

impl RunSummary {
    /// Whether every destination succeeded
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(|r| r.outcome.is_success())
    }

    /// Reports that did not succeed
    pub fn failures(&self) -> Vec<&DestinationReport> {
        self.reports
            .iter()
            .filter(|r| !r.outcome.is_success())
            .collect()
    }

    /// Process exit code: 0 on success, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }

    /// Human-readable line per destination
    pub fn lines(&self) -> Vec<String> {
        self.reports
            .iter()
            .map(|r| match &r.outcome {
                Outcome::Written { cases } => {
                    format!("Generated {} ({cases} cases)", r.path.display())
                }
                Outcome::Checked(freshness) => format!("{}: {freshness}", r.path.display()),
                Outcome::Failed(message) => format!("Error: {}: {message}", r.destination),
            })
            .collect()
    }
}

/// Generate `destination` and hand it to `writer`
///
/// Nothing reaches the writer unless every case was generated.
pub fn generate_destination<W: Writer>(
    generator: &Generator<'_>,
    writer: &mut W,
    destination: &str,
) -> Result<usize> {
    let cases = generator.generate(destination)?;
    let count = cases.len();
    writer.write(destination, cases)?;
    Ok(count)
}

fn process(
    generator: &Generator<'_>,
    writer: &mut FileWriter,
    destination: &str,
    check: bool,
) -> Result<Outcome> {
    if check {
        let cases = generator.generate(destination)?;
        let freshness = check_destination(writer, destination, &cases)?;
        if !freshness.is_fresh() {
            warn!(destination, %freshness, "destination out of date");
        }
        Ok(Outcome::Checked(freshness))
    } else {
        let cases = generate_destination(generator, writer, destination)?;
        Ok(Outcome::Written { cases })
    }
}

/// Run the selected destinations
///
/// Each destination fails independently; the error is recorded in the
/// summary and the run moves on.
///
/// # Errors
///
/// Returns the first error that signals broken target definitions
/// ([`suite_data_gen::Error::aborts_run`]); the run stops there.
pub fn run(registry: &Registry, config: &GeneratorConfig, options: &RunOptions) -> Result<RunSummary> {
    let destinations = select_destinations(registry, options, config.format.extension());
    let mut summary = RunSummary::default();
    if destinations.is_empty() {
        info!("no destinations requested");
        return Ok(summary);
    }

    let generator = config.generator(registry);
    let mut writer = config.writer();
    for destination in destinations {
        let outcome = match process(&generator, &mut writer, &destination, options.check) {
            Ok(outcome) => outcome,
            Err(e) if e.aborts_run() => {
                error!(%destination, error = %e, "aborting run");
                return Err(e);
            }
            Err(e) => {
                error!(%destination, error = %e, "destination failed");
                Outcome::Failed(e.to_string())
            }
        };
        summary.reports.push(DestinationReport {
            path: writer.path_for(&destination),
            destination,
            outcome,
        });
    }
    Ok(summary)
}
