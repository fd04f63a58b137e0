//! Suite Data CLI
//!
//! Command-line interface for generating test suite data files.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use suite_data_cli::{
    ConfigOverrides, RunOptions, build_config, destination_paths, format_cmake_listing,
    format_listing, run,
};
use suite_data_gen::registry;
use tracing::Level;

#[derive(Parser)]
#[command(name = "suite-data")]
#[command(about = "Generate test suite data files", long_about = None)]
#[command(version)]
struct Cli {
    /// Destinations to generate; `foo`, `foo.data` and `dir/foo.data` are
    /// equivalent, `-` is ignored
    #[arg(value_name = "TARGET")]
    targets: Vec<String>,

    /// Generate every known destination
    #[arg(long)]
    all: bool,

    /// List the output file of every destination and exit
    #[arg(long)]
    list: bool,

    /// Print ';'-separated output files and exit
    #[arg(long, conflicts_with = "list")]
    list_for_cmake: bool,

    /// Compare generated content with files on disk instead of writing
    #[arg(long)]
    check: bool,

    /// YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (default: tests/suites)
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Output format (data, json, yaml)
    #[arg(short, long)]
    format: Option<String>,

    /// Number of the first case of every target
    #[arg(long, value_name = "N")]
    first_case_number: Option<usize>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let overrides = ConfigOverrides {
        directory: cli.directory,
        format: cli.format,
        first_case_number: cli.first_case_number,
    };
    let config = match build_config(cli.config.as_deref(), &overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let registry = match registry::global() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    if cli.list || cli.list_for_cmake {
        let paths = destination_paths(registry, &config.writer());
        if cli.list {
            print!("{}", format_listing(&paths));
        } else {
            print!("{}", format_cmake_listing(&paths));
        }
        return;
    }

    let options = RunOptions {
        targets: cli.targets,
        all: cli.all,
        check: cli.check,
    };
    match run(registry, &config, &options) {
        Ok(summary) => {
            for (line, report) in summary.lines().iter().zip(&summary.reports) {
                if report.outcome.is_success() {
                    println!("{line}");
                } else {
                    eprintln!("{line}");
                }
            }
            std::process::exit(summary.exit_code());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
