use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listingcsv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract marketplace listings from saved HTML snapshots into CSV")]
#[command(
    long_about = "ListingCsv parses the data table of a saved marketplace HTML snapshot \
                       and writes one CSV row per listing, with best-effort extraction per row."
)]
#[command(after_help = "EXAMPLES:\n  \
    listingcsv --input data/raw/actioneer-2025-04-01T120000.html --output listings.csv\n  \
    listingcsv --latest\n  \
    listingcsv --latest --silent --output-format json\n\n\
    Without --input or --latest, the configured default snapshot is tried first, \
    then the most recent matching file in the raw directory.")]
pub struct Cli {
    /// Path to the HTML snapshot to process
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path to save the extracted data (CSV)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Process the most recent snapshot in the raw directory
    #[arg(short, long)]
    pub latest: bool,

    /// Suppress the sample rows and summary statistics
    #[arg(short, long)]
    pub silent: bool,

    /// Directory to search for snapshots (overrides config)
    #[arg(long, help = "Directory searched by --latest")]
    pub directory: Option<PathBuf>,

    /// Snapshot filename glob (overrides config)
    #[arg(long, help = "Glob matched by --latest (e.g. actioneer-*.html)")]
    pub pattern: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_raw_directory(self.directory.clone())
            .with_pattern(self.pattern.clone())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.silent
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.silent {
            0
        } else {
            self.verbose
        }
    }
}
