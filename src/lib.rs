pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod ui;
pub mod writer;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, LocateConfig, OutputConfig};
pub use error::{ListingCsvError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{Extraction, ListingExtractor, ListingRecord};
pub use locator::{LocateOutcome, Snapshot, SnapshotLocator};
pub use ui::{OutputFormatter, OutputMode};
pub use writer::write_records;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one export run, also the payload for `--output-format json`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub input: PathBuf,
    /// The CSV written, or `None` when there was no data to save.
    pub output: Option<PathBuf>,
    pub records: Vec<ListingRecord>,
    pub skipped: Vec<String>,
    pub exported_at: DateTime<Utc>,
}

/// Main library interface: resolves the input snapshot, extracts the listing
/// table, and writes the CSV. Strictly synchronous; one read, one write.
pub struct ListingCsv {
    config: Config,
    output_formatter: OutputFormatter,
    extractor: ListingExtractor,
}

impl ListingCsv {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, silent: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, silent),
            extractor: ListingExtractor::new(),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.silent,
        ))
    }

    /// Full run for one CLI invocation. `Ok(None)` means no input could be
    /// resolved; the diagnostic has already been printed and the caller
    /// returns gracefully.
    pub fn run(&self, cli_args: &Cli) -> Result<Option<ExportReport>> {
        let Some(input) = self.resolve_input(cli_args)? else {
            return Ok(None);
        };

        let output = self.resolve_output(cli_args, &input);
        let report = self.export_file(&input, &output)?;

        match cli_args.output_format {
            OutputFormat::Json => self.output_formatter.print_export_report(&report),
            _ => self
                .output_formatter
                .print_export_summary(&report, self.config.output.sample_rows),
        }

        Ok(Some(report))
    }

    /// Input selection order: --latest, --input, the configured default
    /// snapshot if it exists, then the most-recent rule as a last resort.
    pub fn resolve_input(&self, cli_args: &Cli) -> Result<Option<PathBuf>> {
        if cli_args.latest {
            let located = self.locate_latest()?;
            if located.is_none() {
                self.output_formatter.warning("No files found to process.");
            }
            return Ok(located);
        }

        if let Some(ref input) = cli_args.input {
            return Ok(Some(input.clone()));
        }

        let default_input = &self.config.locate.default_input;
        if default_input.exists() {
            return Ok(Some(default_input.clone()));
        }

        let located = self.locate_latest()?;
        if located.is_none() {
            self.output_formatter
                .warning("No input file specified and no default file found.");
        }
        Ok(located)
    }

    /// --output wins; otherwise the input filename stem lands in the
    /// processed directory with a .csv extension.
    pub fn resolve_output(&self, cli_args: &Cli, input: &Path) -> PathBuf {
        if let Some(ref output) = cli_args.output {
            return output.clone();
        }

        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("listings");
        self.config
            .output
            .processed_directory
            .join(format!("{}.csv", stem))
    }

    /// Read, extract, write. A read failure on an explicit path propagates;
    /// row-level faults are logged and dropped inside the extractor.
    pub fn export_file(&self, input: &Path, output: &Path) -> Result<ExportReport> {
        self.output_formatter
            .start_operation(&format!("Processing {}", input.display()));

        let html = fs::read_to_string(input)?;
        let extraction = self.extractor.extract(&html);

        for line in &extraction.skipped {
            self.output_formatter.warning(line);
        }
        self.output_formatter.info(&format!(
            "Extracted {} listings from {}",
            extraction.records.len(),
            input.display()
        ));

        let written = write_records(&extraction.records, output)?;
        if written {
            self.output_formatter
                .success(&format!("Data saved to {}", output.display()));
        } else {
            self.output_formatter.warning("No data to save!");
        }

        Ok(ExportReport {
            input: input.to_path_buf(),
            output: written.then(|| output.to_path_buf()),
            records: extraction.records,
            skipped: extraction.skipped,
            exported_at: Utc::now(),
        })
    }

    fn locate_latest(&self) -> Result<Option<PathBuf>> {
        let locator = SnapshotLocator::new(&self.config.locate)?;

        match locator.locate_latest() {
            LocateOutcome::Found(snapshot) => {
                self.output_formatter.debug(&format!(
                    "Selected snapshot {} ({:?} timestamp)",
                    snapshot.path.display(),
                    snapshot.source
                ));
                Ok(Some(snapshot.path))
            }
            LocateOutcome::MissingDirectory(directory) => {
                self.output_formatter.warning(&format!(
                    "Directory {} does not exist or is not a directory",
                    directory.display()
                ));
                Ok(None)
            }
            LocateOutcome::NoMatch { directory, pattern } => {
                self.output_formatter.warning(&format!(
                    "No files matching pattern {} found in {}",
                    pattern,
                    directory.display()
                ));
                Ok(None)
            }
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        fs::write(output_path.as_ref(), sample_config).map_err(ListingCsvError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &ListingCsvError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to export one snapshot with default settings.
pub fn export_snapshot(input: &Path, output: &Path) -> Result<ExportReport> {
    let app = ListingCsv::new(Config::default(), OutputMode::Plain, 0, true);
    app.export_file(input, output)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("listingcsv").chain(args.iter().copied())).unwrap()
    }

    fn app_for(temp: &TempDir) -> ListingCsv {
        let mut config = Config::default();
        config.locate.raw_directory = temp.path().join("raw");
        config.locate.default_input = temp.path().join("raw/default.html");
        config.output.processed_directory = temp.path().join("processed");
        ListingCsv::new(config, OutputMode::Plain, 0, true)
    }

    const SNAPSHOT: &str = r#"<html><body><table id="data-table"><tbody>
        <tr>
          <td class="name"><span class="numeric">x5</span>Iron Ingot x5</td>
          <td align="center">1 day</td>
          <td align="center">Vesh</td>
          <td class="costValues"><span class="numeric">300</span></td>
        </tr>
    </tbody></table></body></html>"#;

    #[test]
    fn test_export_file_end_to_end() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("snap.html");
        let output = temp.path().join("out.csv");
        std::fs::write(&input, SNAPSHOT).unwrap();

        let report = app_for(&temp).export_file(&input, &output).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "Iron Ingot");
        assert_eq!(report.records[0].seller, "Vesh");
        assert_eq!(report.output.as_deref(), Some(output.as_path()));
        assert!(output.exists());
    }

    #[test]
    fn test_export_file_missing_input_propagates_io() {
        let temp = TempDir::new().unwrap();
        let result = app_for(&temp).export_file(
            &temp.path().join("missing.html"),
            &temp.path().join("out.csv"),
        );
        assert!(matches!(result, Err(ListingCsvError::Io(_))));
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("empty.html");
        let output = temp.path().join("out.csv");
        std::fs::write(&input, "<html><body></body></html>").unwrap();

        let report = app_for(&temp).export_file(&input, &output).unwrap();

        assert!(report.records.is_empty());
        assert!(report.output.is_none());
        assert!(!output.exists());
    }

    #[test]
    fn test_resolve_output_derives_from_stem() {
        let temp = TempDir::new().unwrap();
        let app = app_for(&temp);

        let cli = cli_from(&[]);
        let output = app.resolve_output(&cli, Path::new("data/raw/actioneer-2025-03-01.html"));
        assert_eq!(
            output,
            app.config()
                .output
                .processed_directory
                .join("actioneer-2025-03-01.csv")
        );

        let cli = cli_from(&["--output", "custom.csv"]);
        let output = app.resolve_output(&cli, Path::new("whatever.html"));
        assert_eq!(output, PathBuf::from("custom.csv"));
    }

    #[test]
    fn test_resolve_input_prefers_explicit_path() {
        let temp = TempDir::new().unwrap();
        let app = app_for(&temp);

        let cli = cli_from(&["--input", "some.html"]);
        let input = app.resolve_input(&cli).unwrap();
        assert_eq!(input, Some(PathBuf::from("some.html")));
    }

    #[test]
    fn test_resolve_input_falls_back_to_default_then_latest() {
        let temp = TempDir::new().unwrap();
        let app = app_for(&temp);

        // Nothing resolvable: no default file, empty raw directory
        let cli = cli_from(&[]);
        assert_eq!(app.resolve_input(&cli).unwrap(), None);

        // Default file present: it wins
        std::fs::create_dir_all(temp.path().join("raw")).unwrap();
        std::fs::write(temp.path().join("raw/default.html"), SNAPSHOT).unwrap();
        let input = app.resolve_input(&cli).unwrap();
        assert_eq!(input, Some(temp.path().join("raw/default.html")));

        // Default gone, a matching snapshot present: locator takes over
        std::fs::remove_file(temp.path().join("raw/default.html")).unwrap();
        std::fs::write(temp.path().join("raw/actioneer-2025-03-01.html"), SNAPSHOT).unwrap();
        let input = app.resolve_input(&cli).unwrap();
        assert_eq!(
            input,
            Some(temp.path().join("raw/actioneer-2025-03-01.html"))
        );
    }

    #[test]
    fn test_resolve_input_latest_flag() {
        let temp = TempDir::new().unwrap();
        let app = app_for(&temp);
        std::fs::create_dir_all(temp.path().join("raw")).unwrap();
        std::fs::write(temp.path().join("raw/actioneer-2025-03-01.html"), SNAPSHOT).unwrap();
        std::fs::write(
            temp.path().join("raw/actioneer-2025-04-01T120000.html"),
            SNAPSHOT,
        )
        .unwrap();

        let cli = cli_from(&["--latest"]);
        let input = app.resolve_input(&cli).unwrap();
        assert_eq!(
            input,
            Some(temp.path().join("raw/actioneer-2025-04-01T120000.html"))
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("sample.toml");

        ListingCsv::generate_sample_config(&config_path).unwrap();
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[locate]"));
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
