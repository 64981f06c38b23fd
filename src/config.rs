use crate::error::{ListingCsvError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub locate: LocateConfig,
    pub output: OutputConfig,
}

/// Where raw snapshots live and how their filenames look.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocateConfig {
    pub raw_directory: PathBuf,
    pub pattern: String,
    pub default_input: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub processed_directory: PathBuf,
    pub sample_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locate: LocateConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            raw_directory: PathBuf::from("data/raw"),
            pattern: "actioneer-*.html".to_string(),
            // Historical snapshot name kept as the fallback input
            default_input: PathBuf::from("data/raw/actioneer-03-04-2025.html"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            processed_directory: PathBuf::from("data/processed"),
            sample_rows: 3,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ListingCsvError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ListingCsvError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ListingCsvError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["listingcsv.toml", ".listingcsv.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.raw_directory {
            self.locate.raw_directory = directory.clone();
        }

        if let Some(ref pattern) = cli_args.pattern {
            self.locate.pattern = pattern.clone();
        }

        if let Some(ref directory) = cli_args.processed_directory {
            self.output.processed_directory = directory.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ListingCsvError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ListingCsvError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.locate.pattern.trim().is_empty() {
            return Err(ListingCsvError::Config {
                message: "Snapshot filename pattern must not be empty".to_string(),
            });
        }

        if self.locate.raw_directory.as_os_str().is_empty() {
            return Err(ListingCsvError::Config {
                message: "Raw snapshot directory must not be empty".to_string(),
            });
        }

        if self.output.processed_directory.as_os_str().is_empty() {
            return Err(ListingCsvError::Config {
                message: "Processed output directory must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub raw_directory: Option<PathBuf>,
    pub pattern: Option<String>,
    pub processed_directory: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.raw_directory = directory;
        self
    }

    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_processed_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.processed_directory = directory;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.locate.raw_directory, PathBuf::from("data/raw"));
        assert_eq!(config.locate.pattern, "actioneer-*.html");
        assert_eq!(
            config.output.processed_directory,
            PathBuf::from("data/processed")
        );
        assert_eq!(config.output.sample_rows, 3);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.locate.pattern = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.locate.pattern, loaded_config.locate.pattern);
        assert_eq!(config.output.sample_rows, loaded_config.output.sample_rows);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("does/not/exist.toml");
        assert!(matches!(result, Err(ListingCsvError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_raw_directory(Some(PathBuf::from("snapshots")))
            .with_pattern(Some("market-*.html".to_string()));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.locate.raw_directory, PathBuf::from("snapshots"));
        assert_eq!(config.locate.pattern, "market-*.html");
        // Untouched fields keep their defaults
        assert_eq!(
            config.output.processed_directory,
            PathBuf::from("data/processed")
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[locate]"));
        assert!(sample.contains("[output]"));
    }
}
