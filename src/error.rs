use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingCsvError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern { pattern: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ListingCsvError {
    fn user_message(&self) -> String {
        match self {
            ListingCsvError::Io(e) => {
                format!("File operation failed: {}", e)
            }
            ListingCsvError::Csv(e) => {
                format!("Could not write CSV output: {}", e)
            }
            ListingCsvError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ListingCsvError::InvalidPattern { pattern } => {
                format!("Invalid snapshot filename pattern: {}", pattern)
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ListingCsvError::Io(_) => Some(
                "Check that the input file exists and you have read/write permission for the paths involved.".to_string()
            ),
            ListingCsvError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            ListingCsvError::InvalidPattern { .. } => Some(
                "Patterns use shell-style globs, e.g. actioneer-*.html".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ListingCsvError {
    fn from(error: toml::de::Error) -> Self {
        ListingCsvError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingCsvError>;
