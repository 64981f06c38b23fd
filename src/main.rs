use clap::Parser;
use listingcsv::{Cli, ListingCsv, ListingCsvError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match ListingCsv::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 2;
        }
    };

    match app.run(&cli) {
        // None means no input was resolvable; the diagnostic is already
        // printed and the run ends gracefully.
        Ok(_) => 0,
        Err(e) => {
            app.handle_error(&e);
            match e {
                ListingCsvError::Config { .. } => 2,
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "listingcsv.toml".to_string());

    match ListingCsv::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  listingcsv --latest --config {}", config_path);
            println!("\nEdit the file to customize the snapshot and output directories.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ListingCsvError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "listingcsv",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[locate]"));
    }
}
