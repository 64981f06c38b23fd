use crate::error::{ListingCsvError, UserFriendlyError};
use crate::extractor::ListingRecord;
use crate::ExportReport;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    silent: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, silent: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported(),
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: verbose,
            silent,
        }
    }

    // Core messaging methods. Diagnostics go to stdout; hard errors to
    // stderr. --silent suppresses only the sample and summary blocks.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Warning, message),
            OutputMode::Json => self.print_json_message("warning", message),
            OutputMode::Plain => println!("WARNING: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Info, message),
            OutputMode::Json => self.print_json_message("info", message),
            OutputMode::Plain => println!("INFO: {}", message),
        }
    }

    pub fn debug(&self, message: &str) {
        if !self.should_show_message(1) {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("  {}", style(message).dim());
                } else {
                    println!("  DEBUG: {}", message);
                }
            }
            OutputMode::Json => self.print_json_message("debug", message),
            OutputMode::Plain => println!("DEBUG: {}", message),
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if !self.should_show_message(1) {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", ROCKET, style(operation).bold());
                } else {
                    println!("> {}", operation);
                }
            }
            OutputMode::Json => self.print_json_message("operation_start", operation),
            OutputMode::Plain => println!("STARTING: {}", operation),
        }
    }

    pub fn print_user_friendly_error(&self, error: &ListingCsvError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Sample rows plus summary statistics, suppressed by --silent.
    pub fn print_export_summary(&self, report: &ExportReport, sample_rows: usize) {
        if self.silent || report.records.is_empty() {
            return;
        }

        println!();
        if self.use_colors {
            println!("{}", style("Sample data:").bold());
        } else {
            println!("Sample data:");
        }

        for (index, record) in report.records.iter().take(sample_rows).enumerate() {
            println!("Item {}:", index + 1);
            self.print_record_fields(record);
        }

        println!();
        println!("Total items extracted: {}", report.records.len());
        if !report.skipped.is_empty() {
            println!("Rows skipped: {}", report.skipped.len());
        }
        println!(
            "Fields available: {}",
            ListingRecord::field_names().join(", ")
        );

        if let Some(ref output) = report.output {
            println!("Full data saved to {}", output.display());
        }
    }

    pub fn print_export_report(&self, report: &ExportReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ => self.print_export_summary(report, report.records.len()),
        }
    }

    fn print_record_fields(&self, record: &ListingRecord) {
        let value = serde_json::to_value(record).unwrap_or(serde_json::Value::Null);
        for field in ListingRecord::field_names() {
            let rendered = match value.get(field) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => "None".to_string(),
                Some(other) => other.to_string(),
            };
            println!("  {}: {}", field, rendered);
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
