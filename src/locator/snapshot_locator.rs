use crate::config::LocateConfig;
use crate::error::{ListingCsvError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where a snapshot's effective timestamp came from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    FilenameDateTime,
    FilenameDate,
    Modified,
}

/// A snapshot file matched against the filename pattern, ranked by its
/// effective timestamp. The timestamp is used only for ordering.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub path: PathBuf,
    pub effective: NaiveDateTime,
    pub source: TimestampSource,
}

impl Snapshot {
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string()
    }
}

/// Result of a locate pass. The empty outcomes are diagnostics for the
/// caller to report, not errors.
#[derive(Debug)]
pub enum LocateOutcome {
    Found(Snapshot),
    MissingDirectory(PathBuf),
    NoMatch { directory: PathBuf, pattern: String },
}

impl LocateOutcome {
    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            LocateOutcome::Found(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

pub struct SnapshotLocator {
    directory: PathBuf,
    pattern: String,
    matcher: Regex,
    datetime_token: Regex,
    date_token: Regex,
}

impl SnapshotLocator {
    pub fn new(config: &LocateConfig) -> Result<Self> {
        Ok(Self {
            directory: config.raw_directory.clone(),
            pattern: config.pattern.clone(),
            matcher: glob_to_regex(&config.pattern)?,
            datetime_token: Regex::new(r"\d{4}-\d{2}-\d{2}T\d{6}").expect("literal regex"),
            date_token: Regex::new(r"\d{4}-\d{2}-\d{2}").expect("literal regex"),
        })
    }

    /// Find the snapshot with the latest effective timestamp. Ties are broken
    /// by filename lexical order, highest-sorting name first, so the choice
    /// is stable regardless of directory enumeration order.
    pub fn locate_latest(&self) -> LocateOutcome {
        if !self.directory.exists() || !self.directory.is_dir() {
            return LocateOutcome::MissingDirectory(self.directory.clone());
        }

        let mut candidates: Vec<Snapshot> = Vec::new();

        let walker = WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy();
            if !self.matcher.is_match(&filename) {
                continue;
            }

            let (effective, source) = self.effective_timestamp(&filename, entry.path());
            candidates.push(Snapshot {
                path: entry.path().to_path_buf(),
                effective,
                source,
            });
        }

        if candidates.is_empty() {
            return LocateOutcome::NoMatch {
                directory: self.directory.clone(),
                pattern: self.pattern.clone(),
            };
        }

        candidates.sort_by(|a, b| {
            b.effective
                .cmp(&a.effective)
                .then_with(|| b.path.cmp(&a.path))
        });

        LocateOutcome::Found(candidates.remove(0))
    }

    /// Derive the timestamp used to rank a candidate: a fine-grained
    /// `YYYY-MM-DDTHHMMSS` token in the filename wins, then a coarse
    /// `YYYY-MM-DD` token read as midnight, then the filesystem mtime.
    /// A token that matches the shape but fails date validation falls
    /// through to the next rule.
    fn effective_timestamp(&self, filename: &str, path: &Path) -> (NaiveDateTime, TimestampSource) {
        if let Some(token) = self.datetime_token.find(filename) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(token.as_str(), "%Y-%m-%dT%H%M%S") {
                return (dt, TimestampSource::FilenameDateTime);
            }
        }

        if let Some(token) = self.date_token.find(filename) {
            if let Ok(date) = NaiveDate::parse_from_str(token.as_str(), "%Y-%m-%d") {
                return (date.and_time(NaiveTime::MIN), TimestampSource::FilenameDate);
            }
        }

        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map(|time| DateTime::<Local>::from(time).naive_local())
            .unwrap_or(NaiveDateTime::UNIX_EPOCH);

        (modified, TimestampSource::Modified)
    }
}

/// Shell-style glob to anchored regex: `*` matches any run, `?` one
/// character, everything else is literal.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push('^');

    for ch in pattern.chars() {
        match ch {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            ch => translated.push_str(&regex::escape(&ch.to_string())),
        }
    }

    translated.push('$');

    Regex::new(&translated).map_err(|_| ListingCsvError::InvalidPattern {
        pattern: pattern.to_string(),
    })
}
