//! Entry source module
//!
//! The storage boundary of the engine. Sources hand over the full mood log;
//! records read from storage are validated here so the engine only ever
//! sees well-formed entries:
//! - missing or unrepresentable timestamps are skipped
//! - non-finite mood values are skipped
//! - mood and energy are rounded and clamped into 0..=10
//! - tags are trimmed and empty tags dropped

pub mod validation;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::MoodEntry;

pub use validation::{validate_entries, RawEntry, ValidationReport};

/// Entry source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid JSON on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Get the default entries file path
pub fn default_entries_path() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("moodlog").join("entries.json")
}

/// Read-only access to the stored mood log
pub trait EntrySource {
    /// Every stored entry, in no particular order
    fn get_all_entries(&self) -> Result<Vec<MoodEntry>, SourceError>;
}

/// Entries held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    entries: Vec<MoodEntry>,
}

impl InMemorySource {
    pub fn new(entries: Vec<MoodEntry>) -> Self {
        Self { entries }
    }
}

impl EntrySource for InMemorySource {
    fn get_all_entries(&self) -> Result<Vec<MoodEntry>, SourceError> {
        Ok(self.entries.clone())
    }
}

/// Entries exported by the storage layer to a file.
///
/// Accepts a JSON array of entries or newline-delimited JSON with one entry
/// per line.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntrySource for JsonFileSource {
    fn get_all_entries(&self) -> Result<Vec<MoodEntry>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let raw = parse_raw_entries(&text)?;
        let (entries, report) = validate_entries(raw);
        tracing::info!(
            "Loaded {} entries from {:?} ({} skipped, {} clamped)",
            report.accepted,
            self.path,
            report.skipped,
            report.clamped
        );
        Ok(entries)
    }
}

/// Parse a JSON array or newline-delimited JSON into raw records
pub fn parse_raw_entries(text: &str) -> Result<Vec<RawEntry>, SourceError> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut raw = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: RawEntry = serde_json::from_str(line).map_err(|source| SourceError::JsonLine {
            line: idx + 1,
            source,
        })?;
        raw.push(entry);
    }
    Ok(raw)
}
