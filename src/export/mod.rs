//! Export module for CSV and JSON export functionality
//!
//! Flattens trend series and correlation results into tabular records and
//! writes the full report as JSON.

pub mod csv_export;
pub mod json_export;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::correlation::CorrelationResult;
use crate::trends::{DailyAggregate, WeeklyAggregate};

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid export format: {0}. Use 'csv' or 'json'")]
    InvalidFormat(String),

    #[error("Invalid export content: {0}. Use 'trends' or 'correlations'")]
    InvalidContent(String),
}

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::InvalidFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// What a CSV export holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportContent {
    #[default]
    Trends,
    Correlations,
}

impl std::str::FromStr for ExportContent {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trends" => Ok(ExportContent::Trends),
            "correlations" => Ok(ExportContent::Correlations),
            _ => Err(ExportError::InvalidContent(s.to_string())),
        }
    }
}

/// Join raw mood values into a single CSV cell
fn join_values(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Exportable day record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableDay {
    pub date: String,
    pub entry_count: usize,
    pub average: Option<f64>,
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub final_value: f64,
    pub interpolated: bool,
    pub values: String, // Semicolon-separated
}

impl From<&DailyAggregate> for ExportableDay {
    fn from(day: &DailyAggregate) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            entry_count: day.values.len(),
            average: day.average,
            min: day.min,
            max: day.max,
            final_value: day.final_value,
            interpolated: day.interpolated,
            values: join_values(&day.values),
        }
    }
}

/// Exportable week record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableWeek {
    pub week_start: String,
    pub week_end: String,
    pub week_number: u32,
    pub entry_count: usize,
    pub min: u8,
    pub q1: u8,
    pub median: u8,
    pub q3: u8,
    pub max: u8,
    pub average: f64,
    pub final_value: f64,
    pub outliers: String,
}

impl From<&WeeklyAggregate> for ExportableWeek {
    fn from(week: &WeeklyAggregate) -> Self {
        Self {
            week_start: week.week_start.format("%Y-%m-%d").to_string(),
            week_end: week.week_end.format("%Y-%m-%d").to_string(),
            week_number: week.week_number,
            entry_count: week.values.len(),
            min: week.quartiles.min,
            q1: week.quartiles.q1,
            median: week.quartiles.median,
            q3: week.quartiles.q3,
            max: week.quartiles.max,
            average: week.average,
            final_value: week.final_value,
            outliers: join_values(&week.outliers),
        }
    }
}

/// Exportable correlation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableCorrelation {
    pub dimension: String,
    pub label: String,
    pub average: f64,
    pub delta: f64,
    pub sample_count: usize,
    pub is_positive: bool,
}

impl From<&CorrelationResult> for ExportableCorrelation {
    fn from(result: &CorrelationResult) -> Self {
        Self {
            dimension: result.dimension.display_name().to_string(),
            label: result.label.clone(),
            average: result.average,
            delta: result.delta,
            sample_count: result.sample_count,
            is_positive: result.is_positive,
        }
    }
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

pub use csv_export::*;
pub use json_export::*;
