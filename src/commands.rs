//! Command handlers
//!
//! Each handler backs one CLI sub-command: it runs the engine over the
//! loaded entries and shapes the result for output.

use std::path::{Path, PathBuf};

use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::correlation::{analyze_correlations, CorrelationSummary};
use crate::export::{
    csv_export, generate_export_filename, get_export_directory, json_export, ExportContent,
    ExportFormat,
};
use crate::models::{is_supported_year, MoodEntry, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
use crate::patterns::{detect_patterns, Pattern, PatternType};
use crate::source::EntrySource;
use crate::stats::{summarize, BoxSummary};
use crate::streak::{calculate_streak, Streak};
use crate::trends::daily::{
    bucket_days, bucket_days_in_range, calculate_trend_summary, filter_entries_by_date_range,
};
use crate::trends::weekly::bucket_weeks;
use crate::trends::{
    bucket_entries, DailyAggregate, Granularity, TrendSeries, TrendSummary, WeeklyAggregate,
};
use crate::CommandError;

/// Length of the summary window in the full report
pub const SUMMARY_WINDOW_DAYS: u32 = 30;

/// Everything a handler needs besides the entries
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub config: AnalyticsConfig,
    pub offset: FixedOffset,
    pub today: NaiveDate,
}

impl AnalysisContext {
    pub fn new(config: AnalyticsConfig) -> Result<Self, CommandError> {
        let offset = config.offset()?;
        let today = crate::trends::daily::today(offset);
        Ok(Self {
            config,
            offset,
            today,
        })
    }

    /// Pin "today" instead of reading the clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Full analytics report
#[derive(Debug, Clone, Serialize)]
pub struct MoodReport {
    pub generated_at: String,
    pub today: NaiveDate,
    pub entry_count: usize,
    /// Last `SUMMARY_WINDOW_DAYS` days against the window before
    pub summary: TrendSummary,
    pub daily: Vec<DailyAggregate>,
    pub weekly: Vec<WeeklyAggregate>,
    pub correlations: CorrelationSummary,
    pub patterns: Vec<Pattern>,
    pub streak: Streak,
}

/// Distribution of mood values, overall and per week
#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub overall: Option<BoxSummary>,
    pub weeks: Vec<WeeklyAggregate>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Load every entry from a source
pub fn load_entries(source: &dyn EntrySource) -> Result<Vec<MoodEntry>, CommandError> {
    let entries = source.get_all_entries()?;
    tracing::info!("Analyzing {} entries", entries.len());
    Ok(entries)
}

/// Parse a `YYYY-MM-DD` date argument within the supported years
pub fn parse_date(value: &str) -> Result<NaiveDate, CommandError> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArgument(format!("Invalid date: {}. Use YYYY-MM-DD", value))
    })?;

    if !is_supported_year(date.year()) {
        return Err(CommandError::InvalidArgument(format!(
            "Date {} is outside the supported years {}-{}",
            value, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR
        )));
    }
    Ok(date)
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, CommandError> {
    value.map(parse_date).transpose()
}

// ============================================================================
// Commands
// ============================================================================

/// Build the full report
pub fn build_report(entries: &[MoodEntry], ctx: &AnalysisContext) -> MoodReport {
    let offset = ctx.offset;

    let report = MoodReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        today: ctx.today,
        entry_count: entries.len(),
        summary: calculate_trend_summary(entries, ctx.today, SUMMARY_WINDOW_DAYS, offset),
        daily: bucket_days(entries, offset),
        weekly: bucket_weeks(entries, offset),
        correlations: analyze_correlations(entries, &ctx.config.correlation, offset),
        patterns: detect_patterns(entries, None, &ctx.config.patterns, offset),
        streak: calculate_streak(entries, ctx.today, offset),
    };

    tracing::info!(
        "Built report: {} days, {} weeks, {} correlations, {} patterns",
        report.daily.len(),
        report.weekly.len(),
        report.correlations.results.len(),
        report.patterns.len()
    );
    report
}

/// Trend series, optionally limited to a date range.
///
/// A day series with both bounds given covers the whole window, including
/// empty days at either end.
pub fn get_trends(
    entries: &[MoodEntry],
    ctx: &AnalysisContext,
    granularity: Granularity,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<TrendSeries, CommandError> {
    let start = parse_optional_date(start_date)?;
    let end = parse_optional_date(end_date)?;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(CommandError::InvalidArgument(format!(
                "Start date {} is after end date {}",
                s, e
            )));
        }
        if granularity == Granularity::Day {
            return Ok(TrendSeries::Day(bucket_days_in_range(entries, s, e, ctx.offset)));
        }
    }

    let filtered = filter_entries_by_date_range(entries, start, end, ctx.offset);
    let series = bucket_entries(&filtered, granularity, ctx.offset);
    tracing::info!("Trend series: {} buckets from {} entries", series.len(), filtered.len());
    Ok(series)
}

/// Box-plot statistics over all values and per week
pub fn get_distribution(entries: &[MoodEntry], ctx: &AnalysisContext) -> DistributionReport {
    let values: Vec<u8> = entries.iter().map(|e| e.mood_value).collect();

    DistributionReport {
        overall: summarize(&values),
        weeks: bucket_weeks(entries, ctx.offset),
    }
}

/// Correlations between mood and tags, time and energy
pub fn get_correlations(entries: &[MoodEntry], ctx: &AnalysisContext) -> CorrelationSummary {
    analyze_correlations(entries, &ctx.config.correlation, ctx.offset)
}

/// Detect mood patterns.
///
/// Unknown pattern type names are ignored; no names means every detector.
pub fn detect_mood_patterns(
    entries: &[MoodEntry],
    ctx: &AnalysisContext,
    pattern_types: Option<Vec<String>>,
    top: Option<usize>,
) -> Vec<Pattern> {
    let types: Option<Vec<PatternType>> = pattern_types.map(|names| {
        names
            .iter()
            .filter_map(|s| PatternType::from_name(s))
            .collect()
    });

    let mut thresholds = ctx.config.patterns.clone();
    if let Some(top) = top {
        thresholds.max_patterns = top;
    }

    detect_patterns(entries, types.as_deref(), &thresholds, ctx.offset)
}

/// Current and longest tracking streak
pub fn get_streak(entries: &[MoodEntry], ctx: &AnalysisContext) -> Streak {
    calculate_streak(entries, ctx.today, ctx.offset)
}

/// Export to a file and return its path.
///
/// CSV holds either the trend series at the requested granularity or the
/// correlation results; JSON always holds the full report. Without an output
/// path a timestamped file is created in the export directory.
pub fn export_analytics(
    entries: &[MoodEntry],
    ctx: &AnalysisContext,
    format: &str,
    content: &str,
    granularity: Granularity,
    output: Option<&Path>,
) -> Result<PathBuf, CommandError> {
    let export_format = format.parse::<ExportFormat>()?;
    let export_content = content.parse::<ExportContent>()?;

    let path = match output {
        Some(p) => p.to_path_buf(),
        None => {
            let prefix = match (export_format, export_content) {
                (ExportFormat::Csv, ExportContent::Trends) => "mood_trends",
                (ExportFormat::Csv, ExportContent::Correlations) => "mood_correlations",
                (ExportFormat::Json, _) => "mood_report",
            };
            get_export_directory().join(generate_export_filename(prefix, export_format.extension()))
        }
    };

    match (export_format, export_content) {
        (ExportFormat::Csv, ExportContent::Trends) => {
            let series = bucket_entries(entries, granularity, ctx.offset);
            csv_export::write_trend_csv_file(&series, &path)?;
        }
        (ExportFormat::Csv, ExportContent::Correlations) => {
            let summary = get_correlations(entries, ctx);
            csv_export::write_correlations_csv_file(&summary, &path)?;
        }
        (ExportFormat::Json, _) => {
            let report = build_report(entries, ctx);
            json_export::write_report_json_file(&report, &path)?;
        }
    }

    tracing::info!("Exported {} entries to {:?}", entries.len(), path);
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================
