//! CSV export functionality
//!
//! Provides CSV serialization for day series, week series and correlations.

use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use super::{ExportError, ExportableCorrelation, ExportableDay, ExportableWeek};
use crate::correlation::CorrelationSummary;
use crate::trends::{DailyAggregate, TrendSeries, WeeklyAggregate};

fn write_records<W, R>(records: impl IntoIterator<Item = R>, writer: W) -> Result<(), ExportError>
where
    W: Write,
    R: Serialize,
{
    let mut writer = Writer::from_writer(writer);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a day series to CSV
pub fn write_days_csv<W: Write>(days: &[DailyAggregate], writer: W) -> Result<(), ExportError> {
    write_records(days.iter().map(ExportableDay::from), writer)
}

/// Write a week series to CSV
pub fn write_weeks_csv<W: Write>(weeks: &[WeeklyAggregate], writer: W) -> Result<(), ExportError> {
    write_records(weeks.iter().map(ExportableWeek::from), writer)
}

/// Write either kind of trend series to CSV
pub fn write_trend_csv<W: Write>(series: &TrendSeries, writer: W) -> Result<(), ExportError> {
    match series {
        TrendSeries::Day(days) => write_days_csv(days, writer),
        TrendSeries::Week(weeks) => write_weeks_csv(weeks, writer),
    }
}

/// Write correlation results to CSV, in ranked order
pub fn write_correlations_csv<W: Write>(
    summary: &CorrelationSummary,
    writer: W,
) -> Result<(), ExportError> {
    write_records(summary.results.iter().map(ExportableCorrelation::from), writer)
}

/// Write a trend series to a CSV file
pub fn write_trend_csv_file(series: &TrendSeries, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_trend_csv(series, file)?;
    tracing::info!("Wrote {} trend rows to {:?}", series.len(), path);
    Ok(())
}

/// Write correlation results to a CSV file
pub fn write_correlations_csv_file(
    summary: &CorrelationSummary,
    path: &Path,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_correlations_csv(summary, file)?;
    tracing::info!("Wrote {} correlation rows to {:?}", summary.results.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::{analyze_correlations, CorrelationConfig};
    use crate::models::MoodEntry;
    use crate::trends::test_support::*;
    use crate::trends::{bucket_entries, Granularity};
    use std::fs;

    fn sample_entries() -> Vec<MoodEntry> {
        vec![
            entry_at("a", 2026, 2, 2, 8, 2),
            entry_at("b", 2026, 2, 2, 18, 4),
            entry_at("c", 2026, 2, 4, 9, 8),
        ]
    }

    fn csv_string(series: &TrendSeries) -> String {
        let mut buffer = Vec::new();
        write_trend_csv(series, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_days_csv() {
        let series = bucket_entries(&sample_entries(), Granularity::Day, utc());
        let output = csv_string(&series);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "date,entry_count,average,min,max,final_value,interpolated,values"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2026-02-02,2,3.0,2,4,3.0,false,"));
        assert!(lines[2].starts_with("2026-02-03,0,,,,5.5,true,"));
        assert!(lines[3].starts_with("2026-02-04,1,8.0,8,8,8.0,false,8"));
    }

    #[test]
    fn test_write_weeks_csv() {
        let series = bucket_entries(&sample_entries(), Granularity::Week, utc());
        let output = csv_string(&series);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0]
            .starts_with("week_start,week_end,week_number,entry_count,min,q1,median,q3,max"));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2026-02-02,2026-02-08,6,3,2,"));
    }

    #[test]
    fn test_write_empty_series() {
        let series = TrendSeries::Day(Vec::new());
        assert_eq!(csv_string(&series), "");
    }

    #[test]
    fn test_write_correlations_csv() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 8, 2).with_contexts(["exercise"]),
            entry_at("b", 2026, 2, 3, 8, 2).with_contexts(["exercise"]),
            entry_at("c", 2026, 2, 4, 8, 2).with_contexts(["exercise"]),
            entry_at("d", 2026, 2, 5, 8, 8),
            entry_at("e", 2026, 2, 6, 8, 8),
            entry_at("f", 2026, 2, 7, 8, 8),
        ];
        let summary = analyze_correlations(&entries, &CorrelationConfig::default(), utc());

        let mut buffer = Vec::new();
        write_correlations_csv(&summary, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.starts_with("dimension,label,average,delta,sample_count,is_positive"));
        assert!(output.contains(",exercise,2.0,-3.0,3,true"));
    }

    #[test]
    fn test_write_trend_csv_file() {
        let path = std::env::temp_dir().join("moodlog_test_trends.csv");
        let series = bucket_entries(&sample_entries(), Granularity::Day, utc());

        write_trend_csv_file(&series, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("2026-02-03"));

        fs::remove_file(&path).ok();
    }
}
