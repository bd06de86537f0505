//! JSON export functionality
//!
//! Writes the full report with export metadata, pretty-printed.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::ExportError;
use crate::commands::MoodReport;

const EXPORT_VERSION: &str = "1.0.0";

/// Complete export structure for JSON
#[derive(Debug, Clone, Serialize)]
pub struct ReportExportJson<'a> {
    pub export_date: String,
    pub export_version: &'static str,
    pub report: &'a MoodReport,
}

impl<'a> ReportExportJson<'a> {
    pub fn new(report: &'a MoodReport) -> Self {
        Self {
            export_date: chrono::Utc::now().to_rfc3339(),
            export_version: EXPORT_VERSION,
            report,
        }
    }
}

/// Write the report as pretty JSON
pub fn write_report_json<W: Write>(report: &MoodReport, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, &ReportExportJson::new(report))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write the report to a JSON file
pub fn write_report_json_file(report: &MoodReport, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_report_json(report, file)?;
    tracing::info!("Wrote report to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{build_report, AnalysisContext};
    use crate::config::AnalyticsConfig;
    use crate::trends::test_support::*;
    use std::fs;

    fn report() -> MoodReport {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 8, 2).with_emotions(["calm"]),
            entry_at("b", 2026, 2, 4, 20, 6),
        ];
        let config = AnalyticsConfig {
            utc_offset_minutes: Some(0),
            ..AnalyticsConfig::default()
        };
        let ctx = AnalysisContext::new(config)
            .unwrap()
            .with_today(date(2026, 2, 4));
        build_report(&entries, &ctx)
    }

    #[test]
    fn test_write_report_json() {
        let mut buffer = Vec::new();
        write_report_json(&report(), &mut buffer).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["export_version"], "1.0.0");
        assert_eq!(parsed["report"]["entry_count"], 2);
        assert_eq!(parsed["report"]["today"], "2026-02-04");
        assert_eq!(parsed["report"]["daily"][1]["date"], "2026-02-03");
        assert_eq!(parsed["report"]["daily"][1]["interpolated"], true);
        assert_eq!(parsed["report"]["streak"]["current"], 1);
        assert!(parsed["report"]["patterns"].is_array());
    }

    #[test]
    fn test_write_report_json_is_pretty() {
        let mut buffer = Vec::new();
        write_report_json(&report(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("{\n  \"export_date\""));
    }

    #[test]
    fn test_write_report_json_file() {
        let path = std::env::temp_dir().join("moodlog_test_report.json");
        write_report_json_file(&report(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["report"]["weekly"][0]["week_start"], "2026-02-02");

        fs::remove_file(&path).ok();
    }
}
