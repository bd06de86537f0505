//! Weekly trend calculations
//!
//! Buckets mood entries by Monday-aligned week. Weeks without entries are
//! not emitted; only day series are gap-filled.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, FixedOffset, NaiveDate};

use super::WeeklyAggregate;
use crate::models::entry::sort_by_timestamp;
use crate::models::MoodEntry;
use crate::stats::{mean, summarize};

/// Get the Monday of the week containing the given date.
///
/// Returns `None` when that Monday is before `NaiveDate::MIN`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let days_from_monday = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(days_from_monday)))
}

/// Get the Sunday of the week containing the given date.
///
/// Returns `None` when that Sunday is after `NaiveDate::MAX`.
pub fn week_end(date: NaiveDate) -> Option<NaiveDate> {
    let days_to_sunday = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(days_to_sunday)))
}

/// Get ISO week number for a date
fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Build the aggregate for one week.
///
/// Returns `None` for an empty value list or a week that runs past the end
/// of the calendar.
pub fn aggregate_week(start: NaiveDate, values: Vec<u8>) -> Option<WeeklyAggregate> {
    let summary = summarize(&values)?;
    let average = mean(&values)?;

    Some(WeeklyAggregate {
        week_start: start,
        week_end: week_end(start)?,
        week_number: iso_week(start),
        final_value: f64::from(summary.quartiles.median),
        values,
        quartiles: summary.quartiles,
        outliers: summary.outliers,
        average,
    })
}

/// Bucket entries into Monday-aligned weeks, ordered by week start.
///
/// Only weeks that contain entries appear in the output.
pub fn bucket_weeks(entries: &[MoodEntry], offset: FixedOffset) -> Vec<WeeklyAggregate> {
    let mut by_week: BTreeMap<NaiveDate, Vec<u8>> = BTreeMap::new();

    for entry in sort_by_timestamp(entries) {
        if let Some(start) = entry.local_date(offset).and_then(week_start) {
            by_week.entry(start).or_default().push(entry.mood_value);
        }
    }

    let weeks: Vec<WeeklyAggregate> = by_week
        .into_iter()
        .filter_map(|(start, values)| aggregate_week(start, values))
        .collect();

    tracing::debug!("Bucketed {} entries into {} weeks", entries.len(), weeks.len());
    weeks
}
