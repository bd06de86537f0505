//! Daily trend calculations
//!
//! Buckets mood entries by calendar day and fills days without entries by
//! linear interpolation between the nearest tracked neighbours.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc};

use super::{DailyAggregate, TrendSummary};
use crate::models::entry::sort_by_timestamp;
use crate::models::{MoodEntry, MOOD_MIDPOINT};

/// Get the current date in the given offset
pub fn today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Get the date N days before `from`, or `None` before `NaiveDate::MIN`
pub fn days_before(from: NaiveDate, n: u64) -> Option<NaiveDate> {
    from.checked_sub_days(Days::new(n))
}

/// Group mood values by local calendar date.
///
/// Entries are stable-sorted by timestamp first, so each day's values are
/// in chronological order and ties keep their input order.
pub fn group_by_date(entries: &[MoodEntry], offset: FixedOffset) -> BTreeMap<NaiveDate, Vec<u8>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<u8>> = BTreeMap::new();

    for entry in sort_by_timestamp(entries) {
        if let Some(date) = entry.local_date(offset) {
            by_date.entry(date).or_default().push(entry.mood_value);
        }
    }

    by_date
}

/// Bucket entries into one aggregate per calendar day from the earliest to
/// the latest entry, inclusive
pub fn bucket_days(entries: &[MoodEntry], offset: FixedOffset) -> Vec<DailyAggregate> {
    let by_date = group_by_date(entries, offset);

    let (first, last) = match (by_date.keys().next(), by_date.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let days = build_days(by_date, first, last);
    tracing::debug!(
        "Bucketed {} entries into {} days ({} to {})",
        entries.len(),
        days.len(),
        first,
        last
    );
    days
}

/// Bucket entries into one aggregate per calendar day over an explicit
/// inclusive window. Entries outside the window are ignored.
///
/// Empty days before the first or after the last tracked day hold the
/// nearest tracked value; a window with no entries at all sits at the
/// neutral midpoint.
pub fn bucket_days_in_range(
    entries: &[MoodEntry],
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
) -> Vec<DailyAggregate> {
    if start > end {
        return Vec::new();
    }

    let by_date: BTreeMap<NaiveDate, Vec<u8>> = group_by_date(entries, offset)
        .into_iter()
        .filter(|(date, _)| *date >= start && *date <= end)
        .collect();

    build_days(by_date, start, end)
}

/// Enumerate every day in [start, end] and fill the gaps
fn build_days(
    mut by_date: BTreeMap<NaiveDate, Vec<u8>>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyAggregate> {
    let mut days = Vec::new();

    let mut current = start;
    while current <= end {
        let values = by_date.remove(&current).unwrap_or_default();
        let day = DailyAggregate::from_values(current, values)
            .unwrap_or_else(|| DailyAggregate::estimated(current, MOOD_MIDPOINT));
        days.push(day);

        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    fill_gaps(&mut days);
    days
}

/// Position of a date on the interpolation axis, in days
fn day_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Linear interpolation through (x0, y0) and (x1, y1) evaluated at x.
///
/// When x0 == x1 the left value is returned.
pub fn interpolate(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Replace the value of every day without entries by an estimate.
///
/// Between two tracked days the estimate is interpolated; with a single
/// tracked neighbour its value is held; with none the neutral midpoint is
/// used. Tracked days are left untouched.
pub fn fill_gaps(days: &mut [DailyAggregate]) {
    let anchors: Vec<(usize, NaiveDate, f64)> = days
        .iter()
        .enumerate()
        .filter(|(_, d)| d.has_entries())
        .map(|(i, d)| (i, d.date, d.final_value))
        .collect();

    for i in 0..days.len() {
        if days[i].has_entries() {
            continue;
        }

        // First anchor after this index
        let split = anchors.partition_point(|(idx, _, _)| *idx < i);
        let before = split.checked_sub(1).map(|p| anchors[p]);
        let after = anchors.get(split).copied();

        let estimate = match (before, after) {
            (Some((_, d0, y0)), Some((_, d1, y1))) => {
                interpolate(day_x(d0), y0, day_x(d1), y1, day_x(days[i].date))
            }
            (Some((_, _, y)), None) | (None, Some((_, _, y))) => y,
            (None, None) => MOOD_MIDPOINT,
        };

        days[i] = DailyAggregate::estimated(days[i].date, estimate);
    }
}

/// Keep only entries whose local date lies within the inclusive range.
///
/// A missing bound leaves that side open.
pub fn filter_entries_by_date_range(
    entries: &[MoodEntry],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    offset: FixedOffset,
) -> Vec<MoodEntry> {
    entries
        .iter()
        .filter(|entry| {
            let date = match entry.local_date(offset) {
                Some(d) => d,
                None => return false,
            };

            let after_start = match start {
                Some(s) => date >= s,
                None => true,
            };

            let before_end = match end {
                Some(e) => date <= e,
                None => true,
            };

            after_start && before_end
        })
        .cloned()
        .collect()
}

/// Summarize the `days`-long window ending at `end` and compare it with the
/// window of equal length immediately before it.
///
/// A window that would start before the first representable date yields an
/// empty summary, and an unrepresentable previous window leaves the change
/// unset.
pub fn calculate_trend_summary(
    entries: &[MoodEntry],
    end: NaiveDate,
    days: u32,
    offset: FixedOffset,
) -> TrendSummary {
    let span = u64::from(days.max(1)) - 1;

    let Some(start) = days_before(end, span) else {
        return TrendSummary::from_daily(&[]);
    };
    let current = TrendSummary::from_daily(&bucket_days_in_range(entries, start, end, offset));

    let previous_window = days_before(start, 1)
        .and_then(|prev_end| Some((days_before(prev_end, span)?, prev_end)));
    match previous_window {
        Some((prev_start, prev_end)) => {
            let previous = TrendSummary::from_daily(&bucket_days_in_range(
                entries, prev_start, prev_end, offset,
            ));
            current.with_comparison(&previous)
        }
        None => current,
    }
}
