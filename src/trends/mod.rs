//! Trend analysis module
//!
//! This module turns an unordered mood log into time-bucketed series:
//! - Daily buckets over every calendar day in range, with empty days
//!   estimated by linear interpolation
//! - Monday-aligned weekly buckets with box-plot statistics
//! - Period summaries and period-over-period comparison

pub mod daily;
pub mod weekly;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::MoodEntry;
use crate::stats::{mean, Quartiles};

/// One calendar day of mood data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Raw mood values logged on this day, in timestamp order
    pub values: Vec<u8>,
    pub average: Option<f64>,
    pub min: Option<u8>,
    pub max: Option<u8>,
    /// Average for tracked days, estimate for empty days
    pub final_value: f64,
    /// True only for days estimated from their neighbours
    pub interpolated: bool,
}

impl DailyAggregate {
    /// Build a bucket for a day that has entries.
    ///
    /// Returns `None` if `values` is empty; empty days go through gap filling.
    pub fn from_values(date: NaiveDate, values: Vec<u8>) -> Option<Self> {
        let average = mean(&values)?;
        let min = values.iter().copied().min();
        let max = values.iter().copied().max();

        Some(Self {
            date,
            values,
            average: Some(average),
            min,
            max,
            final_value: average,
            interpolated: false,
        })
    }

    /// Build a bucket for a day without entries holding an estimated value
    pub fn estimated(date: NaiveDate, final_value: f64) -> Self {
        Self {
            date,
            values: Vec::new(),
            average: None,
            min: None,
            max: None,
            final_value,
            interpolated: true,
        }
    }

    pub fn has_entries(&self) -> bool {
        !self.values.is_empty()
    }
}

/// One Monday-aligned week of mood data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    /// Monday
    pub week_start: NaiveDate,
    /// Sunday
    pub week_end: NaiveDate,
    /// ISO week number
    pub week_number: u32,
    /// Raw mood values logged in this week, in timestamp order
    pub values: Vec<u8>,
    pub quartiles: Quartiles,
    /// Values outside the Tukey fences, ascending
    pub outliers: Vec<u8>,
    pub average: f64,
    /// The weekly median; resists skew from a single extreme entry in a
    /// sparse week
    pub final_value: f64,
}

/// Granularity level for trend queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
}

impl From<&str> for Granularity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "week" | "weekly" => Granularity::Week,
            _ => Granularity::Day,
        }
    }
}

impl From<Option<String>> for Granularity {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(val) => Granularity::from(val.as_str()),
            None => Granularity::default(),
        }
    }
}

/// A bucketed trend series at either granularity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "granularity", content = "buckets", rename_all = "lowercase")]
pub enum TrendSeries {
    Day(Vec<DailyAggregate>),
    Week(Vec<WeeklyAggregate>),
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        match self {
            TrendSeries::Day(days) => days.len(),
            TrendSeries::Week(weeks) => weeks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket entries at the requested granularity over [earliest, latest]
pub fn bucket_entries(
    entries: &[MoodEntry],
    granularity: Granularity,
    offset: FixedOffset,
) -> TrendSeries {
    match granularity {
        Granularity::Day => TrendSeries::Day(daily::bucket_days(entries, offset)),
        Granularity::Week => TrendSeries::Week(weekly::bucket_weeks(entries, offset)),
    }
}

/// Summary of a daily series with optional comparison to a previous period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Days in the series
    pub days: u32,
    /// Days with at least one entry
    pub tracked_days: u32,
    /// Days whose value was estimated
    pub interpolated_days: u32,
    /// Total number of raw values
    pub entry_count: u32,
    /// Mean of all raw values (0 when there are none)
    pub average: f64,
    /// Average change versus the previous period
    /// Negative = mood improved (lower is better)
    pub change_vs_previous: Option<f64>,
}

impl TrendSummary {
    /// Create a TrendSummary from daily data
    pub fn from_daily(daily: &[DailyAggregate]) -> Self {
        let values: Vec<u8> = daily.iter().flat_map(|d| d.values.iter().copied()).collect();
        let tracked_days = daily.iter().filter(|d| d.has_entries()).count() as u32;
        let interpolated_days = daily.iter().filter(|d| d.interpolated).count() as u32;

        Self {
            days: daily.len() as u32,
            tracked_days,
            interpolated_days,
            entry_count: values.len() as u32,
            average: mean(&values).unwrap_or(0.0),
            change_vs_previous: None,
        }
    }

    /// Compare with the summary of the preceding period.
    ///
    /// Leaves the change unset when either period has no raw values.
    pub fn with_comparison(mut self, previous: &TrendSummary) -> Self {
        self.change_vs_previous = if self.entry_count > 0 && previous.entry_count > 0 {
            Some(self.average - previous.average)
        } else {
            None
        };
        self
    }
}
