//! Mood entry data types
//!
//! A single logged mood value plus its optional context, as supplied by the
//! storage layer.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lowest value on the mood scale (best mood)
pub const MOOD_MIN: u8 = 0;
/// Highest value on the mood scale (worst mood)
pub const MOOD_MAX: u8 = 10;
/// Neutral midpoint used when no real value is available to estimate from
pub const MOOD_MIDPOINT: f64 = 5.0;

/// Earliest calendar year (UTC) an entry timestamp may fall in
pub const MIN_SUPPORTED_YEAR: i32 = 1900;
/// Latest calendar year (UTC) an entry timestamp may fall in
pub const MAX_SUPPORTED_YEAR: i32 = 2199;

/// Whether a calendar year lies in the supported range
pub fn is_supported_year(year: i32) -> bool {
    (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year)
}

/// Convert epoch milliseconds to a UTC datetime inside the supported range.
///
/// A gap-filled day series over supported dates spans at most about 110k days.
pub fn supported_datetime(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp).filter(|dt| is_supported_year(dt.year()))
}

/// A single mood log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// 0-10, lower is better
    #[serde(alias = "moodValue")]
    pub mood_value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Ordered emotion tags
    #[serde(default)]
    pub emotions: Vec<String>,
    /// Context tags (work, exercise, ...)
    #[serde(default)]
    pub contexts: Vec<String>,
    /// 0-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<u8>,
}

impl MoodEntry {
    /// Create an entry with no tags, note or energy
    pub fn new(id: impl Into<String>, timestamp: i64, mood_value: u8) -> Self {
        Self {
            id: id.into(),
            timestamp,
            mood_value,
            note: None,
            emotions: Vec::new(),
            contexts: Vec::new(),
            energy: None,
        }
    }

    pub fn with_emotions<I, S>(mut self, emotions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emotions = emotions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = contexts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_energy(mut self, energy: u8) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Timestamp expressed in the given offset.
    ///
    /// Returns `None` when the timestamp falls outside the supported years.
    pub fn local_datetime(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        supported_datetime(self.timestamp).map(|dt| dt.with_timezone(&offset))
    }

    /// Calendar date of the entry in the given offset
    pub fn local_date(&self, offset: FixedOffset) -> Option<NaiveDate> {
        self.local_datetime(offset).map(|dt| dt.date_naive())
    }
}

/// Stable sort by timestamp ascending; ties keep their input order
pub fn sort_by_timestamp(entries: &[MoodEntry]) -> Vec<&MoodEntry> {
    let mut sorted: Vec<&MoodEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);
    sorted
}
