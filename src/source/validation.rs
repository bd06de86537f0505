//! Validation of records read from storage
//!
//! Turns loosely typed storage records into engine entries.

use serde::{Deserialize, Serialize};

use crate::models::{supported_datetime, MoodEntry, MOOD_MAX, MOOD_MIN};

/// An entry as stored, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default, alias = "moodValue")]
    pub mood_value: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub contexts: Vec<String>,
    #[serde(default)]
    pub energy: Option<f64>,
}

/// Outcome counts of a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub accepted: usize,
    pub skipped: usize,
    /// Accepted entries whose mood or energy had to be adjusted
    pub clamped: usize,
}

/// Round and clamp a finite value onto the 0-10 scale.
///
/// Returns the scaled value and whether it changed.
fn clamp_scale(value: f64) -> Option<(u8, bool)> {
    if !value.is_finite() {
        return None;
    }
    let clamped = value.round().clamp(f64::from(MOOD_MIN), f64::from(MOOD_MAX));
    Some((clamped as u8, clamped != value))
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Validate one record
fn validate_entry(raw: RawEntry) -> Result<(MoodEntry, bool), &'static str> {
    let timestamp = raw.timestamp.ok_or("missing timestamp")?;
    if supported_datetime(timestamp).is_none() {
        return Err("timestamp outside supported range");
    }

    let (mood_value, mood_adjusted) = raw
        .mood_value
        .and_then(clamp_scale)
        .ok_or("missing or non-finite mood value")?;

    let (energy, energy_adjusted) = match raw.energy.map(clamp_scale) {
        Some(Some((value, adjusted))) => (Some(value), adjusted),
        Some(None) => (None, true),
        None => (None, false),
    };

    let entry = MoodEntry {
        id: raw.id,
        timestamp,
        mood_value,
        note: raw.note,
        emotions: clean_tags(raw.emotions),
        contexts: clean_tags(raw.contexts),
        energy,
    };

    Ok((entry, mood_adjusted || energy_adjusted))
}

/// Validate storage records, skipping the ones the engine cannot use
pub fn validate_entries(raw: Vec<RawEntry>) -> (Vec<MoodEntry>, ValidationReport) {
    let mut report = ValidationReport::default();
    let mut entries = Vec::with_capacity(raw.len());

    for record in raw {
        let id = record.id.clone();
        match validate_entry(record) {
            Ok((entry, adjusted)) => {
                if adjusted {
                    tracing::debug!("Adjusted out-of-range values on entry {:?}", id);
                    report.clamped += 1;
                }
                report.accepted += 1;
                entries.push(entry);
            }
            Err(reason) => {
                tracing::warn!("Skipping entry {:?}: {}", id, reason);
                report.skipped += 1;
            }
        }
    }

    (entries, report)
}
