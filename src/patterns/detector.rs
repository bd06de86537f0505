//! Pattern detection logic
//!
//! Each detector compares the best and worst group along one dimension of
//! the mood log and reports a pattern when the gap is large enough. Lower
//! mood values are better, so the best group has the lowest mean.

use chrono::FixedOffset;

use crate::correlation::{partition_entries, weekday_index, DimensionType};
use crate::models::MoodEntry;
use crate::stats::mean;

use super::types::{
    DetectionThresholds, GroupThresholds, Pattern, PatternType, TagThresholds, WeekendThresholds,
};

/// A labelled group mean
#[derive(Debug, Clone)]
struct GroupMean {
    label: String,
    average: f64,
}

/// Detect mood patterns in the log
///
/// # Arguments
/// * `entries` - The full mood log, in any order
/// * `pattern_types` - Optional filter for specific pattern types. If None, checks all.
/// * `thresholds` - Detection thresholds to use
/// * `offset` - UTC offset used for time of day and weekday
///
/// # Returns
/// At most `thresholds.max_patterns` patterns with confidence of at least
/// `thresholds.min_confidence`, highest confidence first
pub fn detect_patterns(
    entries: &[MoodEntry],
    pattern_types: Option<&[PatternType]>,
    thresholds: &DetectionThresholds,
    offset: FixedOffset,
) -> Vec<Pattern> {
    if entries.len() < thresholds.min_total_entries {
        tracing::debug!(
            "Skipping pattern detection: {} entries (need {})",
            entries.len(),
            thresholds.min_total_entries
        );
        return Vec::new();
    }

    let all = PatternType::all();
    let patterns_to_check = pattern_types.unwrap_or(&all);

    let mut detected: Vec<Pattern> = patterns_to_check
        .iter()
        .filter_map(|pattern_type| match pattern_type {
            PatternType::TimeOfDay => {
                detect_time_of_day(entries, &thresholds.time_of_day, offset)
            }
            PatternType::DayOfWeek => {
                detect_day_of_week(entries, &thresholds.day_of_week, offset)
            }
            PatternType::WeekendWeekday => {
                detect_weekend_weekday(entries, &thresholds.weekend, offset)
            }
            PatternType::Emotion => {
                detect_tag_pattern(entries, DimensionType::Emotion, &thresholds.emotion, offset)
            }
            PatternType::Context => {
                detect_tag_pattern(entries, DimensionType::Context, &thresholds.context, offset)
            }
        })
        .filter(|p| p.confidence >= thresholds.min_confidence)
        .collect();

    // Highest confidence first; ties keep detector order
    detected.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    detected.truncate(thresholds.max_patterns);

    tracing::debug!("Detected {} mood patterns", detected.len());
    detected
}

/// Means of the partitions with at least `min_group_size` entries
fn group_means(
    entries: &[MoodEntry],
    dimension: DimensionType,
    min_group_size: usize,
    offset: FixedOffset,
) -> Vec<GroupMean> {
    partition_entries(entries, dimension, offset)
        .into_iter()
        .filter(|p| p.values.len() >= min_group_size)
        .filter_map(|p| {
            mean(&p.values).map(|average| GroupMean {
                label: p.label,
                average,
            })
        })
        .collect()
}

/// Best (lowest mean) and worst (highest mean) groups; first wins on ties
fn best_and_worst(groups: &[GroupMean]) -> Option<(&GroupMean, &GroupMean)> {
    let mut iter = groups.iter();
    let first = iter.next()?;

    let (best, worst) = iter.fold((first, first), |(best, worst), g| {
        let best = if g.average < best.average { g } else { best };
        let worst = if g.average > worst.average { g } else { worst };
        (best, worst)
    });

    Some((best, worst))
}

/// Detect TimeOfDay: one part of the day is clearly better than another
fn detect_time_of_day(
    entries: &[MoodEntry],
    thresholds: &GroupThresholds,
    offset: FixedOffset,
) -> Option<Pattern> {
    if entries.len() < thresholds.min_entries {
        return None;
    }

    let groups = group_means(entries, DimensionType::TimeOfDay, thresholds.min_group_size, offset);
    if groups.len() < 2 {
        return None;
    }

    let (best, worst) = best_and_worst(&groups)?;
    let difference = worst.average - best.average;
    if difference < thresholds.min_difference {
        return None;
    }

    Some(Pattern::new(
        PatternType::TimeOfDay,
        format!("You tend to feel best in the {}", best.label),
        format!(
            "Your mood averages {:.1} in the {} compared with {:.1} in the {}.",
            best.average, best.label, worst.average, worst.label
        ),
        difference / thresholds.normalizer,
    ))
}

/// Detect DayOfWeek: one weekday is clearly better than another
fn detect_day_of_week(
    entries: &[MoodEntry],
    thresholds: &GroupThresholds,
    offset: FixedOffset,
) -> Option<Pattern> {
    if entries.len() < thresholds.min_entries {
        return None;
    }

    let groups = group_means(entries, DimensionType::DayOfWeek, thresholds.min_group_size, offset);
    if groups.len() < 2 {
        return None;
    }

    let (best, worst) = best_and_worst(&groups)?;
    let difference = worst.average - best.average;
    if difference < thresholds.min_difference {
        return None;
    }

    Some(Pattern::new(
        PatternType::DayOfWeek,
        format!("{}s are your best days", best.label),
        format!(
            "Your mood averages {:.1} on {}s compared with {:.1} on {}s.",
            best.average, best.label, worst.average, worst.label
        ),
        difference / thresholds.normalizer,
    ))
}

/// Detect WeekendWeekday: weekends and weekdays differ
fn detect_weekend_weekday(
    entries: &[MoodEntry],
    thresholds: &WeekendThresholds,
    offset: FixedOffset,
) -> Option<Pattern> {
    if entries.len() < thresholds.min_entries {
        return None;
    }

    let mut weekend: Vec<u8> = Vec::new();
    let mut weekday: Vec<u8> = Vec::new();

    for entry in entries {
        match weekday_index(entry, offset) {
            // Sunday, Saturday
            Some(0) | Some(6) => weekend.push(entry.mood_value),
            Some(_) => weekday.push(entry.mood_value),
            None => {}
        }
    }

    if weekday.len() < thresholds.min_weekday_entries
        || weekend.len() < thresholds.min_weekend_entries
    {
        return None;
    }

    let weekend_avg = mean(&weekend)?;
    let weekday_avg = mean(&weekday)?;
    let difference = (weekend_avg - weekday_avg).abs();
    if difference < thresholds.min_difference {
        return None;
    }

    let (title, description) = if weekend_avg < weekday_avg {
        (
            "Weekends lift your mood".to_string(),
            format!(
                "Your mood averages {:.1} on weekends compared with {:.1} on weekdays.",
                weekend_avg, weekday_avg
            ),
        )
    } else {
        (
            "Weekdays suit you better than weekends".to_string(),
            format!(
                "Your mood averages {:.1} on weekdays compared with {:.1} on weekends.",
                weekday_avg, weekend_avg
            ),
        )
    };

    Some(Pattern::new(
        PatternType::WeekendWeekday,
        title,
        description,
        difference / thresholds.normalizer,
    ))
}

/// Detect Emotion / Context: some tags go with clearly better mood.
///
/// There is no separate difference gate; weak gaps fall out through the
/// minimum confidence.
fn detect_tag_pattern(
    entries: &[MoodEntry],
    dimension: DimensionType,
    thresholds: &TagThresholds,
    offset: FixedOffset,
) -> Option<Pattern> {
    let groups = group_means(entries, dimension, thresholds.min_group_size, offset);
    if groups.len() < thresholds.min_tags.max(2) {
        return None;
    }

    let (best, worst) = best_and_worst(&groups)?;
    let confidence = (worst.average - best.average) / thresholds.normalizer;

    let (pattern_type, title, description) = match dimension {
        DimensionType::Emotion => (
            PatternType::Emotion,
            format!("Feeling {} comes with your best moods", best.label),
            format!(
                "Entries where you felt {} average {:.1}, \
                 while entries where you felt {} average {:.1}.",
                best.label, best.average, worst.label, worst.average
            ),
        ),
        _ => (
            PatternType::Context,
            format!("Your mood is best around {}", best.label),
            format!(
                "Entries tagged {} average {:.1}, while entries tagged {} average {:.1}.",
                best.label, best.average, worst.label, worst.average
            ),
        ),
    };

    Some(Pattern::new(pattern_type, title, description, confidence))
}
