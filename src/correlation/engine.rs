//! Correlation engine
//!
//! Partitions the mood log along each contextual dimension and compares the
//! average mood of every sufficiently large partition against the overall
//! average.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, FixedOffset, Timelike};

use super::types::{
    CorrelationConfig, CorrelationResult, CorrelationSummary, DimensionType, EnergyLevel,
    Partition, TimeOfDay, WEEKDAY_LABELS,
};
use crate::models::MoodEntry;
use crate::stats::mean;

/// Time-of-day slot of an entry in the given offset
pub fn time_of_day(entry: &MoodEntry, offset: FixedOffset) -> Option<TimeOfDay> {
    entry
        .local_datetime(offset)
        .map(|dt| TimeOfDay::from_hour(dt.hour()))
}

/// Day of week of an entry, 0 = Sunday
pub fn weekday_index(entry: &MoodEntry, offset: FixedOffset) -> Option<usize> {
    entry
        .local_datetime(offset)
        .map(|dt| dt.weekday().num_days_from_sunday() as usize)
}

/// Split entries into the partitions of one dimension.
///
/// Tag dimensions are case-insensitive and an entry joins every tag
/// partition it carries (duplicate tags on one entry count once). Entries
/// without energy are left out of the energy dimension. Only non-empty
/// partitions are returned: tags in label order, the other dimensions in
/// their natural order.
pub fn partition_entries(
    entries: &[MoodEntry],
    dimension: DimensionType,
    offset: FixedOffset,
) -> Vec<Partition> {
    match dimension {
        DimensionType::Emotion => partition_tags(entries, |e| &e.emotions),
        DimensionType::Context => partition_tags(entries, |e| &e.contexts),
        DimensionType::TimeOfDay => {
            let labels: Vec<&str> = TimeOfDay::ALL.iter().map(|t| t.label()).collect();
            partition_indexed(entries, &labels, |e| time_of_day(e, offset).map(|t| t as usize))
        }
        DimensionType::DayOfWeek => {
            partition_indexed(entries, &WEEKDAY_LABELS, |e| weekday_index(e, offset))
        }
        DimensionType::Energy => {
            let labels: Vec<&str> = EnergyLevel::ALL.iter().map(|l| l.label()).collect();
            partition_indexed(entries, &labels, |e| {
                e.energy.map(|v| EnergyLevel::from_value(v) as usize)
            })
        }
    }
}

fn partition_tags<F>(entries: &[MoodEntry], tags: F) -> Vec<Partition>
where
    F: Fn(&MoodEntry) -> &Vec<String>,
{
    let mut by_tag: BTreeMap<String, Vec<u8>> = BTreeMap::new();

    for entry in entries {
        let unique: BTreeSet<String> = tags(entry)
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        for tag in unique {
            by_tag.entry(tag).or_default().push(entry.mood_value);
        }
    }

    by_tag
        .into_iter()
        .map(|(label, values)| Partition { label, values })
        .collect()
}

fn partition_indexed<F>(entries: &[MoodEntry], labels: &[&str], key: F) -> Vec<Partition>
where
    F: Fn(&MoodEntry) -> Option<usize>,
{
    let mut slots: Vec<Vec<u8>> = vec![Vec::new(); labels.len()];

    for entry in entries {
        if let Some(slot) = key(entry).and_then(|i| slots.get_mut(i)) {
            slot.push(entry.mood_value);
        }
    }

    labels
        .iter()
        .zip(slots)
        .filter(|(_, values)| !values.is_empty())
        .map(|(label, values)| Partition {
            label: (*label).to_string(),
            values,
        })
        .collect()
}

/// Compute per-partition mood deltas across all five dimensions.
///
/// Fewer than `min_samples` entries yields an empty summary.
pub fn analyze_correlations(
    entries: &[MoodEntry],
    config: &CorrelationConfig,
    offset: FixedOffset,
) -> CorrelationSummary {
    if entries.len() < config.min_samples {
        return CorrelationSummary::empty();
    }

    let all_values: Vec<u8> = entries.iter().map(|e| e.mood_value).collect();
    let overall_average = match mean(&all_values) {
        Some(avg) => avg,
        None => return CorrelationSummary::empty(),
    };

    let mut results = Vec::new();

    for dimension in DimensionType::all() {
        for partition in partition_entries(entries, dimension, offset) {
            if partition.values.len() < config.min_samples {
                continue;
            }
            if let Some(average) = mean(&partition.values) {
                results.push(CorrelationResult::new(
                    dimension,
                    partition.label,
                    average,
                    overall_average,
                    partition.values.len(),
                ));
            }
        }
    }

    tracing::debug!(
        "Correlation analysis: {} entries, {} qualifying partitions, overall average {:.2}",
        entries.len(),
        results.len(),
        overall_average
    );

    CorrelationSummary::from_results(overall_average, entries.len(), results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::test_support::*;

    fn in_dimension(
        summary: &CorrelationSummary,
        dimension: DimensionType,
    ) -> Vec<&CorrelationResult> {
        summary.results.iter().filter(|r| r.dimension == dimension).collect()
    }

    #[test]
    fn test_empty_and_small_input() {
        let config = CorrelationConfig::default();
        assert_eq!(analyze_correlations(&[], &config, utc()), CorrelationSummary::empty());

        let two = vec![entry_at("a", 2026, 2, 2, 9, 3), entry_at("b", 2026, 2, 3, 9, 5)];
        let summary = analyze_correlations(&two, &config, utc());
        assert_eq!(summary.overall_average, 0.0);
        assert!(summary.results.is_empty());
        assert!(summary.top_positive.is_none());
        assert!(summary.top_negative.is_none());
    }

    #[test]
    fn test_exercise_context_lifts_mood() {
        // Overall average 5: three exercise entries at 2, three others at 8
        let mut entries: Vec<MoodEntry> = (0..3)
            .map(|i| entry_at(&format!("ex{i}"), 2026, 2, 2 + i, 9, 2).with_contexts(["Exercise"]))
            .collect();
        entries.extend((0..3).map(|i| entry_at(&format!("o{i}"), 2026, 2, 5 + i, 9, 8)));

        let summary = analyze_correlations(&entries, &CorrelationConfig::default(), utc());
        assert!((summary.overall_average - 5.0).abs() < 1e-9);

        let exercise = in_dimension(&summary, DimensionType::Context)
            .into_iter()
            .find(|r| r.label == "exercise")
            .unwrap();
        assert_eq!(exercise.sample_count, 3);
        assert!((exercise.average - 2.0).abs() < 1e-9);
        assert!((exercise.delta - (-3.0)).abs() < 1e-9);
        assert!(exercise.is_positive);
    }

    #[test]
    fn test_tags_are_case_insensitive_and_multi_member() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 9, 1).with_emotions(["Happy", "calm"]),
            entry_at("b", 2026, 2, 3, 9, 3).with_emotions(["happy", "HAPPY"]),
            entry_at("c", 2026, 2, 4, 9, 5).with_emotions([" Calm ", "Happy"]),
        ];

        let partitions = partition_entries(&entries, DimensionType::Emotion, utc());
        assert_eq!(
            partitions,
            vec![
                Partition { label: "calm".into(), values: vec![1, 5] },
                Partition { label: "happy".into(), values: vec![1, 3, 5] },
            ]
        );
    }

    #[test]
    fn test_time_of_day_partitions() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 5, 1),
            entry_at("b", 2026, 2, 2, 12, 2),
            entry_at("c", 2026, 2, 2, 17, 3),
            entry_at("d", 2026, 2, 2, 21, 4),
            entry_at("e", 2026, 2, 3, 4, 5),
        ];

        let partitions = partition_entries(&entries, DimensionType::TimeOfDay, utc());
        let labels: Vec<&str> = partitions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["morning", "afternoon", "evening", "night"]);
        assert_eq!(partitions[3].values, vec![4, 5]);
    }

    #[test]
    fn test_day_of_week_partitions() {
        // Feb 1 2026 is a Sunday, Feb 2 a Monday
        let entries = vec![
            entry_at("a", 2026, 2, 1, 9, 1),
            entry_at("b", 2026, 2, 2, 9, 2),
            entry_at("c", 2026, 2, 8, 9, 3),
        ];

        assert_eq!(weekday_index(&entries[0], utc()), Some(0));
        assert_eq!(weekday_index(&entries[1], utc()), Some(1));

        let partitions = partition_entries(&entries, DimensionType::DayOfWeek, utc());
        assert_eq!(partitions[0].label, "Sunday");
        assert_eq!(partitions[0].values, vec![1, 3]);
        assert_eq!(partitions[1].label, "Monday");
    }

    #[test]
    fn test_energy_partitions_skip_missing_energy() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 9, 1).with_energy(2),
            entry_at("b", 2026, 2, 2, 10, 2).with_energy(9),
            entry_at("c", 2026, 2, 2, 11, 3),
        ];

        let partitions = partition_entries(&entries, DimensionType::Energy, utc());
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].label, "low energy");
        assert_eq!(partitions[1].label, "high energy");
    }

    #[test]
    fn test_small_partitions_are_not_reported() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 9, 1).with_contexts(["work"]),
            entry_at("b", 2026, 2, 3, 9, 2).with_contexts(["work"]),
            entry_at("c", 2026, 2, 4, 9, 9),
        ];

        let summary = analyze_correlations(&entries, &CorrelationConfig::default(), utc());
        assert!(in_dimension(&summary, DimensionType::Context).is_empty());
        // All three fall in the morning slot
        assert_eq!(in_dimension(&summary, DimensionType::TimeOfDay).len(), 1);
    }

    #[test]
    fn test_results_sorted_and_top_picks() {
        let mut entries = Vec::new();
        for i in 0..3 {
            entries.push(
                entry_at(&format!("g{i}"), 2026, 2, 2 + i, 9, 1).with_contexts(["friends"]),
            );
            entries.push(entry_at(&format!("w{i}"), 2026, 2, 2 + i, 14, 8).with_contexts(["work"]));
            entries.push(entry_at(&format!("n{i}"), 2026, 2, 2 + i, 19, 6));
        }

        let summary = analyze_correlations(&entries, &CorrelationConfig::default(), utc());
        for pair in summary.results.windows(2) {
            assert!(pair[0].delta.abs() >= pair[1].delta.abs());
        }

        let top_positive = summary.top_positive.unwrap();
        assert!(top_positive.is_positive);
        assert!(top_positive.delta < 0.0);
        // friends (context) and morning (time of day) tie; context comes first
        assert_eq!(top_positive.dimension, DimensionType::Context);
        assert_eq!(top_positive.label, "friends");

        let top_negative = summary.top_negative.unwrap();
        assert!(!top_negative.is_positive);
        assert_eq!(top_negative.label, "work");
    }

    #[test]
    fn test_custom_min_samples() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 9, 1).with_contexts(["work"]),
            entry_at("b", 2026, 2, 3, 9, 9),
        ];
        let config = CorrelationConfig { min_samples: 1 };

        let summary = analyze_correlations(&entries, &config, utc());
        assert_eq!(in_dimension(&summary, DimensionType::Context).len(), 1);
        assert_eq!(summary.entry_count, 2);
    }
}
