//! Correlation types and data structures
//!
//! Defines the dimensions mood is partitioned along and the per-partition
//! results reported by the correlation engine.

use serde::{Deserialize, Serialize};

/// Contextual dimension a partition belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionType {
    Emotion,
    Context,
    TimeOfDay,
    DayOfWeek,
    Energy,
}

impl DimensionType {
    /// Get display name for the dimension
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Emotion => "Emotion",
            Self::Context => "Context",
            Self::TimeOfDay => "Time of Day",
            Self::DayOfWeek => "Day of Week",
            Self::Energy => "Energy",
        }
    }

    /// All dimensions, in reporting order
    pub fn all() -> Vec<DimensionType> {
        vec![
            Self::Emotion,
            Self::Context,
            Self::TimeOfDay,
            Self::DayOfWeek,
            Self::Energy,
        ]
    }
}

/// Part of the day an entry was logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// [5, 12)
    Morning,
    /// [12, 17)
    Afternoon,
    /// [17, 21)
    Evening,
    /// [21, 5)
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Classify an hour of day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

/// Energy band of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    /// 0-3
    Low,
    /// 4-6
    Medium,
    /// 7-10
    High,
}

impl EnergyLevel {
    pub const ALL: [EnergyLevel; 3] = [EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High];

    pub fn from_value(energy: u8) -> Self {
        match energy {
            0..=3 => Self::Low,
            4..=6 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low energy",
            Self::Medium => "medium energy",
            Self::High => "high energy",
        }
    }
}

/// Weekday names indexed by days from Sunday (0 = Sunday)
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Mood values that fell into one partition of a dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub label: String,
    pub values: Vec<u8>,
}

/// Average mood of one partition compared against the overall average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub dimension: DimensionType,
    pub label: String,
    /// Mean mood of entries in this partition
    pub average: f64,
    /// `average - overall_average`
    pub delta: f64,
    pub sample_count: usize,
    /// Lower mood values are better, so a negative delta is positive
    pub is_positive: bool,
}

impl CorrelationResult {
    pub fn new(
        dimension: DimensionType,
        label: String,
        average: f64,
        overall_average: f64,
        sample_count: usize,
    ) -> Self {
        let delta = average - overall_average;
        Self {
            dimension,
            label,
            average,
            delta,
            sample_count,
            is_positive: delta < 0.0,
        }
    }
}

/// Every qualifying partition, strongest effect first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub overall_average: f64,
    pub entry_count: usize,
    /// Sorted by descending |delta|
    pub results: Vec<CorrelationResult>,
    /// Strongest partition associated with better mood
    pub top_positive: Option<CorrelationResult>,
    /// Strongest partition associated with worse (or unchanged) mood
    pub top_negative: Option<CorrelationResult>,
}

impl CorrelationSummary {
    /// Summary for input too small to analyze
    pub fn empty() -> Self {
        Self {
            overall_average: 0.0,
            entry_count: 0,
            results: Vec::new(),
            top_positive: None,
            top_negative: None,
        }
    }

    /// Build from unsorted results
    pub fn from_results(
        overall_average: f64,
        entry_count: usize,
        mut results: Vec<CorrelationResult>,
    ) -> Self {
        // Stable: equal |delta| keeps dimension and partition order
        results.sort_by(|a, b| {
            b.delta
                .abs()
                .partial_cmp(&a.delta.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top_positive = results.iter().find(|r| r.is_positive).cloned();
        let top_negative = results.iter().find(|r| !r.is_positive).cloned();

        Self {
            overall_average,
            entry_count,
            results,
            top_positive,
            top_negative,
        }
    }
}

/// Settings for the correlation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Minimum entries in a partition (and in total) before reporting
    pub min_samples: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self { min_samples: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_from_hour() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
    }

    #[test]
    fn test_energy_level_from_value() {
        assert_eq!(EnergyLevel::from_value(0), EnergyLevel::Low);
        assert_eq!(EnergyLevel::from_value(3), EnergyLevel::Low);
        assert_eq!(EnergyLevel::from_value(4), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_value(6), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_value(7), EnergyLevel::High);
        assert_eq!(EnergyLevel::from_value(10), EnergyLevel::High);
    }

    #[test]
    fn test_correlation_result_sign() {
        let better = CorrelationResult::new(DimensionType::Context, "exercise".into(), 2.0, 5.0, 3);
        assert!((better.delta - (-3.0)).abs() < 1e-9);
        assert!(better.is_positive);

        let same = CorrelationResult::new(DimensionType::Context, "work".into(), 5.0, 5.0, 3);
        assert!(!same.is_positive);
    }

    #[test]
    fn test_summary_from_results_sorts_by_magnitude() {
        let results = vec![
            CorrelationResult::new(DimensionType::Emotion, "calm".into(), 4.0, 5.0, 3),
            CorrelationResult::new(DimensionType::Context, "work".into(), 7.5, 5.0, 4),
            CorrelationResult::new(DimensionType::Energy, "high energy".into(), 3.0, 5.0, 5),
        ];

        let summary = CorrelationSummary::from_results(5.0, 12, results);
        let labels: Vec<&str> = summary.results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["work", "high energy", "calm"]);
        assert_eq!(summary.top_positive.as_ref().unwrap().label, "high energy");
        assert_eq!(summary.top_negative.as_ref().unwrap().label, "work");
    }

    #[test]
    fn test_summary_top_picks_may_be_absent() {
        let results = vec![CorrelationResult::new(
            DimensionType::Emotion,
            "calm".into(),
            4.0,
            5.0,
            3,
        )];
        let summary = CorrelationSummary::from_results(5.0, 3, results);
        assert!(summary.top_positive.is_some());
        assert!(summary.top_negative.is_none());
    }

    #[test]
    fn test_dimension_serialization() {
        let json = serde_json::to_string(&DimensionType::TimeOfDay).unwrap();
        assert_eq!(json, "\"time_of_day\"");
        let parsed: DimensionType = serde_json::from_str("\"day_of_week\"").unwrap();
        assert_eq!(parsed, DimensionType::DayOfWeek);
    }

    #[test]
    fn test_default_config() {
        assert_eq!(CorrelationConfig::default().min_samples, 3);
        let parsed: CorrelationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.min_samples, 3);
    }
}
