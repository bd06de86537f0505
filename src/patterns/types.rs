//! Pattern types and data structures
//!
//! Defines the kinds of mood patterns detected, the structure used to
//! report them, and the thresholds each detector is gated by.

use serde::{Deserialize, Deserializer, Serialize};

/// Kinds of behavioral pattern that can be detected in a mood log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Mood differs between parts of the day
    TimeOfDay,
    /// Mood differs between days of the week
    DayOfWeek,
    /// Mood differs between weekends and weekdays
    WeekendWeekday,
    /// Some emotion tags go with better mood than others
    Emotion,
    /// Some context tags go with better mood than others
    Context,
}

impl PatternType {
    /// Stable identifier used as the pattern id
    pub fn id(&self) -> &'static str {
        match self {
            Self::TimeOfDay => "time-of-day",
            Self::DayOfWeek => "day-of-week",
            Self::WeekendWeekday => "weekend-weekday",
            Self::Emotion => "emotion",
            Self::Context => "context",
        }
    }

    /// Get all pattern types, in detector order
    pub fn all() -> Vec<PatternType> {
        vec![
            Self::TimeOfDay,
            Self::DayOfWeek,
            Self::WeekendWeekday,
            Self::Emotion,
            Self::Context,
        ]
    }

    /// Parse from a name such as "time_of_day", "time-of-day" or "TimeOfDay"
    pub fn from_name(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "timeofday" => Some(Self::TimeOfDay),
            "dayofweek" => Some(Self::DayOfWeek),
            "weekendweekday" | "weekend" => Some(Self::WeekendWeekday),
            "emotion" => Some(Self::Emotion),
            "context" => Some(Self::Context),
            _ => None,
        }
    }
}

/// A detected mood pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub pattern_type: PatternType,
    pub title: String,
    pub description: String,
    /// 0-1
    pub confidence: f64,
}

impl Pattern {
    /// Create a pattern, clamping confidence into [0, 1]
    pub fn new(
        pattern_type: PatternType,
        title: String,
        description: String,
        confidence: f64,
    ) -> Self {
        Self {
            id: pattern_type.id().to_string(),
            pattern_type,
            title,
            description,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Gate for a best-versus-worst group detector.
///
/// Missing fields take the time-of-day defaults; the `day_of_week` entry of
/// [`DetectionThresholds`] fills its gaps from [`GroupThresholds::day_of_week`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupThresholds {
    /// Minimum entries in the whole log
    pub min_entries: usize,
    /// Minimum entries for a group to take part
    pub min_group_size: usize,
    /// Minimum best-vs-worst mean difference
    pub min_difference: f64,
    /// Difference that maps to confidence 1.0
    pub normalizer: f64,
}

impl GroupThresholds {
    pub fn time_of_day() -> Self {
        Self {
            min_entries: 10,
            min_group_size: 3,
            min_difference: 0.8,
            normalizer: 2.0,
        }
    }

    pub fn day_of_week() -> Self {
        Self {
            min_entries: 14,
            min_group_size: 2,
            min_difference: 0.8,
            normalizer: 2.0,
        }
    }
}

impl Default for GroupThresholds {
    fn default() -> Self {
        Self::time_of_day()
    }
}

/// Fields given in a config file for one group detector
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GroupOverrides {
    min_entries: Option<usize>,
    min_group_size: Option<usize>,
    min_difference: Option<f64>,
    normalizer: Option<f64>,
}

impl GroupOverrides {
    fn apply(self, base: GroupThresholds) -> GroupThresholds {
        GroupThresholds {
            min_entries: self.min_entries.unwrap_or(base.min_entries),
            min_group_size: self.min_group_size.unwrap_or(base.min_group_size),
            min_difference: self.min_difference.unwrap_or(base.min_difference),
            normalizer: self.normalizer.unwrap_or(base.normalizer),
        }
    }
}

fn day_of_week_thresholds<'de, D>(deserializer: D) -> Result<GroupThresholds, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = GroupOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(GroupThresholds::day_of_week()))
}

/// Gate for the weekend versus weekday detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekendThresholds {
    pub min_entries: usize,
    pub min_weekday_entries: usize,
    pub min_weekend_entries: usize,
    pub min_difference: f64,
    pub normalizer: f64,
}

impl Default for WeekendThresholds {
    fn default() -> Self {
        Self {
            min_entries: 14,
            min_weekday_entries: 5,
            min_weekend_entries: 2,
            min_difference: 0.5,
            normalizer: 1.5,
        }
    }
}

/// Gate for the emotion and context tag detectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagThresholds {
    /// Minimum entries carrying a tag for it to take part
    pub min_group_size: usize,
    /// Minimum number of qualifying tags
    pub min_tags: usize,
    pub normalizer: f64,
}

impl Default for TagThresholds {
    fn default() -> Self {
        Self {
            min_group_size: 3,
            min_tags: 2,
            normalizer: 2.0,
        }
    }
}

/// Thresholds for pattern detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
    /// Below this many entries no detector runs (default: 7)
    pub min_total_entries: usize,
    /// Patterns under this confidence are dropped (default: 0.3)
    pub min_confidence: f64,
    /// Number of patterns kept after ranking (default: 3)
    pub max_patterns: usize,
    pub time_of_day: GroupThresholds,
    #[serde(deserialize_with = "day_of_week_thresholds")]
    pub day_of_week: GroupThresholds,
    pub weekend: WeekendThresholds,
    pub emotion: TagThresholds,
    pub context: TagThresholds,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_total_entries: 7,
            min_confidence: 0.3,
            max_patterns: 3,
            time_of_day: GroupThresholds::time_of_day(),
            day_of_week: GroupThresholds::day_of_week(),
            weekend: WeekendThresholds::default(),
            emotion: TagThresholds::default(),
            context: TagThresholds::default(),
        }
    }
}
