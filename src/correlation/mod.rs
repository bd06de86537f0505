//! Correlation module
//!
//! Relates mood to the context it was logged in:
//! - Emotion tags and context tags
//! - Time of day and day of week
//! - Self-reported energy

pub mod engine;
pub mod types;

pub use engine::{analyze_correlations, partition_entries, time_of_day, weekday_index};
pub use types::{
    CorrelationConfig, CorrelationResult, CorrelationSummary, DimensionType, EnergyLevel,
    Partition, TimeOfDay, WEEKDAY_LABELS,
};
