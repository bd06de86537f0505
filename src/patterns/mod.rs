//! Mood pattern detection module
//!
//! Derives ranked, confidence-scored insights from the mood log:
//! - TimeOfDay: mood differs between parts of the day
//! - DayOfWeek: mood differs between days of the week
//! - WeekendWeekday: weekends versus weekdays
//! - Emotion: emotion tags that go with better or worse mood
//! - Context: context tags that go with better or worse mood

pub mod detector;
pub mod types;

pub use detector::detect_patterns;
pub use types::{DetectionThresholds, Pattern, PatternType};
