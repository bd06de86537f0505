//! Data models module
//!
//! Contains the mood entry type consumed by every analytics module.

pub mod entry;

pub use entry::{
    is_supported_year, supported_datetime, MoodEntry, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR,
    MOOD_MAX, MOOD_MIDPOINT, MOOD_MIN,
};
