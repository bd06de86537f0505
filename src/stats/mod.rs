//! Statistics module
//!
//! Distribution summaries shared by the trend, correlation and pattern
//! modules.

pub mod distribution;

pub use distribution::{mean, quartiles, summarize, BoxSummary, Quartiles};
