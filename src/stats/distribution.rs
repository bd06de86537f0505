//! Quartile and outlier statistics
//!
//! Box-plot summaries for one bucket of mood values. Quartiles use
//! nearest-rank indexing (`floor(n * p)` into the sorted values), not an
//! interpolated percentile, so the reported quartiles are always values
//! that actually occurred.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the IQR to place the Tukey fences
pub const TUKEY_K: f64 = 1.5;

/// Five-number summary of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: u8,
    pub median: u8,
    pub q3: u8,
    pub min: u8,
    pub max: u8,
}

impl Quartiles {
    /// Interquartile range (q3 - q1)
    pub fn iqr(&self) -> f64 {
        f64::from(self.q3) - f64::from(self.q1)
    }

    pub fn lower_fence(&self) -> f64 {
        f64::from(self.q1) - TUKEY_K * self.iqr()
    }

    pub fn upper_fence(&self) -> f64 {
        f64::from(self.q3) + TUKEY_K * self.iqr()
    }

    /// True if the value lies outside the Tukey fences
    pub fn is_outlier(&self, value: u8) -> bool {
        let v = f64::from(value);
        v < self.lower_fence() || v > self.upper_fence()
    }
}

/// Quartiles plus the values that fall outside the fences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub quartiles: Quartiles,
    /// Outlying values in ascending order
    pub outliers: Vec<u8>,
}

/// Compute nearest-rank quartiles.
///
/// Returns `None` for an empty slice.
pub fn quartiles(values: &[u8]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Some(quartiles_of_sorted(&sorted))
}

fn quartiles_of_sorted(sorted: &[u8]) -> Quartiles {
    let n = sorted.len();
    let rank = |p: f64| sorted[((n as f64) * p).floor() as usize];

    Quartiles {
        q1: rank(0.25),
        median: rank(0.5),
        q3: rank(0.75),
        min: sorted[0],
        max: sorted[n - 1],
    }
}

/// Compute quartiles and Tukey-fence outliers for a bucket.
///
/// Returns `None` for an empty slice.
pub fn summarize(values: &[u8]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let quartiles = quartiles_of_sorted(&sorted);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| quartiles.is_outlier(v))
        .collect();

    Some(BoxSummary { quartiles, outliers })
}

/// Arithmetic mean, or `None` when there is nothing to average
pub fn mean(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    Some(sum / values.len() as f64)
}
