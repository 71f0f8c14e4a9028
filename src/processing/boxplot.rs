use serde::{Deserialize, Serialize};

use crate::processing::statistics::SeriesStats;

/// Whisker reach as a multiple of the IQR beyond the quartiles.
pub const WHISKER_REACH: f64 = 1.5;

/// Five-number summary plus outliers for one box of a box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    #[serde(deserialize_with = "crate::state::figure::f64_or_nan")]
    pub lower_whisker: f64,
    #[serde(deserialize_with = "crate::state::figure::f64_or_nan")]
    pub q1: f64,
    #[serde(deserialize_with = "crate::state::figure::f64_or_nan")]
    pub median: f64,
    #[serde(deserialize_with = "crate::state::figure::f64_or_nan")]
    pub q3: f64,
    #[serde(deserialize_with = "crate::state::figure::f64_or_nan")]
    pub upper_whisker: f64,
    #[serde(deserialize_with = "crate::state::figure::f64_or_nan")]
    pub mean: f64,
    /// Values beyond the whiskers, in input order.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Whiskers end at the most extreme data points still within
    /// `WHISKER_REACH * IQR` of the quartiles; everything beyond is an
    /// outlier. Empty input yields NaN quartiles and no outliers.
    pub fn compute(values: &[f64]) -> Self {
        let stats = SeriesStats::compute(values);
        let finite = || values.iter().copied().filter(|v| v.is_finite());

        let low_fence = stats.q1 - WHISKER_REACH * stats.iqr;
        let high_fence = stats.q3 + WHISKER_REACH * stats.iqr;

        let lower_whisker = finite()
            .filter(|&v| v >= low_fence)
            .fold(f64::NAN, f64::min);
        let upper_whisker = finite()
            .filter(|&v| v <= high_fence)
            .fold(f64::NAN, f64::max);
        let outliers = finite()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Self {
            lower_whisker,
            q1: stats.q1,
            median: stats.median,
            q3: stats.q3,
            upper_whisker,
            mean: stats.mean,
            outliers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlier_beyond_upper_fence() {
        let b = BoxSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        // q1 = 2.25, q3 = 4.75, iqr = 2.5, high fence = 8.5
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn whiskers_stay_inside_fences() {
        let vals = [-40.0, 3.0, 4.0, 4.5, 5.0, 5.5, 6.0, 7.0, 30.0];
        let b = BoxSummary::compute(&vals);
        let iqr = b.q3 - b.q1;
        assert!(b.lower_whisker >= b.q1 - WHISKER_REACH * iqr);
        assert!(b.upper_whisker <= b.q3 + WHISKER_REACH * iqr);
        assert_eq!(b.outliers.len(), 2);
    }

    #[test]
    fn empty_box() {
        let b = BoxSummary::compute(&[]);
        assert!(b.median.is_nan());
        assert!(b.lower_whisker.is_nan());
        assert!(b.outliers.is_empty());
    }
}
