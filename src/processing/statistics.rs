use serde::{Deserialize, Serialize};

/// The per-series statistics reported in a statistics table, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Mean,
    Range,
    Std,
    Iqr,
    Skew,
    Kurtosis,
}

impl Statistic {
    pub const ALL: [Statistic; 6] = [
        Statistic::Mean,
        Statistic::Range,
        Statistic::Std,
        Statistic::Iqr,
        Statistic::Skew,
        Statistic::Kurtosis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Range => "range",
            Statistic::Std => "std",
            Statistic::Iqr => "iqr",
            Statistic::Skew => "skew",
            Statistic::Kurtosis => "kurtosis",
        }
    }
}

/// Descriptive statistics for a data series.
///
/// Non-finite values are dropped before computing. Fields that need more
/// observations than are available are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// max - min
    pub range: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// q3 - q1
    pub iqr: f64,
    /// Adjusted Fisher-Pearson skewness (G1).
    pub skewness: f64,
    /// Bias-corrected excess kurtosis (G2).
    pub kurtosis: f64,
}

impl SeriesStats {
    pub fn compute(values: &[f64]) -> Self {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return Self::undefined();
        }
        vals.sort_by(|a, b| a.total_cmp(b));

        let count = vals.len();
        let min = vals[0];
        let max = vals[count - 1];
        let mean = vals.iter().sum::<f64>() / count as f64;
        let q1 = quantile_sorted(&vals, 0.25);
        let median = quantile_sorted(&vals, 0.5);
        let q3 = quantile_sorted(&vals, 0.75);

        Self {
            count,
            min,
            max,
            mean,
            range: max - min,
            std_dev: sample_std(&vals, mean),
            q1,
            median,
            q3,
            iqr: q3 - q1,
            skewness: skewness(&vals, mean),
            kurtosis: kurtosis(&vals, mean),
        }
    }

    fn undefined() -> Self {
        Self {
            count: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            range: f64::NAN,
            std_dev: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            iqr: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
        }
    }

    pub fn get(&self, stat: Statistic) -> f64 {
        match stat {
            Statistic::Mean => self.mean,
            Statistic::Range => self.range,
            Statistic::Std => self.std_dev,
            Statistic::Iqr => self.iqr,
            Statistic::Skew => self.skewness,
            Statistic::Kurtosis => self.kurtosis,
        }
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        let mut out = format!("{label}:\n  Count: {}\n", self.count);
        for stat in Statistic::ALL {
            out.push_str(&format!("  {}: {:.3}\n", stat.label(), self.get(stat)));
        }
        out
    }
}

/// Quantile with linear interpolation between order statistics.
/// NaN for an empty slice. `values` need not be sorted.
pub fn quantile(values: &[f64], p: f64) -> f64 {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    vals.sort_by(|a, b| a.total_cmp(b));
    quantile_sorted(&vals, p)
}

fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

fn sample_std(vals: &[f64], mean: f64) -> f64 {
    let n = vals.len();
    if n < 2 {
        return f64::NAN;
    }
    let ss: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

fn skewness(vals: &[f64], mean: f64) -> f64 {
    let n = vals.len() as f64;
    if vals.len() < 3 {
        return f64::NAN;
    }
    let m2 = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let m3 = vals.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n;
    if m2 == 0.0 {
        return 0.0;
    }
    (n * (n - 1.0)).sqrt() / (n - 2.0) * m3 / m2.powf(1.5)
}

fn kurtosis(vals: &[f64], mean: f64) -> f64 {
    let n = vals.len() as f64;
    if vals.len() < 4 {
        return f64::NAN;
    }
    let s2: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
    let s4: f64 = vals.iter().map(|v| (v - mean).powi(4)).sum();
    if s2 == 0.0 {
        return 0.0;
    }
    let numerator = (n + 1.0) * n * (n - 1.0) * s4;
    let denominator = (n - 2.0) * (n - 3.0) * s2 * s2;
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    numerator / denominator - adjustment
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basic_moments() {
        let s = SeriesStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.count, 8);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.range, 7.0);
        // population sd is 2, sample sd is sqrt(32/7)
        assert_relative_eq!(s.std_dev, (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.median, 4.5);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let vals = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&vals, 0.25), 1.75);
        assert_relative_eq!(quantile(&vals, 0.75), 3.25);
        let s = SeriesStats::compute(&vals);
        assert_relative_eq!(s.iqr, 1.5);
        assert!(s.iqr >= 0.0);
    }

    #[test]
    fn skew_and_kurtosis_match_bias_corrected_estimators() {
        let s = SeriesStats::compute(&[1.0, 2.0, 3.0, 4.0, 10.0]);
        assert_relative_eq!(s.skewness, 1.697056274847714, epsilon = 1e-9);
        assert_relative_eq!(s.kurtosis, 3.152, epsilon = 1e-9);
    }

    #[test]
    fn symmetric_data_has_zero_skew() {
        let s = SeriesStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_relative_eq!(s.skewness, 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.kurtosis, -1.2, epsilon = 1e-12);
    }

    #[test]
    fn constant_series() {
        let s = SeriesStats::compute(&[3.0; 5]);
        assert_eq!(s.range, 0.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.iqr, 0.0);
        assert_eq!(s.skewness, 0.0);
        assert_eq!(s.kurtosis, 0.0);
    }

    #[test]
    fn short_and_empty_inputs() {
        let one = SeriesStats::compute(&[1.0]);
        assert_eq!(one.range, 0.0);
        assert!(one.std_dev.is_nan());
        assert!(one.skewness.is_nan());

        let empty = SeriesStats::compute(&[f64::NAN]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
        assert!(empty.iqr.is_nan());
    }

    #[test]
    fn report_lists_every_statistic() {
        let text = SeriesStats::compute(&[1.0, 2.0, 3.0]).report("observed");
        for stat in Statistic::ALL {
            assert!(text.contains(stat.label()));
        }
    }
}
