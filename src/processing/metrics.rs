//! Agreement metrics between an observed series and a prediction of it.
//!
//! Both slices are expected to be aligned (same length, same index order);
//! pairs where either side is non-finite are skipped.

use serde::{Deserialize, Serialize};

/// Ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Degree-1 least squares fit of `y` on `x`.
    ///
    /// Slope and intercept are NaN when fewer than two points remain or `x`
    /// has no variance.
    pub fn fit(x: &[f64], y: &[f64]) -> Self {
        let (xs, ys) = finite_pairs(x, y);
        let n = xs.len();
        if n < 2 {
            return Self::undefined();
        }
        let mx = mean(&xs);
        let my = mean(&ys);
        let sxx: f64 = xs.iter().map(|v| (v - mx).powi(2)).sum();
        if sxx == 0.0 {
            return Self::undefined();
        }
        let sxy: f64 = xs.iter().zip(&ys).map(|(a, b)| (a - mx) * (b - my)).sum();
        let slope = sxy / sxx;
        Self {
            slope,
            intercept: my - slope * mx,
        }
    }

    fn undefined() -> Self {
        Self {
            slope: f64::NAN,
            intercept: f64::NAN,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Statistical comparison metrics between observed and predicted values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Number of finite pairs used.
    pub n: usize,
    /// Pearson correlation coefficient [-1, 1]
    pub correlation: f64,
    /// Coefficient of determination of the predictions against the
    /// observations: 1 - SS_res / SS_tot
    pub r2: f64,
    pub fit: LinearFit,
    /// sqrt(mean((pred - obs)²))
    pub rmse: f64,
    /// mean(pred - obs)
    pub bias: f64,
    /// rmse / range(obs)
    pub nrmse: f64,
    /// bias / range(obs)
    pub nbias: f64,
    /// max(|pred - obs|)
    pub max_abs_error: f64,
}

impl ComparisonMetrics {
    pub fn compute(observed: &[f64], predicted: &[f64]) -> Self {
        let (obs, pred) = finite_pairs(observed, predicted);
        let n = obs.len();
        let fit = LinearFit::fit(&obs, &pred);

        if n == 0 {
            return Self {
                n,
                correlation: f64::NAN,
                r2: f64::NAN,
                fit,
                rmse: f64::NAN,
                bias: f64::NAN,
                nrmse: f64::NAN,
                nbias: f64::NAN,
                max_abs_error: f64::NAN,
            };
        }

        let errors: Vec<f64> = obs.iter().zip(&pred).map(|(o, p)| p - o).collect();
        let bias = mean(&errors);
        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n as f64;
        let rmse = mse.sqrt();
        let max_abs_error = errors.iter().map(|e| e.abs()).fold(0.0, f64::max);

        let obs_min = obs.iter().copied().fold(f64::INFINITY, f64::min);
        let obs_max = obs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = obs_max - obs_min;

        Self {
            n,
            correlation: pearson(&obs, &pred),
            r2: r2_score(&obs, &pred),
            fit,
            rmse,
            bias,
            nrmse: normalized(rmse, range),
            nbias: normalized(bias, range),
            max_abs_error,
        }
    }
}

/// `value / range`, NaN when the range is zero or not finite.
pub fn normalized(value: f64, range: f64) -> f64 {
    if range == 0.0 || !range.is_finite() {
        f64::NAN
    } else {
        value / range
    }
}

/// Pearson product-moment correlation. NaN when either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (xs, ys) = finite_pairs(x, y);
    if xs.len() < 2 {
        return f64::NAN;
    }
    let mx = mean(&xs);
    let my = mean(&ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in xs.iter().zip(&ys) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Coefficient of determination of `y_pred` against `y_true`.
///
/// A constant `y_true` gives 1.0 for a perfect prediction and 0.0
/// otherwise; an empty input gives NaN.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let (t, p) = finite_pairs(y_true, y_pred);
    if t.is_empty() {
        return f64::NAN;
    }
    let mt = mean(&t);
    let ss_res: f64 = t.iter().zip(&p).map(|(a, b)| (a - b).powi(2)).sum();
    let ss_tot: f64 = t.iter().map(|a| (a - mt).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

fn finite_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identical_series() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = ComparisonMetrics::compute(&v, &v);
        assert_relative_eq!(m.correlation, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.r2, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.fit.slope, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.fit.intercept, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m.nbias, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m.nrmse, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_range_observed_gives_nan_normalized_metrics() {
        let m = ComparisonMetrics::compute(&[1.0; 4], &[2.0; 4]);
        assert!(m.nrmse.is_nan());
        assert!(m.nbias.is_nan());
        assert_relative_eq!(m.bias, 1.0);
        assert_relative_eq!(m.rmse, 1.0);
        assert_eq!(m.r2, 0.0);
        assert!(m.correlation.is_nan());
        assert!(m.fit.slope.is_nan());
    }

    #[test]
    fn offset_prediction() {
        let obs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let pred = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = ComparisonMetrics::compute(&obs, &pred);
        assert_relative_eq!(m.bias, 1.0);
        assert_relative_eq!(m.nbias, 0.25);
        assert_relative_eq!(m.nrmse, 0.25);
        assert_relative_eq!(m.fit.intercept, 1.0, epsilon = 1e-12);
        // SS_res = 5, SS_tot = 10
        assert_relative_eq!(m.r2, 0.5, epsilon = 1e-12);
        assert_relative_eq!(m.max_abs_error, 1.0);
    }

    #[test]
    fn fit_passes_through_means() {
        let obs = [1.0, 3.0, 4.0, 7.0, 9.5, 11.0];
        let pred = [2.1, 2.9, 5.2, 6.4, 10.8, 10.1];
        let fit = LinearFit::fit(&obs, &pred);
        let mx = obs.iter().sum::<f64>() / obs.len() as f64;
        let my = pred.iter().sum::<f64>() / pred.len() as f64;
        assert_relative_eq!(fit.predict(mx), my, epsilon = 1e-10);
    }

    #[test]
    fn empty_pair_is_undefined() {
        let m = ComparisonMetrics::compute(&[], &[]);
        assert_eq!(m.n, 0);
        assert!(m.r2.is_nan());
        assert!(m.nrmse.is_nan());
        assert!(m.correlation.is_nan());
    }

    #[test]
    fn non_finite_pairs_are_skipped() {
        let m = ComparisonMetrics::compute(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(m.n, 2);
        assert_relative_eq!(m.r2, 1.0);
    }

    #[test]
    fn normalization_guard() {
        assert!(normalized(1.0, 0.0).is_nan());
        assert!(normalized(1.0, f64::NAN).is_nan());
        assert_relative_eq!(normalized(1.0, 4.0), 0.25);
    }
}
