/// Number of equal-width bins spanning the value range.
pub const VALUE_BINS: usize = 30;
/// Number of bins on each side of zero for prediction errors.
pub const ERROR_HALF_BINS: usize = 15;
/// Head room added above the data, as a fraction of the span it covers.
pub const HEADROOM: f64 = 0.1;

/// Evenly spaced values `start, start + step, ...` strictly below `stop`.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(stop > start) {
        return Vec::new();
    }
    let len = ((stop - start) / step).ceil() as usize;
    (0..len).map(|i| start + i as f64 * step).collect()
}

/// Bin edges for a histogram of raw values.
///
/// Edges start at `min` with a width of `(max - min) / bins` and run to
/// `max + 0.1 * (max - min)`, always reaching at least `max`, so the count
/// stays near `bins` wherever the data sits. Constant data
/// gets a single unit-width bin centred on the value. Non-finite bounds
/// produce no edges.
pub fn value_bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max < min || bins == 0 {
        return Vec::new();
    }
    if max == min {
        return vec![min - 0.5, min + 0.5];
    }
    let step = (max - min) / bins as f64;
    let mut edges = arange(min, max + HEADROOM * (max - min), step);
    extend_to(&mut edges, max, step);
    edges
}

/// Bin edges for a histogram of signed errors, symmetric around zero:
/// from `-max_abs_error` up to (excluding) `1.1 * max_abs_error`, with
/// `half_bins` bins per side. A zero error gets the single bin `[-0.5, 0.5]`.
pub fn error_bin_edges(max_abs_error: f64, half_bins: usize) -> Vec<f64> {
    let m = max_abs_error.abs();
    if !m.is_finite() || half_bins == 0 {
        return Vec::new();
    }
    if m == 0.0 {
        return vec![-0.5, 0.5];
    }
    let step = m / half_bins as f64;
    let mut edges = arange(-m, m * (1.0 + HEADROOM), step);
    extend_to(&mut edges, m, step);
    edges
}

fn extend_to(edges: &mut Vec<f64>, bound: f64, step: f64) {
    let Some(&first) = edges.first() else {
        return;
    };
    let mut i = edges.len();
    while edges.last().is_some_and(|&last| last < bound) {
        edges.push(first + i as f64 * step);
        i += 1;
    }
}

/// Histogram heights normalised so the bars integrate to one.
///
/// Bins are half-open `[a, b)` except the last which also includes its
/// right edge. Values outside the edges are ignored. When no value falls
/// inside, every height is zero.
pub fn density_histogram(values: &[f64], edges: &[f64]) -> Vec<f64> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[bins];
    let mut counts = vec![0usize; bins];

    for &v in values {
        if !v.is_finite() || v < first || v > last {
            continue;
        }
        let idx = if v == last {
            bins - 1
        } else {
            edges.partition_point(|&e| e <= v).saturating_sub(1).min(bins - 1)
        };
        counts[idx] += 1;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; bins];
    }
    counts
        .iter()
        .zip(edges.windows(2))
        .map(|(&c, w)| c as f64 / (total as f64 * (w[1] - w[0])))
        .collect()
}
