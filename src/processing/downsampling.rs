/// Line series longer than this are reduced before drawing.
pub const MAX_LINE_POINTS: usize = 2_000;

/// Largest-Triangle-Three-Buckets (LTTB) downsampling of `[x, y]` points.
/// The first and last points are always kept.
pub fn lttb(points: &[[f64; 2]], target: usize) -> Vec<[f64; 2]> {
    let n = points.len();
    if n <= target || target < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(target);
    out.push(points[0]);

    let bucket_size = (n - 2) as f64 / (target - 2) as f64;
    let mut prev = points[0];

    for i in 0..(target - 2) {
        let bucket_start = (i as f64 * bucket_size) as usize + 1;
        let bucket_end = (((i + 1) as f64 * bucket_size) as usize + 1).min(n - 1);

        // Average of the next bucket is the third triangle vertex
        let next_end = (((i + 2) as f64 * bucket_size) as usize + 1).min(n);
        let next = &points[bucket_end..next_end.max(bucket_end + 1)];
        let count = next.len() as f64;
        let avg_x = next.iter().map(|p| p[0]).sum::<f64>() / count;
        let avg_y = next.iter().map(|p| p[1]).sum::<f64>() / count;

        let mut max_area = -1.0f64;
        let mut best = points[bucket_start];
        for p in &points[bucket_start..bucket_end.max(bucket_start + 1)] {
            // Doubled area, only compared
            let area = ((prev[0] - avg_x) * (p[1] - prev[1]) - (prev[0] - p[0]) * (avg_y - prev[1])).abs();
            if area > max_area {
                max_area = area;
                best = *p;
            }
        }

        out.push(best);
        prev = best;
    }

    out.push(points[n - 1]);
    out
}

/// Points of a line inside `[view_min, view_max]`, reduced with LTTB when
/// there are more than `max_points`.
///
/// For x-sorted input one extra point is kept on each side of the window so
/// the line runs to the panel edge.
pub fn downsample_for_view(
    points: &[[f64; 2]],
    view_min: f64,
    view_max: f64,
    max_points: usize,
) -> Vec<[f64; 2]> {
    if points.is_empty() {
        return Vec::new();
    }

    let is_sorted = points.windows(2).all(|w| w[0][0] <= w[1][0]);
    let visible: Vec<[f64; 2]> = if is_sorted {
        let start = points.partition_point(|p| p[0] < view_min).saturating_sub(1);
        let end = (points.partition_point(|p| p[0] <= view_max) + 1).min(points.len());
        points[start..end.max(start)].to_vec()
    } else {
        points
            .iter()
            .filter(|p| p[0] >= view_min && p[0] <= view_max)
            .copied()
            .collect()
    };

    lttb(&visible, max_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [i as f64, (i as f64 * 0.1).sin()]).collect()
    }

    #[test]
    fn short_input_is_unchanged() {
        let pts = wave(10);
        assert_eq!(lttb(&pts, 100), pts);
    }

    #[test]
    fn keeps_endpoints_and_target_size() {
        let pts = wave(10_000);
        let out = lttb(&pts, 500);
        assert_eq!(out.len(), 500);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[499], pts[9_999]);
        assert!(out.windows(2).all(|w| w[0][0] < w[1][0]));
    }

    #[test]
    fn view_window_includes_neighbours() {
        let pts = wave(100);
        let out = downsample_for_view(&pts, 10.5, 20.5, MAX_LINE_POINTS);
        assert_eq!(out.first().map(|p| p[0]), Some(10.0));
        assert_eq!(out.last().map(|p| p[0]), Some(21.0));
    }
}
