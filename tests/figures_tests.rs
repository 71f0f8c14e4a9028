use approx::assert_relative_eq;
use chrono::NaiveDate;

use obsplot::processing::align::align_pair;
use obsplot::processing::binning::{density_histogram, value_bin_edges};
use obsplot::state::figure::PlotItem;
use obsplot::{
    comparison_figure, comparison_grid, overview_strip, ComparisonGridOptions, ComparisonOptions,
    FigureError, NamedSeries, OverviewStripOptions, Statistic, Window,
};

fn daily(name: &str, start_day: u32, values: &[f64]) -> NamedSeries<NaiveDate> {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let date = NaiveDate::from_ymd_opt(2024, 1, start_day + i as u32).unwrap();
            (date, *v)
        })
        .collect();
    NamedSeries::new(name, points)
}

#[test]
fn identical_series_compare_perfectly() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let obs = daily("obs", 1, &values);
    let pred = daily("pred", 1, &values);
    let out = comparison_figure(&obs, &pred, &ComparisonOptions::default());
    let m = &out.metrics[0];
    assert_relative_eq!(m.correlation, 1.0, epsilon = 1e-12);
    assert_relative_eq!(m.r2, 1.0);
    assert_relative_eq!(m.fit.slope, 1.0, epsilon = 1e-12);
    assert_relative_eq!(m.fit.intercept, 0.0, epsilon = 1e-12);
    assert_relative_eq!(m.nbias, 0.0);
}

#[test]
fn constant_observed_gives_nan_normalized_metrics() {
    let obs = daily("obs", 1, &[1.0; 4]);
    let pred = daily("pred", 1, &[2.0; 4]);
    let out = comparison_figure(&obs, &pred, &ComparisonOptions::default());
    assert!(out.metrics[0].nrmse.is_nan());
    assert!(out.metrics[0].nbias.is_nan());
    assert_relative_eq!(out.metrics[0].rmse, 1.0);
    assert_eq!(out.figure.panels.len(), 4);
}

#[test]
fn partial_overlap_is_aligned_before_statistics() {
    let obs = daily("obs", 1, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let pred = daily("pred", 3, &[3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    let (a, b) = align_pair(&obs, &pred);
    assert_eq!(a.len(), 4);
    assert!(a.index().eq(b.index()));

    let out = comparison_figure(&obs, &pred, &ComparisonOptions::default());
    assert_eq!(out.metrics[0].n, 4);
    assert_relative_eq!(out.stats.value("observed", Statistic::Mean).unwrap(), 4.5);
    assert_relative_eq!(out.metrics[0].bias, 0.0);
}

#[test]
fn disjoint_series_still_build() {
    let obs = daily("obs", 1, &[1.0, 2.0]);
    let pred = daily("pred", 10, &[1.0, 2.0]);
    let out = comparison_figure(&obs, &pred, &ComparisonOptions::default());
    assert_eq!(out.metrics[0].n, 0);
    assert!(out.stats.value("observed", Statistic::Mean).unwrap().is_nan());
}

#[test]
fn mismatched_lists_fail_before_computing() {
    let obs: Vec<_> = (0..3).map(|i| daily("o", 1, &[i as f64])).collect();
    let pred: Vec<_> = (0..2).map(|i| daily("p", 1, &[i as f64])).collect();
    let err = comparison_grid(&obs, &pred, &ComparisonGridOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "list length mismatch between observed (3) and predicted (2)"
    );

    let none: Vec<NamedSeries<NaiveDate>> = Vec::new();
    assert!(matches!(
        comparison_grid(&none, &none, &ComparisonGridOptions::default()),
        Err(FigureError::EmptyInput(_))
    ));
}

#[test]
fn grid_stats_export_to_csv() {
    let obs: Vec<_> = (0..3).map(|i| daily("o", 1, &[1.0 + i as f64, 3.0, 2.0, 5.0])).collect();
    let pred: Vec<_> = (0..3).map(|_| daily("p", 1, &[1.5, 2.5, 2.5, 4.0])).collect();
    let opts = ComparisonGridOptions {
        row_titles: vec!["a".into(), "b".into(), "c".into()],
        ..Default::default()
    };
    let out = comparison_grid(&obs, &pred, &opts).unwrap();
    let df = out.stats.to_dataframe().unwrap();
    assert_eq!(df.shape(), (6, 7));

    let mut buf = Vec::new();
    out.stats.write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("statistic,observed.a,predicted.a,observed.b"));
}

#[test]
fn grid_with_default_options_exports() {
    let obs: Vec<_> = (0..2).map(|i| daily("o", 1, &[1.0 + i as f64, 3.0, 2.0, 5.0])).collect();
    let pred: Vec<_> = (0..2).map(|_| daily("p", 1, &[1.5, 2.5, 2.5, 4.0])).collect();
    let out = comparison_grid(&obs, &pred, &ComparisonGridOptions::default()).unwrap();
    assert_eq!(out.stats.to_dataframe().unwrap().shape(), (6, 5));

    let mut buf = Vec::new();
    out.stats.write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("statistic,observed.1,predicted.1,observed.2,predicted.2"));
}

#[test]
fn value_bins_stay_bounded_far_from_zero() {
    let values: Vec<f64> = (0..50).map(|i| 1.0e6 + i as f64 / 49.0).collect();
    let edges = value_bin_edges(1.0e6, 1.0e6 + 1.0, 30);
    assert!(edges.len() <= 34);
    let heights = density_histogram(&values, &edges);
    let area: f64 = heights.iter().zip(edges.windows(2)).map(|(h, w)| h * (w[1] - w[0])).sum();
    assert_relative_eq!(area, 1.0, epsilon = 1e-6);
}

#[test]
fn value_histogram_is_a_density() {
    let values: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() * 10.0 + 20.0).collect();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let edges = value_bin_edges(min, max, 30);
    assert!(edges.windows(2).all(|w| w[0] < w[1]));
    assert!(edges[0] <= min && *edges.last().unwrap() >= max);
    let heights = density_histogram(&values, &edges);
    let area: f64 = heights
        .iter()
        .zip(edges.windows(2))
        .map(|(h, w)| h * (w[1] - w[0]))
        .sum();
    assert_relative_eq!(area, 1.0, epsilon = 1e-9);
}

#[test]
fn strip_zoom_band_matches_window() {
    let series = vec![daily("s", 1, &(0..30).map(|i| i as f64).collect::<Vec<_>>())];
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
    let zoom = Window::new(
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    );
    let opts = OverviewStripOptions {
        detail_windows: vec![zoom.clone()],
        detail_is_zoom: true,
        ..Default::default()
    };
    let fig = overview_strip(&series, &Window::new(start, end), &opts).unwrap();
    let spans: Vec<_> = fig.panels[0].spans().collect();
    assert_eq!(spans.len(), 1);
    assert_eq!((spans[0].0, spans[0].1), zoom.to_axis());
    assert_eq!(fig.panels[1].x_limits, Some(zoom.to_axis()));
    assert!(fig.panels.iter().all(|p| p.x_is_datetime));
}

#[test]
fn figure_serializes_to_json() {
    let obs = daily("obs", 1, &[1.0, 2.0, 3.0]);
    let pred = daily("pred", 1, &[1.5, 2.0, 2.5]);
    let out = comparison_figure(&obs, &pred, &ComparisonOptions::default());
    let json = out.figure.to_json().unwrap();
    let back = obsplot::Figure::from_json(&json).unwrap();
    assert_eq!(back.panels.len(), 4);
    assert!(matches!(back.panels[3].items[0], PlotItem::BoxPlot { .. }));
}

#[test]
fn degenerate_figure_reads_back_from_json() {
    let obs = daily("obs", 1, &[1.0, 2.0]);
    let pred = daily("pred", 10, &[1.0, 2.0]);
    let out = comparison_figure(&obs, &pred, &ComparisonOptions::default());
    let json = out.figure.to_json().unwrap();
    let back = obsplot::Figure::from_json(&json).unwrap();
    match &back.panels[3].items[0] {
        PlotItem::BoxPlot { summary, .. } => assert!(summary.median.is_nan()),
        other => panic!("unexpected item {other:?}"),
    }
}
