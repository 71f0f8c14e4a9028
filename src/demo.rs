//! Deterministic synthetic series and the figures the viewer shows.

use chrono::{Days, NaiveDate};

use crate::error::Result;
use crate::figures::comparison::{
    comparison_figure, comparison_grid, ComparisonGridOptions, ComparisonOptions,
};
use crate::figures::table::StatsTable;
use crate::figures::timeseries::{
    mixed_grid, overview_detail_grid, overview_strip, MixedGridOptions, OverviewDetailOptions,
    OverviewStripOptions,
};
use crate::state::figure::Figure;
use crate::state::series::{NamedSeries, Window};
use crate::state::style::{ComparisonLabels, ComparisonStyle};

/// Days between 1970-01-01 and 2020-01-01.
const START_DAY: u64 = 18_262;
const DAYS: u64 = 730;

/// A figure ready for display, with its statistics when it has any.
#[derive(Debug, Clone)]
pub struct DemoFigure {
    pub name: &'static str,
    pub figure: Figure,
    pub stats: Option<StatsTable>,
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::default() + Days::new(START_DAY + offset)
}

/// Repeatable noise in `[-1, 1]` (splitmix64 finaliser).
fn jitter(i: u64, seed: u64) -> f64 {
    let mut z = i.wrapping_add(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z as f64 / u64::MAX as f64) * 2.0 - 1.0
}

/// Seasonal daily flow of one station.
pub fn observed_flow(station: u64) -> NamedSeries<NaiveDate> {
    let base = 20.0 + 10.0 * station as f64;
    let points = (0..DAYS)
        .map(|i| {
            let t = i as f64 / 365.0 * std::f64::consts::TAU;
            let v = base + 0.4 * base * t.sin() + 0.15 * base * jitter(i, station);
            (day(i), v.max(0.0))
        })
        .collect();
    NamedSeries::new(format!("observed {}", station + 1), points)
}

/// Biased, noisier prediction for a station. Starts two weeks late so the
/// pair needs aligning.
pub fn predicted_flow(station: u64) -> NamedSeries<NaiveDate> {
    let observed = observed_flow(station);
    let points = observed
        .points
        .iter()
        .enumerate()
        .skip(14)
        .map(|(i, (key, v))| {
            let scale = 0.9 + 0.05 * station as f64;
            (*key, (scale * v + 2.0 + 3.0 * jitter(i as u64, station + 100)).max(0.0))
        })
        .collect();
    NamedSeries::new(format!("predicted {}", station + 1), points)
}

fn window(from: u64, to: u64) -> Window<NaiveDate> {
    Window::new(day(from), day(to))
}

/// One figure per builder.
pub fn build_demos() -> Result<Vec<DemoFigure>> {
    let observed: Vec<_> = (0..3).map(observed_flow).collect();
    let predicted: Vec<_> = (0..3).map(predicted_flow).collect();
    let full = window(0, DAYS - 1);

    let single = comparison_figure(
        &observed[0],
        &predicted[0],
        &ComparisonOptions {
            title: "Station 1: observed vs predicted flow".into(),
            value_label: "flow m3/s".into(),
            ..Default::default()
        },
    );

    let grid = comparison_grid(
        &observed,
        &predicted,
        &ComparisonGridOptions {
            title: "Vazão observada vs prevista".into(),
            value_labels: vec!["vazão m3".into()],
            row_titles: vec!["posto 1".into(), "posto 2".into(), "posto 3".into()],
            style: ComparisonStyle::muted(),
            labels: ComparisonLabels::portuguese(),
            ..Default::default()
        },
    )?;

    let detail = overview_detail_grid(
        &[observed[0].clone(), predicted[0].clone()],
        &[observed[1].clone(), predicted[1].clone()],
        &full,
        &OverviewDetailOptions {
            title: "Two stations, spring detail".into(),
            panel_titles: vec!["station 1".into(), "station 2".into()],
            y_label_a: "flow m3/s".into(),
            detail_window: Some(window(60, 150)),
            detail_is_zoom: true,
            ..Default::default()
        },
    );

    let strip = overview_strip(
        &observed,
        &full,
        &OverviewStripOptions {
            title: "Observed flow by quarter".into(),
            panel_titles: vec!["all stations".into()],
            y_label: "flow m3/s".into(),
            detail_windows: vec![window(0, 90), window(180, 270), window(400, 490)],
            detail_is_zoom: true,
            ..Default::default()
        },
    )?;

    let mixed = mixed_grid(
        &[observed[0].clone(), predicted[0].clone()],
        &[observed[2].clone(), predicted[2].clone()],
        &full,
        &MixedGridOptions {
            title: "Stations 1 and 3".into(),
            panel_titles: vec!["station 1".into(), "station 3".into()],
            y_label_a: "flow m3/s".into(),
            detail_windows: vec![
                window(0, 60),
                window(120, 180),
                window(300, 360),
                window(500, 560),
            ],
            ..Default::default()
        },
    );

    Ok(vec![
        DemoFigure {
            name: "Comparison 1×4",
            figure: single.figure,
            stats: Some(single.stats),
        },
        DemoFigure {
            name: "Comparison grid 3×4",
            figure: grid.figure,
            stats: Some(grid.stats),
        },
        DemoFigure {
            name: "Overview/detail 2×2",
            figure: detail,
            stats: None,
        },
        DemoFigure {
            name: "Overview strip 2×N",
            figure: strip,
            stats: None,
        },
        DemoFigure {
            name: "Mixed grid 3×4",
            figure: mixed,
            stats: None,
        },
    ])
}
