//! Observed-vs-predicted comparison figures.
//!
//! One row of four panels per observed/predicted pair:
//! 1. overlaid density histograms with IQR bands, median and mean lines,
//! 2. scatter of predicted against observed with identity and OLS lines,
//! 3. histogram of the prediction error with the bias line,
//! 4. box plots of both series.

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};
use crate::figures::pad_labels;
use crate::figures::table::StatsTable;
use crate::processing::align::align_pair;
use crate::processing::binning::{
    density_histogram, error_bin_edges, value_bin_edges, ERROR_HALF_BINS, VALUE_BINS,
};
use crate::processing::boxplot::BoxSummary;
use crate::processing::metrics::ComparisonMetrics;
use crate::processing::statistics::SeriesStats;
use crate::state::figure::{Figure, LineStyle, Panel, PlotItem};
use crate::state::grid::{CellSpan, GridSpec};
use crate::state::series::{IndexKey, NamedSeries};
use crate::state::style::{ComparisonLabels, ComparisonStyle};

/// Layout and styling of a single-pair comparison figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOptions {
    /// Figure title.
    pub title: String,
    /// Label of the value axis (distribution x axis, box plot y axis).
    pub value_label: String,
    pub size: (f32, f32),
    pub width_ratios: Vec<f64>,
    pub style: ComparisonStyle,
    pub labels: ComparisonLabels,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            value_label: String::new(),
            size: (14.0, 4.0),
            width_ratios: vec![2.0, 1.5, 1.0, 1.0],
            style: ComparisonStyle::default(),
            labels: ComparisonLabels::default(),
        }
    }
}

/// Layout and styling of a comparison figure with one row per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonGridOptions {
    pub title: String,
    /// Value axis label per row. A single entry is used for every row,
    /// otherwise missing entries are empty.
    pub value_labels: Vec<String>,
    /// Title per row, appended to the panel titles and used as suffix of
    /// the statistics table columns. Padded like `value_labels`.
    pub row_titles: Vec<String>,
    pub size: (f32, f32),
    pub width_ratios: Vec<f64>,
    pub height_ratios: Vec<f64>,
    pub style: ComparisonStyle,
    pub labels: ComparisonLabels,
}

impl Default for ComparisonGridOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            value_labels: Vec::new(),
            row_titles: Vec::new(),
            size: (14.0, 12.0),
            width_ratios: vec![2.0, 1.5, 1.0, 1.0],
            height_ratios: vec![1.0, 1.0, 1.5],
            style: ComparisonStyle::default(),
            labels: ComparisonLabels::default(),
        }
    }
}

/// A built comparison figure with the numbers behind it.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub figure: Figure,
    pub stats: StatsTable,
    /// Agreement metrics, one entry per row.
    pub metrics: Vec<ComparisonMetrics>,
}

/// Everything one comparison row needs, computed up front.
struct PairAnalysis {
    observed: Vec<f64>,
    predicted: Vec<f64>,
    errors: Vec<f64>,
    observed_stats: SeriesStats,
    predicted_stats: SeriesStats,
    metrics: ComparisonMetrics,
    min_value: f64,
    max_value: f64,
    value_edges: Vec<f64>,
    error_edges: Vec<f64>,
}

impl PairAnalysis {
    fn new<K: IndexKey>(observed: &NamedSeries<K>, predicted: &NamedSeries<K>) -> Self {
        // The value range spans both inputs before alignment.
        let min_value = observed.min().min(predicted.min());
        let max_value = observed.max().max(predicted.max());

        let (obs, pred) = align_pair(observed, predicted);
        let observed = obs.values();
        let predicted = pred.values();
        let errors: Vec<f64> = observed.iter().zip(&predicted).map(|(o, p)| p - o).collect();

        let metrics = ComparisonMetrics::compute(&observed, &predicted);
        let value_edges = value_bin_edges(min_value, max_value, VALUE_BINS);
        let error_edges = error_bin_edges(metrics.max_abs_error, ERROR_HALF_BINS);

        tracing::debug!(
            aligned = observed.len(),
            value_bins = value_edges.len().saturating_sub(1),
            error_bins = error_edges.len().saturating_sub(1),
            r2 = metrics.r2,
            "analysed observed/predicted pair"
        );

        Self {
            observed_stats: SeriesStats::compute(&observed),
            predicted_stats: SeriesStats::compute(&predicted),
            observed,
            predicted,
            errors,
            metrics,
            min_value,
            max_value,
            value_edges,
            error_edges,
        }
    }

    fn stats_table(&self, labels: &ComparisonLabels) -> StatsTable {
        let mut table = StatsTable::new();
        table.push(labels.observed.clone(), self.observed_stats);
        table.push(labels.predicted.clone(), self.predicted_stats);
        table
    }
}

/// Text bits of one comparison row.
struct RowText<'a> {
    /// Appended to every panel title, e.g. ` [station A]`.
    title_suffix: String,
    value_label: &'a str,
    box_label: &'a str,
}

/// Build the 1×4 comparison figure for one observed/predicted pair.
pub fn comparison_figure<K: IndexKey>(
    observed: &NamedSeries<K>,
    predicted: &NamedSeries<K>,
    opts: &ComparisonOptions,
) -> Comparison {
    let grid = GridSpec::new(1, 4).with_width_ratios(&opts.width_ratios);
    let mut figure = Figure::new(opts.title.clone(), opts.size, grid);

    let analysis = PairAnalysis::new(observed, predicted);
    let text = RowText {
        title_suffix: String::new(),
        value_label: &opts.value_label,
        box_label: &opts.value_label,
    };
    add_comparison_row(&mut figure, 0, &analysis, &text, &opts.style, &opts.labels);

    Comparison {
        figure,
        stats: analysis.stats_table(&opts.labels),
        metrics: vec![analysis.metrics],
    }
}

/// Build the comparison figure with one 1×4 row per pair.
///
/// Fails before any computation when the two lists differ in length or are
/// empty.
pub fn comparison_grid<K: IndexKey>(
    observed: &[NamedSeries<K>],
    predicted: &[NamedSeries<K>],
    opts: &ComparisonGridOptions,
) -> Result<Comparison> {
    if observed.len() != predicted.len() {
        return Err(FigureError::LengthMismatch {
            left: "observed",
            left_len: observed.len(),
            right: "predicted",
            right_len: predicted.len(),
        });
    }
    if observed.is_empty() {
        return Err(FigureError::EmptyInput("observed/predicted series lists"));
    }

    let rows = observed.len();
    let value_labels = pad_labels(&opts.value_labels, rows, true);
    let row_titles = pad_labels(&opts.row_titles, rows, true);
    // Box plot axis drops the two-character suffix of the first value label.
    let box_label: String = {
        let first = &value_labels[0];
        let keep = first.chars().count().saturating_sub(2);
        first.chars().take(keep).collect()
    };

    let grid = GridSpec::new(rows, 4)
        .with_width_ratios(&opts.width_ratios)
        .with_height_ratios(&opts.height_ratios);
    let mut figure = Figure::new(opts.title.clone(), opts.size, grid);

    let mut tables = Vec::with_capacity(rows);
    let mut metrics = Vec::with_capacity(rows);
    for (row, (obs, pred)) in observed.iter().zip(predicted).enumerate() {
        let analysis = PairAnalysis::new(obs, pred);
        let text = RowText {
            title_suffix: format!(" [{}]", row_titles[row]),
            value_label: &value_labels[row],
            box_label: &box_label,
        };
        add_comparison_row(&mut figure, row, &analysis, &text, &opts.style, &opts.labels);
        tables.push(analysis.stats_table(&opts.labels));
        metrics.push(analysis.metrics);
    }

    tracing::debug!(rows, panels = figure.panels.len(), "built comparison grid");

    Ok(Comparison {
        figure,
        stats: StatsTable::merge_suffixed(tables, &row_titles),
        metrics,
    })
}

fn add_comparison_row(
    figure: &mut Figure,
    row: usize,
    a: &PairAnalysis,
    text: &RowText<'_>,
    style: &ComparisonStyle,
    labels: &ComparisonLabels,
) {
    figure.add_panel(distribution_panel(row, a, text, style, labels));
    figure.add_panel(correlation_panel(row, a, text, style, labels));
    figure.add_panel(error_panel(row, a, text, style, labels));
    figure.add_panel(boxplot_panel(row, a, text, style, labels));
}

fn distribution_panel(
    row: usize,
    a: &PairAnalysis,
    text: &RowText<'_>,
    style: &ComparisonStyle,
    labels: &ComparisonLabels,
) -> Panel {
    let obs_tag = labels.observed_short();
    let pred_tag = labels.predicted_short();
    let (os, ps) = (&a.observed_stats, &a.predicted_stats);

    let mut panel = Panel::new(CellSpan::single(row, 0));
    panel.title = format!(
        "{} {} vs {}{}",
        labels.distribution_title, labels.observed, labels.predicted, text.title_suffix
    );
    panel.x_label = text.value_label.to_string();
    panel.y_label = labels.density.clone();

    panel.push(PlotItem::VSpan {
        label: format!("IQR {obs_tag}"),
        x_min: os.q1,
        x_max: os.q3,
        color: style.iqr.observed,
    });
    panel.push(PlotItem::VSpan {
        label: format!("IQR {pred_tag}"),
        x_min: ps.q1,
        x_max: ps.q3,
        color: style.iqr.predicted,
    });
    for (tag, stats, color) in [
        (&obs_tag, os, style.median.observed),
        (&pred_tag, ps, style.median.predicted),
    ] {
        panel.push(PlotItem::VLine {
            label: format!("{} {tag}={:.2}", labels.median, stats.median),
            x: stats.median,
            color,
            width: 1.0,
            style: LineStyle::Solid,
        });
    }
    for (name, values, color) in [
        (&labels.observed, &a.observed, style.data.observed),
        (&labels.predicted, &a.predicted, style.data.predicted),
    ] {
        panel.push(PlotItem::Histogram {
            label: name.clone(),
            edges: a.value_edges.clone(),
            heights: density_histogram(values, &a.value_edges),
            color: color.with_alpha(style.histogram_alpha),
        });
    }
    for (tag, stats, color) in [
        (&obs_tag, os, style.mean.observed),
        (&pred_tag, ps, style.mean.predicted),
    ] {
        panel.push(PlotItem::VLine {
            label: format!("{} {tag}={:.2}", labels.mean, stats.mean),
            x: stats.mean,
            color,
            width: 1.0,
            style: LineStyle::Dotted,
        });
    }
    panel
}

fn correlation_panel(
    row: usize,
    a: &PairAnalysis,
    text: &RowText<'_>,
    style: &ComparisonStyle,
    labels: &ComparisonLabels,
) -> Panel {
    let m = &a.metrics;
    let mut panel = Panel::new(CellSpan::single(row, 1));
    panel.title = format!("{}{}", labels.correlation_title, text.title_suffix);
    panel.x_label = labels.observed.clone();
    panel.y_label = labels.predicted.clone();

    panel.push(PlotItem::Scatter {
        label: labels.scatter.clone(),
        points: a
            .observed
            .iter()
            .zip(&a.predicted)
            .map(|(o, p)| [*o, *p])
            .collect(),
        color: style.comparison.with_alpha(style.scatter_alpha),
        radius: style.scatter_radius,
    });
    if a.min_value.is_finite() && a.max_value.is_finite() {
        panel.push(PlotItem::Line {
            label: labels.identity.clone(),
            points: vec![[a.min_value, a.min_value], [a.max_value, a.max_value]],
            color: style.identity_line,
            width: 1.0,
            style: LineStyle::Dotted,
        });
    }
    let fit_label = format!("{} R²={:.2}\n[Corr={:.2}]", labels.fit, m.r2, m.correlation);
    if m.fit.slope.is_finite() {
        let (lo, hi) = (a.observed_stats.min, a.observed_stats.max);
        panel.push(PlotItem::Line {
            label: fit_label,
            points: vec![[lo, m.fit.predict(lo)], [hi, m.fit.predict(hi)]],
            color: style.fit_line,
            width: 1.0,
            style: LineStyle::Dashed,
        });
    } else {
        // No line to draw, but the legend still reports the metrics.
        panel.push(PlotItem::Line {
            label: fit_label,
            points: Vec::new(),
            color: style.fit_line,
            width: 1.0,
            style: LineStyle::Dashed,
        });
    }
    panel
}

fn error_panel(
    row: usize,
    a: &PairAnalysis,
    text: &RowText<'_>,
    style: &ComparisonStyle,
    labels: &ComparisonLabels,
) -> Panel {
    let m = &a.metrics;
    let mut panel = Panel::new(CellSpan::single(row, 2));
    panel.title = format!("{}{}", labels.error_title, text.title_suffix);
    panel.x_label = labels.error.clone();
    panel.y_label = labels.density.clone();

    panel.push(PlotItem::Histogram {
        label: labels.prediction_error.clone(),
        edges: a.error_edges.clone(),
        heights: density_histogram(&a.errors, &a.error_edges),
        color: style.comparison.with_alpha(style.error_histogram_alpha),
    });
    panel.push(PlotItem::VLine {
        label: format!(
            "nBIAS={:.2}\n[BIAS={:.2}]\n[nRMSE={:.2}]",
            m.nbias, m.bias, m.nrmse
        ),
        x: m.bias,
        color: style.bias_line,
        width: 1.0,
        style: LineStyle::Dashed,
    });
    panel
}

fn boxplot_panel(
    row: usize,
    a: &PairAnalysis,
    text: &RowText<'_>,
    style: &ComparisonStyle,
    labels: &ComparisonLabels,
) -> Panel {
    let mut panel = Panel::new(CellSpan::single(row, 3));
    panel.title = format!("{}{}", labels.boxplot_title, text.title_suffix);
    panel.y_label = text.box_label.to_string();
    panel.legend = false;
    panel.x_categories = vec![(1.0, labels.observed_short()), (2.0, labels.predicted_short())];

    panel.push(PlotItem::BoxPlot {
        label: labels.observed_short(),
        position: 1.0,
        width: style.box_width,
        summary: BoxSummary::compute(&a.observed),
        style: style.observed_box(),
    });
    panel.push(PlotItem::BoxPlot {
        label: labels.predicted_short(),
        position: 2.0,
        width: style.box_width,
        summary: BoxSummary::compute(&a.predicted),
        style: style.predicted_box(),
    });
    panel
}
