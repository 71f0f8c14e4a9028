//! Overview/detail time-series figures.
//!
//! Every layout plots whole series and narrows the x axis per panel. Detail
//! panels that zoom into an overview are cross-referenced by a shaded band
//! on the overview and a border of the same colour.

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};
use crate::figures::pad_labels;
use crate::state::figure::{color_for_index, Color, Figure, LineStyle, Panel, PlotItem};
use crate::state::grid::{CellSpan, GridSpec};
use crate::state::series::{IndexKey, NamedSeries, Window};
use crate::state::style::{emphasis_color, EMPHASIS_ALPHA};

const SERIES_LINE_WIDTH: f32 = 1.5;

/// Options of the 2×2 overview/detail figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewDetailOptions<K> {
    pub title: String,
    /// Panel titles in row-major order.
    pub panel_titles: Vec<String>,
    pub y_label_a: String,
    /// Defaults to `y_label_a`.
    pub y_label_b: Option<String>,
    pub y_limits_a: Option<(f64, f64)>,
    pub y_limits_b: Option<(f64, f64)>,
    /// X window of the bottom row; the overview window when `None`.
    pub detail_window: Option<Window<K>>,
    /// Mark the detail window on the overview panels.
    pub detail_is_zoom: bool,
    pub size: (f32, f32),
    pub height_ratios: Vec<f64>,
}

impl<K> Default for OverviewDetailOptions<K> {
    fn default() -> Self {
        Self {
            title: String::new(),
            panel_titles: Vec::new(),
            y_label_a: String::new(),
            y_label_b: None,
            y_limits_a: None,
            y_limits_b: None,
            detail_window: None,
            detail_is_zoom: false,
            size: (10.0, 5.0),
            height_ratios: vec![1.5, 1.0],
        }
    }
}

/// Options of the 2×N overview strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStripOptions<K> {
    pub title: String,
    /// Overview title first, then one per detail panel.
    pub panel_titles: Vec<String>,
    pub y_label: String,
    pub y_limits: Option<(f64, f64)>,
    /// X window per detail panel; missing entries use the overview window.
    pub detail_windows: Vec<Window<K>>,
    pub detail_is_zoom: bool,
    pub size: (f32, f32),
    pub height_ratios: Vec<f64>,
}

impl<K> Default for OverviewStripOptions<K> {
    fn default() -> Self {
        Self {
            title: String::new(),
            panel_titles: Vec::new(),
            y_label: String::new(),
            y_limits: None,
            detail_windows: Vec::new(),
            detail_is_zoom: false,
            size: (10.0, 5.0),
            height_ratios: vec![1.0, 1.5],
        }
    }
}

/// Options of the ten-panel mixed grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedGridOptions<K> {
    pub title: String,
    /// Titles in panel order (see [`MIXED_LAYOUT`]).
    pub panel_titles: Vec<String>,
    pub y_label_a: String,
    pub y_label_b: Option<String>,
    pub y_limits_a: Option<(f64, f64)>,
    pub y_limits_b: Option<(f64, f64)>,
    /// Windows of detail slots 0..4, shared by both groups.
    ///
    /// Empty: every slot shows the overview window. Two entries: slots 0
    /// and 1 use them, slots 2 and 3 the overview window, nothing is
    /// highlighted. Otherwise the list is padded to four with the overview
    /// window and supplied slots from 2 on are highlighted.
    pub detail_windows: Vec<Window<K>>,
    pub size: (f32, f32),
    pub height_ratios: Vec<f64>,
}

impl<K> Default for MixedGridOptions<K> {
    fn default() -> Self {
        Self {
            title: String::new(),
            panel_titles: Vec::new(),
            y_label_a: String::new(),
            y_label_b: None,
            y_limits_a: None,
            y_limits_b: None,
            detail_windows: Vec::new(),
            size: (10.0, 7.0),
            height_ratios: vec![1.0, 1.5, 1.5],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Overview,
    Detail(usize),
}

/// Group, role and cell of every mixed-grid panel, in panel order.
pub const MIXED_LAYOUT: [(Group, Role, CellSpan); 10] = [
    (Group::A, Role::Overview, CellSpan::columns(0, 0, 2)),
    (Group::B, Role::Overview, CellSpan::columns(0, 2, 2)),
    (Group::A, Role::Detail(0), CellSpan::single(1, 0)),
    (Group::A, Role::Detail(1), CellSpan::single(1, 1)),
    (Group::B, Role::Detail(0), CellSpan::single(1, 2)),
    (Group::B, Role::Detail(1), CellSpan::single(1, 3)),
    (Group::A, Role::Detail(2), CellSpan::single(2, 0)),
    (Group::A, Role::Detail(3), CellSpan::single(2, 1)),
    (Group::B, Role::Detail(2), CellSpan::single(2, 2)),
    (Group::B, Role::Detail(3), CellSpan::single(2, 3)),
];

const MIXED_SLOTS: usize = 4;

/// 2×2 figure: group A in column 0, group B in column 1, the overview
/// window on top and the detail window below.
pub fn overview_detail_grid<K: IndexKey>(
    group_a: &[NamedSeries<K>],
    group_b: &[NamedSeries<K>],
    overview_window: &Window<K>,
    opts: &OverviewDetailOptions<K>,
) -> Figure {
    let grid = GridSpec::new(2, 2).with_height_ratios(&opts.height_ratios);
    let mut figure = Figure::new(opts.title.clone(), opts.size, grid);
    let titles = pad_labels(&opts.panel_titles, 4, false);
    let y_label_b = opts.y_label_b.as_deref().unwrap_or(&opts.y_label_a);
    let detail = opts.detail_window.as_ref().unwrap_or(overview_window);

    for (row, window) in [overview_window, detail].into_iter().enumerate() {
        for (col, group) in [group_a, group_b].into_iter().enumerate() {
            let mut panel = series_panel(CellSpan::single(row, col), group, window);
            panel.title = titles[row * 2 + col].clone();
            if col == 0 {
                panel.y_label = opts.y_label_a.clone();
                panel.y_limits = opts.y_limits_a;
            } else {
                panel.y_label = y_label_b.to_string();
                panel.y_limits = opts.y_limits_b;
            }
            figure.add_panel(panel);
        }
    }

    if let (Some(window), true) = (&opts.detail_window, opts.detail_is_zoom) {
        let bounds = window.to_axis();
        for col in 0..2 {
            highlight_zoom(&mut figure.panels, col, 2 + col, bounds, emphasis_color(0));
        }
    }

    tracing::debug!(panels = figure.panels.len(), zoom = opts.detail_is_zoom, "built overview/detail grid");
    figure
}

/// 2×N figure: one overview spanning the top row and one detail panel per
/// series below, every panel showing all series.
pub fn overview_strip<K: IndexKey>(
    series: &[NamedSeries<K>],
    overview_window: &Window<K>,
    opts: &OverviewStripOptions<K>,
) -> Result<Figure> {
    if series.is_empty() {
        return Err(FigureError::EmptyInput("overview strip series"));
    }
    let n = series.len();
    let grid = GridSpec::new(2, n).with_height_ratios(&opts.height_ratios);
    let mut figure = Figure::new(opts.title.clone(), opts.size, grid);
    let titles = pad_labels(&opts.panel_titles, n + 1, false);

    let mut cells = vec![(CellSpan::columns(0, 0, n), overview_window)];
    for col in 0..n {
        let window = opts.detail_windows.get(col).unwrap_or(overview_window);
        cells.push((CellSpan::single(1, col), window));
    }
    for (i, (cell, window)) in cells.into_iter().enumerate() {
        let mut panel = series_panel(cell, series, window);
        panel.title = titles[i].clone();
        panel.y_label = opts.y_label.clone();
        panel.y_limits = opts.y_limits;
        figure.add_panel(panel);
    }

    if opts.detail_is_zoom {
        for (slot, window) in opts.detail_windows.iter().take(n).enumerate() {
            highlight_zoom(&mut figure.panels, 0, slot + 1, window.to_axis(), emphasis_color(slot));
        }
    }

    tracing::debug!(panels = figure.panels.len(), zoom = opts.detail_is_zoom, "built overview strip");
    Ok(figure)
}

/// Ten panels on a 3×4 grid: an overview per group on top and four detail
/// slots per group below, laid out by [`MIXED_LAYOUT`].
pub fn mixed_grid<K: IndexKey>(
    group_a: &[NamedSeries<K>],
    group_b: &[NamedSeries<K>],
    overview_window: &Window<K>,
    opts: &MixedGridOptions<K>,
) -> Figure {
    let grid = GridSpec::new(3, 4).with_height_ratios(&opts.height_ratios);
    let mut figure = Figure::new(opts.title.clone(), opts.size, grid);
    let titles = pad_labels(&opts.panel_titles, MIXED_LAYOUT.len(), false);
    let y_label_b = opts.y_label_b.as_deref().unwrap_or(&opts.y_label_a);
    let slots = mixed_slots(&opts.detail_windows, overview_window);

    for (i, (group, role, cell)) in MIXED_LAYOUT.iter().enumerate() {
        let window = match role {
            Role::Overview => overview_window,
            Role::Detail(slot) => slots[*slot].0,
        };
        let (series, y_label, y_limits) = match group {
            Group::A => (group_a, opts.y_label_a.as_str(), opts.y_limits_a),
            Group::B => (group_b, y_label_b, opts.y_limits_b),
        };
        let mut panel = series_panel(*cell, series, window);
        panel.title = titles[i].clone();
        panel.y_label = y_label.to_string();
        panel.y_limits = y_limits;
        figure.add_panel(panel);
    }

    for (i, (group, role, _)) in MIXED_LAYOUT.iter().enumerate() {
        let Role::Detail(slot) = *role else { continue };
        let (window, highlighted) = slots[slot];
        if !highlighted {
            continue;
        }
        let overview = match group {
            Group::A => 0,
            Group::B => 1,
        };
        highlight_zoom(&mut figure.panels, overview, i, window.to_axis(), emphasis_color(slot));
    }

    tracing::debug!(panels = figure.panels.len(), windows = opts.detail_windows.len(), "built mixed grid");
    figure
}

/// Window of each mixed-grid detail slot and whether it is highlighted.
fn mixed_slots<'a, K>(
    windows: &'a [Window<K>],
    overview: &'a Window<K>,
) -> [(&'a Window<K>, bool); MIXED_SLOTS] {
    let paired_only = windows.len() == 2;
    std::array::from_fn(|slot| match windows.get(slot) {
        Some(window) => (window, !paired_only && slot >= 2),
        None => (overview, false),
    })
}

/// A panel with one line per series over `window`.
fn series_panel<K: IndexKey>(
    cell: CellSpan,
    series: &[NamedSeries<K>],
    window: &Window<K>,
) -> Panel {
    let mut panel = Panel::new(cell);
    panel.x_limits = Some(window.to_axis());
    panel.x_is_datetime = K::is_datetime();
    for (i, s) in series.iter().enumerate() {
        panel.push(PlotItem::Line {
            label: s.name.clone(),
            points: s.axis_points(),
            color: color_for_index(i),
            width: SERIES_LINE_WIDTH,
            style: LineStyle::Solid,
        });
    }
    panel
}

/// Shade `bounds` on the overview panel and frame the detail panel in the
/// same colour.
fn highlight_zoom(
    panels: &mut [Panel],
    overview: usize,
    detail: usize,
    bounds: (f64, f64),
    color: Color,
) {
    panels[overview].push(PlotItem::VSpan {
        label: String::new(),
        x_min: bounds.0,
        x_max: bounds.1,
        color: color.with_alpha(EMPHASIS_ALPHA),
    });
    panels[detail].border_color = Some(color);
}
