//! Observed-vs-predicted comparison figures.
//!
//! Builders in [`figures`] turn named series into declarative [`Figure`]s
//! plus a [`StatsTable`]; [`render::figure_view`] draws a figure with
//! `egui_plot`.

pub mod data;
pub mod demo;
pub mod error;
pub mod figures;
pub mod processing;
pub mod render;
pub mod state;

pub use error::{FigureError, Result};
pub use figures::comparison::{
    comparison_figure, comparison_grid, Comparison, ComparisonGridOptions, ComparisonOptions,
};
pub use figures::table::StatsTable;
pub use figures::timeseries::{
    mixed_grid, overview_detail_grid, overview_strip, MixedGridOptions, OverviewDetailOptions,
    OverviewStripOptions,
};
pub use processing::metrics::ComparisonMetrics;
pub use processing::statistics::{SeriesStats, Statistic};
pub use state::figure::{Color, Figure, Panel, PlotItem};
pub use state::series::{IndexKey, NamedSeries, Window};
pub use state::style::{ComparisonLabels, ComparisonStyle};
