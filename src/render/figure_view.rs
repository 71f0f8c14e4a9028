//! Draws a [`Figure`] with `egui_plot`, one plot per panel laid out on the
//! figure's grid.

use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Stroke, UiBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Corner, Legend, Line, Plot, PlotBounds,
    PlotPoints, PlotUi, Points, Polygon, VLine,
};

use crate::data::datetime::{format_axis_tick, format_timestamp};
use crate::processing::boxplot::BoxSummary;
use crate::processing::downsampling::{downsample_for_view, MAX_LINE_POINTS};
use crate::state::figure::{BoxStyle, Figure, LineStyle, Panel, PlotItem};
use crate::state::theme::Theme;

const FIGURE_TITLE_HEIGHT: f32 = 28.0;
const PANEL_GAP: f32 = 4.0;
const PANEL_TITLE_HEIGHT: f32 = 20.0;
/// Fraction of the data extent added on each side of an automatic range.
const AUTO_MARGIN: f64 = 0.05;

/// Draw `figure` into the remaining space of `ui`, keeping its aspect ratio.
pub fn show_figure(ui: &mut egui::Ui, figure: &Figure, theme: &Theme) {
    let title_height = if figure.title.is_empty() { 0.0 } else { FIGURE_TITLE_HEIGHT };
    let area = fit_aspect(ui.available_rect_before_wrap(), figure.size, title_height);
    ui.allocate_rect(area, egui::Sense::hover());

    let painter = ui.painter_at(area);
    painter.rect_filled(area, 0.0, theme.figure_bg());
    if !figure.title.is_empty() {
        painter.text(
            pos2(area.center().x, area.top() + 4.0),
            Align2::CENTER_TOP,
            &figure.title,
            FontId::proportional(16.0),
            theme.text(),
        );
    }

    let grid_area = Rect::from_min_max(pos2(area.left(), area.top() + title_height), area.max);
    for (index, panel) in figure.panels.iter().enumerate() {
        let frac = figure.grid.cell_rect(panel.cell);
        let rect = Rect::from_min_size(
            pos2(
                grid_area.left() + frac.x as f32 * grid_area.width(),
                grid_area.top() + frac.y as f32 * grid_area.height(),
            ),
            vec2(
                frac.width as f32 * grid_area.width(),
                frac.height as f32 * grid_area.height(),
            ),
        )
        .shrink(PANEL_GAP);
        let mut child = ui.new_child(UiBuilder::new().max_rect(rect));
        show_panel(&mut child, (figure.title.as_str(), index), panel, theme);
    }
}

/// Largest rect inside `available` with the figure's aspect ratio below a
/// title strip.
fn fit_aspect(available: Rect, size: (f32, f32), title_height: f32) -> Rect {
    let (w, h) = size;
    if !(w > 0.0 && h > 0.0) {
        return available;
    }
    let aspect = w / h;
    let mut width = available.width();
    let mut height = width / aspect + title_height;
    if height > available.height() {
        height = available.height();
        width = (height - title_height).max(0.0) * aspect;
    }
    Rect::from_min_size(available.min, vec2(width, height))
}

fn show_panel(ui: &mut egui::Ui, id: (&str, usize), panel: &Panel, theme: &Theme) {
    let width = if panel.border_color.is_some() { 2.0 } else { 1.0 };
    let border = Stroke::new(width, border_color(panel, theme));
    let rect = ui.max_rect();
    ui.painter().rect_stroke(rect, 0.0, border, egui::StrokeKind::Inside);

    let inner = rect.shrink(3.0);
    let mut ui = ui.new_child(UiBuilder::new().max_rect(inner));
    if !panel.title.is_empty() {
        ui.allocate_ui(vec2(inner.width(), PANEL_TITLE_HEIGHT), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(&panel.title).strong().color(theme.text()));
            });
        });
    }

    let (x_range, y_range) = panel_bounds(panel);
    let mut plot = Plot::new(id)
        .width(ui.available_width())
        .height(ui.available_height())
        .x_axis_label(panel.x_label.clone())
        .y_axis_label(panel.y_label.clone())
        .show_grid(panel.grid)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false);
    if panel.legend {
        plot = plot.legend(Legend::default().position(Corner::RightTop));
    }
    if panel.x_is_datetime {
        plot = plot
            .x_axis_formatter(|mark, range| {
                format_axis_tick(mark.value, range.end() - range.start())
            })
            .label_formatter(|name, value| {
                format!("{name}\n{}\n{:.3}", format_timestamp(value.x), value.y)
            });
    } else if !panel.x_categories.is_empty() {
        let categories = panel.x_categories.clone();
        plot = plot.x_axis_formatter(move |mark, _range| {
            categories
                .iter()
                .find(|(pos, _)| (pos - mark.value).abs() < 1e-9)
                .map(|(_, name)| name.clone())
                .unwrap_or_default()
        });
    }

    plot.show(&mut ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [x_range.0, y_range.0],
            [x_range.1, y_range.1],
        ));
        for item in &panel.items {
            draw_item(plot_ui, item, x_range, y_range);
        }
    });
}

fn draw_item(plot_ui: &mut PlotUi, item: &PlotItem, x_range: (f64, f64), y_range: (f64, f64)) {
    match item {
        PlotItem::Line {
            label,
            points,
            color,
            width,
            style,
        } => {
            let points = downsample_for_view(points, x_range.0, x_range.1, MAX_LINE_POINTS);
            plot_ui.line(
                Line::new(PlotPoints::from(points))
                    .name(label)
                    .color(color.color32())
                    .width(*width)
                    .style(plot_line_style(*style)),
            );
        }
        PlotItem::Scatter {
            label,
            points,
            color,
            radius,
        } => {
            plot_ui.points(
                Points::new(PlotPoints::from(points.clone()))
                    .name(label)
                    .color(color.color32())
                    .radius(*radius),
            );
        }
        PlotItem::Histogram {
            label,
            edges,
            heights,
            color,
        } => {
            let bars: Vec<Bar> = edges
                .windows(2)
                .zip(heights)
                .map(|(edge, height)| {
                    Bar::new((edge[0] + edge[1]) / 2.0, *height).width(edge[1] - edge[0])
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(label).color(color.color32()));
        }
        PlotItem::VLine {
            label,
            x,
            color,
            width,
            style,
        } => {
            if x.is_finite() {
                plot_ui.vline(
                    VLine::new(*x)
                        .name(label)
                        .color(color.color32())
                        .width(*width)
                        .style(plot_line_style(*style)),
                );
            }
        }
        PlotItem::VSpan {
            label,
            x_min,
            x_max,
            color,
        } => {
            if x_min.is_finite() && x_max.is_finite() {
                let (y0, y1) = y_range;
                let corners = vec![[*x_min, y0], [*x_max, y0], [*x_max, y1], [*x_min, y1]];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(corners))
                        .name(label)
                        .fill_color(color.color32())
                        .stroke(Stroke::NONE),
                );
            }
        }
        PlotItem::BoxPlot {
            label,
            position,
            width,
            summary,
            style,
        } => draw_box(plot_ui, label, *position, *width, summary, style),
    }
}

/// A box with whiskers from `egui_plot`, plus overlaid median and cap
/// segments and outlier dots in their own colours.
fn draw_box(
    plot_ui: &mut PlotUi,
    label: &str,
    position: f64,
    width: f64,
    summary: &BoxSummary,
    style: &BoxStyle,
) {
    if !summary.median.is_finite() {
        return;
    }
    let spread = BoxSpread::new(
        summary.lower_whisker,
        summary.q1,
        summary.median,
        summary.q3,
        summary.upper_whisker,
    );
    let elem = BoxElem::new(position, spread)
        .name(label)
        .box_width(width)
        .whisker_width(width / 2.0)
        .fill(style.fill.color32())
        .stroke(Stroke::new(style.line_width, style.edge.color32()));
    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(label));

    let half = width / 2.0;
    plot_ui.line(
        Line::new(PlotPoints::from(vec![
            [position - half, summary.median],
            [position + half, summary.median],
        ]))
        .color(style.median.color32())
        .width(style.median_width),
    );
    let quarter = width / 4.0;
    for y in [summary.lower_whisker, summary.upper_whisker] {
        plot_ui.line(
            Line::new(PlotPoints::from(vec![[position - quarter, y], [position + quarter, y]]))
                .color(style.cap.color32())
                .width(style.line_width),
        );
    }
    if !summary.outliers.is_empty() {
        let outliers: Vec<[f64; 2]> = summary.outliers.iter().map(|y| [position, *y]).collect();
        plot_ui.points(
            Points::new(PlotPoints::from(outliers))
                .color(style.flier.color32())
                .radius(2.0),
        );
    }
}

fn plot_line_style(style: LineStyle) -> egui_plot::LineStyle {
    match style {
        LineStyle::Solid => egui_plot::LineStyle::Solid,
        LineStyle::Dashed => egui_plot::LineStyle::Dashed { length: 8.0 },
        LineStyle::Dotted => egui_plot::LineStyle::Dotted { spacing: 4.0 },
    }
}

/// Running min/max of finite values.
#[derive(Debug, Clone, Copy, Default)]
struct Extent(Option<(f64, f64)>);

impl Extent {
    fn add(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.0 = Some(match self.0 {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    fn padded(self) -> Option<(f64, f64)> {
        let (lo, hi) = self.0?;
        if lo == hi {
            return Some((lo - 0.5, hi + 0.5));
        }
        let margin = (hi - lo) * AUTO_MARGIN;
        Some((lo - margin, hi + margin))
    }
}

/// X and y ranges shown by a panel: explicit limits where set, otherwise
/// the extent of its items plus a margin. The automatic y range only
/// counts line and scatter points inside the x range.
pub fn panel_bounds(panel: &Panel) -> ((f64, f64), (f64, f64)) {
    let mut xs = Extent::default();
    for item in &panel.items {
        match item {
            PlotItem::Line { points, .. } | PlotItem::Scatter { points, .. } => {
                points.iter().for_each(|p| xs.add(p[0]));
            }
            PlotItem::Histogram { edges, .. } => edges.iter().for_each(|e| xs.add(*e)),
            PlotItem::VLine { x, .. } => xs.add(*x),
            PlotItem::VSpan { x_min, x_max, .. } => {
                xs.add(*x_min);
                xs.add(*x_max);
            }
            PlotItem::BoxPlot { position, width, .. } => {
                xs.add(position - width);
                xs.add(position + width);
            }
        }
    }
    let x = panel.x_limits.or_else(|| xs.padded()).unwrap_or((0.0, 1.0));

    let mut ys = Extent::default();
    let inside = |v: f64| v >= x.0 && v <= x.1;
    for item in &panel.items {
        match item {
            PlotItem::Line { points, .. } | PlotItem::Scatter { points, .. } => points
                .iter()
                .filter(|p| inside(p[0]))
                .for_each(|p| ys.add(p[1])),
            PlotItem::Histogram { heights, .. } => {
                ys.add(0.0);
                heights.iter().for_each(|h| ys.add(*h));
            }
            PlotItem::BoxPlot { summary, .. } => {
                ys.add(summary.lower_whisker);
                ys.add(summary.upper_whisker);
                summary.outliers.iter().for_each(|o| ys.add(*o));
            }
            PlotItem::VLine { .. } | PlotItem::VSpan { .. } => {}
        }
    }
    let y = panel.y_limits.or_else(|| ys.padded()).unwrap_or((0.0, 1.0));
    (x, y)
}

/// Colour of a panel frame.
pub fn border_color(panel: &Panel, theme: &Theme) -> Color32 {
    panel
        .border_color
        .map(|c| c.color32())
        .unwrap_or_else(|| theme.panel_border())
}
