use serde::{Deserialize, Deserializer, Serialize};

use crate::processing::boxplot::BoxSummary;
use crate::state::grid::{CellSpan, GridSpec};

/// RGBA colour, unmultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const DARK_RED: Color = Color::rgb(139, 0, 0);
    pub const DARK_BLUE: Color = Color::rgb(0, 0, 139);
    pub const MISTY_ROSE: Color = Color::rgb(255, 228, 225);
    pub const LAVENDER: Color = Color::rgb(230, 230, 250);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const GOLD: Color = Color::rgb(255, 215, 0);
    pub const DEEP_SKY_BLUE: Color = Color::rgb(0, 191, 255);
    pub const ORCHID: Color = Color::rgb(218, 112, 214);
    pub const YELLOW_GREEN: Color = Color::rgb(154, 205, 50);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const ORANGE_RED: Color = Color::rgb(255, 69, 0);
    pub const MEDIUM_SLATE_BLUE: Color = Color::rgb(123, 104, 238);
    pub const TEAL: Color = Color::rgb(0, 128, 128);
    pub const DARK_ORANGE: Color = Color::rgb(255, 140, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }

    /// Same colour with its alpha scaled by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, a] = self.0;
        let scaled = (a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Color([r, g, b, scaled])
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    pub fn color32(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/// Default per-series line colours, cycled by series position.
pub const COLOR_PALETTE: [Color; 10] = [
    Color::rgb(31, 119, 180),
    Color::rgb(255, 127, 14),
    Color::rgb(44, 160, 44),
    Color::rgb(214, 39, 40),
    Color::rgb(148, 103, 189),
    Color::rgb(140, 86, 75),
    Color::rgb(227, 119, 194),
    Color::rgb(127, 127, 127),
    Color::rgb(188, 189, 34),
    Color::rgb(23, 190, 207),
];

pub fn color_for_index(index: usize) -> Color {
    COLOR_PALETTE[index % COLOR_PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// JSON has no NaN: serde_json writes it as `null`, read back here as NaN.
pub(crate) fn f64_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn points_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<[f64; 2]>, D::Error> {
    let points = Vec::<[Option<f64>; 2]>::deserialize(deserializer)?;
    Ok(points
        .into_iter()
        .map(|[x, y]| [x.unwrap_or(f64::NAN), y.unwrap_or(f64::NAN)])
        .collect())
}

/// Something drawn inside a panel, in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotItem {
    Line {
        label: String,
        #[serde(deserialize_with = "points_or_nan")]
        points: Vec<[f64; 2]>,
        color: Color,
        width: f32,
        style: LineStyle,
    },
    Scatter {
        label: String,
        #[serde(deserialize_with = "points_or_nan")]
        points: Vec<[f64; 2]>,
        color: Color,
        radius: f32,
    },
    /// Bars over consecutive `edges`; `heights.len() == edges.len() - 1`.
    Histogram {
        label: String,
        edges: Vec<f64>,
        heights: Vec<f64>,
        color: Color,
    },
    VLine {
        label: String,
        #[serde(deserialize_with = "f64_or_nan")]
        x: f64,
        color: Color,
        width: f32,
        style: LineStyle,
    },
    /// Shaded vertical band over `[x_min, x_max]`, full panel height.
    VSpan {
        label: String,
        #[serde(deserialize_with = "f64_or_nan")]
        x_min: f64,
        #[serde(deserialize_with = "f64_or_nan")]
        x_max: f64,
        color: Color,
    },
    BoxPlot {
        label: String,
        position: f64,
        width: f64,
        summary: BoxSummary,
        style: BoxStyle,
    },
}

/// Colours of the parts of one box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub fill: Color,
    pub edge: Color,
    pub whisker: Color,
    pub cap: Color,
    pub median: Color,
    pub flier: Color,
    pub line_width: f32,
    pub median_width: f32,
}

/// One set of axes in a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub cell: CellSpan,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    /// Tick labels on the x axis are timestamps.
    pub x_is_datetime: bool,
    /// Category names for integer x positions (box plots).
    pub x_categories: Vec<(f64, String)>,
    pub grid: bool,
    pub legend: bool,
    /// Frame colour; `None` keeps the theme default.
    pub border_color: Option<Color>,
    pub items: Vec<PlotItem>,
}

impl Panel {
    pub fn new(cell: CellSpan) -> Self {
        Self {
            cell,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_limits: None,
            y_limits: None,
            x_is_datetime: false,
            x_categories: Vec::new(),
            grid: true,
            legend: true,
            border_color: None,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: PlotItem) {
        self.items.push(item);
    }

    /// Highlighted bands, in insertion order.
    pub fn spans(&self) -> impl Iterator<Item = (f64, f64, Color)> + '_ {
        self.items.iter().filter_map(|item| match item {
            PlotItem::VSpan {
                x_min, x_max, color, ..
            } => Some((*x_min, *x_max, *color)),
            _ => None,
        })
    }
}

/// A complete multi-panel figure, independent of any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    /// Width and height in inches.
    pub size: (f32, f32),
    pub grid: GridSpec,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn new(title: impl Into<String>, size: (f32, f32), grid: GridSpec) -> Self {
        Self {
            title: title.into(),
            size,
            grid,
            panels: Vec::new(),
        }
    }

    pub fn add_panel(&mut self, panel: Panel) -> usize {
        self.panels.push(panel);
        self.panels.len() - 1
    }

    /// Pretty JSON. NaN values are written as `null`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Inverse of [`Figure::to_json`]; `null` numbers come back as NaN.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_scaling() {
        assert_eq!(Color::GOLD.with_alpha(0.3).alpha(), 77);
        assert_eq!(Color::GOLD.with_alpha(2.0).alpha(), 255);
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(color_for_index(0), color_for_index(COLOR_PALETTE.len()));
    }

    #[test]
    fn spans_only_yield_bands() {
        let mut panel = Panel::new(CellSpan::single(0, 0));
        panel.push(PlotItem::VLine {
            label: String::new(),
            x: 1.0,
            color: Color::BLACK,
            width: 1.0,
            style: LineStyle::Solid,
        });
        panel.push(PlotItem::VSpan {
            label: String::new(),
            x_min: 2.0,
            x_max: 3.0,
            color: Color::GOLD,
        });
        assert_eq!(panel.spans().collect::<Vec<_>>(), vec![(2.0, 3.0, Color::GOLD)]);
    }

    #[test]
    fn nan_survives_json() {
        let mut panel = Panel::new(CellSpan::single(0, 0));
        panel.push(PlotItem::VLine {
            label: "mean".into(),
            x: f64::NAN,
            color: Color::BLACK,
            width: 1.0,
            style: LineStyle::Dotted,
        });
        panel.push(PlotItem::Line {
            label: "fit".into(),
            points: vec![[0.0, f64::NAN], [1.0, 2.0]],
            color: Color::RED,
            width: 1.0,
            style: LineStyle::Dashed,
        });
        let mut figure = Figure::new("nan", (4.0, 3.0), GridSpec::new(1, 1));
        figure.add_panel(panel);

        let json = figure.to_json().unwrap();
        assert!(json.contains("null"));
        let back = Figure::from_json(&json).unwrap();
        match &back.panels[0].items[0] {
            PlotItem::VLine { x, .. } => assert!(x.is_nan()),
            other => panic!("unexpected item {other:?}"),
        }
        match &back.panels[0].items[1] {
            PlotItem::Line { points, .. } => {
                assert!(points[0][1].is_nan());
                assert_eq!(points[1], [1.0, 2.0]);
            }
            other => panic!("unexpected item {other:?}"),
        }
    }
}
