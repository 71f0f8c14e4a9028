use serde::{Deserialize, Serialize};

use crate::error::FigureError;
use crate::state::figure::{BoxStyle, Color};

/// Colours that cross-reference a detail panel with the band it covers on
/// its overview panel, by detail slot.
pub const EMPHASIS_COLORS: [Color; 7] = [
    Color::GOLD,
    Color::DEEP_SKY_BLUE,
    Color::ORCHID,
    Color::YELLOW_GREEN,
    Color::GREY,
    Color::ORANGE_RED,
    Color::MEDIUM_SLATE_BLUE,
];

/// Opacity of a zoom band on an overview panel.
pub const EMPHASIS_ALPHA: f32 = 0.3;

pub fn emphasis_color(slot: usize) -> Color {
    EMPHASIS_COLORS[slot % EMPHASIS_COLORS.len()]
}

/// A pair of colours indexed by series role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RolePair {
    pub observed: Color,
    pub predicted: Color,
}

impl RolePair {
    pub const fn new(observed: Color, predicted: Color) -> Self {
        Self { observed, predicted }
    }
}

/// Colour profile of the observed-vs-predicted comparison figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStyle {
    /// Histogram bars, box edges and whiskers.
    pub data: RolePair,
    /// IQR bands and box fill.
    pub iqr: RolePair,
    /// Mean lines, box caps and outlier markers.
    pub mean: RolePair,
    pub median: RolePair,
    /// Scatter points and the error histogram.
    pub comparison: Color,
    pub identity_line: Color,
    pub fit_line: Color,
    pub bias_line: Color,
    pub histogram_alpha: f32,
    pub error_histogram_alpha: f32,
    pub scatter_alpha: f32,
    pub scatter_radius: f32,
    pub box_width: f64,
}

impl Default for ComparisonStyle {
    fn default() -> Self {
        Self {
            data: RolePair::new(Color::RED, Color::BLUE),
            iqr: RolePair::new(Color::MISTY_ROSE, Color::LAVENDER),
            mean: RolePair::new(Color::DARK_RED, Color::DARK_BLUE),
            median: RolePair::new(Color::YELLOW, Color::GREEN),
            comparison: Color::PURPLE,
            identity_line: Color::BLACK,
            fit_line: Color::LIGHT_GRAY,
            bias_line: Color::LIGHT_GRAY,
            histogram_alpha: 0.5,
            error_histogram_alpha: 0.7,
            scatter_alpha: 0.3,
            scatter_radius: 1.0,
            box_width: 0.5,
        }
    }
}

impl ComparisonStyle {
    /// Teal/orange profile that stays readable for red-green colour blindness.
    pub fn muted() -> Self {
        Self {
            data: RolePair::new(Color::TEAL, Color::DARK_ORANGE),
            iqr: RolePair::new(Color::rgb(204, 229, 229), Color::rgb(255, 232, 204)),
            mean: RolePair::new(Color::rgb(0, 77, 77), Color::rgb(153, 84, 0)),
            median: RolePair::new(Color::rgb(0, 180, 180), Color::rgb(255, 190, 90)),
            comparison: Color::GREY,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, FigureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, FigureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn observed_box(&self) -> BoxStyle {
        self.box_style(self.data.observed, self.iqr.observed, self.mean.observed, self.median.observed)
    }

    pub fn predicted_box(&self) -> BoxStyle {
        self.box_style(
            self.data.predicted,
            self.iqr.predicted,
            self.mean.predicted,
            self.median.predicted,
        )
    }

    fn box_style(&self, data: Color, iqr: Color, mean: Color, median: Color) -> BoxStyle {
        BoxStyle {
            fill: iqr,
            edge: data,
            whisker: data,
            cap: mean,
            median,
            flier: mean.with_alpha(0.7),
            line_width: 1.5,
            median_width: 3.0,
        }
    }
}

/// Text used in the comparison figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonLabels {
    pub observed: String,
    pub predicted: String,
    pub density: String,
    pub error: String,
    pub distribution_title: String,
    pub correlation_title: String,
    pub error_title: String,
    pub boxplot_title: String,
    pub mean: String,
    pub median: String,
    pub scatter: String,
    pub identity: String,
    pub fit: String,
    pub prediction_error: String,
}

impl Default for ComparisonLabels {
    fn default() -> Self {
        Self {
            observed: "observed".into(),
            predicted: "predicted".into(),
            density: "normalized density".into(),
            error: "error".into(),
            distribution_title: "Distribution".into(),
            correlation_title: "Correlation".into(),
            error_title: "Error".into(),
            boxplot_title: "Boxplot".into(),
            mean: "mean".into(),
            median: "median".into(),
            scatter: "paired data".into(),
            identity: "identity".into(),
            fit: "fit".into(),
            prediction_error: "prediction error".into(),
        }
    }
}

impl ComparisonLabels {
    /// Portuguese wording.
    pub fn portuguese() -> Self {
        Self {
            observed: "observado".into(),
            predicted: "previsto".into(),
            density: "densidade normalizada".into(),
            error: "erro".into(),
            distribution_title: "Distribuição".into(),
            correlation_title: "Correlação".into(),
            error_title: "Erro".into(),
            boxplot_title: "Boxplot".into(),
            mean: "média".into(),
            median: "mediana".into(),
            scatter: "dados cruzados".into(),
            identity: "identidade".into(),
            fit: "ajuste".into(),
            prediction_error: "erro da previsão".into(),
        }
    }

    /// Short tag for the observed role in legends and box categories.
    pub fn observed_short(&self) -> String {
        self.observed.chars().take(3).collect()
    }

    pub fn predicted_short(&self) -> String {
        self.predicted.chars().take(4).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_json_roundtrip_keeps_profile() {
        let style = ComparisonStyle::muted();
        let json = style.to_json().unwrap();
        assert_eq!(ComparisonStyle::from_json(&json).unwrap(), style);
    }

    #[test]
    fn malformed_style_json_is_an_error() {
        assert!(matches!(
            ComparisonStyle::from_json("{"),
            Err(FigureError::Json(_))
        ));
    }

    #[test]
    fn box_parts_follow_role_colours() {
        let style = ComparisonStyle::default();
        let b = style.predicted_box();
        assert_eq!(b.edge, Color::BLUE);
        assert_eq!(b.fill, Color::LAVENDER);
        assert_eq!(b.cap, Color::DARK_BLUE);
        assert_eq!(b.median, Color::GREEN);
    }

    #[test]
    fn short_tags_use_leading_characters() {
        let labels = ComparisonLabels::portuguese();
        assert_eq!(labels.observed_short(), "obs");
        assert_eq!(labels.predicted_short(), "prev");
    }

    #[test]
    fn emphasis_cycles() {
        assert_eq!(emphasis_color(0), Color::GOLD);
        assert_eq!(emphasis_color(7), Color::GOLD);
    }
}
