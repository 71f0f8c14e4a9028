use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

/// Viewer colour scheme. Figure item colours are fixed by the builders;
/// the theme only decides the surroundings (background, frame, text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn figure_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Frame of a panel that does not carry its own border colour.
    pub fn panel_border(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(110),
            Theme::Light => Color32::from_gray(40),
        }
    }

    pub fn text(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(220),
            Theme::Light => Color32::from_gray(20),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_labels_target() {
        assert_eq!(Theme::default().toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle().label(), "Light");
        assert_ne!(Theme::Dark.panel_border(), Theme::Light.panel_border());
    }
}
