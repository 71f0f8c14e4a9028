use std::path::Path;
use std::sync::Arc;

use eframe::egui;

use obsplot::demo::{build_demos, DemoFigure};
use obsplot::render::figure_view;
use obsplot::state::theme::Theme;
use obsplot::{FigureError, Result};

use crate::ui::figure_panel::{self, FigureAction};

/// The figure viewer.
pub struct ObsPlotApp {
    pub theme: Theme,
    pub demos: Vec<DemoFigure>,
    pub selected: usize,
    /// Last error, shown in a window until dismissed.
    pub error_message: Option<String>,
    /// A screenshot was requested and should be saved when it arrives.
    pending_screenshot: bool,
    /// Screen rect of the figure in the last frame, for cropping screenshots.
    figure_rect: Option<egui::Rect>,
}

impl ObsPlotApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = Theme::default();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(14.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.0));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(20.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(11.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.visuals.window_corner_radius = egui::CornerRadius::same(8);
        ctx.set_style(style);
        ctx.set_visuals(theme.visuals());

        let (demos, error_message) = match build_demos() {
            Ok(demos) => (demos, None),
            Err(e) => {
                tracing::error!("Failed to build demo figures: {e}");
                (Vec::new(), Some(format!("Failed to build demo figures: {e}")))
            }
        };

        Self {
            theme,
            demos,
            selected: 0,
            error_message,
            pending_screenshot: false,
            figure_rect: None,
        }
    }

    fn current(&self) -> Option<&DemoFigure> {
        self.demos.get(self.selected)
    }

    fn report(&mut self, what: &str, path: &Path, result: Result<()>) {
        match result {
            Ok(()) => tracing::info!("Saved {what} to {:?}", path),
            Err(e) => {
                tracing::error!("Failed to save {what}: {e}");
                self.error_message = Some(format!("Failed to save {what}: {e}"));
            }
        }
    }

    fn save_stats_csv(&mut self) {
        let Some(demo) = self.current() else { return };
        let Some(stats) = &demo.stats else { return };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.csv", file_stem(demo.name)))
            .add_filter("CSV Files", &["csv"])
            .save_file()
        else {
            return;
        };
        let result = std::fs::File::create(&path)
            .map_err(FigureError::from)
            .and_then(|file| stats.write_csv(file));
        self.report("statistics CSV", &path, result);
    }

    fn save_figure_json(&mut self) {
        let Some(demo) = self.current() else { return };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", file_stem(demo.name)))
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let result = demo
            .figure
            .to_json()
            .map_err(FigureError::from)
            .and_then(|json| std::fs::write(&path, json).map_err(FigureError::from));
        self.report("figure JSON", &path, result);
    }

    /// Crop a viewport screenshot to the figure and save it as PNG.
    fn save_screenshot(&mut self, ctx: &egui::Context, color_image: &egui::ColorImage) {
        let ppp = ctx.pixels_per_point();
        let full_w = color_image.width();
        let full_h = color_image.height();
        let (x0, y0, x1, y1) = match self.figure_rect {
            Some(rect) => (
                ((rect.left() * ppp) as usize).min(full_w),
                ((rect.top() * ppp) as usize).min(full_h),
                ((rect.right() * ppp).ceil() as usize).min(full_w),
                ((rect.bottom() * ppp).ceil() as usize).min(full_h),
            ),
            None => (0, 0, full_w, full_h),
        };
        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        let mut rgba = Vec::with_capacity(width * height * 4);
        for row in y0..y1 {
            for col in x0..x1 {
                let c = color_image.pixels[row * full_w + col];
                rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }

        let name = self.current().map(|d| file_stem(d.name)).unwrap_or_else(|| "figure".into());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{name}.png"))
            .add_filter("PNG Image", &["png"])
            .save_file()
        else {
            return;
        };
        match image::RgbaImage::from_raw(width as u32, height as u32, rgba) {
            Some(img) => match img.save(&path) {
                Ok(()) => tracing::info!("Saved screenshot to {:?}", path),
                Err(e) => {
                    tracing::error!("Failed to save image: {e}");
                    self.error_message = Some(format!("Failed to save image: {e}"));
                }
            },
            None => {
                tracing::error!("Screenshot buffer does not match {width}x{height}");
                self.error_message = Some("Failed to save image: empty screenshot".into());
            }
        }
    }
}

/// Lowercase file name made of the alphanumeric parts of `name`.
fn file_stem(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

impl eframe::App for ObsPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.theme.visuals());

        // Screenshot requested in an earlier frame
        if self.pending_screenshot {
            let mut screenshot: Option<Arc<egui::ColorImage>> = None;
            ctx.input(|i| {
                for event in &i.raw.events {
                    if let egui::Event::Screenshot { image, .. } = event {
                        screenshot = Some(image.clone());
                    }
                }
            });
            if let Some(image) = screenshot {
                self.pending_screenshot = false;
                self.save_screenshot(ctx, &image);
            }
        }

        let mut action = FigureAction::None;
        let has_stats = self.current().is_some_and(|d| d.stats.is_some());
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("obsplot");
                    ui.separator();
                    action = figure_panel::show_toolbar(ui, &self.theme, has_stats);
                });
            });

        egui::SidePanel::left("figures")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.strong("Figures");
                ui.separator();
                for (i, demo) in self.demos.iter().enumerate() {
                    if ui.selectable_label(self.selected == i, demo.name).clicked() && self.selected != i {
                        self.selected = i;
                        tracing::debug!(figure = demo.name, "selected figure");
                        if let Some(stats) = &demo.stats {
                            for (name, column) in &stats.columns {
                                tracing::debug!("{}", column.report(name));
                            }
                        }
                    }
                }
            });

        if let Some(stats) = self.current().and_then(|d| d.stats.as_ref()) {
            egui::TopBottomPanel::bottom("stats")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::horizontal().show(ui, |ui| {
                        figure_panel::show_stats_table(ui, stats);
                    });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.demos.get(self.selected) {
            Some(demo) => {
                self.figure_rect = Some(ui.available_rect_before_wrap());
                figure_view::show_figure(ui, &demo.figure, &self.theme);
            }
            None => {
                ui.centered_and_justified(|ui| ui.label("No figures."));
            }
        });

        if let Some(msg) = self.error_message.clone() {
            let mut open = true;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(220, 60, 60), msg);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
            if !open {
                self.error_message = None;
            }
        }

        match action {
            FigureAction::None => {}
            FigureAction::ToggleTheme => self.theme = self.theme.toggle(),
            FigureAction::SavePng => {
                self.pending_screenshot = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            FigureAction::SaveStatsCsv => self.save_stats_csv(),
            FigureAction::SaveFigureJson => self.save_figure_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_keeps_words() {
        assert_eq!(file_stem("Comparison grid 3×4"), "comparison_grid_3_4");
        assert_eq!(file_stem("Overview/detail 2×2"), "overview_detail_2_2");
    }
}
