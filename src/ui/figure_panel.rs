use obsplot::figures::table::StatsTable;
use obsplot::processing::statistics::Statistic;
use obsplot::state::theme::Theme;

/// Actions the toolbar can request from the app.
pub enum FigureAction {
    None,
    ToggleTheme,
    SavePng,
    SaveStatsCsv,
    SaveFigureJson,
}

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Toolbar above the figure. Returns the clicked action, if any.
pub fn show_toolbar(ui: &mut egui::Ui, theme: &Theme, has_stats: bool) -> FigureAction {
    let mut action = FigureAction::None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        if toolbar_btn(ui, "Save PNG").on_hover_text("Save the figure as an image").clicked() {
            action = FigureAction::SavePng;
        }
        let csv = ui
            .add_enabled(has_stats, egui::Button::new("Save stats CSV").min_size(egui::vec2(0.0, 26.0)))
            .on_hover_text("Export the statistics table")
            .on_disabled_hover_text("This figure has no statistics table");
        if csv.clicked() {
            action = FigureAction::SaveStatsCsv;
        }
        if toolbar_btn(ui, "Save figure JSON").on_hover_text("Export the figure description").clicked() {
            action = FigureAction::SaveFigureJson;
        }

        ui.separator();

        let theme_label = format!("{} Mode", theme.toggle().label());
        if toolbar_btn(ui, &theme_label).clicked() {
            action = FigureAction::ToggleTheme;
        }
    });
    action
}

/// Statistics as a table: one row per statistic, one column per series.
pub fn show_stats_table(ui: &mut egui::Ui, stats: &StatsTable) {
    if stats.columns.is_empty() {
        ui.label("No statistics.");
        return;
    }

    use egui_extras::{Column, TableBuilder};

    let num_cols = stats.columns.len() + 1;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(90.0), num_cols)
        .min_scrolled_height(120.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("statistic");
            });
            for name in stats.column_names() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, Statistic::ALL.len(), |mut row| {
                let stat = Statistic::ALL[row.index()];
                row.col(|ui| {
                    ui.label(stat.label());
                });
                for (_, column) in &stats.columns {
                    row.col(|ui| {
                        let v = column.get(stat);
                        if v.is_finite() {
                            ui.label(format!("{v:.3}"));
                        } else {
                            ui.label("-");
                        }
                    });
                }
            });
        });
}
