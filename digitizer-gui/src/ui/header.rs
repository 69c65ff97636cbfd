use super::Tab;
use digitizer_core::App;
use eframe::egui::{self, RichText};

/// Title bar with dashboard actions and the tab strip. "View" and
/// "Flowgraph" are disabled until a dashboard is active.
pub fn draw(ui: &mut egui::Ui, app: &mut App, tab: &mut Tab) {
    let has_dashboard = app.dashboard().is_some();
    let can_save = app
        .dashboard()
        .is_some_and(|d| d.description().path().is_some());

    ui.horizontal(|ui| {
        ui.label(RichText::new("OpenDigitizer").strong().size(18.0));
        if let Some(dashboard) = app.dashboard() {
            ui.separator();
            ui.label(dashboard.name());
        }
        if app.is_loading() {
            ui.spinner();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let style_label = if app.style().is_dark() {
                "Light mode"
            } else {
                "Dark mode"
            };
            if ui.button(style_label).clicked() {
                let next = app.style().toggled();
                app.set_style(next);
            }
            if ui.button("New window").clicked() {
                if let Err(err) = app.open_new_window() {
                    app.report_error(format!("failed to open a new window: {err}"));
                }
            }
            if ui
                .add_enabled(has_dashboard, egui::Button::new("Close"))
                .clicked()
            {
                app.close_dashboard();
            }
            if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                if let Err(err) = app.save_dashboard() {
                    app.report_error(err);
                }
            }
        });
    });

    ui.horizontal(|ui| {
        ui.add_enabled_ui(has_dashboard, |ui| {
            ui.selectable_value(&mut *tab, Tab::View, "View");
            ui.selectable_value(&mut *tab, Tab::Flowgraph, "Flowgraph");
        });
        ui.selectable_value(&mut *tab, Tab::File, "File");
    });
}
