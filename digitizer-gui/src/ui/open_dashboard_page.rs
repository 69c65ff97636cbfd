use digitizer_core::App;
use eframe::egui::{self, Color32, RichText};
use std::path::PathBuf;

enum Action {
    SelectSource(PathBuf),
    Load(String),
    LoadEmpty,
    Browse,
    Refresh,
    DismissError,
}

/// The "File" tab: recent sources, the dashboards found in the selected
/// source, a locator field and a native file picker.
pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut actions = Vec::new();

    if let Some(error) = app.last_error() {
        ui.horizontal(|ui| {
            ui.colored_label(Color32::from_rgb(220, 60, 60), error);
            if ui.small_button("Dismiss").clicked() {
                actions.push(Action::DismissError);
            }
        });
        ui.separator();
    }
    if app.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading dashboard...");
        });
    }

    ui.horizontal(|ui| {
        ui.label("Dashboard:");
        let page = &mut app.open_dashboard_page;
        let response = ui.text_edit_singleline(&mut page.locator);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Load").clicked() || submitted {
            actions.push(Action::Load(page.locator.clone()));
        }
        if ui.button("Browse...").clicked() {
            actions.push(Action::Browse);
        }
        if ui.button("New empty dashboard").clicked() {
            actions.push(Action::LoadEmpty);
        }
    });
    ui.separator();

    ui.columns(2, |columns| {
        let page = &app.open_dashboard_page;
        columns[0].heading("Sources");
        let selected = page.selected_source().map(|p| p.to_path_buf());
        for source in page.recent_sources() {
            let is_selected = selected.as_ref() == Some(source);
            if columns[0]
                .selectable_label(is_selected, source.display().to_string())
                .clicked()
            {
                actions.push(Action::SelectSource(source.clone()));
            }
        }
        if let Some(path) = &selected {
            if !page.recent_sources().contains(path) {
                columns[0].selectable_label(true, path.display().to_string());
            }
        }

        columns[1].horizontal(|ui| {
            ui.heading("Dashboards");
            if ui.small_button("Refresh").clicked() {
                actions.push(Action::Refresh);
            }
        });
        if page.entries().is_empty() {
            columns[1].label("No dashboards found.");
        }
        egui::Grid::new("dashboard_entries")
            .striped(true)
            .show(&mut columns[1], |ui| {
                for entry in page.entries() {
                    ui.label(RichText::new(&entry.name).strong());
                    ui.label(entry.description.as_str());
                    ui.label(format!("{} blocks", entry.blocks));
                    if ui.button("Open").clicked() {
                        actions.push(Action::Load(entry.path.to_string_lossy().into_owned()));
                    }
                    ui.end_row();
                }
            });
    });

    for action in actions {
        match action {
            Action::SelectSource(path) => app.open_dashboard_page.select_source(path),
            Action::Load(locator) => {
                if let Err(err) = app.load_dashboard_url(&locator) {
                    app.report_error(err);
                }
            }
            Action::LoadEmpty => {
                if let Err(err) = app.load_empty_dashboard() {
                    app.report_error(err);
                }
            }
            Action::Browse => crate::file_dialog::open_dashboard_dialog(app.scheduler().clone()),
            Action::Refresh => app.open_dashboard_page.refresh(),
            Action::DismissError => app.clear_error(),
        }
    }
}
