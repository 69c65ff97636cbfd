use digitizer_core::{App, Scheduler};

/// Shows a native file picker on its own thread and loads the chosen
/// dashboard on the UI thread through `scheduler`.
pub fn open_dashboard_dialog(scheduler: Scheduler<App>) {
    let spawned = std::thread::Builder::new()
        .name("file-dialog".to_string())
        .spawn(move || {
            let Some(path) = rfd::FileDialog::new()
                .add_filter("Dashboard", &["json"])
                .pick_file()
            else {
                return;
            };
            scheduler.schedule(move |app| {
                let locator = path.to_string_lossy().into_owned();
                app.open_dashboard_page.locator = locator.clone();
                if let Err(err) = app.load_dashboard_url(&locator) {
                    app.report_error(err);
                }
            });
        });
    if let Err(err) = spawned {
        log::error!("failed to start file dialog: {err}");
    }
}
