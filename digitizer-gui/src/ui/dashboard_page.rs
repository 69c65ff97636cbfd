use digitizer_core::{App, Dashboard};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

const MIN_PLOT_HEIGHT: f32 = 160.0;

/// Plots laid out on the dashboard. A dashboard without plot definitions
/// shows one plot per block that records samples.
fn plot_layout(dashboard: &Dashboard) -> Vec<(String, Vec<String>)> {
    if !dashboard.plots().is_empty() {
        return dashboard
            .plots()
            .iter()
            .map(|plot| (plot.name.clone(), plot.sinks.clone()))
            .collect();
    }
    dashboard
        .flowgraph()
        .blocks()
        .filter(|block| block.history().is_some())
        .map(|block| (block.name().to_string(), vec![block.name().to_string()]))
        .collect()
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(dashboard) = app.dashboard() else {
        ui.label("No dashboard loaded.");
        return;
    };

    let plots = plot_layout(dashboard);
    if plots.is_empty() {
        ui.label("This dashboard has no sinks to plot. Add one from the Flowgraph tab.");
        return;
    }

    let height = (ui.available_height() / plots.len() as f32 - 24.0).max(MIN_PLOT_HEIGHT);
    egui::ScrollArea::vertical().show(ui, |ui| {
        for (name, sinks) in &plots {
            ui.label(egui::RichText::new(name).strong());
            Plot::new(format!("plot_{name}"))
                .height(height)
                .legend(Legend::default())
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for sink in sinks {
                        let Some(history) = dashboard.flowgraph().history(sink) else {
                            continue;
                        };
                        let points: PlotPoints = history
                            .iter()
                            .enumerate()
                            .map(|(i, v)| [i as f64, f64::from(*v)])
                            .collect();
                        plot_ui.line(Line::new(points).name(sink));
                    }
                });
        }
    });
}
