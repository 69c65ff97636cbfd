use digitizer_core::{App, AppSettings, Shell, ShellEvent, TaskQueue};
use eframe::egui;
use flowgraph::BlockRegistry;
use std::path::PathBuf;
use std::time::Duration;

mod file_dialog;
mod ui;

pub use ui::Tab;

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "OpenDigitizer".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl GuiConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            width: settings.window_width,
            height: settings.window_height,
            ..Self::default()
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
}

/// Everything the application needs before the first frame.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Dashboard loaded in the background right after startup.
    pub locator: Option<String>,
    pub dashboards_dir: PathBuf,
    /// Directory of `*.json` block type manifests registered next to the built-ins.
    pub blocks_dir: Option<PathBuf>,
    pub settings: AppSettings,
    pub settings_path: Option<PathBuf>,
    pub executable: Option<PathBuf>,
}

/// Opens the main window and runs the frame loop until it is closed.
///
/// Returns `GuiError::Gui` when eframe fails to create the window or its
/// rendering context.
pub fn run_gui(config: GuiConfig, startup: StartupOptions) -> Result<(), GuiError> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&config.title)
            .with_inner_size([config.width, config.height]),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Box::new(GuiApp::new(startup))),
    )
    .map_err(|e| GuiError::Gui(e.to_string()))
}

pub struct GuiApp {
    shell: Shell,
    tab: Tab,
    had_dashboard: bool,
}

impl GuiApp {
    pub fn new(startup: StartupOptions) -> Self {
        let StartupOptions {
            locator,
            dashboards_dir,
            blocks_dir,
            settings,
            settings_path,
            executable,
        } = startup;

        let mut registry = BlockRegistry::with_builtin_blocks();
        if let Some(dir) = blocks_dir {
            match registry.load_block_definitions(&dir) {
                Ok(count) => log::info!("registered {count} block types from {}", dir.display()),
                Err(err) => {
                    log::warn!("failed to read block definitions in {}: {err}", dir.display())
                }
            }
        }

        let mut shell = Shell::with_app(TaskQueue::new(), |scheduler| {
            let mut app = App::new(registry, scheduler, settings);
            if let Some(path) = settings_path {
                app = app.with_settings_path(path);
            }
            if let Some(executable) = executable {
                app = app.with_executable(executable);
            }
            app
        });

        let app = shell.app_mut();
        app.open_dashboard_page.select_source(dashboards_dir);
        if let Some(locator) = locator {
            app.open_dashboard_page.locator = locator.clone();
            if let Err(err) = app.load_dashboard_url(&locator) {
                app.report_error(err);
            }
        }

        Self {
            shell,
            tab: Tab::File,
            had_dashboard: false,
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Forces the "File" tab while no dashboard is loaded and switches to
    /// "View" when one becomes active.
    pub fn sync_tab(&mut self) {
        let has_dashboard = self.shell.app().dashboard().is_some();
        if !has_dashboard {
            self.tab = Tab::File;
        } else if !self.had_dashboard {
            self.tab = Tab::View;
        }
        self.had_dashboard = has_dashboard;
    }

    fn collect_events(&self, ctx: &egui::Context) -> Vec<ShellEvent> {
        let window_id = self.shell.window_id();
        ctx.input(|input| {
            let mut events = Vec::new();
            if input.viewport().close_requested() {
                events.push(ShellEvent::WindowClose(window_id));
            }
            if input.modifiers.command && input.key_pressed(egui::Key::Q) {
                events.push(ShellEvent::Quit);
            }
            events
        })
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let events = self.collect_events(ctx);
        self.shell.frame(events);
        if !self.shell.is_running() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        self.sync_tab();

        let app = self.shell.app_mut();
        ctx.set_visuals(if app.style().is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui::header::draw(ui, app, &mut self.tab);
        });
        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::View => ui::dashboard_page::draw(ui, app),
            Tab::Flowgraph => ui::flowgraph_view::draw(ui, app),
            Tab::File => ui::open_dashboard_page::draw(ui, app),
        });

        if app.dashboard().is_some() || app.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
