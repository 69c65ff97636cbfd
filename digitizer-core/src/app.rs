use crate::dashboard::{
    Dashboard, DashboardController, DashboardDescription, DashboardError, DashboardState,
    LoadTicket, SourceRegistry,
};
use crate::flowgraph_item::FlowgraphItem;
use crate::open_dashboard::OpenDashboardPage;
use crate::settings::AppSettings;
use crate::style::Style;
use crate::task_queue::Scheduler;
use crate::window;
use flowgraph::blocks::{DataSink, DataSinkSource};
use flowgraph::BlockRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const EMPTY_DASHBOARD_NAME: &str = "New dashboard";

/// Application state shared by every tab. Owned by the [`crate::Shell`] and
/// handed by `&mut` to deferred callbacks.
pub struct App {
    registry: BlockRegistry,
    dashboards: DashboardController,
    pub fg_item: FlowgraphItem,
    pub open_dashboard_page: OpenDashboardPage,
    sources: SourceRegistry,
    style: Style,
    scheduler: Scheduler<App>,
    executable: Option<PathBuf>,
    settings: AppSettings,
    settings_path: Option<PathBuf>,
    last_error: Option<String>,
    tick_error: Option<String>,
}

impl App {
    pub fn new(registry: BlockRegistry, scheduler: Scheduler<App>, settings: AppSettings) -> Self {
        let mut fg_item = FlowgraphItem::new();
        fg_item.set_style(settings.style);
        Self {
            registry,
            dashboards: DashboardController::new(),
            fg_item,
            open_dashboard_page: OpenDashboardPage::with_recent_sources(
                settings.recent_sources.clone(),
            ),
            sources: SourceRegistry::new(),
            style: settings.style,
            scheduler,
            executable: None,
            settings,
            settings_path: None,
            last_error: None,
            tick_error: None,
        }
    }

    /// Persist settings changes (style, recent sources) to `path`.
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn with_executable(mut self, executable: PathBuf) -> Self {
        self.executable = Some(executable);
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Scheduler<App> {
        &self.scheduler
    }

    /// Queues `callback` to run on the UI thread during the next frame.
    pub fn schedule<F>(&self, callback: F) -> bool
    where
        F: FnOnce(&mut App) + Send + 'static,
    {
        self.scheduler.schedule(callback)
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        self.fg_item.set_style(style);
        if self.settings.style != style {
            self.settings.style = style;
            self.persist_settings();
        }
    }

    pub fn state(&self) -> DashboardState {
        self.dashboards.state()
    }

    /// True while an asynchronous load is in flight, even if a dashboard is shown.
    pub fn is_loading(&self) -> bool {
        self.dashboards.is_loading()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboards.dashboard()
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        self.dashboards.dashboard_mut()
    }

    pub fn load_empty_dashboard(&mut self) -> Result<(), DashboardError> {
        self.load_dashboard(DashboardDescription::create_empty(EMPTY_DASHBOARD_NAME))
    }

    /// Replaces the active dashboard. On error the previous state is kept.
    pub fn load_dashboard(
        &mut self,
        description: Arc<DashboardDescription>,
    ) -> Result<(), DashboardError> {
        self.dashboards
            .load(description, &self.registry, &mut self.fg_item)?;
        self.tick_error = None;
        Ok(())
    }

    /// Loads the dashboard at `locator` (`dir/file.json`) in the background.
    /// The result is installed during a later frame, unless another load or a
    /// close happened in the meantime.
    pub fn load_dashboard_url(&mut self, locator: &str) -> Result<LoadTicket, DashboardError> {
        let locator_path = Path::new(locator.trim());
        let file_name = locator_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| DashboardError::InvalidLocator(locator.to_string()))?;
        let dir = match locator_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let source = self.sources.get(dir);
        let ticket = self.dashboards.begin_load();
        log::info!("loading dashboard {locator}");
        let loaded = DashboardDescription::load(
            source,
            file_name,
            self.scheduler.clone(),
            move |app: &mut App, result| app.finish_dashboard_load(ticket, result),
        );
        if let Err(err) = loaded {
            self.dashboards.cancel(ticket);
            return Err(err);
        }
        Ok(ticket)
    }

    fn finish_dashboard_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DashboardDescription, DashboardError>,
    ) {
        if !self.dashboards.finish_load(ticket) {
            return;
        }
        let description = match result {
            Ok(description) => description,
            Err(err) => return self.report_error(err),
        };
        let source_path = description.source.as_ref().map(|s| s.path.clone());
        if let Err(err) = self.load_dashboard(Arc::new(description)) {
            return self.report_error(err);
        }
        self.last_error = None;
        if let Some(path) = source_path {
            self.open_dashboard_page.add_source(path);
            self.settings.recent_sources = self.open_dashboard_page.recent_sources().to_vec();
            self.persist_settings();
        }
    }

    pub fn close_dashboard(&mut self) {
        self.dashboards.close(&mut self.fg_item);
        self.tick_error = None;
    }

    pub fn save_dashboard(&mut self) -> Result<PathBuf, DashboardError> {
        let dashboard = self.dashboards.dashboard().ok_or(DashboardError::NoSource)?;
        let path = dashboard.save()?;
        self.open_dashboard_page.refresh();
        Ok(path)
    }

    /// Adds a `sink N` block and a matching `source for sink N` block to the
    /// active dashboard. Returns the new sink's name.
    pub fn new_sink(&mut self) -> Result<Option<String>, DashboardError> {
        let Some(dashboard) = self.dashboards.dashboard_mut() else {
            return Ok(None);
        };
        let flowgraph = &dashboard.definition().flowgraph;
        let mut n = 1;
        while flowgraph.block_by_name(&format!("sink {n}")).is_some() {
            n += 1;
        }
        let sink_name = format!("sink {n}");
        let source_name = format!("source for sink {n}");

        dashboard.edit_flowgraph(&self.registry, |fg| {
            fg.add_block(DataSink::TYPE_NAME, &sink_name, serde_json::Value::Null);
            fg.add_block(DataSinkSource::TYPE_NAME, &source_name, serde_json::Value::Null);
            Ok(())
        })?;
        self.fg_item.bind(dashboard);
        log::debug!("added {sink_name} and {source_name}");
        Ok(Some(sink_name))
    }

    pub fn open_new_window(&self) -> std::io::Result<()> {
        let executable = match &self.executable {
            Some(path) => path.clone(),
            None => window::current_executable().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "executable path unknown")
            })?,
        };
        window::spawn_window(&executable, &[])?;
        Ok(())
    }

    /// Runs the active dashboard's flowgraph once. A processing error is
    /// reported when it first occurs, not again on every following frame.
    pub fn tick_dashboard(&mut self) {
        let Some(dashboard) = self.dashboards.dashboard_mut() else {
            return;
        };
        match dashboard.tick() {
            Ok(()) => self.tick_error = None,
            Err(err) => {
                let message = err.to_string();
                if self.tick_error.as_deref() == Some(message.as_str()) {
                    return;
                }
                log::warn!("dashboard '{}' failed to process: {message}", dashboard.name());
                self.last_error = Some(message.clone());
                self.tick_error = Some(message);
            }
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Logs `err` and shows it on the "File" tab until cleared.
    pub fn report_error(&mut self, err: impl std::fmt::Display) {
        log::warn!("{err}");
        self.last_error = Some(err.to_string());
    }

    fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = self.settings.save(path) {
            log::warn!("failed to save settings to {}: {err}", path.display());
        }
    }
}
