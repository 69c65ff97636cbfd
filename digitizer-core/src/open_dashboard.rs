use crate::dashboard::{scan_dashboard_entries, DashboardEntry};
use std::path::{Path, PathBuf};

pub const MAX_RECENT_SOURCES: usize = 10;

/// Model behind the "File" tab: recently used dashboard sources and the
/// dashboards found in the selected one.
#[derive(Debug, Default)]
pub struct OpenDashboardPage {
    recent_sources: Vec<PathBuf>,
    selected_source: Option<PathBuf>,
    entries: Vec<DashboardEntry>,
    pub locator: String,
}

impl OpenDashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recent_sources(recent: Vec<PathBuf>) -> Self {
        let mut page = Self::new();
        for path in recent.into_iter().rev() {
            page.add_source(path);
        }
        page
    }

    /// Records `path` as the most recent source. A path is listed at most once.
    pub fn add_source(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.recent_sources.retain(|p| p != &path);
        self.recent_sources.insert(0, path);
        self.recent_sources.truncate(MAX_RECENT_SOURCES);
    }

    pub fn recent_sources(&self) -> &[PathBuf] {
        &self.recent_sources
    }

    pub fn selected_source(&self) -> Option<&Path> {
        self.selected_source.as_deref()
    }

    pub fn select_source(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.entries = scan_dashboard_entries(&path);
        self.selected_source = Some(path);
    }

    pub fn refresh(&mut self) {
        if let Some(path) = &self.selected_source {
            self.entries = scan_dashboard_entries(path);
        }
    }

    pub fn entries(&self) -> &[DashboardEntry] {
        &self.entries
    }
}
