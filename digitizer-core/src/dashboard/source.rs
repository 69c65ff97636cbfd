use flowgraph::DashboardDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A directory holding dashboard descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSource {
    pub path: PathBuf,
    pub name: String,
}

impl DashboardSource {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    pub fn entries(&self) -> Vec<DashboardEntry> {
        scan_dashboard_entries(&self.path)
    }
}

/// Hands out one shared [`DashboardSource`] per path.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: HashMap<PathBuf, Arc<DashboardSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, path: impl Into<PathBuf>) -> Arc<DashboardSource> {
        let path = path.into();
        self.sources
            .entry(path.clone())
            .or_insert_with(|| {
                log::debug!("registering dashboard source {}", path.display());
                Arc::new(DashboardSource::new(path))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardEntry {
    pub name: String,
    pub description: String,
    pub blocks: usize,
    pub file_name: String,
    pub path: PathBuf,
}

/// Lists the parseable `*.json` dashboards in `dir`, sorted by name.
/// Settings files and anything that fails to parse are skipped.
pub fn scan_dashboard_entries(dir: &Path) -> Vec<DashboardEntry> {
    let mut entries = Vec::new();
    if let Ok(dir_entries) = std::fs::read_dir(dir) {
        for entry in dir_entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if file_name == crate::settings::SETTINGS_FILE_NAME {
                continue;
            }
            match DashboardDefinition::load_from_file(&path) {
                Ok(dashboard) => entries.push(DashboardEntry {
                    name: dashboard.name,
                    description: dashboard.description,
                    blocks: dashboard.flowgraph.blocks.len(),
                    file_name: file_name.to_string(),
                    path: path.clone(),
                }),
                Err(err) => log::debug!("skipping {}: {err}", path.display()),
            }
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
