use crate::style::Style;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "opendigitizer_settings.json";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User preferences kept between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub style: Style,
    pub recent_sources: Vec<PathBuf>,
    pub dashboards_dir: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            style: Style::default(),
            recent_sources: Vec::new(),
            dashboards_dir: PathBuf::from("dashboards"),
            window_width: 1280.0,
            window_height: 720.0,
        }
    }
}

impl AppSettings {
    pub fn path_for(dashboards_dir: &Path) -> PathBuf {
        dashboards_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let data = std::fs::read(path)?;
        let mut settings: Self = serde_json::from_slice(&data)?;
        settings.window_width = settings.window_width.max(320.0);
        settings.window_height = settings.window_height.max(240.0);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Reads the settings stored in `dashboards_dir`, writing defaults there
    /// when the file is missing or unreadable.
    pub fn load_or_create(dashboards_dir: &Path) -> (Self, PathBuf) {
        let path = Self::path_for(dashboards_dir);
        let settings = match Self::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::debug!("using default settings ({}): {err}", path.display());
                let defaults = Self {
                    dashboards_dir: dashboards_dir.to_path_buf(),
                    ..Self::default()
                };
                if let Err(err) = defaults.save(&path) {
                    log::warn!("failed to write settings to {}: {err}", path.display());
                }
                defaults
            }
        };
        (settings, path)
    }
}
