pub mod controller;
pub mod source;

pub use controller::{DashboardController, DashboardState, LoadTicket};
pub use source::{scan_dashboard_entries, DashboardEntry, DashboardSource, SourceRegistry};

use crate::task_queue::Scheduler;
use flowgraph::{
    BlockRegistry, DashboardDefinition, Flowgraph, FlowgraphDefinition, FlowgraphError,
    PlotDefinition,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("failed to load dashboard {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: FlowgraphError,
    },
    #[error("failed to save dashboard {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: FlowgraphError,
    },
    #[error("invalid dashboard: {0}")]
    Invalid(#[from] FlowgraphError),
    #[error("invalid dashboard locator '{0}'")]
    InvalidLocator(String),
    #[error("dashboard has no source to save to")]
    NoSource,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A dashboard definition together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDescription {
    pub definition: DashboardDefinition,
    pub source: Option<Arc<DashboardSource>>,
    pub file_name: Option<String>,
}

impl DashboardDescription {
    pub fn new(definition: DashboardDefinition) -> Self {
        Self {
            definition,
            source: None,
            file_name: None,
        }
    }

    pub fn create_empty(name: &str) -> Arc<Self> {
        Arc::new(Self::new(DashboardDefinition::empty(name)))
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn path(&self) -> Option<PathBuf> {
        match (&self.source, &self.file_name) {
            (Some(source), Some(file_name)) => Some(source.file_path(file_name)),
            _ => None,
        }
    }

    /// Reads and parses `file_name` from `source` on the calling thread.
    pub fn load_from(
        source: &Arc<DashboardSource>,
        file_name: &str,
    ) -> Result<Self, DashboardError> {
        let path = source.file_path(file_name);
        let definition =
            DashboardDefinition::load_from_file(&path).map_err(|source| DashboardError::Load {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            definition,
            source: Some(source.clone()),
            file_name: Some(file_name.to_string()),
        })
    }

    /// Loads `file_name` from `source` on a worker thread and hands the result
    /// to `callback` on the thread that drains `scheduler`'s queue.
    pub fn load<C, F>(
        source: Arc<DashboardSource>,
        file_name: String,
        scheduler: Scheduler<C>,
        callback: F,
    ) -> Result<(), DashboardError>
    where
        C: 'static,
        F: FnOnce(&mut C, Result<DashboardDescription, DashboardError>) + Send + 'static,
    {
        std::thread::Builder::new()
            .name("dashboard-load".to_string())
            .spawn(move || {
                let result = Self::load_from(&source, &file_name);
                if let Err(err) = &result {
                    log::debug!("dashboard load worker: {err}");
                }
                if !scheduler.schedule(move |ctx| callback(ctx, result)) {
                    log::debug!("dashboard '{file_name}' loaded after the application closed");
                }
            })?;
        Ok(())
    }
}

/// The active dashboard: its description plus the flowgraph instantiated from it.
pub struct Dashboard {
    description: Arc<DashboardDescription>,
    definition: DashboardDefinition,
    flowgraph: Flowgraph,
    loaded: bool,
}

impl Dashboard {
    pub fn new(description: Arc<DashboardDescription>) -> Self {
        let definition = description.definition.clone();
        Self {
            description,
            definition,
            flowgraph: Flowgraph::empty(),
            loaded: false,
        }
    }

    /// Instantiates the flowgraph described by the dashboard.
    pub fn load(&mut self, registry: &BlockRegistry) -> Result<(), DashboardError> {
        self.flowgraph = Flowgraph::new(self.definition.flowgraph.clone(), registry)?;
        self.loaded = true;
        log::info!(
            "dashboard '{}' loaded with {} blocks",
            self.name(),
            self.flowgraph.block_count()
        );
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn description(&self) -> &Arc<DashboardDescription> {
        &self.description
    }

    /// The current definition, including edits made since loading.
    pub fn definition(&self) -> &DashboardDefinition {
        &self.definition
    }

    pub fn plots(&self) -> &[PlotDefinition] {
        &self.definition.plots
    }

    pub fn flowgraph(&self) -> &Flowgraph {
        &self.flowgraph
    }

    pub fn tick(&mut self) -> Result<(), DashboardError> {
        self.flowgraph.process()?;
        Ok(())
    }

    /// Applies `edit` to a copy of the flowgraph definition and re-instantiates it.
    /// The dashboard is left untouched when the edited graph does not validate.
    pub fn edit_flowgraph<F>(
        &mut self,
        registry: &BlockRegistry,
        edit: F,
    ) -> Result<(), DashboardError>
    where
        F: FnOnce(&mut FlowgraphDefinition) -> Result<(), FlowgraphError>,
    {
        let mut edited = self.definition.flowgraph.clone();
        edit(&mut edited)?;
        let flowgraph = Flowgraph::new(edited.clone(), registry)?;
        self.definition.flowgraph = edited;
        self.flowgraph = flowgraph;
        Ok(())
    }

    pub fn add_plot(&mut self, name: &str, sinks: Vec<String>) {
        self.definition.plots.push(PlotDefinition {
            name: name.to_string(),
            sinks,
        });
    }

    /// Writes the current definition back to the file it was loaded from.
    pub fn save(&self) -> Result<PathBuf, DashboardError> {
        let path = self.description.path().ok_or(DashboardError::NoSource)?;
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&self, path: &Path) -> Result<(), DashboardError> {
        self.definition
            .save_to_file(path)
            .map_err(|source| DashboardError::Save {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("dashboard '{}' saved to {}", self.name(), path.display());
        Ok(())
    }
}
