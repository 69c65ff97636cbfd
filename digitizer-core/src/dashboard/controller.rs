use super::{Dashboard, DashboardDescription, DashboardError};
use crate::flowgraph_item::FlowgraphItem;
use flowgraph::BlockRegistry;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Empty,
    Loading,
    Active,
}

/// Identifies one asynchronous load request. Only the most recent request is
/// allowed to install its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Holds at most one dashboard and sequences load, replace and close.
#[derive(Default)]
pub struct DashboardController {
    dashboard: Option<Dashboard>,
    generation: u64,
    pending: Option<LoadTicket>,
}

impl DashboardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DashboardState {
        if self.dashboard.is_some() {
            DashboardState::Active
        } else if self.pending.is_some() {
            DashboardState::Loading
        } else {
            DashboardState::Empty
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        self.dashboard.as_mut()
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.pending = None;
        self.generation
    }

    /// Replaces the current dashboard with one built from `description`.
    ///
    /// `fg_item` is cleared before the new dashboard is constructed, so no
    /// view ever refers to a dashboard that is being replaced. If validation
    /// or construction fails, the previous dashboard is put back together with
    /// its view state and pending load.
    pub fn load(
        &mut self,
        description: Arc<DashboardDescription>,
        registry: &BlockRegistry,
        fg_item: &mut FlowgraphItem,
    ) -> Result<(), DashboardError> {
        description.definition.flowgraph.validate(registry)?;

        let generation = self.generation;
        let pending = self.pending;
        self.bump();
        let previous = self.dashboard.take();
        let previous_view = fg_item.clone();
        fg_item.clear();

        let mut dashboard = Dashboard::new(description);
        if let Err(err) = dashboard.load(registry) {
            log::debug!("restoring previous dashboard after failed load: {err}");
            self.dashboard = previous;
            self.generation = generation;
            self.pending = pending;
            *fg_item = previous_view;
            return Err(err);
        }

        if let Some(old) = previous {
            log::debug!("replacing dashboard '{}'", old.name());
        }
        fg_item.bind(&dashboard);
        self.dashboard = Some(dashboard);
        Ok(())
    }

    /// Starts an asynchronous load, superseding any request still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = LoadTicket(self.bump());
        self.pending = Some(ticket);
        ticket
    }

    /// Consumes `ticket` if it belongs to the latest request.
    pub fn finish_load(&mut self, ticket: LoadTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            log::debug!(
                "discarding stale dashboard load {} (current generation {})",
                ticket.0,
                self.generation
            );
            false
        }
    }

    pub fn cancel(&mut self, ticket: LoadTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    /// Drops the held dashboard and supersedes any pending load. Returns
    /// whether a dashboard was closed.
    pub fn close(&mut self, fg_item: &mut FlowgraphItem) -> bool {
        if self.dashboard.is_none() && self.pending.is_none() {
            return false;
        }
        self.bump();
        fg_item.clear();
        match self.dashboard.take() {
            Some(dashboard) => {
                log::info!("closed dashboard '{}'", dashboard.name());
                true
            }
            None => false,
        }
    }
}
