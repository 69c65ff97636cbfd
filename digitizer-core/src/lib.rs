pub mod app;
pub mod dashboard;
pub mod flowgraph_item;
pub mod open_dashboard;
pub mod settings;
pub mod shell;
pub mod style;
pub mod task_queue;
pub mod window;

pub use app::{App, EMPTY_DASHBOARD_NAME};
pub use dashboard::{
    Dashboard, DashboardController, DashboardDescription, DashboardError, DashboardSource,
    DashboardEntry, DashboardState, LoadTicket, SourceRegistry,
};
pub use flowgraph_item::{BlockPosition, FlowgraphItem};
pub use open_dashboard::OpenDashboardPage;
pub use settings::{AppSettings, SettingsError};
pub use shell::{Shell, ShellEvent, WindowId};
pub use style::Style;
pub use task_queue::{DrainReport, FailurePolicy, Scheduler, TaskError, TaskQueue};
