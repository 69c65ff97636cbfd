use crate::app::App;
use crate::settings::AppSettings;
use crate::task_queue::{DrainReport, FailurePolicy, Scheduler, TaskQueue};
use flowgraph::BlockRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Quit,
    WindowClose(WindowId),
    Other,
}

/// Owns the deferred-callback queue and the [`App`] it runs against, and
/// drives one frame at a time.
pub struct Shell {
    tasks: TaskQueue<App>,
    app: App,
    window_id: WindowId,
    running: bool,
}

impl Shell {
    pub fn new(registry: BlockRegistry, settings: AppSettings) -> Self {
        Self::with_app(TaskQueue::new(), |scheduler| {
            App::new(registry, scheduler, settings)
        })
    }

    /// Builds the shell around an app constructed from the queue's scheduler.
    pub fn with_app<F>(tasks: TaskQueue<App>, build: F) -> Self
    where
        F: FnOnce(Scheduler<App>) -> App,
    {
        let app = build(tasks.scheduler());
        Self {
            tasks,
            app,
            window_id: WindowId::default(),
            running: true,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.tasks.set_policy(policy);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn scheduler(&self) -> Scheduler<App> {
        self.tasks.scheduler()
    }

    pub fn handle_event(&mut self, event: &ShellEvent) {
        match event {
            ShellEvent::Quit => self.running = false,
            ShellEvent::WindowClose(id) if *id == self.window_id => self.running = false,
            _ => {}
        }
    }

    /// Runs every callback scheduled so far against the app.
    pub fn fire_callbacks(&mut self) -> DrainReport {
        self.tasks.drain(&mut self.app)
    }

    /// One iteration of the run loop up to drawing: dispatch `events`, run
    /// deferred callbacks, then advance the active dashboard.
    pub fn frame<I>(&mut self, events: I) -> DrainReport
    where
        I: IntoIterator<Item = ShellEvent>,
    {
        for event in events {
            self.handle_event(&event);
        }
        let report = self.fire_callbacks();
        if self.running {
            self.app.tick_dashboard();
        }
        report
    }
}
