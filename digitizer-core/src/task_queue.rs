//! Deferred callbacks marshalled onto the thread that owns the UI state.
//!
//! Producers on any thread hold a [`Scheduler`] and append to the pending
//! buffer under a mutex. The owning thread calls [`TaskQueue::drain`] once per
//! frame: it swaps the pending buffer with the (empty) draining buffer while
//! holding the lock, releases it, and then runs the batch in insertion order.
//! Producers therefore only ever wait for the swap, never for a callback, and
//! anything scheduled while a batch runs lands in the next batch.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

pub type Task<C> = Box<dyn FnOnce(&mut C) -> Result<(), TaskError> + Send>;

type Pending<C> = Mutex<Vec<Task<C>>>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),
    #[error("callback panicked: {0}")]
    Panicked(String),
}

/// What [`TaskQueue::drain`] does with a failed or panicking callback.
///
/// In every case the remaining callbacks of the batch still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure at error level and move on.
    #[default]
    Log,
    /// Hand the failures back in the [`DrainReport`].
    Collect,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub executed: usize,
    pub failures: Vec<TaskError>,
}

fn lock<C>(pending: &Pending<C>) -> MutexGuard<'_, Vec<Task<C>>> {
    // Callbacks never run under this lock, so a poisoned guard still holds a valid buffer.
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Cloneable producer handle. Outlives its queue safely: scheduling onto a
/// dropped queue is a no-op reported by the return value.
pub struct Scheduler<C> {
    pending: Weak<Pending<C>>,
}

impl<C> Clone for Scheduler<C> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.clone(),
        }
    }
}

impl<C> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<C> Scheduler<C> {
    /// A handle that is not attached to any queue.
    pub fn detached() -> Self {
        Self {
            pending: Weak::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.pending.strong_count() > 0
    }

    pub fn schedule<F>(&self, callback: F) -> bool
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        self.schedule_fallible(move |ctx| {
            callback(ctx);
            Ok(())
        })
    }

    pub fn schedule_fallible<F>(&self, callback: F) -> bool
    where
        F: FnOnce(&mut C) -> Result<(), TaskError> + Send + 'static,
    {
        let Some(pending) = self.pending.upgrade() else {
            log::debug!("dropping callback scheduled after its queue was closed");
            return false;
        };
        lock(&pending).push(Box::new(callback));
        true
    }
}

pub struct TaskQueue<C> {
    pending: Arc<Pending<C>>,
    draining: Vec<Task<C>>,
    policy: FailurePolicy,
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TaskQueue<C> {
    pub fn new() -> Self {
        Self::with_policy(FailurePolicy::default())
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self {
            pending: Arc::new(Mutex::new(Vec::new())),
            draining: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
    }

    pub fn scheduler(&self) -> Scheduler<C> {
        Scheduler {
            pending: Arc::downgrade(&self.pending),
        }
    }

    /// Same as [`Scheduler::schedule`]. Always succeeds while the queue is alive.
    pub fn schedule<F>(&self, callback: F) -> bool
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        self.scheduler().schedule(callback)
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Runs every callback scheduled before this call, in insertion order.
    pub fn drain(&mut self, ctx: &mut C) -> DrainReport {
        {
            let mut pending = lock(&self.pending);
            std::mem::swap(&mut *pending, &mut self.draining);
        }

        let mut report = DrainReport::default();
        for task in self.draining.drain(..) {
            report.executed += 1;
            let result = match panic::catch_unwind(AssertUnwindSafe(|| task(ctx))) {
                Ok(result) => result,
                Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
            };
            if let Err(err) = result {
                match self.policy {
                    FailurePolicy::Log => log::error!("deferred callback failed: {err}"),
                    FailurePolicy::Collect => report.failures.push(err),
                }
            }
        }
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
