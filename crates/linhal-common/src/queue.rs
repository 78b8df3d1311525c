//! In-order execution queue and completion events.
//!
//! The queue runs each submitted task synchronously once its dependencies
//! have completed. Failures are reported twice: on the returned [`Event`],
//! and on the queue itself so a later [`Queue::wait_and_throw`] surfaces
//! errors from tasks whose events were dropped.

use crate::device::Device;
use crate::error::{LinhalError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct QueueInner {
    id: u64,
    device: Device,
    submitted: AtomicU64,
    async_errors: Mutex<Vec<LinhalError>>,
}

/// Handle to an in-order queue bound to one device. Clones share state.
#[derive(Debug, Clone)]
pub struct Queue {
    inner: Arc<QueueInner>,
}

impl Queue {
    pub fn new(device: Device) -> Self {
        let id = NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed);
        debug!(queue = id, device = %device, "created queue");
        Self {
            inner: Arc::new(QueueInner {
                id,
                device,
                submitted: AtomicU64::new(0),
                async_errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Queue on the host device.
    pub fn host() -> Self {
        Self::new(Device::host())
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn device(&self) -> &Device {
        &self.inner.device
    }

    /// Number of tasks submitted so far, including failed ones.
    pub fn submitted(&self) -> u64 {
        self.inner.submitted.load(Ordering::Relaxed)
    }

    /// Run `task` after `dependencies` and return its completion event.
    ///
    /// A failed dependency means `task` is never run; the returned event
    /// carries the dependency's error.
    pub fn submit<F>(&self, name: &'static str, dependencies: &[Event], task: F) -> Event
    where
        F: FnOnce() -> Result<()>,
    {
        self.inner.submitted.fetch_add(1, Ordering::Relaxed);

        let outcome = match dependencies.iter().try_for_each(Event::wait) {
            Ok(()) => task(),
            Err(dep_err) => {
                debug!(queue = self.inner.id, task = name, "dependency failed, task skipped");
                Err(dep_err)
            }
        };

        if let Err(err) = &outcome {
            error!(queue = self.inner.id, task = name, error = %err, "task failed");
            self.lock_errors().push(err.clone());
        }

        Event { inner: Arc::new(EventInner { task: name, queue: Some(self.inner.id), outcome }) }
    }

    /// Block until every submitted task is done. Tasks run synchronously, so
    /// there is nothing left to wait for.
    pub fn wait(&self) {}

    /// Wait, then return the first error recorded since the last call.
    pub fn wait_and_throw(&self) -> Result<()> {
        self.wait();
        let mut errors = self.lock_errors();
        if errors.is_empty() {
            return Ok(());
        }
        let first = errors.remove(0);
        errors.clear();
        Err(first)
    }

    fn lock_errors(&self) -> std::sync::MutexGuard<'_, Vec<LinhalError>> {
        // A panicking task cannot leave the vector half-written.
        self.inner.async_errors.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug)]
struct EventInner {
    task: &'static str,
    queue: Option<u64>,
    outcome: Result<()>,
}

/// Completion handle for one submitted task.
#[derive(Debug, Clone)]
pub struct Event {
    inner: Arc<EventInner>,
}

impl Event {
    /// An event that is already complete, for use as an empty dependency.
    pub fn completed() -> Self {
        Self { inner: Arc::new(EventInner { task: "completed", queue: None, outcome: Ok(()) }) }
    }

    /// Wait for completion and report the task's outcome.
    pub fn wait(&self) -> Result<()> {
        self.inner.outcome.clone()
    }

    pub fn is_complete(&self) -> bool {
        true
    }

    pub fn task(&self) -> &'static str {
        self.inner.task
    }

    /// Id of the queue that produced this event, if any.
    pub fn queue_id(&self) -> Option<u64> {
        self.inner.queue
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn failure() -> LinhalError {
        LinhalError::invalid_argument("blas", "gemm_batch", "bad lda")
    }

    #[test]
    fn submit_runs_task_and_returns_event() {
        let queue = Queue::host();
        let ran = Cell::new(false);
        let event = queue.submit("probe", &[], || {
            ran.set(true);
            Ok(())
        });
        assert!(ran.get());
        assert!(event.wait().is_ok());
        assert_eq!(event.task(), "probe");
        assert_eq!(event.queue_id(), Some(queue.id()));
        assert_eq!(queue.submitted(), 1);
    }

    #[test]
    fn failed_dependency_skips_task() {
        let queue = Queue::host();
        let bad = queue.submit("bad", &[], || Err(failure()));
        let ran = Cell::new(false);
        let next = queue.submit("next", &[bad], || {
            ran.set(true);
            Ok(())
        });
        assert!(!ran.get(), "dependent task must not run");
        assert_eq!(next.wait().unwrap_err(), failure());
    }

    #[test]
    fn wait_and_throw_reports_then_clears() {
        let queue = Queue::host();
        drop(queue.submit("bad", &[], || Err(failure())));
        assert_eq!(queue.wait_and_throw().unwrap_err(), failure());
        assert!(queue.wait_and_throw().is_ok(), "errors are drained after being thrown");
    }

    #[test]
    fn clones_share_error_state() {
        let queue = Queue::host();
        let other = queue.clone();
        drop(other.submit("bad", &[], || Err(failure())));
        assert!(queue.wait_and_throw().is_err());
        assert_eq!(queue.id(), other.id());
    }

    #[test]
    fn completed_event_is_ok() {
        let event = Event::completed();
        assert!(event.is_complete());
        assert!(event.wait().is_ok());
        assert_eq!(event.queue_id(), None);
    }
}
