//! Input-driven background validation
//!
//! A single-slot deferred task: every input change cancels the pending timer and
//! schedules a new one. Only the quiet-period sleep is cancellable. Once the
//! timer fires, the silent validate runs on its own task and completes even if
//! more input arrives.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::orchestrator::RequestOrchestrator;

/// Default quiet period before a silent validate fires
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1500);

/// Turns a stream of input changes into one silent validate per quiet period.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct ValidationDebouncer {
    orchestrator: RequestOrchestrator,
    quiet_period: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ValidationDebouncer {
    /// Create a debouncer feeding `orchestrator`
    pub fn new(orchestrator: RequestOrchestrator, quiet_period: Duration) -> Self {
        Self {
            orchestrator,
            quiet_period,
            pending: Mutex::new(None),
        }
    }

    /// Quiet period in use
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Call on every text-buffer mutation.
    pub fn on_input_changed(&self) {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let orchestrator = self.orchestrator.clone();
        let quiet_period = self.quiet_period;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if !orchestrator.has_source() {
                tracing::debug!("debounce fired on empty buffer, nothing to validate");
                return;
            }
            tracing::debug!("debounce fired, starting silent validation");
            tokio::spawn(async move {
                orchestrator.request_validate(true).await;
            });
        }));
    }

    /// True while a timer is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Drop the pending timer, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for ValidationDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
