//! Rendering refresh hook
//!
//! Called after mutations that insert icon-bearing elements. Fire-and-forget:
//! nothing returns, and the orchestrator's state is already final when it runs.

use parking_lot::Mutex;

/// What was just inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTarget {
    /// Message blocks changed
    Messages,
    /// Object lists were re-projected
    Objects,
    /// Converted output was written or cleared
    Output,
    /// Copy control label changed
    CopyControl,
}

/// Receiver of refresh notifications
pub trait RefreshHook: Send + Sync + 'static {
    /// Re-run icon substitution / highlighting for `target`
    fn refresh(&self, target: RefreshTarget);
}

/// Hook that only traces
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRefresh;

impl RefreshHook for TracingRefresh {
    fn refresh(&self, target: RefreshTarget) {
        tracing::trace!(?target, "refresh");
    }
}

/// Hook that records every notification, for inspection
#[derive(Debug, Default)]
pub struct RecordingRefresh {
    seen: Mutex<Vec<RefreshTarget>>,
}

impl RecordingRefresh {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far
    pub fn seen(&self) -> Vec<RefreshTarget> {
        self.seen.lock().clone()
    }
}

impl RefreshHook for RecordingRefresh {
    fn refresh(&self, target: RefreshTarget) {
        self.seen.lock().push(target);
    }
}
