//! Explicit UI state
//!
//! Everything a rendering layer needs to draw the converter lives in
//! [`Workbench`]. The orchestrator owns it behind a lock and hands out
//! snapshots, so the state machine can be driven without any renderer.

use super::objects::ObjectListProjector;
use super::presenter::MessagePresenter;
use super::request::ConversionMode;

/// Whether an explicit request is outstanding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusyState {
    /// No explicit request in flight
    #[default]
    Idle,
    /// An explicit convert/validate is in flight
    Busy,
}

/// Label state of the copy control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyControl {
    /// Normal "Copy" label
    #[default]
    Ready,
    /// Transient "Copied!" acknowledgment
    Acknowledged,
}

/// Complete client-side UI state
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    /// Source text buffer as typed
    pub source: String,
    /// Selected conversion mode
    pub mode: ConversionMode,
    /// Converted DAX, if any conversion has succeeded since the last clear
    pub converted_code: Option<String>,
    /// Identified-object lists
    pub objects: ObjectListProjector,
    /// Outcome messages
    pub messages: MessagePresenter,
    /// Busy/idle indicator
    pub busy: BusyState,
    /// Copy control label
    pub copy_control: CopyControl,
    /// Bumped on every copy; stale acknowledgment timers compare against it
    pub(crate) copy_generation: u64,
}

impl Workbench {
    /// Fresh state for `mode`
    pub fn new(mode: ConversionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Placeholder shown in the empty input buffer
    pub fn placeholder(&self) -> &'static str {
        self.mode.placeholder()
    }

    /// True when the trimmed buffer has content
    pub fn has_source(&self) -> bool {
        !self.source.trim().is_empty()
    }

    /// Loading indicator visibility
    pub fn loading_visible(&self) -> bool {
        self.busy == BusyState::Busy
    }

    /// Output container visibility (hidden while loading)
    pub fn output_container_visible(&self) -> bool {
        self.busy == BusyState::Idle
    }

    /// Empty-state panel visibility
    pub fn empty_state_visible(&self) -> bool {
        self.converted_code.is_none()
    }

    /// Copy control visibility
    pub fn copy_visible(&self) -> bool {
        self.converted_code.is_some()
    }

    /// Label of the copy control
    pub fn copy_label(&self) -> &'static str {
        match self.copy_control {
            CopyControl::Ready => "Copy",
            CopyControl::Acknowledged => "Copied!",
        }
    }

    /// Reset buffer, output, object lists and messages
    pub(crate) fn clear(&mut self) {
        self.source.clear();
        self.converted_code = None;
        self.objects.clear();
        self.messages.reset();
    }
}
