//! Request orchestration
//!
//! Drives convert/validate calls against the conversion service and folds every
//! outcome into the shared [`Workbench`]. Explicit actions toggle the busy state
//! around their call; silent validation never does.
//!
//! Outcomes apply in completion order. Nothing sequences an explicit request
//! against a silent one, so a late silent `Invalid` can overwrite the status of a
//! convert that finished before it. The lock is only ever held for synchronous
//! segments, never across a service call.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::clipboard::Clipboard;
use super::error::{ClientError, ClientResult, ClipboardError, InputError};
use super::refresh::{RefreshHook, RefreshTarget, TracingRefresh};
use super::request::{ConversionMode, ConversionOutcome, ConversionRequest, ValidationOutcome};
use super::service_client::ConversionService;
use super::state::{BusyState, CopyControl, Workbench};

/// Status text after a successful conversion
pub const CONVERT_SUCCESS: &str = "Code converted successfully!";
/// Status text after an explicit validation passes
pub const VALIDATE_SUCCESS: &str = "Code validation passed!";
/// Status text heading an invalid validation result
pub const VALIDATE_FAILED: &str = "Validation failed";
/// Connectivity message for a convert that could not complete
pub const CONVERT_CONNECTIVITY: &str =
    "Failed to convert code. Please check your connection and try again.";
/// Connectivity message for a validate that could not complete
pub const VALIDATE_CONNECTIVITY: &str =
    "Failed to validate code. Please check your connection and try again.";
/// Status text when the clipboard write fails
pub const CLIPBOARD_FAILURE: &str = "Failed to copy to clipboard. Please copy manually.";

/// Default delay before the copy acknowledgment reverts
pub const DEFAULT_COPY_ACK_DELAY: Duration = Duration::from_millis(2000);

/// Restores `Idle` when an explicit request ends, however it ends.
struct BusyGuard {
    state: Arc<Mutex<Workbench>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.lock().busy = BusyState::Idle;
    }
}

/// Top-level coordinator for user actions.
///
/// Cheap to clone; clones share the same workbench state and collaborators.
#[derive(Clone)]
pub struct RequestOrchestrator {
    service: Arc<dyn ConversionService>,
    clipboard: Arc<dyn Clipboard>,
    refresh: Arc<dyn RefreshHook>,
    state: Arc<Mutex<Workbench>>,
    copy_ack_delay: Duration,
}

impl RequestOrchestrator {
    /// Create an orchestrator with a fresh workbench in `mode`
    pub fn new(
        service: Arc<dyn ConversionService>,
        clipboard: Arc<dyn Clipboard>,
        mode: ConversionMode,
    ) -> Self {
        Self {
            service,
            clipboard,
            refresh: Arc::new(TracingRefresh),
            state: Arc::new(Mutex::new(Workbench::new(mode))),
            copy_ack_delay: DEFAULT_COPY_ACK_DELAY,
        }
    }

    /// Route refresh notifications to `hook`
    pub fn with_refresh(mut self, hook: Arc<dyn RefreshHook>) -> Self {
        self.refresh = hook;
        self
    }

    /// Override how long the copy acknowledgment stays up
    pub fn with_copy_ack_delay(mut self, delay: Duration) -> Self {
        self.copy_ack_delay = delay;
        self
    }

    /// Clone of the current workbench state
    pub fn snapshot(&self) -> Workbench {
        self.state.lock().clone()
    }

    /// Read the workbench without cloning it
    pub fn with_state<R>(&self, f: impl FnOnce(&Workbench) -> R) -> R {
        f(&self.state.lock())
    }

    /// Current busy state
    pub fn busy(&self) -> BusyState {
        self.state.lock().busy
    }

    /// True when the trimmed buffer has content
    pub fn has_source(&self) -> bool {
        self.state.lock().has_source()
    }

    /// Replace the text buffer
    pub fn set_source(&self, text: impl Into<String>) {
        self.state.lock().source = text.into();
    }

    /// Switch conversion mode; the input placeholder follows it
    pub fn set_mode(&self, mode: ConversionMode) {
        self.state.lock().mode = mode;
        tracing::debug!(%mode, "conversion mode changed");
    }

    /// Convert the buffer.
    ///
    /// Empty input is reported without contacting the service. Otherwise the
    /// workbench is busy and its messages cleared until the outcome is applied.
    pub async fn request_convert(&self) {
        let request = {
            let mut state = self.state.lock();
            match ConversionRequest::new(&state.source, state.mode) {
                Some(request) => {
                    state.busy = BusyState::Busy;
                    state.messages.reset();
                    request
                }
                None => {
                    state
                        .messages
                        .set_status_error(InputError::EmptyConvertSource.to_string(), &[]);
                    drop(state);
                    self.refresh.refresh(RefreshTarget::Messages);
                    return;
                }
            }
        };
        let _busy = BusyGuard {
            state: self.state.clone(),
        };

        let span = tracing::info_span!(
            "convert",
            request_id = %Uuid::new_v4(),
            mode = %request.mode(),
        );
        let result = self.service.convert(request).instrument(span.clone()).await;
        span.in_scope(|| self.apply_convert_result(result));
    }

    /// Validate the buffer.
    ///
    /// Silent calls (from the debouncer) skip busy toggling and message
    /// clearing, stay quiet on empty input and on success, and surface only
    /// `Invalid` outcomes.
    pub async fn request_validate(&self, silent: bool) {
        let request = {
            let mut state = self.state.lock();
            match ConversionRequest::new(&state.source, state.mode) {
                Some(request) => {
                    if !silent {
                        state.busy = BusyState::Busy;
                        state.messages.reset();
                    }
                    request
                }
                None if silent => {
                    tracing::debug!("silent validation skipped: empty source");
                    return;
                }
                None => {
                    state
                        .messages
                        .set_status_error(InputError::EmptyValidateSource.to_string(), &[]);
                    drop(state);
                    self.refresh.refresh(RefreshTarget::Messages);
                    return;
                }
            }
        };
        let _busy = (!silent).then(|| BusyGuard {
            state: self.state.clone(),
        });

        let span = tracing::info_span!(
            "validate",
            request_id = %Uuid::new_v4(),
            mode = %request.mode(),
            silent,
        );
        let result = self.service.validate(request).instrument(span.clone()).await;
        span.in_scope(|| self.apply_validate_result(silent, result));
    }

    /// Reset buffer, output, object lists and messages. Never contacts the service.
    pub fn clear(&self) {
        self.state.lock().clear();
        self.refresh.refresh(RefreshTarget::Output);
        self.refresh.refresh(RefreshTarget::Objects);
        self.refresh.refresh(RefreshTarget::Messages);
    }

    /// Copy the displayed DAX to the clipboard.
    ///
    /// Does nothing while there is no output. On success the copy control shows
    /// an acknowledgment that reverts after the configured delay.
    pub async fn copy_converted_code(&self) {
        let text = match self.state.lock().converted_code.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return,
        };

        let clipboard = self.clipboard.clone();
        let written = tokio::task::spawn_blocking(move || clipboard.write_text(&text))
            .await
            .unwrap_or_else(|err| Err(ClipboardError::Unavailable(err.to_string())));

        match written {
            Ok(()) => self.acknowledge_copy(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to copy to clipboard");
                self.state
                    .lock()
                    .messages
                    .set_status_error(CLIPBOARD_FAILURE, &[]);
                self.refresh.refresh(RefreshTarget::Messages);
            }
        }
    }

    fn apply_convert_result(&self, result: ClientResult<ConversionOutcome>) {
        match result {
            Ok(ConversionOutcome::Success {
                converted_code,
                identified_objects,
                warnings,
                notes,
            }) => {
                tracing::info!(
                    warnings = warnings.len(),
                    notes = notes.len(),
                    "conversion succeeded"
                );
                {
                    let mut state = self.state.lock();
                    state.converted_code = Some(converted_code);
                    state.objects.project(&identified_objects);
                    if !warnings.is_empty() {
                        state.messages.add_warnings(&warnings);
                    }
                    if !notes.is_empty() {
                        state.messages.add_notes(&notes);
                    }
                    state.messages.set_status_success(CONVERT_SUCCESS);
                }
                self.refresh.refresh(RefreshTarget::Output);
                self.refresh.refresh(RefreshTarget::Objects);
                self.refresh.refresh(RefreshTarget::Messages);
            }
            Ok(ConversionOutcome::Failure {
                message,
                suggestions,
            }) => {
                tracing::info!(%message, "conversion rejected by service");
                self.state
                    .lock()
                    .messages
                    .set_status_error(message, &suggestions);
                self.refresh.refresh(RefreshTarget::Messages);
            }
            Err(err) => {
                self.report_transport_error(&err, CONVERT_CONNECTIVITY);
            }
        }
    }

    fn apply_validate_result(&self, silent: bool, result: ClientResult<ValidationOutcome>) {
        match result {
            Ok(ValidationOutcome::Valid) => {
                tracing::debug!("validation passed");
                if !silent {
                    self.state
                        .lock()
                        .messages
                        .set_status_success(VALIDATE_SUCCESS);
                    self.refresh.refresh(RefreshTarget::Messages);
                }
            }
            Ok(ValidationOutcome::Invalid {
                suggestions,
                errors,
            }) => {
                tracing::info!(errors = errors.len(), "validation failed");
                {
                    let mut state = self.state.lock();
                    state
                        .messages
                        .set_status_error(VALIDATE_FAILED, &suggestions);
                    state.messages.add_error_entries(&errors);
                }
                self.refresh.refresh(RefreshTarget::Messages);
            }
            Err(err) if silent => {
                tracing::warn!(error = %err, "background validation could not reach the service");
            }
            Err(err) => {
                self.report_transport_error(&err, VALIDATE_CONNECTIVITY);
            }
        }
    }

    fn acknowledge_copy(&self) {
        let generation = {
            let mut state = self.state.lock();
            state.copy_generation += 1;
            state.copy_control = CopyControl::Acknowledged;
            state.copy_generation
        };
        self.refresh.refresh(RefreshTarget::CopyControl);

        let state = self.state.clone();
        let refresh = self.refresh.clone();
        let delay = self.copy_ack_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = state.lock();
                // A newer copy restarted the acknowledgment.
                if state.copy_generation != generation {
                    return;
                }
                state.copy_control = CopyControl::Ready;
            }
            refresh.refresh(RefreshTarget::CopyControl);
        });
    }

    fn report_transport_error(&self, err: &ClientError, message: &str) {
        tracing::warn!(error = %err, "conversion service call failed");
        self.state.lock().messages.set_status_error(message, &[]);
        self.refresh.refresh(RefreshTarget::Messages);
    }
}

impl std::fmt::Debug for RequestOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOrchestrator")
            .field("state", &*self.state.lock())
            .field("copy_ack_delay", &self.copy_ack_delay)
            .finish_non_exhaustive()
    }
}
