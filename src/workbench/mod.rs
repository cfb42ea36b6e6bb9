//! Converter workbench and public API
//!
//! This module provides [`ConverterSession`], which wires the request
//! orchestrator, the validation debouncer and their collaborators together and
//! exposes the user actions of the converter.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// Submodules
pub mod clipboard;
pub mod debounce;
pub mod error;
pub mod objects;
pub mod orchestrator;
pub mod presenter;
pub mod refresh;
pub mod request;
pub mod service_client;
pub mod state;

use clipboard::{Clipboard, CommandClipboard};
use debounce::ValidationDebouncer;
use error::{Result, WorkbenchError};
use orchestrator::RequestOrchestrator;
use refresh::{RefreshHook, TracingRefresh};
use request::ConversionMode;
use service_client::{ConversionService, HttpConversionClient};
use state::Workbench;

/// Configuration for a converter session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Base URL of the conversion service
    pub endpoint: String,

    /// Quiet period before background validation fires (milliseconds)
    pub quiet_period_ms: u64,

    /// How long the copy acknowledgment stays visible (milliseconds)
    pub copy_ack_ms: u64,

    /// Transport timeout for service calls; none by default
    pub request_timeout_secs: Option<u64>,

    /// Conversion mode selected at startup
    pub mode: ConversionMode,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            quiet_period_ms: 1500,
            copy_ack_ms: 2000,
            request_timeout_secs: None,
            mode: ConversionMode::SqlToTarget,
        }
    }
}

impl WorkbenchConfig {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config: WorkbenchConfig = serde_json::from_slice(&data)?;
        Ok(config)
    }

    /// Apply `DAXLIFT_ENDPOINT`, `DAXLIFT_TIMEOUT_SECS` and `DAXLIFT_MODE`
    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(endpoint) = env_value("DAXLIFT_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = env_value("DAXLIFT_TIMEOUT_SECS") {
            let secs = timeout.parse::<u64>().map_err(|err| {
                WorkbenchError::Config(format!("DAXLIFT_TIMEOUT_SECS '{timeout}': {err}"))
            })?;
            self.request_timeout_secs = Some(secs);
        }
        if let Some(mode) = env_value("DAXLIFT_MODE") {
            self.mode = mode.parse().map_err(WorkbenchError::Config)?;
        }
        Ok(self)
    }

    /// Debounce quiet period
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Copy acknowledgment delay
    pub fn copy_ack_delay(&self) -> Duration {
        Duration::from_millis(self.copy_ack_ms)
    }

    /// Transport timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// A running converter: orchestrator plus background validation.
///
/// Must be created and used inside a tokio runtime.
#[derive(Debug)]
pub struct ConverterSession {
    config: WorkbenchConfig,
    orchestrator: RequestOrchestrator,
    debouncer: ValidationDebouncer,
}

impl ConverterSession {
    /// Connect to the HTTP service named in `config`, using the system clipboard
    pub fn connect(config: WorkbenchConfig) -> Result<Self> {
        let service = HttpConversionClient::new(&config.endpoint, config.request_timeout())?;
        tracing::info!(endpoint = %service.base_url(), mode = %config.mode, "converter session ready");
        Ok(Self::with_parts(
            config,
            Arc::new(service),
            Arc::new(CommandClipboard::system()),
            Arc::new(TracingRefresh),
        ))
    }

    /// Build a session from explicit collaborators
    pub fn with_parts(
        config: WorkbenchConfig,
        service: Arc<dyn ConversionService>,
        clipboard: Arc<dyn Clipboard>,
        refresh: Arc<dyn RefreshHook>,
    ) -> Self {
        let orchestrator = RequestOrchestrator::new(service, clipboard, config.mode)
            .with_refresh(refresh)
            .with_copy_ack_delay(config.copy_ack_delay());
        let debouncer = ValidationDebouncer::new(orchestrator.clone(), config.quiet_period());
        Self {
            config,
            orchestrator,
            debouncer,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    /// The orchestrator behind this session
    pub fn orchestrator(&self) -> &RequestOrchestrator {
        &self.orchestrator
    }

    /// The debouncer behind this session
    pub fn debouncer(&self) -> &ValidationDebouncer {
        &self.debouncer
    }

    /// Clone of the current UI state
    pub fn snapshot(&self) -> Workbench {
        self.orchestrator.snapshot()
    }

    /// Replace the buffer as typed and schedule background validation
    pub fn edit_source(&self, text: impl Into<String>) {
        self.orchestrator.set_source(text);
        self.debouncer.on_input_changed();
    }

    /// Switch conversion mode
    pub fn set_mode(&self, mode: ConversionMode) {
        self.orchestrator.set_mode(mode);
    }

    /// Convert button
    pub async fn convert(&self) {
        self.orchestrator.request_convert().await;
    }

    /// Validate button
    pub async fn validate(&self) {
        self.orchestrator.request_validate(false).await;
    }

    /// Clear button
    pub fn clear(&self) {
        self.orchestrator.clear();
    }

    /// Copy button
    pub async fn copy(&self) {
        self.orchestrator.copy_converted_code().await;
    }
}
