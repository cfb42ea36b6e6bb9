//! Error types for the converter workbench
//!
//! Domain errors use thiserror. Every kind is converted into a presentation
//! update at the orchestrator boundary; none of them escape a user action.

use std::io;
use thiserror::Error;

/// Errors produced by a [`ConversionService`](super::service_client::ConversionService).
///
/// All variants are transport-level: the service call could not complete or its
/// response could not be understood. Structured failures reported by the service
/// travel inside `ConversionOutcome::Failure` / `ValidationOutcome::Invalid` instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failure (unreachable host, timeout, broken connection).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// JSON (de)serialisation error for request or response bodies.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The service returned a payload that does not match the wire contract.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The endpoint configured for the client is not usable.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
}

/// Convenience result alias for service client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Empty source text submitted to an explicit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    /// Convert requested with an empty buffer
    #[error("Please enter source code to convert.")]
    EmptyConvertSource,
    /// Non-silent validate requested with an empty buffer
    #[error("Please enter source code to validate.")]
    EmptyValidateSource,
}

/// Clipboard write failures
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The clipboard could not be acquired for writing.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The helper process exited unsuccessfully.
    #[error("clipboard command '{command}' exited with {status}")]
    CommandFailed {
        /// Program that was invoked
        command: String,
        /// Exit status reported by the process
        status: std::process::ExitStatus,
    },
    /// IO error talking to the clipboard helper
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Top-level workbench error
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// Service client errors
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Input validation errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (config files)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error (config files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using WorkbenchError
pub type Result<T> = std::result::Result<T, WorkbenchError>;
