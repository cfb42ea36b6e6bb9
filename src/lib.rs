//! Daxlift – client-side orchestration for an interactive SQL/Spotfire to DAX converter
//!
//! This crate drives a remote conversion service and keeps a consistent UI state:
//! - Convert and validate requests with busy-state bracketing
//! - Debounced background validation while the user types
//! - Merging of status, warning, note and error messages into one presentation
//! - Projection of identified tables, columns, functions and aliases
//! - Clipboard copy with a transient acknowledgment

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Small shared helpers
pub mod util;

/// Request orchestration and UI state
pub mod workbench;

// Re-export key types for convenience
pub use workbench::{ConverterSession, WorkbenchConfig};

/// Current version of the Daxlift client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
