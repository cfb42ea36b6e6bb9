//! Clipboard boundary
//!
//! A single scoped write: implementations acquire clipboard access, write the
//! text, and release access before returning. No read access is used.

use parking_lot::Mutex;
use std::io::Write;
use std::process::{Command, Stdio};

use super::error::ClipboardError;

/// Write-only clipboard access
pub trait Clipboard: Send + Sync + 'static {
    /// Replace the clipboard contents with `text`
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for headless use and tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemoryClipboard {
    /// Writable clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard that refuses every write
    pub fn unavailable() -> Self {
        Self {
            contents: Mutex::new(None),
            unavailable: true,
        }
    }

    /// Last written text
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::Unavailable(
                "clipboard write permission denied".to_string(),
            ));
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard backed by a system helper that reads the text on stdin
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Use an explicit helper command
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Pick the usual helper for the current platform
    pub fn system() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(windows) {
            Self::new("clip", Vec::new())
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::new())
        } else {
            Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            )
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                ClipboardError::Unavailable(format!("failed to start {}: {err}", self.program))
            })?;

        {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                ClipboardError::Unavailable(format!("{} did not expose stdin", self.program))
            })?;
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ClipboardError::CommandFailed {
                command: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}
