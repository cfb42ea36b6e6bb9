//! Categorized outcome messages
//!
//! The presenter holds one status slot (last writer wins), append-only warning
//! and note lists, and itemized error entries. Whether the "no messages"
//! placeholder shows is derived from those fields, so it can never disagree
//! with them.

use serde::Serialize;

use crate::util::html::escape_html;

/// The single primary outcome indicator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum StatusMessage {
    /// Nothing reported
    #[default]
    None,
    /// The last action succeeded
    Success(String),
    /// The last action failed
    Error {
        /// Error text
        text: String,
        /// Suggestions shown under the error
        suggestions: Vec<String>,
    },
}

impl StatusMessage {
    /// True for `StatusMessage::None`
    pub fn is_none(&self) -> bool {
        matches!(self, StatusMessage::None)
    }
}

/// Currently visible message categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationState {
    /// Primary status
    pub status: StatusMessage,
    /// Conversion warnings
    pub warnings: Vec<String>,
    /// Conversion notes
    pub notes: Vec<String>,
    /// Itemized validation errors, one entry each
    pub error_entries: Vec<String>,
}

impl PresentationState {
    /// True iff any category has content
    pub fn has_any_message(&self) -> bool {
        !self.status.is_none()
            || !self.warnings.is_empty()
            || !self.notes.is_empty()
            || !self.error_entries.is_empty()
    }

    /// The "no messages" placeholder shows iff nothing else does
    pub fn placeholder_visible(&self) -> bool {
        !self.has_any_message()
    }
}

/// Visual category of a rendered message block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    /// Success status
    Success,
    /// Warning list
    Warning,
    /// Note list
    Note,
    /// Error status or error entry
    Error,
}

impl MessageKind {
    /// Icon name substituted by the rendering service
    pub fn icon(&self) -> &'static str {
        match self {
            MessageKind::Success => "check-circle",
            MessageKind::Warning => "alert-triangle",
            MessageKind::Note => "info",
            MessageKind::Error => "alert-circle",
        }
    }
}

/// One escaped message block ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    /// Visual category
    pub kind: MessageKind,
    /// Heading line
    pub heading: String,
    /// Escaped list items under the heading
    pub items: Vec<String>,
}

/// Owns the [`PresentationState`] and applies message operations to it.
#[derive(Debug, Clone, Default)]
pub struct MessagePresenter {
    state: PresentationState,
}

impl MessagePresenter {
    /// Create a presenter at the no-messages baseline
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// Replace the status with a success message.
    ///
    /// Error entries belong to the status they were reported with and go with it.
    pub fn set_status_success(&mut self, text: impl Into<String>) {
        self.state.error_entries.clear();
        self.state.status = StatusMessage::Success(text.into());
    }

    /// Replace the status with an error message, dropping earlier error entries
    pub fn set_status_error(&mut self, text: impl Into<String>, suggestions: &[String]) {
        self.state.error_entries.clear();
        self.state.status = StatusMessage::Error {
            text: text.into(),
            suggestions: suggestions.to_vec(),
        };
    }

    /// Append warnings
    pub fn add_warnings(&mut self, warnings: &[String]) {
        self.state.warnings.extend_from_slice(warnings);
    }

    /// Append notes
    pub fn add_notes(&mut self, notes: &[String]) {
        self.state.notes.extend_from_slice(notes);
    }

    /// Append one error entry per item, under the current status
    pub fn add_error_entries(&mut self, errors: &[String]) {
        self.state.error_entries.extend_from_slice(errors);
    }

    /// Back to the no-messages baseline
    pub fn reset(&mut self) {
        self.state = PresentationState::default();
    }

    /// Render visible messages in display order: status, warnings, notes, error entries.
    pub fn render(&self) -> Vec<RenderedMessage> {
        let mut rendered = Vec::new();

        match &self.state.status {
            StatusMessage::None => {}
            StatusMessage::Success(text) => rendered.push(RenderedMessage {
                kind: MessageKind::Success,
                heading: escape_html(text),
                items: Vec::new(),
            }),
            StatusMessage::Error { text, suggestions } => rendered.push(RenderedMessage {
                kind: MessageKind::Error,
                heading: format!("Error: {}", escape_html(text)),
                items: suggestions.iter().map(|s| escape_html(s)).collect(),
            }),
        }

        if !self.state.warnings.is_empty() {
            rendered.push(RenderedMessage {
                kind: MessageKind::Warning,
                heading: "Conversion Warnings:".to_string(),
                items: self.state.warnings.iter().map(|w| escape_html(w)).collect(),
            });
        }

        if !self.state.notes.is_empty() {
            rendered.push(RenderedMessage {
                kind: MessageKind::Note,
                heading: "Conversion Notes:".to_string(),
                items: self.state.notes.iter().map(|n| escape_html(n)).collect(),
            });
        }

        for error in &self.state.error_entries {
            rendered.push(RenderedMessage {
                kind: MessageKind::Error,
                heading: format!("Error: {}", escape_html(error)),
                items: Vec::new(),
            });
        }

        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn baseline_shows_placeholder() {
        let presenter = MessagePresenter::new();
        assert!(presenter.state().placeholder_visible());
        assert!(!presenter.state().has_any_message());
        assert!(presenter.render().is_empty());
    }

    #[test]
    fn status_is_last_writer_wins() {
        let mut presenter = MessagePresenter::new();
        presenter.set_status_success("done");
        presenter.set_status_error("broken", &strings(&["fix it"]));
        assert_eq!(
            presenter.state().status,
            StatusMessage::Error {
                text: "broken".into(),
                suggestions: strings(&["fix it"]),
            }
        );
    }

    #[test]
    fn warnings_alone_hide_placeholder() {
        let mut presenter = MessagePresenter::new();
        presenter.add_warnings(&strings(&["W1"]));
        assert!(presenter.state().has_any_message());
        assert!(!presenter.state().placeholder_visible());
    }

    #[test]
    fn adding_nothing_keeps_placeholder() {
        let mut presenter = MessagePresenter::new();
        presenter.add_notes(&[]);
        presenter.add_warnings(&[]);
        assert!(presenter.state().placeholder_visible());
    }

    #[test]
    fn reset_clears_everything() {
        let mut presenter = MessagePresenter::new();
        presenter.set_status_success("ok");
        presenter.add_warnings(&strings(&["W1"]));
        presenter.add_notes(&strings(&["N1"]));
        presenter.add_error_entries(&strings(&["E1"]));
        presenter.reset();
        assert_eq!(presenter.state(), &PresentationState::default());
        assert!(presenter.state().placeholder_visible());
    }

    #[test]
    fn new_status_drops_stale_error_entries() {
        let mut presenter = MessagePresenter::new();
        presenter.set_status_error("Validation failed", &strings(&["S1"]));
        presenter.add_error_entries(&strings(&["E1", "E2"]));

        presenter.set_status_error("Please enter source code to convert.", &[]);
        assert!(presenter.state().error_entries.is_empty());
        assert_eq!(presenter.render().len(), 1);

        presenter.add_error_entries(&strings(&["E3"]));
        presenter.set_status_success("Code validation passed!");
        assert!(presenter.state().error_entries.is_empty());
    }

    #[test]
    fn render_escapes_and_orders_blocks() {
        let mut presenter = MessagePresenter::new();
        presenter.set_status_error("Validation failed", &strings(&["Use <b>"]));
        presenter.add_error_entries(&strings(&["E1", "E2"]));
        let rendered = presenter.render();
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0].kind, MessageKind::Error);
        assert_eq!(rendered[0].heading, "Error: Validation failed");
        assert_eq!(rendered[0].items, strings(&["Use &lt;b&gt;"]));
        assert_eq!(rendered[1].heading, "Error: E1");
        assert_eq!(rendered[2].heading, "Error: E2");
    }
}
