use ratatui::{style::Style, text::Span};

use crate::{
    ui::theme::Theme,
    view::{Focus, LedgerView},
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Hints for whatever currently has focus.
pub fn for_view(view: &LedgerView) -> Vec<KeyHint> {
    if view.is_editing() {
        return vec![
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "done"),
            KeyHint::new("Tab", "form"),
        ];
    }
    match view.focus() {
        Focus::Form(_) => vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "add"),
            KeyHint::new("Esc", "rows"),
            KeyHint::new("Ctrl+C", "quit"),
        ],
        Focus::Rows => vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("e", "description"),
            KeyHint::new("a", "amount"),
            KeyHint::new("x", "delete"),
            KeyHint::new("Tab", "form"),
            KeyHint::new("q", "quit"),
        ],
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}
