pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::AppState;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState<'_>) {
    let theme = Theme::default();

    // Info bar, ledger, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_info_bar(frame, layout[0], state, &theme);
    screens::ledger::render(frame, layout[1], state.view);
    render_bottom_bar(frame, layout[2], state, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState<'_>, theme: &Theme) {
    let count = state.view.state().rows.len();
    let line = Line::from(vec![
        Span::styled(
            "Finances",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Source", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.source)),
        Span::styled("Entries", Style::default().fg(theme.dim)),
        Span::raw(format!(": {count}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState<'_>, theme: &Theme) {
    let mut parts = components::hints::hints_to_spans(
        &components::hints::for_view(state.view),
        theme,
    );

    if let Some(status) = state.status {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.push(Span::styled(status.to_string(), Style::default().fg(theme.text)));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
