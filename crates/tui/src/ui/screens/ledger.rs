use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    ui::{components::money, theme::Theme},
    view::{Focus, FormField, LedgerState, LedgerView, RowField, RowView},
};

const CURSOR: &str = "▏";

pub fn render(frame: &mut Frame<'_>, area: Rect, view: &LedgerView) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Rows
            Constraint::Length(1), // Total
            Constraint::Length(4), // New entry form
        ])
        .split(area);

    let state = view.state();
    render_rows(frame, layout[0], &state, view.focus() == Focus::Rows, &theme);
    render_total(frame, layout[1], &state, &theme);
    render_form(frame, layout[2], view, &theme);
}

fn render_rows(frame: &mut Frame<'_>, area: Rect, state: &LedgerState, focused: bool, theme: &Theme) {
    let items = state
        .rows
        .iter()
        .map(|row| ListItem::new(row_line(row, theme)))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if focused && !items.is_empty() {
        list_state.select(Some(state.selected));
    }

    let border = if focused { theme.accent } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title("Entries");

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No entries yet.",
            Style::default().fg(theme.dim),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn row_line(row: &RowView, theme: &Theme) -> Line<'static> {
    let date = Span::styled(
        format!("{:<11}", row.human_date()),
        Style::default().fg(theme.dim),
    );
    let editing = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::UNDERLINED);

    let (description, amount) = match (row.editing_field(), row.buffer()) {
        (Some(RowField::Description), Some(buffer)) => (
            Span::styled(format!("{buffer}{CURSOR}"), editing),
            money::styled_amount(row.raw_amount(), theme),
        ),
        (Some(RowField::Amount), Some(buffer)) => (
            Span::raw(row.description().to_string()),
            Span::styled(format!("{buffer:>10}{CURSOR}"), editing),
        ),
        _ => (
            Span::raw(row.description().to_string()),
            money::styled_amount(row.raw_amount(), theme),
        ),
    };

    Line::from(vec![date, amount, Span::raw("  "), description])
}

fn render_total(frame: &mut Frame<'_>, area: Rect, state: &LedgerState, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" Total ", Style::default().fg(theme.dim)),
        money::styled_total(state.total, theme),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, view: &LedgerView, theme: &Theme) {
    let form = view.form();
    let field_line = |label: &'static str, field: FormField| {
        let focused = view.focus() == Focus::Form(field);
        let label_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.dim)
        };
        let cursor = if focused { CURSOR } else { "" };
        Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(format!("{}{cursor}", form.field(field))),
        ])
    };

    let border = if matches!(view.focus(), Focus::Form(_)) {
        theme.accent
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title("New entry");
    let content = Paragraph::new(vec![
        field_line("Description: ", FormField::Description),
        field_line("Amount:      ", FormField::Amount),
    ])
    .block(block);
    frame.render_widget(content, area);
}
