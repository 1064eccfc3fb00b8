use engine::format_amount;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Expenses are positive amounts, so they take the `negative` color;
/// refunds (negative amounts) take `positive`. NaN renders as an error.
fn amount_color(amount: f64, theme: &Theme) -> ratatui::style::Color {
    if amount.is_nan() {
        theme.error
    } else if amount > 0.0 {
        theme.negative
    } else if amount < 0.0 {
        theme.positive
    } else {
        theme.text
    }
}

#[must_use]
pub fn styled_amount(amount: f64, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!("{:>10}", format_amount(amount)),
        Style::default().fg(amount_color(amount, theme)),
    )
}

/// Bold variant for the total line.
#[must_use]
pub fn styled_total(amount: f64, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_amount(amount),
        Style::default()
            .fg(amount_color(amount, theme))
            .add_modifier(Modifier::BOLD),
    )
}
