//! Two-state field used for the sort direction and advanced-search switches.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// Render a boxed toggle showing `on_text` or `off_text`.
pub fn render_toggle(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: bool,
    (on_text, off_text): (&str, &str),
    focused: bool,
) {
    let t = theme();
    let border_style = if focused {
        Style::default().fg(t.border_focused)
    } else {
        Style::default().fg(t.border)
    };
    let title_style = if focused {
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.fg)
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let text = if value { on_text } else { off_text };
    let style = if value {
        Style::default().fg(t.accent)
    } else {
        Style::default().fg(t.fg)
    };
    frame.render_widget(Paragraph::new(text.to_string()).style(style).block(block), area);
}
