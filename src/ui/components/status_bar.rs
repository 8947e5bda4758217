//! Bottom status line: key hints on the left, result summary on the right.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// Render hints such as `"[Tab] next [m] more"` with the bracketed keys
/// highlighted, and `summary` right-aligned.
pub fn render_status_bar(frame: &mut Frame, area: Rect, hints: &str, summary: &str) {
    let t = theme();
    let summary_width = summary.chars().count() as u16 + 1;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(summary_width)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(hint_spans(hints))), chunks[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(summary.to_string(), Style::default().fg(t.muted)))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

/// Split hint text into spans, highlighting `[key]` groups.
fn hint_spans(hints: &str) -> Vec<Span<'static>> {
    let t = theme();
    let mut spans = Vec::new();
    let mut rest = hints;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|c| open + c) else {
            break;
        };
        if open > 0 {
            spans.push(Span::styled(
                rest[..open].to_string(),
                Style::default().fg(t.muted),
            ));
        }
        spans.push(Span::styled(
            rest[open..=close].to_string(),
            Style::default().fg(t.accent),
        ));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), Style::default().fg(t.muted)));
    }
    spans
}
