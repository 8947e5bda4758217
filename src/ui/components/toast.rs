//! Transient toast messages shown in the bottom-right corner.

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme::theme;

const INFO_DURATION: Duration = Duration::from_secs(3);
const ERROR_DURATION: Duration = Duration::from_secs(5);
const MAX_VISIBLE: usize = 3;
const TOAST_WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ",
            ToastKind::Error => "✗",
        }
    }

    fn color(self) -> Color {
        match self {
            ToastKind::Info => theme().accent,
            ToastKind::Error => theme().error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info, INFO_DURATION)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error, ERROR_DURATION)
    }

    fn new(message: impl Into<String>, kind: ToastKind, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Queue of active toasts. Only the newest few are kept.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.items.push(toast);
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Toast::info(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::error(message));
    }

    /// Drop expired toasts.
    pub fn tick(&mut self) {
        self.items.retain(|t| !t.is_expired());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let inner_width = width.saturating_sub(4).max(1) as usize;
        let mut bottom = area.y + area.height.saturating_sub(1);

        for toast in self.iter().rev() {
            let text_len = toast.message.chars().count() + 2;
            let lines = text_len.div_ceil(inner_width).max(1) as u16;
            let height = lines + 2;
            if bottom < area.y + height {
                break;
            }
            let rect = Rect::new(
                area.x + area.width.saturating_sub(width + 1),
                bottom - height,
                width,
                height,
            );
            bottom -= height;

            let color = toast.kind.color();
            let line = Line::from(vec![
                Span::styled(format!("{} ", toast.kind.icon()), Style::default().fg(color)),
                Span::raw(toast.message.as_str()),
            ]);
            let paragraph = Paragraph::new(line).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
            frame.render_widget(Clear, rect);
            frame.render_widget(paragraph, rect);
        }
    }
}
