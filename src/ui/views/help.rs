//! Help panel listing keyboard shortcuts.
//!
//! Opened with '?' and closed with '?', 'q' or Escape. Scrolls with the
//! arrows (and j/k in vim mode) when the terminal is too short.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::events::{keybindings_grouped, KeyContext, Keybinding};
use crate::logging;
use crate::ui::theme::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    Close,
}

pub struct HelpView {
    grouped_bindings: Vec<(KeyContext, Vec<Keybinding>)>,
    scroll: usize,
    visible_height: usize,
    vim_mode: bool,
}

impl HelpView {
    pub fn new(vim_mode: bool) -> Self {
        Self {
            grouped_bindings: keybindings_grouped(vim_mode),
            scroll: 0,
            visible_height: 0,
            vim_mode,
        }
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    fn total_lines(&self) -> usize {
        // Header and blank line per section, plus the footer.
        self.grouped_bindings
            .iter()
            .map(|(_, bindings)| bindings.len() + 3)
            .sum::<usize>()
            + 2
    }

    fn max_scroll(&self) -> usize {
        self.total_lines().saturating_sub(self.visible_height)
    }

    pub fn handle_input(&mut self, key_event: KeyEvent) -> Option<HelpAction> {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('j' | 'k'), _) if !self.vim_mode => None,
            (KeyCode::Char('?'), _) | (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
                Some(HelpAction::Close)
            }
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();

        let width = area.width.min(60);
        let height = area.height.min(self.total_lines() as u16 + 2);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Help - Keyboard Shortcuts ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        self.visible_height = inner.height as usize;
        self.scroll = self.scroll.min(self.max_scroll());

        let paragraph = Paragraph::new(self.build_content_lines()).scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, inner);
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let t = theme();
        let mut lines = Vec::new();

        for (context, bindings) in &self.grouped_bindings {
            lines.push(Line::styled(
                format!("── {} ──", context.title()),
                Style::default().fg(t.border_focused).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(""));
            for binding in bindings {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:>16}", binding.keys),
                        Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::raw(binding.description),
                ]));
            }
            lines.push(Line::raw(""));
        }

        if let Some(dir) = logging::log_directory() {
            lines.push(Line::styled(
                format!("Logs: {}", dir.display()),
                Style::default().fg(t.muted),
            ));
        }
        lines.push(Line::styled(
            "Press ?, q, or Esc to close",
            Style::default().fg(t.muted),
        ));
        lines
    }
}
