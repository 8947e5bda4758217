//! Free-text search field.
//!
//! Edits stay local until committed. Enter commits, losing focus commits if
//! the text changed, and Esc throws the edit away and restores the last
//! committed text. Only commits change the query.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// Result of handling a key in the [`SearchInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// The text was committed and should become the query's search text.
    Commit(String),
    /// The edit was abandoned.
    Revert,
}

/// A single-line search box with a committed value.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    value: String,
    committed: String,
    /// Cursor position in chars.
    cursor: usize,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.value != self.committed
    }

    /// Replace both the text and the committed value.
    pub fn set_committed(&mut self, value: impl Into<String>) {
        self.committed = value.into();
        self.value = self.committed.clone();
        self.cursor = self.value.chars().count();
    }

    /// Called when focus moves away. Commits pending edits.
    pub fn blur(&mut self) -> Option<SearchAction> {
        self.is_dirty().then(|| self.commit())
    }

    fn commit(&mut self) -> SearchAction {
        self.committed = self.value.clone();
        SearchAction::Commit(self.committed.clone())
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Handle a key while the field has focus.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<SearchAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => Some(self.commit()),
            (KeyCode::Esc, _) => {
                let value = self.committed.clone();
                self.set_committed(value);
                Some(SearchAction::Revert)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor = 0;
                None
            }
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.cursor = 0;
                None
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.cursor = self.len();
                None
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let idx = self.byte_index();
                self.value.insert(idx, c);
                self.cursor += 1;
                None
            }
            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index();
                    self.value.remove(idx);
                }
                None
            }
            (KeyCode::Delete, _) => {
                if self.cursor < self.len() {
                    let idx = self.byte_index();
                    self.value.remove(idx);
                }
                None
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            (KeyCode::Right, _) => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, label: &str) {
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

        let paragraph = if self.value.is_empty() && !focused {
            Paragraph::new("Search summaries...").style(Style::default().fg(t.muted))
        } else {
            Paragraph::new(self.value.as_str()).style(Style::default().fg(t.fg))
        };
        frame.render_widget(paragraph.block(block), area);

        if focused {
            let x = area.x + 1 + self.cursor as u16;
            let max_x = area.x + area.width.saturating_sub(2);
            frame.set_cursor_position(Position::new(x.min(max_x), area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(input: &mut SearchInput, text: &str) {
        for c in text.chars() {
            assert!(input.handle_input(key(KeyCode::Char(c))).is_none());
        }
    }

    #[test]
    fn test_typing_does_not_commit() {
        let mut input = SearchInput::new();
        type_text(&mut input, "crash");
        assert_eq!(input.value, "crash");
        assert_eq!(input.committed, "");
        assert!(input.is_dirty());
    }

    #[test]
    fn test_enter_commits() {
        let mut input = SearchInput::new();
        type_text(&mut input, "crash");
        let action = input.handle_input(key(KeyCode::Enter));
        assert_eq!(action, Some(SearchAction::Commit("crash".to_string())));
        assert_eq!(input.committed, "crash");
        assert!(!input.is_dirty());
    }

    #[test]
    fn test_escape_reverts() {
        let mut input = SearchInput::new();
        input.set_committed("boat");
        type_text(&mut input, "s");
        assert_eq!(input.value, "boats");

        let action = input.handle_input(key(KeyCode::Esc));
        assert_eq!(action, Some(SearchAction::Revert));
        assert_eq!(input.value, "boat");
        assert!(!input.is_dirty());
    }

    #[test]
    fn test_blur_commits_only_when_changed() {
        let mut input = SearchInput::new();
        assert!(input.blur().is_none());

        type_text(&mut input, "lag");
        assert_eq!(input.blur(), Some(SearchAction::Commit("lag".to_string())));
        assert!(input.blur().is_none());
    }

    #[test]
    fn test_editing_with_multibyte_chars() {
        let mut input = SearchInput::new();
        type_text(&mut input, "héllo");
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.value, "hllo");

        input.handle_input(key(KeyCode::Home));
        input.handle_input(key(KeyCode::Delete));
        assert_eq!(input.value, "llo");

        input.handle_input(key(KeyCode::End));
        type_text(&mut input, "!");
        assert_eq!(input.value, "llo!");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = SearchInput::new();
        type_text(&mut input, "text");
        input.handle_input(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(input.value, "");
    }
}
