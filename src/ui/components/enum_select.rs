//! Selector over a list of `{ id, label }` options.
//!
//! Used for the project, filter and sort-field controls. When collapsed it
//! shows the current label; Enter opens the list, arrows (and j/k in vim
//! mode) move, Enter picks and Esc closes without changing anything.
//! Left/Right (h/l in vim mode) cycle through options without opening the list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::catalog::EnumOption;
use crate::ui::theme::theme;

/// Maximum rows shown when the list is open.
const MAX_VISIBLE_OPTIONS: usize = 8;

/// Result of handling a key in an [`EnumSelect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectAction {
    /// The option with this id was picked.
    Select(String),
    /// The list was closed without picking.
    Cancel,
}

/// A selector for one enumerated query field.
#[derive(Debug, Clone)]
pub struct EnumSelect {
    label: String,
    options: Vec<EnumOption>,
    /// Index of the option matching the current value.
    selected: Option<usize>,
    /// Highlighted row while expanded.
    highlighted: usize,
    expanded: bool,
}

impl EnumSelect {
    /// Create a selector with the given label and options.
    pub fn new(label: impl Into<String>, options: Vec<EnumOption>) -> Self {
        Self {
            label: label.into(),
            options,
            selected: None,
            highlighted: 0,
            expanded: false,
        }
    }

    /// Id of the selected option.
    #[cfg(test)]
    pub fn value(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(|o| o.id.as_str())
    }

    /// Sync the displayed value with the query; unknown ids clear it.
    pub fn set_value(&mut self, id: Option<&str>) {
        self.selected = id.and_then(|id| self.options.iter().position(|o| o.id == id));
        self.highlighted = self.selected.unwrap_or(0);
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn expand(&mut self) {
        if !self.options.is_empty() {
            self.expanded = true;
            self.highlighted = self.selected.unwrap_or(0);
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Handle a key while this selector has focus.
    pub fn handle_input(&mut self, key: KeyEvent, vim_mode: bool) -> Option<SelectAction> {
        if self.expanded {
            self.handle_expanded_input(key, vim_mode)
        } else {
            self.handle_collapsed_input(key, vim_mode)
        }
    }

    fn handle_collapsed_input(&mut self, key: KeyEvent, vim_mode: bool) -> Option<SelectAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Char(' '), KeyModifiers::NONE) => {
                self.expand();
                None
            }
            (KeyCode::Char('h' | 'l'), _) if !vim_mode => None,
            (KeyCode::Left, KeyModifiers::NONE) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
                match self.selected {
                    Some(current) if current > 0 => self.pick(current - 1),
                    _ => None,
                }
            }
            (KeyCode::Right, KeyModifiers::NONE) | (KeyCode::Char('l'), KeyModifiers::NONE) => {
                let next = self.selected.map_or(0, |current| current + 1);
                if next < self.options.len() {
                    self.pick(next)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn handle_expanded_input(&mut self, key: KeyEvent, vim_mode: bool) -> Option<SelectAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('j' | 'k'), _) if !vim_mode => None,
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                if self.highlighted + 1 < self.options.len() {
                    self.highlighted += 1;
                }
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.highlighted = self.highlighted.saturating_sub(1);
                None
            }
            (KeyCode::Enter, KeyModifiers::NONE) => {
                self.expanded = false;
                self.pick(self.highlighted)
            }
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.expanded = false;
                Some(SelectAction::Cancel)
            }
            _ => None,
        }
    }

    fn pick(&mut self, index: usize) -> Option<SelectAction> {
        let option = self.options.get(index)?;
        self.selected = Some(index);
        self.highlighted = index;
        Some(SelectAction::Select(option.id.clone()))
    }

    /// Render the collapsed field.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();

        let (text, text_style) = match self.selected.and_then(|idx| self.options.get(idx)) {
            Some(option) => (option.label.clone(), Style::default().fg(t.fg)),
            None => (self.label.clone(), Style::default().fg(t.muted)),
        };
        let indicator = if self.expanded { "▲" } else { "▼" };

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
            .title(Span::styled(format!(" {} ", self.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = Paragraph::new(format!("{} {}", text, indicator))
            .style(text_style)
            .block(block);

        frame.render_widget(paragraph, area);
    }

    /// Render the open option list below the field.
    ///
    /// Call after everything else so the list overlays the issue list.
    pub fn render_expanded_list(&self, frame: &mut Frame, field_area: Rect, screen_area: Rect) {
        if !self.expanded || self.options.is_empty() {
            return;
        }

        let t = theme();

        let list_height = (self.options.len().min(MAX_VISIBLE_OPTIONS) + 2) as u16;
        let space_below = screen_area
            .height
            .saturating_sub(field_area.y + field_area.height);
        let width = field_area
            .width
            .max(self.longest_label() + 6)
            .min(screen_area.width.saturating_sub(field_area.x));
        let list_area = Rect::new(
            field_area.x,
            field_area.y + field_area.height.saturating_sub(1),
            width,
            list_height.min(space_below + 1),
        );

        frame.render_widget(Clear, list_area);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                let style = if Some(idx) == self.selected {
                    Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(t.fg)
                };
                ListItem::new(option.label.clone()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(t.border_focused))
                    .style(Style::default().bg(t.popup_bg)),
            )
            .highlight_style(
                Style::default()
                    .fg(t.selection_fg)
                    .bg(t.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.highlighted));

        frame.render_stateful_widget(list, list_area, &mut state);
    }

    fn longest_label(&self) -> u16 {
        self.options
            .iter()
            .map(|o| o.label.chars().count())
            .max()
            .unwrap_or(0) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select() -> EnumSelect {
        EnumSelect::new(
            "Filter",
            vec![
                EnumOption::new("all", "All issues"),
                EnumOption::new("open", "Open"),
                EnumOption::new("resolved", "Resolved"),
            ],
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_new_has_no_value() {
        let select = select();
        assert!(select.value().is_none());
        assert!(!select.is_expanded());
        assert_eq!(select.options.len(), 3);
    }

    #[test]
    fn test_set_value() {
        let mut select = select();
        select.set_value(Some("resolved"));
        assert_eq!(select.value(), Some("resolved"));

        select.set_value(Some("unknown"));
        assert!(select.value().is_none());
    }

    #[test]
    fn test_enter_expands_then_selects() {
        let mut select = select();
        select.set_value(Some("all"));

        assert!(select.handle_input(key(KeyCode::Enter), true).is_none());
        assert!(select.is_expanded());

        select.handle_input(key(KeyCode::Char('j')), true);
        select.handle_input(key(KeyCode::Down), true);
        select.handle_input(key(KeyCode::Down), true);
        let action = select.handle_input(key(KeyCode::Enter), true);

        assert_eq!(action, Some(SelectAction::Select("resolved".to_string())));
        assert!(!select.is_expanded());
        assert_eq!(select.value(), Some("resolved"));
    }

    #[test]
    fn test_expand_starts_at_selected() {
        let mut select = select();
        select.set_value(Some("open"));
        select.expand();
        assert_eq!(select.highlighted, 1);

        select.handle_input(key(KeyCode::Up), true);
        select.handle_input(key(KeyCode::Up), true);
        assert_eq!(select.highlighted, 0);
    }

    #[test]
    fn test_escape_cancels_without_change() {
        let mut select = select();
        select.set_value(Some("open"));
        select.expand();
        select.handle_input(key(KeyCode::Down), true);

        let action = select.handle_input(key(KeyCode::Esc), true);
        assert_eq!(action, Some(SelectAction::Cancel));
        assert_eq!(select.value(), Some("open"));
        assert!(!select.is_expanded());
    }

    #[test]
    fn test_cycle_collapsed() {
        let mut select = select();

        let action = select.handle_input(key(KeyCode::Right), true);
        assert_eq!(action, Some(SelectAction::Select("all".to_string())));

        let action = select.handle_input(key(KeyCode::Char('l')), true);
        assert_eq!(action, Some(SelectAction::Select("open".to_string())));

        let action = select.handle_input(key(KeyCode::Left), true);
        assert_eq!(action, Some(SelectAction::Select("all".to_string())));

        assert!(select.handle_input(key(KeyCode::Char('h')), true).is_none());
    }

    #[test]
    fn test_cycle_stops_at_end() {
        let mut select = select();
        select.set_value(Some("resolved"));
        assert!(select.handle_input(key(KeyCode::Right), true).is_none());
    }

    #[test]
    fn test_empty_does_not_expand() {
        let mut select = EnumSelect::new("Project", Vec::new());
        select.expand();
        assert!(!select.is_expanded());
    }

    #[test]
    fn test_vim_keys_need_vim_mode() {
        let mut select = select();
        assert!(select.handle_input(key(KeyCode::Char('l')), false).is_none());
        assert!(select.value().is_none());

        select.set_value(Some("all"));
        select.expand();
        select.handle_input(key(KeyCode::Char('j')), false);
        assert_eq!(select.highlighted, 0);
        select.handle_input(key(KeyCode::Down), false);
        let action = select.handle_input(key(KeyCode::Enter), false);
        assert_eq!(action, Some(SelectAction::Select("open".to_string())));
    }
}
