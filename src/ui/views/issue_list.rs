//! Issue list view.
//!
//! Renders the accumulated pages of the pager as one scrolling list and
//! appends a status row describing what happens at the bottom: a spinner
//! while the next page loads, the last error, a load-more hint, or the end
//! of the results.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::api::Issue;
use crate::pager::{FetchError, Pager};
use crate::ui::components::Spinner;
use crate::ui::theme::theme;

/// Actions the list hands back to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Open the issue with this key.
    Open(String),
    /// The selection reached the last loaded issue.
    ReachedEnd,
}

/// What the body of the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    /// No project selected yet.
    NoProject,
    /// Waiting for the first page.
    Loading,
    /// The first page failed; nothing to show.
    Failed(String),
    /// The search matched nothing.
    NoResults,
    /// At least one issue is loaded.
    Issues,
}

/// The trailing row under the loaded issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trailer {
    LoadingMore,
    Error(String),
    End,
    More,
}

impl ListBody {
    pub fn for_pager(pager: &Pager) -> Self {
        if pager.key().is_none() {
            ListBody::NoProject
        } else if pager.issue_count() > 0 {
            ListBody::Issues
        } else if pager.is_loading() {
            ListBody::Loading
        } else if let Some(error) = pager.error() {
            ListBody::Failed(error_text(error))
        } else if pager.is_empty() {
            ListBody::NoResults
        } else {
            ListBody::Loading
        }
    }
}

impl Trailer {
    pub fn for_pager(pager: &Pager) -> Self {
        if pager.is_loading_more() {
            Trailer::LoadingMore
        } else if let Some(error) = pager.error() {
            Trailer::Error(error_text(error))
        } else if pager.is_reaching_end() {
            Trailer::End
        } else {
            Trailer::More
        }
    }
}

/// Selection and scroll state for the issue list.
#[derive(Debug, Default)]
pub struct IssueListView {
    selected: usize,
    state: ListState,
}

impl IssueListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top, used when the query key changes.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.state = ListState::default();
    }

    /// Keep the selection inside the loaded range.
    pub fn clamp(&mut self, count: usize) {
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Handle navigation keys over the issues loaded in `pager`.
    pub fn handle_input(
        &mut self,
        key: KeyEvent,
        pager: &Pager,
        vim_mode: bool,
    ) -> Option<ListAction> {
        let count = pager.issue_count();
        if count == 0 {
            return None;
        }

        let before = self.selected;
        match (key.code, key.modifiers) {
            (KeyCode::Down, _) => self.selected = (self.selected + 1).min(count - 1),
            (KeyCode::Char('j'), KeyModifiers::NONE) if vim_mode => {
                self.selected = (self.selected + 1).min(count - 1)
            }
            (KeyCode::Up, _) => self.selected = self.selected.saturating_sub(1),
            (KeyCode::Char('k'), KeyModifiers::NONE) if vim_mode => {
                self.selected = self.selected.saturating_sub(1)
            }
            (KeyCode::PageDown, _) | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.selected = (self.selected + 10).min(count - 1)
            }
            (KeyCode::PageUp, _) | (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.selected = self.selected.saturating_sub(10)
            }
            (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => self.selected = 0,
            (KeyCode::End, _) | (KeyCode::Char('G'), _) => self.selected = count - 1,
            (KeyCode::Enter, _) | (KeyCode::Char('o'), KeyModifiers::NONE) => {
                return pager
                    .issue(self.selected)
                    .map(|issue| ListAction::Open(issue.key.clone()));
            }
            _ => return None,
        }

        (self.selected != before && self.selected + 1 == count).then_some(ListAction::ReachedEnd)
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        pager: &Pager,
        spinner: &Spinner,
        focused: bool,
    ) {
        let t = theme();

        let mut title = format!(" Issues ({}) ", pager.issue_count());
        if pager.is_refreshing() {
            title = format!(" Issues ({}) {} ", pager.issue_count(), spinner.text("refreshing"));
        }
        let border_style = if focused {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.border)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let message = match ListBody::for_pager(pager) {
            ListBody::Issues => None,
            ListBody::NoProject => Some(Line::styled(
                "Select a project to start searching.",
                Style::default().fg(t.muted),
            )),
            ListBody::Loading => Some(Line::styled(
                spinner.text("Loading issues..."),
                Style::default().fg(t.accent),
            )),
            ListBody::Failed(error) => Some(Line::styled(
                error,
                Style::default().fg(t.error),
            )),
            ListBody::NoResults => Some(Line::styled(
                "No issues found.",
                Style::default().fg(t.muted),
            )),
        };

        if let Some(line) = message {
            let paragraph = Paragraph::new(vec![Line::raw(""), line])
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let mut items: Vec<ListItem> = pager.issues().map(issue_item).collect();
        items.push(trailer_item(&Trailer::for_pager(pager), spinner));

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(t.accent)
                    .fg(t.selection_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        self.clamp(pager.issue_count());
        self.state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

fn error_text(error: &FetchError) -> String {
    if error.is_retryable() {
        format!("{}  (press m to retry)", error.message())
    } else {
        error.message().to_string()
    }
}

fn issue_item(issue: &Issue) -> ListItem<'_> {
    let t = theme();
    let mut spans = vec![
        Span::styled(
            format!("{:<12}", issue.key),
            Style::default().fg(t.issue_key),
        ),
        Span::raw(" "),
        Span::styled(issue.summary(), Style::default().fg(t.fg)),
    ];
    if let Some(status) = issue.status() {
        spans.push(Span::styled(
            format!("  [{}]", status),
            Style::default().fg(t.muted),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn trailer_item(trailer: &Trailer, spinner: &Spinner) -> ListItem<'static> {
    let t = theme();
    let line = match trailer {
        Trailer::LoadingMore => Line::styled(
            spinner.text("Loading more..."),
            Style::default().fg(t.accent),
        ),
        Trailer::Error(message) => Line::styled(
            format!("✗ {}", message),
            Style::default().fg(t.error),
        ),
        Trailer::End => Line::styled("No more issues", Style::default().fg(t.muted)),
        Trailer::More => Line::styled("Press m to load more", Style::default().fg(t.muted)),
    };
    ListItem::new(line)
}
