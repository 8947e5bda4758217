//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: `update` turns
//! events into state changes and `view` renders the current state. Network
//! work never happens here. Page requests produced by the pager are queued
//! and the main loop hands them to the task spawner; their responses come
//! back through [`App::handle_api_message`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tracing::{debug, info, trace};

use crate::catalog::{label_of, Catalog};
use crate::config::Config;
use crate::events::Event;
use crate::pager::{fetch_key, FetchPhase, PageRequest, Pager};
use crate::query::{reduce, QueryAction, QueryState};
use crate::tasks::ApiMessage;
use crate::ui::theme;
use crate::ui::{
    render_status_bar, render_toggle, EnumSelect, HelpAction, HelpView, IssueListView,
    ListAction, SearchAction, SearchInput, SelectAction, Spinner, Toasts,
};

/// The control that receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Project,
    Filter,
    SortField,
    SortDirection,
    Advanced,
    Search,
    Results,
}

const FOCUS_ORDER: [Focus; 7] = [
    Focus::Project,
    Focus::Filter,
    Focus::SortField,
    Focus::SortDirection,
    Focus::Advanced,
    Focus::Search,
    Focus::Results,
];

impl Focus {
    fn position(self) -> usize {
        FOCUS_ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        FOCUS_ORDER[(self.position() + 1) % FOCUS_ORDER.len()]
    }

    pub fn prev(self) -> Self {
        FOCUS_ORDER[(self.position() + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()]
    }

    fn hints(self) -> &'static str {
        match self {
            Focus::Project | Focus::Filter | Focus::SortField => {
                "[Tab] next [Enter] choose [←/→] cycle [m] more [r] refresh [?] help [q] quit"
            }
            Focus::SortDirection | Focus::Advanced => {
                "[Tab] next [Space] toggle [m] more [r] refresh [?] help [q] quit"
            }
            Focus::Search => "[Enter] search [Esc] discard [Tab] next",
            Focus::Results => {
                "[↑/↓] move [o] open [m] more [r] refresh [Tab] next [?] help [q] quit"
            }
        }
    }
}

/// The main application struct that holds all state.
pub struct App {
    config: Config,
    catalog: Catalog,
    query: QueryState,
    pager: Pager,
    focus: Focus,
    project_select: EnumSelect,
    filter_select: EnumSelect,
    sort_select: EnumSelect,
    search_input: SearchInput,
    list_view: IssueListView,
    help_view: HelpView,
    show_help: bool,
    toasts: Toasts,
    spinner: Spinner,
    /// Requests produced by the pager, waiting to be spawned.
    pending_requests: Vec<PageRequest>,
    /// Issue keys to open in the browser.
    pending_opens: Vec<String>,
    should_quit: bool,
}

impl App {
    /// Create the application from configuration plus startup overrides.
    ///
    /// If the resulting query has a project, the first page is queued
    /// immediately.
    pub fn new(config: Config, overrides: Vec<QueryAction>) -> Self {
        let catalog = config.catalog();
        let query = overrides
            .into_iter()
            .fold(config.defaults.to_query(), |query, action| {
                reduce(&query, action, &catalog)
            });

        debug!(?query, theme = config.theme.as_str(), "Creating application");
        theme::set_mode(config.theme);

        let mut search_input = SearchInput::new();
        search_input.set_committed(query.search.clone());

        let mut app = Self {
            project_select: EnumSelect::new("Project", catalog.projects.clone()),
            filter_select: EnumSelect::new("Filter", catalog.filters.clone()),
            sort_select: EnumSelect::new("Sort by", catalog.sort_fields.clone()),
            help_view: HelpView::new(config.vim_mode),
            focus: if query.project.is_some() {
                Focus::Results
            } else {
                Focus::Project
            },
            config,
            catalog,
            query,
            pager: Pager::new(),
            search_input,
            list_view: IssueListView::new(),
            show_help: false,
            toasts: Toasts::new(),
            spinner: Spinner::new(),
            pending_requests: Vec::new(),
            pending_opens: Vec::new(),
            should_quit: false,
        };
        app.sync_controls();
        app.sync_key();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Drain the requests the main loop must spawn.
    pub fn take_pending_requests(&mut self) -> Vec<PageRequest> {
        std::mem::take(&mut self.pending_requests)
    }

    /// Drain the issue keys the main loop must open in the browser.
    pub fn take_pending_opens(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_opens)
    }

    /// Apply a query change and follow the new key.
    pub fn dispatch(&mut self, action: QueryAction) {
        let next = reduce(&self.query, action, &self.catalog);
        if next == self.query {
            return;
        }
        self.query = next;
        self.sync_controls();
        self.sync_key();
    }

    fn sync_controls(&mut self) {
        self.project_select.set_value(self.query.project.as_deref());
        self.filter_select.set_value(Some(&self.query.filter));
        self.sort_select.set_value(Some(&self.query.sort_field));
    }

    fn sync_key(&mut self) {
        let key = self.query.key();
        if self.pager.key() == key.as_ref() {
            return;
        }
        debug!(first_page = ?fetch_key(1, &self.query), "Query key changed");
        self.list_view.reset();
        if let Some(request) = self.pager.set_key(key) {
            self.pending_requests.push(request);
        }
    }

    /// Request the next page, or retry the failed one.
    pub fn load_more(&mut self) {
        if let Some(request) = self.pager.load_more() {
            self.pending_requests.push(request);
        }
    }

    /// Re-fetch every loaded page.
    pub fn refresh(&mut self) {
        if let Some(request) = self.pager.refresh() {
            info!(pages = self.pager.pages().len(), "Refreshing results");
            self.toasts.info("Refreshing loaded pages");
            self.pending_requests.push(request);
        }
    }

    /// Switch between the dark and light palettes.
    pub fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        theme::set_mode(self.config.theme);
        info!(theme = self.config.theme.as_str(), "Theme changed");
        self.toasts.info(format!("Theme: {}", self.config.theme.as_str()));
    }

    /// Feed a finished background task back into the pager.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::PageFetched(response) => {
                let current = response.generation == self.pager.generation();
                let failure = response
                    .result
                    .as_ref()
                    .err()
                    .map(|e| e.message().to_string());

                if let Some(next) = self.pager.resolve(response) {
                    self.pending_requests.push(next);
                }

                if current && self.pager.phase() == FetchPhase::Error {
                    if let Some(message) = failure {
                        self.toasts.error(message);
                    }
                }
                self.list_view.clamp(self.pager.issue_count());
            }
        }
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.handle_tick(),
        }
    }

    fn handle_tick(&mut self) {
        self.spinner
            .set_active(self.pager.is_loading_more() || self.pager.is_refreshing());
        self.spinner.tick();
        self.toasts.tick();
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if let Some(HelpAction::Close) = self.help_view.handle_input(key) {
                self.show_help = false;
            }
            return;
        }

        // An open selector or the search box captures every key except focus moves.
        let vim_mode = self.config.vim_mode;
        if let Some(select) = self.focused_select_mut() {
            if select.is_expanded() {
                if let Some(action) = select.handle_input(key, vim_mode) {
                    self.apply_select_action(action);
                }
                return;
            }
        }
        if self.focus == Focus::Search && !matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            if let Some(SearchAction::Commit(text)) = self.search_input.handle_input(key) {
                self.dispatch(QueryAction::SetSearch(text));
            }
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Tab, _) => return self.set_focus(self.focus.next()),
            (KeyCode::BackTab, _) => return self.set_focus(self.focus.prev()),
            (KeyCode::Char('?'), _) => {
                self.help_view.reset_scroll();
                self.show_help = true;
                return;
            }
            (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('m'), KeyModifiers::NONE) => return self.load_more(),
            (KeyCode::Char('r'), KeyModifiers::NONE) => return self.refresh(),
            (KeyCode::Char('t'), KeyModifiers::NONE) => return self.toggle_theme(),
            (KeyCode::Char('/'), KeyModifiers::NONE) => return self.set_focus(Focus::Search),
            _ => {}
        }

        let vim_mode = self.config.vim_mode;
        match self.focus {
            Focus::Project | Focus::Filter | Focus::SortField => {
                if let Some(action) = self
                    .focused_select_mut()
                    .and_then(|s| s.handle_input(key, vim_mode))
                {
                    self.apply_select_action(action);
                }
            }
            Focus::SortDirection => {
                if is_toggle_key(key, vim_mode) {
                    self.dispatch(QueryAction::SetSortDirection(!self.query.sort_ascending));
                }
            }
            Focus::Advanced => {
                if is_toggle_key(key, vim_mode) {
                    self.dispatch(QueryAction::SetAdvanced(!self.query.advanced));
                }
            }
            Focus::Search => {}
            Focus::Results => {
                match self.list_view.handle_input(key, &self.pager, vim_mode) {
                    Some(ListAction::Open(issue_key)) => {
                        debug!(issue_key = %issue_key, "Opening issue in browser");
                        self.pending_opens.push(issue_key);
                    }
                    Some(ListAction::ReachedEnd) => {
                        // Errors wait for an explicit retry.
                        if self.pager.phase() != FetchPhase::Error {
                            self.load_more();
                        }
                    }
                    None => {}
                }
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if let Some(select) = self.focused_select_mut() {
            select.collapse();
        }
        if self.focus == Focus::Search && focus != Focus::Search {
            if let Some(SearchAction::Commit(text)) = self.search_input.blur() {
                self.dispatch(QueryAction::SetSearch(text));
            }
        }
        self.focus = focus;
    }

    fn focused_select_mut(&mut self) -> Option<&mut EnumSelect> {
        match self.focus {
            Focus::Project => Some(&mut self.project_select),
            Focus::Filter => Some(&mut self.filter_select),
            Focus::SortField => Some(&mut self.sort_select),
            _ => None,
        }
    }

    fn apply_select_action(&mut self, action: SelectAction) {
        let SelectAction::Select(id) = action else {
            return;
        };
        let action = match self.focus {
            Focus::Project => QueryAction::SetProject(id),
            Focus::Filter => QueryAction::SetFilter(id),
            Focus::SortField => QueryAction::SetSortField(id),
            _ => return,
        };
        self.dispatch(action);
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(18),
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Length(13),
                Constraint::Length(12),
                Constraint::Min(16),
            ])
            .split(chunks[0]);

        self.project_select
            .render(frame, controls[0], self.focus == Focus::Project);
        self.filter_select
            .render(frame, controls[1], self.focus == Focus::Filter);
        self.sort_select
            .render(frame, controls[2], self.focus == Focus::SortField);
        render_toggle(
            frame,
            controls[3],
            "Order",
            self.query.sort_ascending,
            ("↑ Asc", "↓ Desc"),
            self.focus == Focus::SortDirection,
        );
        render_toggle(
            frame,
            controls[4],
            "Mode",
            self.query.advanced,
            ("JQL", "Simple"),
            self.focus == Focus::Advanced,
        );
        let search_label = if self.query.advanced { "JQL" } else { "Search" };
        self.search_input
            .render(frame, controls[5], self.focus == Focus::Search, search_label);

        self.list_view.render(
            frame,
            chunks[1],
            &self.pager,
            &self.spinner,
            self.focus == Focus::Results,
        );

        render_status_bar(frame, chunks[2], self.focus.hints(), &self.summary());

        let select_areas: [(&EnumSelect, Rect); 3] = [
            (&self.project_select, controls[0]),
            (&self.filter_select, controls[1]),
            (&self.sort_select, controls[2]),
        ];
        for (select, field_area) in select_areas {
            select.render_expanded_list(frame, field_area, area);
        }

        self.toasts.render(frame, chunks[1]);

        if self.show_help {
            self.help_view.render(frame, area);
        }
    }

    fn summary(&self) -> String {
        let phase = match self.pager.phase() {
            FetchPhase::Idle if self.pager.is_reaching_end() && self.pager.key().is_some() => {
                "all loaded"
            }
            FetchPhase::Idle => "idle",
            FetchPhase::LoadingFirst | FetchPhase::LoadingMore => "loading",
            FetchPhase::Revalidating => "refreshing",
            FetchPhase::Error => "error",
        };
        let project = self
            .query
            .project
            .as_deref()
            .and_then(|id| label_of(&self.catalog.projects, id))
            .unwrap_or("No project");
        format!(
            "{} · {} issues · {} pages · {} ",
            project,
            self.pager.issue_count(),
            self.pager.pages().len(),
            phase
        )
    }
}

fn is_toggle_key(key: KeyEvent, vim_mode: bool) -> bool {
    matches!(
        key.code,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
    ) || (vim_mode
        && matches!(key.code, KeyCode::Char('h') | KeyCode::Char('l'))
        && key.modifiers == KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::IssueFields;
    use crate::api::Issue;
    use crate::pager::{FetchError, Page, PageResponse, PAGE_SIZE};
    use crate::ui::theme::ThemeMode;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(press(KeyCode::Char(c)));
        }
    }

    fn app_with_project() -> App {
        App::new(
            Config::default(),
            vec![QueryAction::SetProject("MC".to_string())],
        )
    }

    fn respond(request: &PageRequest, count: usize) -> ApiMessage {
        let issues = (0..count)
            .map(|n| Issue {
                key: format!("{}-{}", request.key.query.project, n),
                fields: IssueFields {
                    summary: format!("Issue {}", n),
                    ..Default::default()
                },
            })
            .collect();
        ApiMessage::PageFetched(PageResponse::for_request(
            request,
            Ok(Page {
                number: request.key.page,
                issues,
                request: request.key.search_request(),
            }),
        ))
    }

    fn fail(request: &PageRequest, message: &str) -> ApiMessage {
        ApiMessage::PageFetched(PageResponse::for_request(
            request,
            Err(FetchError::new(message)),
        ))
    }

    fn single(app: &mut App) -> PageRequest {
        let mut requests = app.take_pending_requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }

    #[test]
    fn test_no_request_without_project() {
        let mut app = App::new(Config::default(), Vec::new());
        assert!(app.take_pending_requests().is_empty());
        assert_eq!(app.focus, Focus::Project);
        assert!(app.pager.is_empty());
    }

    #[test]
    fn test_project_override_requests_first_page() {
        let mut app = app_with_project();
        let request = single(&mut app);
        assert_eq!(request.key.page, 1);
        assert_eq!(request.key.query.project, "MC");
        assert_eq!(app.focus, Focus::Results);
        assert!(app.pager.is_loading());
    }

    #[test]
    fn test_unknown_override_is_ignored() {
        let mut app = App::new(
            Config::default(),
            vec![QueryAction::SetProject("NOPE".to_string())],
        );
        assert!(app.query.project.is_none());
        assert!(app.take_pending_requests().is_empty());
    }

    #[test]
    fn test_selecting_project_with_keys() {
        let mut app = App::new(Config::default(), Vec::new());
        app.update(press(KeyCode::Enter));
        app.update(press(KeyCode::Char('j')));
        app.update(press(KeyCode::Enter));

        assert_eq!(app.query.project.as_deref(), Some("MCPE"));
        let request = single(&mut app);
        assert_eq!(request.key.query.project, "MCPE");
    }

    #[test]
    fn test_filter_change_resets_results() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, PAGE_SIZE as usize));
        assert_eq!(app.pager.issue_count(), 25);

        app.dispatch(QueryAction::SetFilter("open".to_string()));
        let request = single(&mut app);
        assert_eq!(request.key.page, 1);
        assert_eq!(request.key.query.filter, "open");
        assert!(request.generation > first.generation);
        assert_eq!(app.pager.issue_count(), 0);

        // The old key's late page is dropped.
        app.handle_api_message(respond(&first, 5));
        assert_eq!(app.pager.issue_count(), 0);
    }

    #[test]
    fn test_same_value_dispatch_is_noop() {
        let mut app = app_with_project();
        single(&mut app);
        app.dispatch(QueryAction::SetFilter("all".to_string()));
        assert!(app.take_pending_requests().is_empty());
    }

    #[test]
    fn test_toggles_dispatch() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, 3));

        app.update(Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        app.update(Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert_eq!(app.focus, Focus::Advanced);
        app.update(press(KeyCode::Char(' ')));
        assert!(app.query.advanced);

        app.update(Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        app.update(press(KeyCode::Enter));
        assert!(app.query.sort_ascending);

        let requests = app.take_pending_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].key.query.sort_ascending);
        assert!(requests[1].key.query.advanced);
    }

    #[test]
    fn test_load_more_key() {
        let mut app = app_with_project();
        let first = single(&mut app);

        // In flight: ignored.
        app.update(press(KeyCode::Char('m')));
        assert!(app.take_pending_requests().is_empty());

        app.handle_api_message(respond(&first, PAGE_SIZE as usize));
        app.update(press(KeyCode::Char('m')));
        let second = single(&mut app);
        assert_eq!(second.key.page, 2);
        assert!(app.pager.is_loading_more());
    }

    #[test]
    fn test_search_commits_on_enter_only() {
        let mut app = app_with_project();
        single(&mut app);
        app.update(press(KeyCode::Char('/')));
        assert_eq!(app.focus, Focus::Search);

        // 'q' and 'm' are text here.
        type_text(&mut app, "qm lag");
        assert!(!app.should_quit());
        assert!(app.take_pending_requests().is_empty());
        assert_eq!(app.query.search, "");

        app.update(press(KeyCode::Enter));
        assert_eq!(app.query.search, "qm lag");
        assert_eq!(single(&mut app).key.query.search, "qm lag");
    }

    #[test]
    fn test_search_escape_discards_edit() {
        let mut app = app_with_project();
        single(&mut app);
        app.update(press(KeyCode::Char('/')));
        type_text(&mut app, "boat");
        app.update(press(KeyCode::Esc));
        app.update(press(KeyCode::Tab));

        assert_eq!(app.focus, Focus::Results);
        assert_eq!(app.query.search, "");
        assert!(app.take_pending_requests().is_empty());
    }

    #[test]
    fn test_search_commits_on_blur() {
        let mut app = app_with_project();
        single(&mut app);
        app.update(press(KeyCode::Char('/')));
        type_text(&mut app, "boat");
        app.update(press(KeyCode::Tab));

        assert_eq!(app.query.search, "boat");
        assert_eq!(single(&mut app).key.query.search, "boat");
    }

    #[test]
    fn test_reaching_end_loads_more() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, PAGE_SIZE as usize));

        app.update(press(KeyCode::Char('G')));
        let second = single(&mut app);
        assert_eq!(second.key.page, 2);
    }

    #[test]
    fn test_reaching_end_after_error_waits_for_retry() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, PAGE_SIZE as usize));
        app.update(press(KeyCode::Char('m')));
        let second = single(&mut app);
        app.handle_api_message(fail(&second, "Tracker server error"));

        assert_eq!(app.toasts.len(), 1);
        app.update(press(KeyCode::Char('G')));
        assert!(app.take_pending_requests().is_empty());

        app.update(press(KeyCode::Char('m')));
        assert_eq!(single(&mut app).key.page, 2);
    }

    #[test]
    fn test_stale_failure_shows_no_toast() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.dispatch(QueryAction::SetProject("MCPE".to_string()));
        single(&mut app);

        app.handle_api_message(fail(&first, "late failure"));
        assert!(app.toasts.is_empty());
        assert!(app.pager.error().is_none());
    }

    #[test]
    fn test_refresh_key() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, PAGE_SIZE as usize));

        app.update(press(KeyCode::Char('r')));
        let refresh = single(&mut app);
        assert_eq!(refresh.key.page, 1);
        assert!(app.pager.is_refreshing());
        assert_eq!(app.pager.issue_count(), 25);
    }

    #[test]
    fn test_open_issue() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, 3));

        app.update(press(KeyCode::Down));
        app.update(press(KeyCode::Char('o')));
        assert_eq!(app.take_pending_opens(), vec!["MC-1".to_string()]);
        assert!(app.take_pending_opens().is_empty());
    }

    #[test]
    fn test_help_toggle() {
        let mut app = App::new(Config::default(), Vec::new());
        app.update(press(KeyCode::Char('?')));
        assert!(app.show_help);

        // Keys go to the help panel while it is open.
        app.update(press(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Config::default(), Vec::new());
        app.update(press(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = App::new(Config::default(), Vec::new());
        app.update(press(KeyCode::Char('/')));
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(Focus::Project.next(), Focus::Filter);
        assert_eq!(Focus::Results.next(), Focus::Project);
        assert_eq!(Focus::Project.prev(), Focus::Results);
    }

    #[test]
    fn test_summary() {
        let app = App::new(Config::default(), Vec::new());
        assert!(app.summary().starts_with("No project · 0 issues"));

        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, 3));
        let summary = app.summary();
        assert!(summary.contains("3 issues · 1 pages · all loaded"));
        assert!(!summary.starts_with("No project"));
    }

    #[test]
    fn test_tick_drives_spinner() {
        let mut app = app_with_project();
        app.update(Event::Tick);
        assert!(app.spinner.is_active());

        let first = single(&mut app);
        app.handle_api_message(respond(&first, 2));
        app.update(Event::Tick);
        assert!(!app.spinner.is_active());
    }

    #[test]
    fn test_failed_refresh_retries_with_load_more() {
        let mut app = app_with_project();
        let first = single(&mut app);
        app.handle_api_message(respond(&first, PAGE_SIZE as usize));
        app.update(press(KeyCode::Char('m')));
        let second = single(&mut app);
        app.handle_api_message(respond(&second, 3));

        app.update(press(KeyCode::Char('r')));
        let again = single(&mut app);
        app.handle_api_message(respond(&again, PAGE_SIZE as usize));
        let again = single(&mut app);
        assert_eq!(again.key.page, 2);
        app.handle_api_message(fail(&again, "Tracker server error"));
        assert_eq!(app.pager.phase(), FetchPhase::Error);

        app.update(press(KeyCode::Char('m')));
        let retry = single(&mut app);
        assert_eq!(retry.key.page, 2);
        app.handle_api_message(respond(&retry, 3));
        assert_eq!(app.pager.phase(), FetchPhase::Idle);
        assert_eq!(app.pager.issue_count(), 28);
    }

    #[test]
    fn test_theme_key_toggles_palette() {
        let mut app = app_with_project();
        assert_eq!(app.config.theme, ThemeMode::Dark);

        app.update(press(KeyCode::Char('t')));
        assert_eq!(app.config.theme, ThemeMode::Light);
        assert_eq!(app.toasts.len(), 1);

        app.update(press(KeyCode::Char('t')));
        assert_eq!(app.config.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_theme_key_is_text_in_search() {
        let mut app = app_with_project();
        app.update(press(KeyCode::Char('/')));
        app.update(press(KeyCode::Char('t')));
        assert_eq!(app.config.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_vim_keys_ignored_without_vim_mode() {
        let config = Config {
            vim_mode: false,
            ..Default::default()
        };
        let mut app = App::new(config, Vec::new());

        // Collapsed selector: 'l' does not cycle, Right does.
        app.update(press(KeyCode::Char('l')));
        assert!(app.query.project.is_none());
        app.update(press(KeyCode::Right));
        assert_eq!(app.query.project.as_deref(), Some("MC"));

        // Expanded selector: 'j' does not move, Down does.
        app.update(press(KeyCode::Enter));
        app.update(press(KeyCode::Char('j')));
        app.update(press(KeyCode::Down));
        app.update(press(KeyCode::Enter));
        assert_eq!(app.query.project.as_deref(), Some("MCPE"));

        for _ in 0..3 {
            app.update(press(KeyCode::Tab));
        }
        assert_eq!(app.focus, Focus::SortDirection);
        app.update(press(KeyCode::Char('h')));
        assert!(!app.query.sort_ascending);
        app.update(press(KeyCode::Left));
        assert!(app.query.sort_ascending);
    }
}
