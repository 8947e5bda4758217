//! mojira - a terminal browser for the Mojira bug tracker
//!
//! Pick a project, narrow the results with a filter, sort order and search
//! text, and page through matching issues.

mod api;
mod app;
mod catalog;
mod config;
mod error;
mod events;
mod logging;
mod pager;
mod query;
mod tasks;
mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{error, info, warn};

use crate::api::MojiraClient;
use crate::app::App;
use crate::catalog::{Catalog, EnumOption};
use crate::config::{Config, CONFIG_PATH_ENV};
use crate::error::AppError;
use crate::events::EventHandler;
use crate::query::QueryAction;
use crate::tasks::{create_task_channel, TaskSpawner};

#[derive(Debug, Parser)]
#[command(name = "mojira", version, about = "Browse the Mojira bug tracker from the terminal")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Project to open with (e.g. MC).
    #[arg(short, long)]
    project: Option<String>,

    /// Filter id (e.g. open).
    #[arg(short, long)]
    filter: Option<String>,

    /// Sort field id (e.g. votes).
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort ascending instead of descending.
    #[arg(long)]
    asc: bool,

    /// Treat the search text as JQL.
    #[arg(long)]
    advanced: bool,

    /// Initial search text.
    #[arg(long)]
    search: Option<String>,

    /// Override the tracker URL from the configuration.
    #[arg(long)]
    base_url: Option<String>,

    /// Log level for mojira's own messages (overrides RUST_LOG).
    #[arg(long, value_parser = logging::LOG_LEVELS)]
    log_level: Option<String>,

    /// Write a default configuration file and exit.
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    /// Startup query changes, checked against the catalog.
    fn query_overrides(&self, catalog: &Catalog) -> anyhow::Result<Vec<QueryAction>> {
        let mut actions = Vec::new();
        if let Some(project) = &self.project {
            check_id("project", project, &catalog.projects)?;
            actions.push(QueryAction::SetProject(project.clone()));
        }
        if let Some(filter) = &self.filter {
            check_id("filter", filter, &catalog.filters)?;
            actions.push(QueryAction::SetFilter(filter.clone()));
        }
        if let Some(sort) = &self.sort {
            check_id("sort field", sort, &catalog.sort_fields)?;
            actions.push(QueryAction::SetSortField(sort.clone()));
        }
        if self.asc {
            actions.push(QueryAction::SetSortDirection(true));
        }
        if self.advanced {
            actions.push(QueryAction::SetAdvanced(true));
        }
        if let Some(search) = &self.search {
            actions.push(QueryAction::SetSearch(search.clone()));
        }
        Ok(actions)
    }
}

fn check_id(what: &str, id: &str, options: &[EnumOption]) -> anyhow::Result<()> {
    if options.iter().any(|o| o.id == id) {
        return Ok(());
    }
    let known: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
    Err(AppError::other(format!(
        "unknown {} '{}' (expected one of: {})",
        what,
        id,
        known.join(", ")
    ))
    .into())
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(format!("raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| AppError::terminal(format!("alternate screen: {}", e)))?;
    Ok(Terminal::new(CrosstermBackend::new(stdout)).map_err(AppError::Io)?)
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level.as_deref()) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    if cli.init_config {
        let path = Config::resolve_path(cli.config.as_deref())?;
        if path.exists() {
            bail!("{} already exists", path.display());
        }
        Config::default()
            .save_to(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let mut config = Config::load_from(&config_path).map_err(|e| {
        let app_error = AppError::from(e);
        let hint = app_error.suggested_action().unwrap_or_default();
        anyhow::anyhow!("{} {}", app_error.user_message(), hint)
    })?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
        config.validate().context("invalid --base-url")?;
    }
    logging::log_session(&config_path, &config);

    let overrides = cli.query_overrides(&config.catalog())?;
    let client = MojiraClient::new(&config).context("failed to create HTTP client")?;
    info!(base_url = %client.base_url(), "Using tracker");

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, App::new(config, overrides), client).await;
    restore_terminal(&mut terminal)?;

    logging::shutdown();
    if let Err(e) = &result {
        error!(error = %e, "Application error");
    }
    result
}

async fn run(terminal: &mut Tui, mut app: App, client: MojiraClient) -> anyhow::Result<()> {
    let (mut rx, spawner) = create_task_channel(client.clone());
    let events = EventHandler::new();

    loop {
        spawn_pending(&mut app, &spawner);
        open_pending(&mut app, &client);

        terminal
            .draw(|frame| app.view(frame))
            .context("failed to draw frame")?;

        let event = tokio::task::block_in_place(|| events.next())
            .context("failed to read terminal event")?;
        app.update(event);

        loop {
            match rx.try_recv() {
                Ok(message) => app.handle_api_message(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => bail!("task channel closed"),
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn spawn_pending(app: &mut App, spawner: &TaskSpawner<MojiraClient>) {
    for request in app.take_pending_requests() {
        spawner.spawn_fetch_page(request);
    }
}

fn open_pending(app: &mut App, client: &MojiraClient) {
    for key in app.take_pending_opens() {
        let url = client.issue_url(&key);
        if let Err(e) = open::that(&url) {
            warn!(url = %url, error = %e, "Failed to open browser");
        }
    }
}
