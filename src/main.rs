// folio: terminal portfolio viewer with a cached GitHub statistics dashboard.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

use folio::app::App;
use folio::clock::{Clock, SystemClock};
use folio::config::Config;
use folio::error::{FolioError, Result};
use folio::export::DashboardExport;
use folio::github::GitHubClient;
use folio::http::ReqwestTransport;
use folio::state::{
    ConsoleMessage, IntegrationManager, LoadOutcome, PortfolioView, Preferences, load_projects,
};
use folio::store::{FileStore, LocalStore, MemoryStore, paths};

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Browse a project portfolio and GitHub stats in the terminal"
)]
struct Cli {
    /// GitHub username (overrides github.username)
    #[arg(short, long)]
    user: Option<String>,

    /// JSON file with portfolio projects (overrides portfolio.projects)
    #[arg(short, long, value_name = "FILE")]
    projects: Option<PathBuf>,

    /// Load GitHub data once, write the dashboard export to FILE, and exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "folio exited with an error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to a file in the cache directory. Stdout belongs to the TUI.
fn init_tracing() {
    let Some(path) = paths::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("folio=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn open_store() -> Arc<dyn LocalStore> {
    match paths::store_dir() {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => {
            tracing::warn!("No cache directory available, keeping state in memory");
            Arc::new(MemoryStore::new())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let store = open_store();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let transport = Arc::new(ReqwestTransport::new(HTTP_TIMEOUT)?);
    let client = GitHubClient::new(
        transport,
        store.clone(),
        clock.clone(),
        config.client_options(),
    );
    let username = cli.user.clone().or_else(|| config.github_username());
    let manager = Arc::new(IntegrationManager::new(
        Arc::new(client),
        username,
        store.clone(),
        clock.clone(),
    ));

    if let Some(path) = cli.export {
        return export_once(&runtime, &manager, clock.as_ref(), &path);
    }

    let projects_path = cli.projects.or_else(|| config.projects_path().map(PathBuf::from));
    let (projects, project_error) = match &projects_path {
        Some(path) => match load_projects(path) {
            Ok(projects) => (projects, None),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load projects");
                (Vec::new(), Some(format!("Failed to load {}: {}", path.display(), e)))
            }
        },
        None => (Vec::new(), None),
    };

    let mut app = App::new(
        manager,
        PortfolioView::new(projects),
        Preferences::load(store),
        config.export_path(),
        runtime.handle().clone(),
    );
    if let Some(message) = project_error {
        app.console.push(ConsoleMessage::error(message));
    }

    let result = run_tui(&mut app);
    app.teardown();
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

fn export_once(
    runtime: &tokio::runtime::Runtime,
    manager: &IntegrationManager,
    clock: &dyn Clock,
    path: &std::path::Path,
) -> Result<()> {
    if manager.username().is_none() {
        return Err(FolioError::MissingUsername);
    }
    if runtime.block_on(manager.load_user_data()) == LoadOutcome::Failed {
        let message = manager
            .state()
            .error()
            .unwrap_or("GitHub load failed")
            .to_string();
        return Err(FolioError::Other(message));
    }

    DashboardExport::collect(manager, clock.now()).write(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    app.start();
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(FolioError::from)
}
