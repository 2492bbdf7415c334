// App state and main event loop.
// Owns every collaborator, routes keyboard and focus events, and applies
// integration notifications on each tick.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::export::DashboardExport;
use crate::state::{
    ConsoleMessage, ConsoleState, ContactForm, Debouncer, FilterKind, IntegrationEvent,
    IntegrationManager, LoadingState, PortfolioView, Preferences, RepoDetails, SEARCH_DEBOUNCE,
    load_repo_details,
};
use crate::transform::{FilterCriteria, RepositoryView, SortKey, SortOrder};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Projects,
    GitHub,
    Contact,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Projects, Tab::GitHub, Tab::Contact, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::GitHub => "GitHub",
            Tab::Contact => "Contact",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Projects => Tab::GitHub,
            Tab::GitHub => Tab::Contact,
            Tab::Contact => Tab::Console,
            Tab::Console => Tab::Projects,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Projects => Tab::Console,
            Tab::GitHub => Tab::Projects,
            Tab::Contact => Tab::GitHub,
            Tab::Console => Tab::Contact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LoadKind {
    Refresh,
    IfStale,
}

/// Latest repository details request and its result. A result is only
/// stored when its generation still matches.
#[derive(Debug)]
struct DetailsSlot {
    generation: u64,
    state: LoadingState<Arc<RepoDetails>>,
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    pub portfolio: PortfolioView,
    pub integration: Arc<IntegrationManager>,
    events: Option<broadcast::Receiver<IntegrationEvent>>,
    pub prefs: Preferences,
    /// Search box has focus.
    pub search_active: bool,
    pub search_input: String,
    search_debounce: Debouncer<String>,
    pub show_help: bool,
    pub console: ConsoleState,
    pub contact: ContactForm,
    /// Dashboard URL being typed on the GitHub tab.
    pub url_input: Option<String>,
    pub repo_list_state: ListState,
    pub repo_order: SortOrder,
    pub repo_filter: FilterCriteria,
    /// Detail panel for the selected repository is open.
    pub show_repo_details: bool,
    repo_details: Arc<Mutex<DetailsSlot>>,
    export_path: PathBuf,
    runtime: Handle,
    tasks: Vec<JoinHandle<()>>,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(
        integration: Arc<IntegrationManager>,
        portfolio: PortfolioView,
        prefs: Preferences,
        export_path: PathBuf,
        runtime: Handle,
    ) -> Self {
        let events = Some(integration.subscribe());
        Self {
            active_tab: Tab::default(),
            portfolio,
            integration,
            events,
            prefs,
            search_active: false,
            search_input: String::new(),
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            show_help: false,
            console: ConsoleState::default(),
            contact: ContactForm::new(),
            url_input: None,
            repo_list_state: ListState::default(),
            repo_order: SortOrder::default(),
            repo_filter: FilterCriteria::default(),
            show_repo_details: false,
            repo_details: Arc::new(Mutex::new(DetailsSlot {
                generation: 0,
                state: LoadingState::Idle,
            })),
            export_path,
            runtime,
            tasks: Vec::new(),
            should_quit: false,
        }
    }

    /// Kick off the first GitHub load. Stale data is refetched, fresh data
    /// comes from the persisted cache.
    pub fn start(&mut self) {
        if self.integration.username().is_none() {
            self.console.push(ConsoleMessage::warn(
                "No GitHub username configured; set github.username or pass --user",
            ));
            return;
        }
        self.spawn_load(LoadKind::IfStale);
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.tick(Instant::now());
        }
        Ok(())
    }

    /// Stop pending work and drop the notification subscription.
    pub fn teardown(&mut self) {
        self.search_debounce.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.events = None;
        tracing::info!("App torn down");
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::FocusGained => self.on_focus_gained(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a settled search and any integration events.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.search_debounce.poll(now) {
            self.portfolio.set_search(&query);
        }

        let mut pending = Vec::new();
        if let Some(events) = self.events.as_mut() {
            loop {
                match events.try_recv() {
                    Ok(event) => pending.push(event),
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Integration events dropped");
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
        for event in pending {
            self.apply_event(event);
        }

        self.tasks.retain(|task| !task.is_finished());
    }

    pub fn on_focus_gained(&mut self) {
        if self.integration.username().is_some() && self.integration.is_stale() {
            self.spawn_load(LoadKind::IfStale);
        }
    }

    fn apply_event(&mut self, event: IntegrationEvent) {
        match event {
            IntegrationEvent::DataUpdated(snapshot) => {
                self.console.push(ConsoleMessage::info(format!(
                    "Loaded {} repositories for {} in {} ms",
                    snapshot.repositories.len(),
                    snapshot.profile.username,
                    snapshot.load_duration.as_millis()
                )));
                let len = self.visible_repositories().len();
                match self.repo_list_state.selected() {
                    _ if len == 0 => self.repo_list_state.select(None),
                    Some(i) if i < len => {}
                    _ => self.repo_list_state.select(Some(0)),
                }
            }
            IntegrationEvent::Failed { message } => {
                self.console.push(ConsoleMessage::error(message));
            }
        }
        self.clear_console_badge_if_viewing();
    }

    fn spawn_load(&mut self, kind: LoadKind) {
        let manager = self.integration.clone();
        let task = self.runtime.spawn(async move {
            let outcome = match kind {
                LoadKind::Refresh => manager.refresh().await,
                LoadKind::IfStale => match manager.refresh_if_stale().await {
                    Some(outcome) => outcome,
                    None => manager.load_user_data().await,
                },
            };
            tracing::debug!(?kind, ?outcome, "Load finished");
        });
        self.tasks.push(task);
    }

    /// Repositories for the GitHub tab under the current filter and order.
    pub fn visible_repositories(&self) -> Vec<RepositoryView> {
        self.integration
            .repositories(&self.repo_filter, self.repo_order)
    }

    pub fn repo_details(&self) -> LoadingState<Arc<RepoDetails>> {
        self.repo_details
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    /// Open the detail panel and fetch languages, contributors, and README
    /// for the selected repository.
    fn open_repo_details(&mut self) {
        let Some(repo) = self
            .repo_list_state
            .selected()
            .and_then(|i| self.visible_repositories().into_iter().nth(i))
        else {
            return;
        };

        let generation = {
            let mut slot = self.repo_details.lock().unwrap_or_else(PoisonError::into_inner);
            slot.generation += 1;
            slot.state = LoadingState::Loading;
            slot.generation
        };
        self.show_repo_details = true;

        let client = self.integration.client().clone();
        let slot = self.repo_details.clone();
        let task = self.runtime.spawn(async move {
            let state = match load_repo_details(&client, &repo).await {
                Ok(details) => LoadingState::Loaded(Arc::new(details)),
                Err(e) => {
                    tracing::warn!(
                        repo = %repo.full_name,
                        error = %e,
                        "Failed to load repository details"
                    );
                    LoadingState::Error(e.to_string())
                }
            };
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.generation == generation {
                slot.state = state;
            } else {
                tracing::debug!(repo = %repo.full_name, "Dropping superseded repository details");
            }
        });
        self.tasks.push(task);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.search_active {
            self.handle_search_key(key);
            return;
        }

        if self.url_input.is_some() {
            self.handle_url_key(key);
            return;
        }

        if self.contact.editing && self.active_tab == Tab::Contact {
            self.handle_contact_edit_key(key);
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.portfolio.modal_project().is_some() {
            self.handle_modal_key(key);
            return;
        }

        if self.show_repo_details && self.active_tab == Tab::GitHub {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.show_repo_details = false;
                }
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                self.clear_console_badge_if_viewing();
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
                self.clear_console_badge_if_viewing();
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('t') => {
                let theme = self.prefs.toggle_theme();
                self.console
                    .push(ConsoleMessage::info(format!("Switched to {} theme", theme)));
            }
            KeyCode::Char('r') => {
                if self.integration.username().is_some() {
                    self.spawn_load(LoadKind::Refresh);
                }
            }
            KeyCode::Char('e') => self.export(),
            _ => match self.active_tab {
                Tab::Projects => self.handle_projects_key(key),
                Tab::GitHub => self.handle_github_key(key),
                Tab::Contact => self.handle_contact_key(key),
                Tab::Console => self.handle_console_key(key),
            },
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.search_debounce
                    .push(self.search_input.clone(), Instant::now());
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.search_debounce
                    .push(self.search_input.clone(), Instant::now());
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.search_debounce.cancel();
                self.portfolio.set_search(&self.search_input);
                self.search_active = false;
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.portfolio.close_modal(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                let technology = self
                    .portfolio
                    .modal_project()
                    .and_then(|p| p.technologies.get(index).cloned());
                if let Some(technology) = technology {
                    self.portfolio.filter_by_technology(&technology);
                    self.search_input = technology;
                }
            }
            _ => {}
        }
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.portfolio.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.portfolio.select_next(),
            KeyCode::Enter => {
                self.portfolio.open_modal();
            }
            KeyCode::Char('/') => {
                self.search_input = self.portfolio.search().to_string();
                self.search_active = true;
            }
            KeyCode::Char('c') => self.portfolio.cycle_category(),
            KeyCode::Char('s') => self.portfolio.cycle_sort(),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                self.portfolio.next_page();
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                self.portfolio.prev_page();
            }
            KeyCode::Backspace => {
                if let Some(last) = self.portfolio.active_filters().last() {
                    if last.kind == FilterKind::Search {
                        self.search_input.clear();
                    }
                    self.portfolio.remove_filter(last.kind);
                }
            }
            KeyCode::Char('x') => {
                self.search_input.clear();
                self.portfolio.clear_filters();
            }
            _ => {}
        }
    }

    fn handle_github_key(&mut self, key: KeyEvent) {
        let len = self.visible_repositories().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let i = self.repo_list_state.selected().map_or(0, |i| i.saturating_sub(1));
                    self.repo_list_state.select(Some(i));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let i = self
                        .repo_list_state
                        .selected()
                        .map_or(0, |i| (i + 1).min(len - 1));
                    self.repo_list_state.select(Some(i));
                }
            }
            KeyCode::Enter => self.open_repo_details(),
            KeyCode::Char('u') => {
                self.url_input = Some(self.prefs.dashboard_url().unwrap_or_default().to_string());
            }
            KeyCode::Char('s') => {
                let next = match self.repo_order.key {
                    SortKey::Updated => SortKey::Created,
                    SortKey::Created => SortKey::Name,
                    SortKey::Name => SortKey::Stars,
                    SortKey::Stars => SortKey::Forks,
                    SortKey::Forks => SortKey::Updated,
                };
                self.repo_order = SortOrder::natural(next);
                self.repo_list_state.select(if len > 0 { Some(0) } else { None });
            }
            KeyCode::Char('f') => {
                self.repo_filter.forks = match self.repo_filter.forks {
                    None => Some(false),
                    Some(_) => None,
                };
                let len = self.visible_repositories().len();
                self.repo_list_state.select(if len > 0 { Some(0) } else { None });
            }
            _ => {}
        }
    }

    /// Edit the dashboard URL. An empty value clears it.
    fn handle_url_key(&mut self, key: KeyEvent) {
        let Some(input) = self.url_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.url_input = None,
            KeyCode::Enter => {
                let url = input.trim().to_string();
                self.url_input = None;
                let message = if url.is_empty() {
                    self.prefs.clear_dashboard_url();
                    ConsoleMessage::info("Dashboard URL cleared")
                } else {
                    match self.prefs.set_dashboard_url(&url) {
                        Ok(()) => ConsoleMessage::info(format!("Dashboard URL set to {}", url)),
                        Err(e) => ConsoleMessage::error(e.to_string()),
                    }
                };
                self.console.push(message);
            }
            _ => {}
        }
    }

    fn handle_contact_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.contact.focus_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.contact.focus_next(),
            KeyCode::Enter => {
                if !self.contact.start_editing() {
                    self.send_contact();
                }
            }
            KeyCode::Char('x') => self.contact.reset(),
            _ => {}
        }
    }

    fn handle_contact_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.contact.push_char(c),
            KeyCode::Backspace => self.contact.pop_char(),
            KeyCode::Enter | KeyCode::Esc => self.contact.finish_editing(),
            KeyCode::Tab | KeyCode::Down => {
                self.contact.finish_editing();
                self.contact.focus_next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.contact.finish_editing();
                self.contact.focus_prev();
            }
            _ => {}
        }
    }

    /// Nothing leaves the machine: a valid message is logged and the form
    /// is cleared.
    fn send_contact(&mut self) {
        let Some(sent) = self.contact.submit() else {
            return;
        };
        tracing::info!(
            name = %sent.name,
            email = %sent.email,
            subject = %sent.subject,
            "Contact message submitted"
        );
        self.console.push(ConsoleMessage::info(format!(
            "Message from {} <{}> sent: {}",
            sent.name, sent.email, sent.subject
        )));
    }

    fn handle_console_key(&mut self, key: KeyEvent) {
        let len = self.console.messages.len();
        if len == 0 {
            return;
        }
        let current = self.console.list_state.selected();
        let i = match key.code {
            KeyCode::Up | KeyCode::Char('k') => current.map_or(0, |i| i.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => current.map_or(0, |i| (i + 1).min(len - 1)),
            _ => return,
        };
        self.console.list_state.select(Some(i));
    }

    fn export(&mut self) {
        let export = DashboardExport::collect(&self.integration, Utc::now());
        let message = match export.write(&self.export_path) {
            Ok(()) => ConsoleMessage::info(format!(
                "Exported dashboard to {}",
                self.export_path.display()
            )),
            Err(e) => ConsoleMessage::error(format!("Export failed: {}", e)),
        };
        self.console.push(message);
        self.clear_console_badge_if_viewing();
    }

    /// Clear console badge when viewing console tab.
    fn clear_console_badge_if_viewing(&mut self) {
        if self.active_tab == Tab::Console {
            self.console.mark_read();
        }
    }
}
