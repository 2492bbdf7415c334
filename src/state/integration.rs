// GitHub integration manager.
// Loads a user's profile and repositories, keeps the last good snapshot, and
// broadcasts change notifications to the UI.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::clock::Clock;
use crate::error::{FolioError, Result};
use crate::github::{GitHubClient, RateLimitState, RepoListOptions};
use crate::store::LocalStore;
use crate::transform::{
    FilterCriteria, RankedCount, RepoStats, RepositoryView, SortOrder, UserProfileView,
    aggregate_stats, filter_repositories, ranked_counts, sort_repositories, to_repository_view,
    to_user_profile_view,
};

use super::loading::LoadingState;
use super::prefs;

const EVENT_CAPACITY: usize = 16;
const REPOS_PER_PAGE: u32 = 100;

/// One successful load, already transformed for display.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub profile: UserProfileView,
    pub repositories: Vec<RepositoryView>,
    pub stats: RepoStats,
    pub loaded_at: DateTime<Utc>,
    pub load_duration: Duration,
}

#[derive(Debug, Clone)]
pub enum IntegrationEvent {
    DataUpdated(Arc<Snapshot>),
    Failed { message: String },
}

/// What a call to `load_user_data` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Another load was already in flight.
    Skipped,
    Failed,
}

struct Inner {
    state: LoadingState<Arc<Snapshot>>,
    last_good: Option<Arc<Snapshot>>,
}

pub struct IntegrationManager {
    client: Arc<GitHubClient>,
    username: Option<String>,
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<IntegrationEvent>,
}

impl IntegrationManager {
    pub fn new(
        client: Arc<GitHubClient>,
        username: Option<String>,
        store: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            username: username.filter(|u| !u.trim().is_empty()),
            store,
            clock,
            inner: Mutex::new(Inner {
                state: LoadingState::Idle,
                last_good: None,
            }),
            events,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn client(&self) -> &Arc<GitHubClient> {
        &self.client
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IntegrationEvent> {
        self.events.subscribe()
    }

    /// Fetch profile and repositories together and publish the result.
    ///
    /// A call made while another is loading returns `Skipped` without
    /// touching the network.
    pub async fn load_user_data(&self) -> LoadOutcome {
        {
            let mut inner = self.inner();
            if inner.state.is_loading() {
                tracing::debug!("Load already in flight, skipping");
                return LoadOutcome::Skipped;
            }
            inner.state = LoadingState::Loading;
        }

        let started = Instant::now();
        match self.fetch().await {
            Ok((profile, repositories)) => {
                let now = self.clock.now();
                let stats = aggregate_stats(&repositories);
                let snapshot = Arc::new(Snapshot {
                    profile,
                    repositories,
                    stats,
                    loaded_at: now,
                    load_duration: started.elapsed(),
                });
                tracing::info!(
                    user = %snapshot.profile.username,
                    repositories = snapshot.repositories.len(),
                    elapsed_ms = snapshot.load_duration.as_millis() as u64,
                    "Loaded GitHub data"
                );

                {
                    let mut inner = self.inner();
                    inner.state = LoadingState::Loaded(snapshot.clone());
                    inner.last_good = Some(snapshot.clone());
                }
                prefs::record_refresh(&*self.store, now);
                let _ = self.events.send(IntegrationEvent::DataUpdated(snapshot));
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "GitHub load failed");
                self.inner().state = LoadingState::Error(message.clone());
                let _ = self.events.send(IntegrationEvent::Failed { message });
                LoadOutcome::Failed
            }
        }
    }

    /// Drop cached responses, then load.
    pub async fn refresh(&self) -> LoadOutcome {
        self.client.clear_cache();
        self.load_user_data().await
    }

    /// Refresh when the last successful load is missing or older than the
    /// staleness threshold. `None` means the data was fresh enough.
    pub async fn refresh_if_stale(&self) -> Option<LoadOutcome> {
        if !self.is_stale() {
            return None;
        }
        Some(self.refresh().await)
    }

    pub fn is_stale(&self) -> bool {
        prefs::is_stale(&*self.store, self.clock.now())
    }

    pub fn state(&self) -> LoadingState<Arc<Snapshot>> {
        self.inner().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner().state.is_loading()
    }

    /// The last successful snapshot, kept through later loads and failures.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner().last_good.clone()
    }

    pub fn profile(&self) -> Option<UserProfileView> {
        self.snapshot().map(|s| s.profile.clone())
    }

    pub fn repositories(&self, criteria: &FilterCriteria, order: SortOrder) -> Vec<RepositoryView> {
        match self.snapshot() {
            Some(snapshot) => {
                sort_repositories(&filter_repositories(&snapshot.repositories, criteria), order)
            }
            None => Vec::new(),
        }
    }

    pub fn stats(&self) -> Option<RepoStats> {
        self.snapshot().map(|s| s.stats.clone())
    }

    pub fn language_stats(&self) -> Vec<RankedCount> {
        self.snapshot()
            .map(|s| ranked_counts(&s.stats.languages))
            .unwrap_or_default()
    }

    pub fn topic_stats(&self) -> Vec<RankedCount> {
        self.snapshot()
            .map(|s| ranked_counts(&s.stats.topics))
            .unwrap_or_default()
    }

    pub fn rate_limit(&self) -> RateLimitState {
        self.client.rate_limit()
    }

    async fn fetch(&self) -> Result<(UserProfileView, Vec<RepositoryView>)> {
        let username = self.username.as_deref().ok_or(FolioError::MissingUsername)?;
        let options = RepoListOptions {
            per_page: REPOS_PER_PAGE,
            ..RepoListOptions::default()
        };

        let (user, repos) = tokio::try_join!(
            self.client.get_user_profile(username),
            self.client.get_user_repositories(username, &options),
        )?;

        Ok((
            to_user_profile_view(&user),
            repos.iter().map(to_repository_view).collect(),
        ))
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
