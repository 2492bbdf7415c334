// Dashboard export.
// Serializes the current GitHub view and load metrics to a JSON file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::github::RateLimitState;
use crate::state::IntegrationManager;
use crate::store::file::write_text;
use crate::transform::{RepoStats, UserProfileView};

#[derive(Debug, Serialize)]
pub struct DashboardExport {
    pub timestamp: DateTime<Utc>,
    pub github: GitHubSection,
    pub performance: PerformanceSection,
}

#[derive(Debug, Serialize)]
pub struct GitHubSection {
    pub username: Option<String>,
    pub profile: Option<UserProfileView>,
    pub stats: Option<RepoStats>,
    pub rate_limit: RateLimitState,
}

#[derive(Debug, Serialize)]
pub struct PerformanceSection {
    /// Wall time of the last successful load.
    pub last_load_ms: Option<u64>,
    pub cached_responses: usize,
    pub repositories: usize,
}

impl DashboardExport {
    pub fn collect(manager: &IntegrationManager, now: DateTime<Utc>) -> Self {
        let snapshot = manager.snapshot();
        Self {
            timestamp: now,
            github: GitHubSection {
                username: manager.username().map(str::to_string),
                profile: snapshot.as_ref().map(|s| s.profile.clone()),
                stats: snapshot.as_ref().map(|s| s.stats.clone()),
                rate_limit: manager.rate_limit(),
            },
            performance: PerformanceSection {
                last_load_ms: snapshot
                    .as_ref()
                    .map(|s| s.load_duration.as_millis() as u64),
                cached_responses: manager.client().cached_responses(),
                repositories: snapshot.as_ref().map_or(0, |s| s.repositories.len()),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_text(path, &self.to_json()?)?;
        tracing::info!(path = %path.display(), "Wrote dashboard export");
        Ok(())
    }
}
