// Persisted user preferences.
// Theme, dashboard embed URL, and the last successful GitHub refresh.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Url;

use crate::error::{FolioError, Result};
use crate::store::{DASHBOARD_URL_KEY, LAST_UPDATE_KEY, LocalStore, THEME_KEY};

/// Data older than this is refreshed when the app starts or regains focus.
pub const STALE_AFTER: Duration = Duration::minutes(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Preferences backed by the local store.
///
/// Reads happen once at load. Writes go straight through; a failed write is
/// logged and the in-memory value still changes.
pub struct Preferences {
    store: Arc<dyn LocalStore>,
    theme: Theme,
    dashboard_url: Option<String>,
}

impl Preferences {
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let theme = read(&*store, THEME_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let dashboard_url = read(&*store, DASHBOARD_URL_KEY);
        Self {
            store,
            theme,
            dashboard_url,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        write(&*self.store, THEME_KEY, theme.as_str());
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggle();
        self.set_theme(next);
        next
    }

    pub fn dashboard_url(&self) -> Option<&str> {
        self.dashboard_url.as_deref()
    }

    /// Store an embed URL. Must be absolute http(s).
    pub fn set_dashboard_url(&mut self, url: &str) -> Result<()> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| FolioError::Other(format!("invalid dashboard URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FolioError::Other(format!(
                "invalid dashboard URL scheme: {}",
                parsed.scheme()
            )));
        }
        let url = parsed.to_string();
        write(&*self.store, DASHBOARD_URL_KEY, &url);
        self.dashboard_url = Some(url);
        Ok(())
    }

    pub fn clear_dashboard_url(&mut self) {
        self.dashboard_url = None;
        if let Err(e) = self.store.remove(DASHBOARD_URL_KEY) {
            tracing::warn!(error = %e, "Failed to clear dashboard URL");
        }
    }
}

/// When GitHub data was last loaded successfully.
pub fn last_refresh(store: &dyn LocalStore) -> Option<DateTime<Utc>> {
    let millis: i64 = read(store, LAST_UPDATE_KEY)?.trim().parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

pub fn record_refresh(store: &dyn LocalStore, at: DateTime<Utc>) {
    write(store, LAST_UPDATE_KEY, &at.timestamp_millis().to_string());
}

/// True when there is no recorded refresh or it is older than `STALE_AFTER`.
pub fn is_stale(store: &dyn LocalStore, now: DateTime<Utc>) -> bool {
    match last_refresh(store) {
        Some(at) => now - at > STALE_AFTER,
        None => true,
    }
}

fn read(store: &dyn LocalStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read preference");
            None
        }
    }
}

fn write(store: &dyn LocalStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "Failed to persist preference");
    }
}
