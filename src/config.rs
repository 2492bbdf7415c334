//! Configuration file support for folio.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `FOLIO_`, nested keys split by `__`,
//!    e.g. `FOLIO_GITHUB__USERNAME`)
//! 3. Config file (./folio.toml, then ~/.config/folio/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! username = "octocat"
//! token = "ghp_..."  # or GITHUB_TOKEN
//!
//! [cache]
//! ttl_secs = 300
//!
//! [portfolio]
//! projects = "demos/projects.json"
//! export = "folio-dashboard.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::github::ClientOptions;
use crate::github::client::GITHUB_API_BASE;
use crate::store::paths;

const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
const DEFAULT_EXPORT_FILE: &str = "folio-dashboard.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub cache: CacheConfig,
    pub portfolio: PortfolioConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Whose profile and repositories to show.
    pub username: Option<String>,
    /// Personal access token. `GITHUB_TOKEN` is used when unset.
    pub token: Option<String>,
    /// API base URL, for GitHub Enterprise or a local test server.
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a cached API response stays fresh.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// JSON file with the project list.
    pub projects: Option<PathBuf>,
    /// Where the `e` key and `--export` write the dashboard JSON.
    pub export: Option<PathBuf>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Never fails: a broken file or variable is logged and defaults are used.
    pub fn load() -> Self {
        let mut files = Vec::new();
        if let Some(dir) = paths::config_dir() {
            files.push(dir.join("config.toml"));
        }
        files.push(PathBuf::from("folio.toml"));
        Self::load_from(&files, true)
    }

    /// Later files override earlier ones; environment overrides both.
    pub fn load_from(files: &[PathBuf], with_env: bool) -> Self {
        let mut builder = ConfigBuilder::builder();

        for file in files.iter().filter(|f| f.exists()) {
            tracing::debug!("Loading config from {:?}", file);
            builder = builder.add_source(
                File::from(file.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    pub fn github_username(&self) -> Option<String> {
        non_empty(self.github.username.clone())
    }

    /// Configured token, else `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        non_empty(self.github.token.clone())
            .or_else(|| non_empty(std::env::var("GITHUB_TOKEN").ok()))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base: non_empty(self.github.api_base.clone())
                .unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            token: self.github_token(),
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
        }
    }

    pub fn projects_path(&self) -> Option<&Path> {
        self.portfolio.projects.as_deref()
    }

    pub fn export_path(&self) -> PathBuf {
        self.portfolio
            .export
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::load_from(&[], false);
        assert_eq!(config.cache.ttl_secs, 300);
        assert!(config.github_username().is_none());
        assert_eq!(config.client_options().api_base, GITHUB_API_BASE);
        assert_eq!(config.export_path(), PathBuf::from("folio-dashboard.json"));
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("config.toml");
        let local = dir.path().join("folio.toml");
        fs::write(
            &global,
            "[github]\nusername = \"octocat\"\napi_base = \"http://localhost:9000/\"\n[cache]\nttl_secs = 60\n",
        )
        .unwrap();
        fs::write(
            &local,
            "[github]\nusername = \"alice\"\n[portfolio]\nprojects = \"p.json\"\n",
        )
        .unwrap();

        let config = Config::load_from(&[global, local], false);
        assert_eq!(config.github_username().as_deref(), Some("alice"));
        assert_eq!(config.projects_path(), Some(Path::new("p.json")));

        let options = config.client_options();
        assert_eq!(options.api_base, "http://localhost:9000/");
        assert_eq!(options.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "[cache]\nttl_secs = \"soon\"\n").unwrap();

        let config = Config::load_from(&[path], false);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn test_blank_username_is_none() {
        let mut config = Config::default();
        config.github.username = Some("   ".into());
        assert!(config.github_username().is_none());
    }
}
