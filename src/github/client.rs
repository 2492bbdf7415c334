// GitHub API HTTP client.
// Handles authentication headers, response caching, and rate-limit tracking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;

use crate::clock::Clock;
use crate::error::{FolioError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::store::LocalStore;

use super::cache::{DEFAULT_TTL, ResponseCache};
use super::rate_limit::{DEFAULT_LIMIT, RateLimitState, RateLimiter};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "folio-tui";

/// Connection settings for a client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base: String,
    pub token: Option<String>,
    pub cache_ttl: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            token: None,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

/// GitHub API client with response caching and rate limit tracking.
///
/// Methods take `&self` so independent requests can be in flight at the
/// same time. The cache and limiter locks are only held between awaits.
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_base: String,
    token: Option<String>,
    cache: Mutex<ResponseCache>,
    rate_limit: Mutex<RateLimiter>,
}

impl GitHubClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
        options: ClientOptions,
    ) -> Self {
        let cache = ResponseCache::new(store, clock.clone(), options.cache_ttl);
        Self {
            transport,
            api_base: options.api_base.trim_end_matches('/').to_string(),
            token: options.token.filter(|t| !t.is_empty()),
            cache: Mutex::new(cache),
            rate_limit: Mutex::new(RateLimiter::new(clock)),
        }
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> RateLimitState {
        self.limiter().snapshot()
    }

    /// Whether a call could be made right now.
    pub fn has_quota(&self) -> bool {
        self.limiter().has_quota()
    }

    pub fn time_until_reset(&self) -> Duration {
        self.limiter().time_until_reset()
    }

    /// Drop every cached response, in memory and on disk.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    pub fn cached_responses(&self) -> usize {
        self.cache().len()
    }

    /// Serve `cache_key` from the cache or fetch `endpoint` and cache the body.
    ///
    /// Order matters: a fresh cache hit skips the quota check entirely.
    pub(crate) async fn cached_get(
        &self,
        cache_key: &str,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value> {
        if let Some(value) = self.cache().get(cache_key) {
            tracing::debug!(cache_key, "Cache hit");
            return Ok(value);
        }

        if !self.has_quota() {
            return Err(FolioError::RateLimitExceeded);
        }

        let value = self.request(endpoint, params).await?;
        self.cache().set(cache_key, value.clone());
        Ok(value)
    }

    /// Make a GET request to the GitHub API and parse the JSON body.
    async fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.url(endpoint, params)?;
        tracing::debug!(%url, "GitHub request");

        let mut headers = vec![
            ("Accept".to_string(), GITHUB_MEDIA_TYPE.to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("token {}", token)));
        }

        let response = self.transport.get(HttpRequest { url, headers }).await?;

        self.update_rate_limit(&response);

        if !response.is_success() {
            return Err(FolioError::Upstream {
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let mut url = reqwest::Url::parse(&format!("{}{}", self.api_base, endpoint))
            .map_err(|e| FolioError::Other(format!("Invalid API URL: {}", e)))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url.to_string())
    }

    /// Update rate limit from response headers.
    /// Missing or malformed headers fall back to 60 remaining / 60 limit / reset 0.
    fn update_rate_limit(&self, response: &HttpResponse) {
        let header = |name: &str| response.header(name).and_then(|v| v.trim().parse().ok());

        let remaining = header("x-ratelimit-remaining").unwrap_or(DEFAULT_LIMIT as i64);
        let limit = header("x-ratelimit-limit").unwrap_or(DEFAULT_LIMIT as i64);
        let reset = header("x-ratelimit-reset").unwrap_or(0);

        self.limiter().record_from_headers(
            remaining.max(0) as u64,
            limit.max(0) as u64,
            reset,
        );
    }

    fn cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn limiter(&self) -> MutexGuard<'_, RateLimiter> {
        self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
