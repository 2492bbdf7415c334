// GitHub API module.
// Provides the cached client, rate limiting, and types for the GitHub REST API.

pub mod cache;
pub mod client;
pub mod endpoints;
pub mod rate_limit;
pub mod types;

pub use client::{ClientOptions, GitHubClient};
pub use endpoints::{Direction, RepoListOptions, RepoSort, RepoType, SearchOptions, SearchSort};
pub use rate_limit::RateLimitState;
pub use types::*;
