// GitHub API endpoint functions.
// One cached method per resource; cache keys encode every request parameter.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

use super::client::GitHubClient;
use super::types::{Contributor, LanguageBytes, Readme, Repository, SearchResponse, User};

/// Sort direction shared by listing and search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Which repositories of a user to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoType {
    #[default]
    All,
    Owner,
    Member,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::All => "all",
            RepoType::Owner => "owner",
            RepoType::Member => "member",
        }
    }
}

/// Server-side ordering of a repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoSort {
    Created,
    #[default]
    Updated,
    Pushed,
    FullName,
}

impl RepoSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoSort::Created => "created",
            RepoSort::Updated => "updated",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

/// Query options for `get_user_repositories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoListOptions {
    pub repo_type: RepoType,
    pub sort: RepoSort,
    pub direction: Direction,
    pub per_page: u32,
    pub page: u32,
}

impl Default for RepoListOptions {
    fn default() -> Self {
        Self {
            repo_type: RepoType::All,
            sort: RepoSort::Updated,
            direction: Direction::Desc,
            per_page: 100,
            page: 1,
        }
    }
}

/// Ranking used by repository search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    #[default]
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Stars => "stars",
            SearchSort::Forks => "forks",
            SearchSort::HelpWantedIssues => "help-wanted-issues",
            SearchSort::Updated => "updated",
        }
    }
}

/// Query options for `search_repositories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub sort: SearchSort,
    pub order: Direction,
    pub per_page: u32,
    pub page: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            sort: SearchSort::Stars,
            order: Direction::Desc,
            per_page: 30,
            page: 1,
        }
    }
}

impl GitHubClient {
    /// Get a user's public profile.
    pub async fn get_user_profile(&self, username: &str) -> Result<User> {
        let value = self
            .cached_get(
                &format!("user:{}", username),
                &format!("/users/{}", username),
                &[],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get one page of a user's repositories.
    pub async fn get_user_repositories(
        &self,
        username: &str,
        options: &RepoListOptions,
    ) -> Result<Vec<Repository>> {
        let key = format!(
            "repos:{}:{}:{}:{}:{}:{}",
            username,
            options.repo_type.as_str(),
            options.sort.as_str(),
            options.direction.as_str(),
            options.per_page,
            options.page
        );
        let params = [
            ("type", options.repo_type.as_str().to_string()),
            ("sort", options.sort.as_str().to_string()),
            ("direction", options.direction.as_str().to_string()),
            ("per_page", options.per_page.to_string()),
            ("page", options.page.to_string()),
        ];
        let value = self
            .cached_get(&key, &format!("/users/{}/repos", username), &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get a specific repository.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let value = self
            .cached_get(
                &format!("repo:{}/{}", owner, repo),
                &format!("/repos/{}/{}", owner, repo),
                &[],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get bytes of code per language for a repository.
    pub async fn get_repository_languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes> {
        let value = self
            .cached_get(
                &format!("languages:{}/{}", owner, repo),
                &format!("/repos/{}/{}/languages", owner, repo),
                &[],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get contributors for a repository.
    pub async fn get_repository_contributors(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Contributor>> {
        let value = self
            .cached_get(
                &format!("contributors:{}/{}", owner, repo),
                &format!("/repos/{}/{}/contributors", owner, repo),
                &[],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get the README of a repository.
    ///
    /// A repository without a README is normal, so any request failure
    /// resolves to `None`. An exhausted quota is still an error.
    pub async fn get_repository_readme(&self, owner: &str, repo: &str) -> Result<Option<Readme>> {
        let result = self
            .cached_get(
                &format!("readme:{}/{}", owner, repo),
                &format!("/repos/{}/{}/readme", owner, repo),
                &[],
            )
            .await;

        match result {
            Ok(value) => Ok(serde_json::from_value(value).ok()),
            Err(FolioError::RateLimitExceeded) => Err(FolioError::RateLimitExceeded),
            Err(e) => {
                tracing::debug!(owner, repo, error = %e, "No README available");
                Ok(None)
            }
        }
    }

    /// Search public repositories.
    pub async fn search_repositories(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let key = format!(
            "search:{}:{}:{}:{}:{}",
            query,
            options.sort.as_str(),
            options.order.as_str(),
            options.per_page,
            options.page
        );
        let params = [
            ("q", query.to_string()),
            ("sort", options.sort.as_str().to_string()),
            ("order", options.order.as_str().to_string()),
            ("per_page", options.per_page.to_string()),
            ("page", options.page.to_string()),
        ];
        let value = self
            .cached_get(&key, "/search/repositories", &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::github::client::ClientOptions;
    use crate::http::mock::{MockTransport, json_response};
    use crate::store::MemoryStore;
    use serde_json::json;

    const ALICE_REPOS: &str = "https://api.github.com/users/alice/repos?type=all&sort=updated&direction=desc&per_page=100&page=1";

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new(
            Arc::new(transport.clone()),
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new()),
            ClientOptions::default(),
        )
    }

    fn repo_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("alice/{}", name),
            "html_url": format!("https://github.com/alice/{}", name),
            "stargazers_count": id * 10,
        })
    }

    #[tokio::test]
    async fn test_repeated_listing_hits_cache() {
        let transport = MockTransport::new();
        transport.push_json(ALICE_REPOS, json!([repo_json(1, "one"), repo_json(2, "two")]));
        let client = client(&transport);
        let options = RepoListOptions {
            per_page: 100,
            page: 1,
            ..RepoListOptions::default()
        };

        let first = client.get_user_repositories("alice", &options).await.unwrap();
        let second = client.get_user_repositories("alice", &options).await.unwrap();

        assert_eq!(transport.request_count(), 1);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_different_page_is_a_different_key() {
        let transport = MockTransport::new();
        transport.push_json(ALICE_REPOS, json!([repo_json(1, "one")]));
        transport.push_json(
            "https://api.github.com/users/alice/repos?type=all&sort=updated&direction=desc&per_page=100&page=2",
            json!([]),
        );
        let client = client(&transport);

        client
            .get_user_repositories("alice", &RepoListOptions::default())
            .await
            .unwrap();
        let page_two = client
            .get_user_repositories(
                "alice",
                &RepoListOptions {
                    page: 2,
                    ..RepoListOptions::default()
                },
            )
            .await
            .unwrap();

        assert!(page_two.is_empty());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_profile_and_repository() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/users/alice",
            json!({"id": 9, "login": "alice", "followers": 12}),
        );
        transport.push_json("https://api.github.com/repos/alice/one", repo_json(1, "one"));
        let client = client(&transport);

        let user = client.get_user_profile("alice").await.unwrap();
        assert_eq!(user.login, "alice");
        assert_eq!(user.followers, 12);

        let repo = client.get_repository("alice", "one").await.unwrap();
        assert_eq!(repo.full_name, "alice/one");
    }

    #[tokio::test]
    async fn test_languages_and_contributors() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/repos/alice/one/languages",
            json!({"Rust": 9000, "Shell": 1000}),
        );
        transport.push_json(
            "https://api.github.com/repos/alice/one/contributors",
            json!([{"id": 1, "login": "alice", "contributions": 42}]),
        );
        let client = client(&transport);

        let languages = client.get_repository_languages("alice", "one").await.unwrap();
        assert_eq!(languages.get("Rust"), Some(&9000));

        let contributors = client
            .get_repository_contributors("alice", "one")
            .await
            .unwrap();
        assert_eq!(contributors[0].contributions, 42);
    }

    #[tokio::test]
    async fn test_missing_readme_is_none() {
        let transport = MockTransport::new();
        transport.push_response(
            "https://api.github.com/repos/o/r/readme",
            json_response(404, "Not Found", json!({"message": "Not Found"}), Vec::new()),
        );
        let client = client(&transport);

        let readme = client.get_repository_readme("o", "r").await.unwrap();
        assert!(readme.is_none());
    }

    #[tokio::test]
    async fn test_readme_is_cached() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/repos/o/r/readme",
            json!({"name": "README.md", "path": "README.md", "content": "aGk=", "encoding": "base64"}),
        );
        let client = client(&transport);

        let first = client.get_repository_readme("o", "r").await.unwrap().unwrap();
        let second = client.get_repository_readme("o", "r").await.unwrap().unwrap();

        assert_eq!(first.decoded_content().as_deref(), Some("hi"));
        assert_eq!(second.name, "README.md");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_search_uses_search_params() {
        let transport = MockTransport::new();
        let url = "https://api.github.com/search/repositories?q=tui&sort=stars&order=desc&per_page=30&page=1";
        transport.push_json(
            url,
            json!({"total_count": 1, "incomplete_results": false, "items": [repo_json(3, "tui")]}),
        );
        let client = client(&transport);

        let results = client
            .search_repositories("tui", &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(results.total_count, 1);
        assert_eq!(results.items[0].name, "tui");
        assert_eq!(transport.requests()[0].url, url);
    }
}
