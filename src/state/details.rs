// Per-repository detail: language breakdown, contributors, and README.

use crate::error::{FolioError, Result};
use crate::github::GitHubClient;
use crate::transform::{
    ContributorView, LanguageShare, RepositoryView, to_contributor_views, to_language_breakdown,
};

/// README text beyond this many lines is cut for the preview.
const README_PREVIEW_LINES: usize = 40;

#[derive(Debug, Clone)]
pub struct RepoDetails {
    pub repository: RepositoryView,
    pub languages: Vec<LanguageShare>,
    pub contributors: Vec<ContributorView>,
    pub readme: Option<String>,
}

/// Fetch languages, contributors, and README for `repo` concurrently.
pub async fn load_repo_details(
    client: &GitHubClient,
    repo: &RepositoryView,
) -> Result<RepoDetails> {
    let (owner, name) = repo
        .full_name
        .split_once('/')
        .ok_or_else(|| FolioError::Other(format!("invalid repository name: {}", repo.full_name)))?;

    let (languages, contributors, readme) = tokio::try_join!(
        client.get_repository_languages(owner, name),
        client.get_repository_contributors(owner, name),
        client.get_repository_readme(owner, name),
    )?;

    Ok(RepoDetails {
        repository: repo.clone(),
        languages: to_language_breakdown(&languages),
        contributors: to_contributor_views(&contributors),
        readme: readme
            .and_then(|r| r.decoded_content())
            .map(|text| preview(&text)),
    })
}

fn preview(text: &str) -> String {
    text.lines()
        .take(README_PREVIEW_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::github::{ClientOptions, Repository};
    use crate::http::mock::{MockTransport, json_response};
    use crate::store::MemoryStore;
    use crate::transform::to_repository_view;
    use serde_json::json;

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new(
            Arc::new(transport.clone()),
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new()),
            ClientOptions::default(),
        )
    }

    fn folio() -> RepositoryView {
        to_repository_view(&Repository {
            id: 1,
            name: "folio".into(),
            full_name: "alice/folio".into(),
            ..Repository::default()
        })
    }

    #[tokio::test]
    async fn test_loads_all_parts() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/repos/alice/folio/languages",
            json!({"Rust": 900, "Shell": 100}),
        );
        transport.push_json(
            "https://api.github.com/repos/alice/folio/contributors",
            json!([{"id": 1, "login": "alice", "contributions": 42}]),
        );
        transport.push_json(
            "https://api.github.com/repos/alice/folio/readme",
            // "# folio\n"
            json!({"name": "README.md", "encoding": "base64", "content": "IyBmb2xpbwo="}),
        );

        let details = load_repo_details(&client(&transport), &folio()).await.unwrap();
        assert_eq!(details.languages[0].language, "Rust");
        assert_eq!(details.languages[0].percentage, 90.0);
        assert_eq!(details.contributors[0].contributions, 42);
        assert_eq!(details.readme.as_deref(), Some("# folio"));
    }

    #[tokio::test]
    async fn test_missing_readme_still_loads() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/repos/alice/folio/languages",
            json!({}),
        );
        transport.push_json(
            "https://api.github.com/repos/alice/folio/contributors",
            json!([]),
        );
        transport.push_response(
            "https://api.github.com/repos/alice/folio/readme",
            json_response(404, "Not Found", json!({}), Vec::new()),
        );

        let details = load_repo_details(&client(&transport), &folio()).await.unwrap();
        assert!(details.languages.is_empty());
        assert!(details.readme.is_none());
    }

    #[tokio::test]
    async fn test_malformed_full_name() {
        let mut repo = folio();
        repo.full_name = "folio".into();
        let err = load_repo_details(&client(&MockTransport::new()), &repo)
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Other(_)));
    }
}
