// GitHub API response types.
// Defines structs for deserializing GitHub REST API responses.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub user profile as returned by `/users/{username}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub hireable: Option<bool>,
    pub public_repos: u64,
    pub public_gists: u64,
    pub followers: u64,
    pub following: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub twitter_username: Option<String>,
}

/// License summary attached to a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

/// GitHub repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub watchers_count: u64,
    pub open_issues_count: u64,
    pub size: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
    pub fork: bool,
    pub archived: bool,
    pub private: bool,
    pub visibility: Option<String>,
    pub license: Option<License>,
    pub default_branch: Option<String>,
}

/// Repository contributor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contributor {
    pub id: u64,
    pub login: String,
    pub avatar_url: Option<String>,
    pub contributions: u64,
}

/// Repository README metadata and base64 content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Readme {
    pub name: String,
    pub path: String,
    pub content: Option<String>,
    pub encoding: Option<String>,
    pub html_url: Option<String>,
}

impl Readme {
    /// Decode the README body. GitHub wraps base64 content at 60 columns.
    pub fn decoded_content(&self) -> Option<String> {
        let content = self.content.as_deref()?;
        if self.encoding.as_deref() != Some("base64") {
            return Some(content.to_string());
        }
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(compact).ok()?;
        String::from_utf8(bytes).ok()
    }
}

/// Response wrapper for repository search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

/// Bytes of code per language, as returned by `/repos/{o}/{r}/languages`.
pub type LanguageBytes = BTreeMap<String, u64>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_tolerates_missing_fields() {
        let repo: Repository = serde_json::from_value(json!({
            "id": 1,
            "name": "folio",
            "full_name": "alice/folio",
            "html_url": "https://github.com/alice/folio",
            "description": null,
            "license": null,
        }))
        .unwrap();

        assert_eq!(repo.name, "folio");
        assert!(repo.topics.is_empty());
        assert!(repo.description.is_none());
        assert_eq!(repo.stargazers_count, 0);
    }

    #[test]
    fn test_readme_decodes_wrapped_base64() {
        let readme = Readme {
            name: "README.md".into(),
            path: "README.md".into(),
            content: Some("IyBmb2xp\nbw==\n".into()),
            encoding: Some("base64".into()),
            html_url: None,
        };
        assert_eq!(readme.decoded_content().as_deref(), Some("# folio"));
    }
}
