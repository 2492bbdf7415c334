// View models derived from raw GitHub payloads.
// Field renaming and defaulting only; every view is rebuilt on each fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::{Contributor, LanguageBytes, Repository, User};

pub const NO_DESCRIPTION: &str = "No description available";

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryView {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub size: u64,
    pub topics: Vec<String>,
    pub is_fork: bool,
    pub is_archived: bool,
    pub is_private: bool,
    pub visibility: Visibility,
    pub license: Option<String>,
    pub default_branch: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfileView {
    pub id: u64,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub public_repos: u64,
    pub public_gists: u64,
    pub followers: u64,
    pub following: u64,
    pub avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfileView {
    /// Display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorView {
    pub id: u64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub contributions: u64,
}

/// Share of a repository's code written in one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub bytes: u64,
    /// Percent of total bytes, rounded to one decimal place.
    pub percentage: f64,
}

pub fn to_repository_view(repo: &Repository) -> RepositoryView {
    let visibility = match repo.visibility.as_deref() {
        Some("public") => Visibility::Public,
        Some("private") => Visibility::Private,
        Some("internal") => Visibility::Internal,
        _ if repo.private => Visibility::Private,
        _ => Visibility::Public,
    };

    RepositoryView {
        id: repo.id,
        name: repo.name.clone(),
        full_name: repo.full_name.clone(),
        description: repo
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        url: repo.html_url.clone(),
        homepage: repo.homepage.clone().filter(|h| !h.is_empty()),
        language: repo.language.clone(),
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        watchers: repo.watchers_count,
        open_issues: repo.open_issues_count,
        size: repo.size,
        topics: repo.topics.clone(),
        is_fork: repo.fork,
        is_archived: repo.archived,
        is_private: repo.private,
        visibility,
        license: repo.license.as_ref().map(|l| l.name.clone()),
        default_branch: repo.default_branch.clone(),
        created_at: repo.created_at,
        updated_at: repo.updated_at,
        pushed_at: repo.pushed_at,
    }
}

pub fn to_user_profile_view(user: &User) -> UserProfileView {
    UserProfileView {
        id: user.id,
        username: user.login.clone(),
        name: user.name.clone(),
        bio: user.bio.clone(),
        company: user.company.clone(),
        blog: user.blog.clone(),
        location: user.location.clone(),
        public_repos: user.public_repos,
        public_gists: user.public_gists,
        followers: user.followers,
        following: user.following,
        avatar_url: user.avatar_url.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn to_contributor_view(contributor: &Contributor) -> ContributorView {
    ContributorView {
        id: contributor.id,
        username: contributor.login.clone(),
        avatar_url: contributor.avatar_url.clone(),
        contributions: contributor.contributions,
    }
}

pub fn to_contributor_views(contributors: &[Contributor]) -> Vec<ContributorView> {
    contributors.iter().map(to_contributor_view).collect()
}

/// Percentage of total bytes per language, largest first.
/// An empty or all-zero input yields an empty breakdown.
pub fn to_language_breakdown(bytes_by_language: &LanguageBytes) -> Vec<LanguageShare> {
    let total: u64 = bytes_by_language.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<LanguageShare> = bytes_by_language
        .iter()
        .map(|(language, &bytes)| LanguageShare {
            language: language.clone(),
            bytes,
            percentage: (bytes as f64 / total as f64 * 1000.0).round() / 10.0,
        })
        .collect();

    // Stable sort keeps the map's alphabetical order among equal byte counts
    shares.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    shares
}
