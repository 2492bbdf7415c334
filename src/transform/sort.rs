// Stable sorting shared by repositories and portfolio projects.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::github::Direction;

use super::views::RepositoryView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Updated,
    Created,
    Name,
    Stars,
    Forks,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Updated => "updated",
            SortKey::Created => "created",
            SortKey::Name => "name",
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "updated" => Ok(SortKey::Updated),
            "created" => Ok(SortKey::Created),
            "name" => Ok(SortKey::Name),
            "stars" => Ok(SortKey::Stars),
            "forks" => Ok(SortKey::Forks),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Sort key plus direction. Defaults to most recently updated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: Direction) -> Self {
        Self { key, direction }
    }

    /// The natural direction for a key: A-Z for names, largest/newest first otherwise.
    pub fn natural(key: SortKey) -> Self {
        let direction = match key {
            SortKey::Name => Direction::Asc,
            _ => Direction::Desc,
        };
        Self { key, direction }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key.as_str(), self.direction.as_str())
    }
}

/// Anything that can be ordered by the shared sort keys.
pub trait Sortable {
    fn sort_name(&self) -> &str;
    fn sort_stars(&self) -> u64;
    fn sort_forks(&self) -> u64;
    fn sort_created(&self) -> Option<DateTime<Utc>>;
    fn sort_updated(&self) -> Option<DateTime<Utc>>;
}

impl Sortable for RepositoryView {
    fn sort_name(&self) -> &str {
        &self.name
    }

    fn sort_stars(&self) -> u64 {
        self.stars
    }

    fn sort_forks(&self) -> u64 {
        self.forks
    }

    fn sort_created(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn sort_updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Case-folded comparison with a byte-order tiebreak.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ascending comparison by `key`. Missing dates sort as oldest.
pub fn compare_by<T: Sortable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(a.sort_name(), b.sort_name()),
        SortKey::Stars => a.sort_stars().cmp(&b.sort_stars()),
        SortKey::Forks => a.sort_forks().cmp(&b.sort_forks()),
        SortKey::Created => a.sort_created().cmp(&b.sort_created()),
        SortKey::Updated => a.sort_updated().cmp(&b.sort_updated()),
    }
}

/// Stable sort into a new vector; ties keep their input order.
pub fn sort_items<T: Sortable + Clone>(items: &[T], order: SortOrder) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by(a, b, order.key);
        match order.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });
    sorted
}

pub fn sort_repositories(repositories: &[RepositoryView], order: SortOrder) -> Vec<RepositoryView> {
    sort_items(repositories, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Repository;
    use crate::transform::views::to_repository_view;
    use chrono::TimeZone;

    fn repo(id: u64, name: &str, stars: u64, updated_day: u32) -> RepositoryView {
        to_repository_view(&Repository {
            id,
            name: name.into(),
            stargazers_count: stars,
            forks_count: id,
            updated_at: Some(Utc.with_ymd_and_hms(2024, 3, updated_day, 0, 0, 0).unwrap()),
            created_at: Some(Utc.with_ymd_and_hms(2023, 1, updated_day, 0, 0, 0).unwrap()),
            ..Repository::default()
        })
    }

    fn ids(repos: &[RepositoryView]) -> Vec<u64> {
        repos.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_stars_desc_is_stable() {
        let repos = vec![
            repo(1, "a", 5, 1),
            repo(2, "b", 9, 2),
            repo(3, "c", 5, 3),
            repo(4, "d", 9, 4),
            repo(5, "e", 0, 5),
        ];

        let sorted = sort_repositories(&repos, SortOrder::natural(SortKey::Stars));

        assert_eq!(ids(&sorted), vec![2, 4, 1, 3, 5]);
        assert!(sorted.windows(2).all(|w| w[0].stars >= w[1].stars));
    }

    #[test]
    fn test_default_is_updated_desc() {
        let repos = vec![repo(1, "a", 0, 3), repo(2, "b", 0, 9), repo(3, "c", 0, 1)];
        let sorted = sort_repositories(&repos, SortOrder::default());
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_name_ascending_ignores_case() {
        let repos = vec![repo(1, "zeta", 0, 1), repo(2, "Alpha", 0, 1), repo(3, "beta", 0, 1)];
        let sorted = sort_repositories(&repos, SortOrder::natural(SortKey::Name));
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn test_created_and_forks() {
        let repos = vec![repo(1, "a", 0, 2), repo(3, "c", 0, 1), repo(2, "b", 0, 3)];
        let by_created =
            sort_repositories(&repos, SortOrder::new(SortKey::Created, Direction::Asc));
        assert_eq!(ids(&by_created), vec![3, 1, 2]);
        let by_forks = sort_repositories(&repos, SortOrder::natural(SortKey::Forks));
        assert_eq!(ids(&by_forks), vec![3, 2, 1]);
    }

    #[test]
    fn test_missing_dates_sort_last_when_descending() {
        let mut undated = repo(9, "x", 0, 1);
        undated.updated_at = None;
        let repos = vec![undated, repo(1, "a", 0, 1)];
        let sorted = sort_repositories(&repos, SortOrder::default());
        assert_eq!(ids(&sorted), vec![1, 9]);
    }

    #[test]
    fn test_sort_key_parse_and_display() {
        assert_eq!("Stars".parse::<SortKey>(), Ok(SortKey::Stars));
        assert!("popularity".parse::<SortKey>().is_err());
        assert_eq!(SortOrder::default().to_string(), "updated-desc");
    }
}
