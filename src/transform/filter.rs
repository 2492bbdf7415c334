// Repository filtering.
// Each present criterion is an AND-combined predicate; absent criteria match everything.

use serde::{Deserialize, Serialize};

use super::views::{RepositoryView, Visibility};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Substring of name, description, or any topic.
    pub search: Option<String>,
    /// Exact topic tag.
    pub category: Option<String>,
    /// Exact primary language.
    pub language: Option<String>,
    /// Substring of any topic.
    pub topic: Option<String>,
    pub min_stars: Option<u64>,
    pub min_forks: Option<u64>,
    pub visibility: Option<Visibility>,
    /// `Some(true)` keeps only forks, `Some(false)` drops them.
    pub forks: Option<bool>,
    pub archived: Option<bool>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `repo` satisfies every present criterion.
    pub fn matches(&self, repo: &RepositoryView) -> bool {
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            let hit = repo.name.to_lowercase().contains(&needle)
                || repo.description.to_lowercase().contains(&needle)
                || repo.topics.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(category) = non_blank(&self.category) {
            let category = category.to_lowercase();
            if !repo.topics.iter().any(|t| t.to_lowercase() == category) {
                return false;
            }
        }

        if let Some(language) = non_blank(&self.language) {
            let language = language.to_lowercase();
            let same = repo
                .language
                .as_deref()
                .is_some_and(|l| l.to_lowercase() == language);
            if !same {
                return false;
            }
        }

        if let Some(topic) = non_blank(&self.topic) {
            let needle = topic.to_lowercase();
            if !repo.topics.iter().any(|t| t.to_lowercase().contains(&needle)) {
                return false;
            }
        }

        if self.min_stars.is_some_and(|min| repo.stars < min) {
            return false;
        }
        if self.min_forks.is_some_and(|min| repo.forks < min) {
            return false;
        }
        if self.visibility.is_some_and(|v| repo.visibility != v) {
            return false;
        }
        if self.forks.is_some_and(|f| repo.is_fork != f) {
            return false;
        }
        if self.archived.is_some_and(|a| repo.is_archived != a) {
            return false;
        }

        true
    }
}

/// Blank strings behave like an absent criterion.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Keep the repositories matching `criteria`, in their original order.
pub fn filter_repositories(
    repositories: &[RepositoryView],
    criteria: &FilterCriteria,
) -> Vec<RepositoryView> {
    repositories
        .iter()
        .filter(|repo| criteria.matches(repo))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Repository;
    use crate::transform::views::to_repository_view;

    fn repos() -> Vec<RepositoryView> {
        let raw = vec![
            Repository {
                id: 1,
                name: "folio".into(),
                description: Some("Terminal portfolio".into()),
                language: Some("Rust".into()),
                stargazers_count: 40,
                forks_count: 3,
                topics: vec!["tui".into(), "portfolio".into()],
                ..Repository::default()
            },
            Repository {
                id: 2,
                name: "dotfiles".into(),
                language: Some("Shell".into()),
                stargazers_count: 2,
                fork: true,
                ..Repository::default()
            },
            Repository {
                id: 3,
                name: "old-site".into(),
                description: Some("Personal website".into()),
                language: Some("JavaScript".into()),
                stargazers_count: 12,
                forks_count: 8,
                archived: true,
                private: true,
                topics: vec!["website".into()],
                ..Repository::default()
            },
        ];
        raw.iter().map(to_repository_view).collect()
    }

    fn ids(repos: &[RepositoryView]) -> Vec<u64> {
        repos.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let input = repos();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filter_repositories(&input, &criteria), input);
    }

    #[test]
    fn test_filter_is_pure() {
        let input = repos();
        let criteria = FilterCriteria {
            min_stars: Some(10),
            ..FilterCriteria::default()
        };
        let once = filter_repositories(&input, &criteria);
        let twice = filter_repositories(&input, &criteria);
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![1, 3]);
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_language_is_case_insensitive() {
        let criteria = FilterCriteria {
            language: Some("rust".into()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&repos(), &criteria)), vec![1]);
    }

    #[test]
    fn test_non_ascii_names_fold_case() {
        let mut input = repos();
        input[0].language = Some("Ämber".into());
        input[0].topics = vec!["Ärger".into()];

        let by_language = FilterCriteria {
            language: Some("ämber".into()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&input, &by_language)), vec![1]);

        let by_category = FilterCriteria {
            category: Some("ÄRGER".into()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&input, &by_category)), vec![1]);
    }

    #[test]
    fn test_topic_substring_and_category_exact() {
        let by_topic = FilterCriteria {
            topic: Some("PORT".into()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&repos(), &by_topic)), vec![1]);

        let by_category = FilterCriteria {
            category: Some("port".into()),
            ..FilterCriteria::default()
        };
        assert!(filter_repositories(&repos(), &by_category).is_empty());
    }

    #[test]
    fn test_search_covers_description() {
        let criteria = FilterCriteria {
            search: Some("website".into()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&repos(), &criteria)), vec![3]);
    }

    #[test]
    fn test_flags_and_visibility_combine() {
        let no_forks = FilterCriteria {
            forks: Some(false),
            archived: Some(false),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&repos(), &no_forks)), vec![1]);

        let private = FilterCriteria {
            visibility: Some(Visibility::Private),
            min_forks: Some(5),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_repositories(&repos(), &private)), vec![3]);
    }

    #[test]
    fn test_blank_strings_are_ignored() {
        let criteria = FilterCriteria {
            search: Some("   ".into()),
            language: Some(String::new()),
            ..FilterCriteria::default()
        };
        assert_eq!(filter_repositories(&repos(), &criteria).len(), 3);
    }
}
