// Aggregate statistics over a repository collection.

use std::collections::BTreeMap;

use serde::Serialize;

use super::views::{RepositoryView, Visibility};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoStats {
    pub total: usize,
    pub languages: BTreeMap<String, usize>,
    pub topics: BTreeMap<String, usize>,
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_size: u64,
    pub public: usize,
    pub private: usize,
    pub forks: usize,
    pub archived: usize,
}

/// A label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

/// Single pass over `repositories`.
pub fn aggregate_stats(repositories: &[RepositoryView]) -> RepoStats {
    let mut stats = RepoStats {
        total: repositories.len(),
        ..RepoStats::default()
    };

    for repo in repositories {
        if let Some(language) = &repo.language {
            *stats.languages.entry(language.clone()).or_default() += 1;
        }
        for topic in &repo.topics {
            *stats.topics.entry(topic.clone()).or_default() += 1;
        }

        stats.total_stars += repo.stars;
        stats.total_forks += repo.forks;
        stats.total_size += repo.size;

        match repo.visibility {
            Visibility::Public => stats.public += 1,
            Visibility::Private => stats.private += 1,
            Visibility::Internal => {}
        }
        if repo.is_fork {
            stats.forks += 1;
        }
        if repo.is_archived {
            stats.archived += 1;
        }
    }

    stats
}

/// Counts ordered largest first, ties alphabetical.
pub fn ranked_counts(counts: &BTreeMap<String, usize>) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .iter()
        .map(|(name, &count)| RankedCount {
            name: name.clone(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}
