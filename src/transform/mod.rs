// Pure transformations from GitHub payloads to view models.
// Also filters, sorts, and aggregates repository collections. No I/O.

pub mod filter;
pub mod sort;
pub mod stats;
pub mod views;

pub use filter::{FilterCriteria, filter_repositories};
pub use sort::{Direction, SortKey, SortOrder, Sortable, sort_items, sort_repositories};
pub use stats::{RankedCount, RepoStats, aggregate_stats, ranked_counts};
pub use views::{
    ContributorView, LanguageShare, RepositoryView, UserProfileView, Visibility,
    to_contributor_views, to_language_breakdown, to_repository_view, to_user_profile_view,
};
