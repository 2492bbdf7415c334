// Projects tab state.
// Search, category filter, sort, pagination, and the detail modal over a
// static project list.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use ratatui::widgets::ListState;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transform::{Direction, SortKey, SortOrder, Sortable, sort_items};

pub const PROJECTS_PER_PAGE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Live,
    Development,
    Archived,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Live => "Live",
            ProjectStatus::Development => "In Development",
            ProjectStatus::Archived => "Archived",
            ProjectStatus::Unknown => "Unknown",
        }
    }
}

/// A portfolio entry as stored in the projects JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

impl Project {
    /// Case-insensitive match on name, description, or any technology.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .technologies
                .iter()
                .any(|t| t.to_lowercase().contains(&needle))
    }
}

fn start_of_day(date: Option<NaiveDate>) -> Option<DateTime<Utc>> {
    date?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

impl Sortable for Project {
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
        start_of_day(self.created_at)
    }

    fn sort_updated(&self) -> Option<DateTime<Utc>> {
        start_of_day(self.updated_at)
    }
}

/// Human label for a category slug. Unknown slugs are shown as-is.
pub fn category_label(category: &str) -> &str {
    match category {
        "web-development" => "Web Development",
        "data-analysis" => "Data Analysis",
        "machine-learning" => "Machine Learning",
        "mobile-app" => "Mobile App",
        "api-development" => "API Development",
        "database" => "Database",
        other => other,
    }
}

/// Read a JSON array of projects.
pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let text = std::fs::read_to_string(path)?;
    let projects: Vec<Project> = serde_json::from_str(&text)?;
    tracing::info!(path = %path.display(), count = projects.len(), "Loaded projects");
    Ok(projects)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    #[default]
    DateDesc,
    DateAsc,
    NameAsc,
    NameDesc,
    StarsDesc,
}

impl ProjectSort {
    const ALL: [ProjectSort; 5] = [
        ProjectSort::DateDesc,
        ProjectSort::DateAsc,
        ProjectSort::NameAsc,
        ProjectSort::NameDesc,
        ProjectSort::StarsDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectSort::DateDesc => "date-desc",
            ProjectSort::DateAsc => "date-asc",
            ProjectSort::NameAsc => "name-asc",
            ProjectSort::NameDesc => "name-desc",
            ProjectSort::StarsDesc => "stars-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectSort::DateDesc => "Newest",
            ProjectSort::DateAsc => "Oldest",
            ProjectSort::NameAsc => "Name A-Z",
            ProjectSort::NameDesc => "Name Z-A",
            ProjectSort::StarsDesc => "Most stars",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Date sorts use the last-updated date.
    pub fn order(&self) -> SortOrder {
        match self {
            ProjectSort::DateDesc => SortOrder::new(SortKey::Updated, Direction::Desc),
            ProjectSort::DateAsc => SortOrder::new(SortKey::Updated, Direction::Asc),
            ProjectSort::NameAsc => SortOrder::new(SortKey::Name, Direction::Asc),
            ProjectSort::NameDesc => SortOrder::new(SortKey::Name, Direction::Desc),
            ProjectSort::StarsDesc => SortOrder::new(SortKey::Stars, Direction::Desc),
        }
    }
}

impl fmt::Display for ProjectSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Search,
    Category,
}

/// A removable chip describing one active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub label: String,
}

#[derive(Debug)]
pub struct PortfolioView {
    projects: Vec<Project>,
    filtered: Vec<Project>,
    search: String,
    category: Option<String>,
    sort: ProjectSort,
    /// 1-based.
    page: usize,
    /// Selection within the current page.
    pub list_state: ListState,
    modal: Option<u64>,
}

impl Default for PortfolioView {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PortfolioView {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut view = Self {
            projects,
            filtered: Vec::new(),
            search: String::new(),
            category: None,
            sort: ProjectSort::default(),
            page: 1,
            list_state: ListState::default(),
            modal: None,
        };
        view.apply_filters();
        view
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.modal = None;
        self.apply_filters();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn sort(&self) -> ProjectSort {
        self.sort
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_string();
        self.apply_filters();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
        self.apply_filters();
    }

    pub fn set_sort(&mut self, sort: ProjectSort) {
        self.sort = sort;
        self.apply_filters();
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort.next());
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for project in &self.projects {
            if !project.category.is_empty() && !seen.contains(&project.category) {
                seen.push(project.category.clone());
            }
        }
        seen
    }

    /// All categories, then each one in turn, then back to all.
    pub fn cycle_category(&mut self) {
        let categories = self.categories();
        let next = match &self.category {
            None => categories.first().cloned(),
            Some(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1))
                .cloned(),
        };
        self.set_category(next);
    }

    /// Search, then category, then sort. Always lands on page 1.
    pub fn apply_filters(&mut self) {
        let matching: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| self.search.is_empty() || p.matches_search(&self.search))
            .filter(|p| self.category.as_ref().is_none_or(|c| p.category == *c))
            .cloned()
            .collect();
        self.filtered = sort_items(&matching, self.sort.order());
        self.page = 1;
        self.reset_selection();
        tracing::debug!(
            visible = self.filtered.len(),
            total = self.projects.len(),
            "Applied project filters"
        );
    }

    /// Every project passing the filters, in sorted order.
    pub fn filtered(&self) -> &[Project] {
        &self.filtered
    }

    pub fn page_items(&self) -> &[Project] {
        let start = self.page.saturating_sub(1) * PROJECTS_PER_PAGE;
        let end = (start + PROJECTS_PER_PAGE).min(self.filtered.len());
        self.filtered.get(start..end).unwrap_or(&[])
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// At least 1, even with no results.
    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(PROJECTS_PER_PAGE).max(1)
    }

    pub fn next_page(&mut self) -> bool {
        if self.page >= self.page_count() {
            return false;
        }
        self.page += 1;
        self.reset_selection();
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.reset_selection();
        true
    }

    pub fn visible_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_count(&self) -> usize {
        self.projects.len()
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut filters = Vec::new();
        if !self.search.is_empty() {
            filters.push(ActiveFilter {
                kind: FilterKind::Search,
                label: format!("Search: \"{}\"", self.search),
            });
        }
        if let Some(category) = &self.category {
            filters.push(ActiveFilter {
                kind: FilterKind::Category,
                label: format!("Category: {}", category_label(category)),
            });
        }
        filters
    }

    pub fn remove_filter(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Search => self.search.clear(),
            FilterKind::Category => self.category = None,
        }
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = None;
        self.apply_filters();
    }

    /// Show everything built with `technology`.
    pub fn filter_by_technology(&mut self, technology: &str) {
        self.modal = None;
        self.set_search(technology);
    }

    pub fn select_next(&mut self) {
        let len = self.page_items().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.page_items().is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.page_items().get(self.list_state.selected()?)
    }

    /// Open the detail modal for the selected project.
    pub fn open_modal(&mut self) -> bool {
        self.modal = self.selected_project().map(|p| p.id);
        self.modal.is_some()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn modal_project(&self) -> Option<&Project> {
        let id = self.modal?;
        self.projects.iter().find(|p| p.id == id)
    }

    fn reset_selection(&mut self) {
        let first = if self.page_items().is_empty() {
            None
        } else {
            Some(0)
        };
        self.list_state.select(first);
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{many_projects, sample_projects};
    use super::*;

    fn names(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let view = PortfolioView::new(sample_projects());
        assert_eq!(view.sort(), ProjectSort::DateDesc);
        assert_eq!(view.filtered()[0].name, "E-Commerce Platform");
        assert_eq!(view.filtered()[5].name, "Database Optimization Tool");
        assert_eq!((view.visible_count(), view.total_count()), (6, 6));
    }

    #[test]
    fn test_search_matches_technologies_case_insensitively() {
        let mut view = PortfolioView::new(sample_projects());
        view.set_search("postgresql");
        assert_eq!(
            names(view.filtered()),
            vec!["REST API Service", "Database Optimization Tool"]
        );
        assert_eq!(view.visible_count(), 2);
        assert_eq!(view.total_count(), 6);
    }

    #[test]
    fn test_category_then_sort() {
        let mut view = PortfolioView::new(sample_projects());
        view.set_category(Some("web-development".into()));
        assert_eq!(names(view.filtered()), vec!["E-Commerce Platform"]);

        view.set_category(None);
        view.set_sort(ProjectSort::StarsDesc);
        let stars: Vec<u64> = view.filtered().iter().map(|p| p.stars).collect();
        assert!(stars.windows(2).all(|w| w[0] >= w[1]));

        view.set_sort(ProjectSort::NameAsc);
        assert_eq!(view.filtered()[0].name, "Data Analytics Dashboard");
    }

    #[test]
    fn test_cycle_category_wraps_to_all() {
        let mut view = PortfolioView::new(sample_projects());
        let categories = view.categories();
        for expected in &categories {
            view.cycle_category();
            assert_eq!(view.category(), Some(expected.as_str()));
        }
        view.cycle_category();
        assert_eq!(view.category(), None);
    }

    #[test]
    fn test_pagination_resets_on_refilter() {
        let mut view = PortfolioView::new(many_projects(30));
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.page_items().len(), PROJECTS_PER_PAGE);

        assert!(view.next_page());
        assert!(view.next_page());
        assert!(!view.next_page());
        assert_eq!(view.page(), 3);
        assert_eq!(view.page_items().len(), 6);

        view.set_search("Project");
        assert_eq!(view.page(), 1);
        assert!(!view.prev_page());
    }

    #[test]
    fn test_empty_results_still_have_one_page() {
        let mut view = PortfolioView::new(sample_projects());
        view.set_search("cobol");
        assert_eq!(view.page_count(), 1);
        assert!(view.page_items().is_empty());
        assert!(view.selected_project().is_none());
        assert!(!view.open_modal());
    }

    #[test]
    fn test_active_filters_and_removal() {
        let mut view = PortfolioView::new(sample_projects());
        view.set_search("python");
        view.set_category(Some("machine-learning".into()));

        let labels: Vec<String> = view.active_filters().into_iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            vec!["Search: \"python\"", "Category: Machine Learning"]
        );

        view.remove_filter(FilterKind::Category);
        assert_eq!(view.visible_count(), 2);
        view.remove_filter(FilterKind::Search);
        assert!(view.active_filters().is_empty());
        assert_eq!(view.visible_count(), 6);
    }

    #[test]
    fn test_modal_and_technology_filter() {
        let mut view = PortfolioView::new(sample_projects());
        view.select_next();
        assert!(view.open_modal());
        assert_eq!(view.modal_project().unwrap().name, "Task Management App");

        view.filter_by_technology("Firebase");
        assert!(view.modal_project().is_none());
        assert_eq!(view.search(), "Firebase");
        assert_eq!(names(view.filtered()), vec!["Task Management App"]);
    }

    #[test]
    fn test_project_json_shape() {
        let json = r#"[{
            "id": 7,
            "name": "Portfolio",
            "category": "web-development",
            "technologies": ["Rust"],
            "githubUrl": "https://github.com/username/portfolio",
            "status": "paused",
            "updatedAt": "2024-03-01"
        }]"#;
        let projects: Vec<Project> = serde_json::from_str(json).unwrap();
        assert_eq!(projects[0].status, ProjectStatus::Unknown);
        assert_eq!(
            projects[0].github_url.as_deref(),
            Some("https://github.com/username/portfolio")
        );
        assert_eq!(projects[0].updated_at, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_load_projects_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, serde_json::to_string(&sample_projects()).unwrap()).unwrap();

        let loaded = load_projects(&path).unwrap();
        assert_eq!(loaded, sample_projects());
        assert!(load_projects(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_default_view_is_empty_first_page() {
        let view = PortfolioView::default();
        assert_eq!(view.page(), 1);
        assert!(view.page_items().is_empty());
        assert_eq!(view.page_count(), 1);
    }

    #[test]
    fn test_demo_projects_load() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/projects.json");
        let view = PortfolioView::new(load_projects(&path).unwrap());
        assert_eq!(view.total_count(), 6);
        assert_eq!(view.filtered()[0].name, "E-Commerce Platform");
        assert_eq!(view.categories().len(), 6);
    }

    #[test]
    fn test_labels() {
        assert_eq!(category_label("api-development"), "API Development");
        assert_eq!(category_label("games"), "games");
        assert_eq!(ProjectStatus::Development.label(), "In Development");
        assert_eq!(ProjectSort::StarsDesc.next(), ProjectSort::DateDesc);
    }
}
