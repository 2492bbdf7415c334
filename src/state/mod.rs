// State management module.
// Holds the GitHub integration, the portfolio view, the contact form,
// preferences, and the console log.

pub mod console;
pub mod contact;
pub mod debounce;
pub mod details;
pub mod integration;
pub mod loading;
pub mod portfolio;
pub mod prefs;

pub use console::{ConsoleLevel, ConsoleMessage, ConsoleState};
pub use contact::{ContactField, ContactForm, ContactSubmission, validate_field};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use details::{RepoDetails, load_repo_details};
pub use integration::{IntegrationEvent, IntegrationManager, LoadOutcome, Snapshot};
pub use loading::LoadingState;
pub use portfolio::{
    ActiveFilter, FilterKind, PROJECTS_PER_PAGE, PortfolioView, Project, ProjectSort,
    ProjectStatus, category_label, load_projects,
};
pub use prefs::{Preferences, Theme};
