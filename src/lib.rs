//! folio: browse a project portfolio and a cached GitHub statistics
//! dashboard in the terminal.

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod github;
pub mod http;
pub mod state;
pub mod store;
pub mod transform;
pub mod ui;
