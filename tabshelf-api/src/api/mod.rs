//! HTTP API handlers for tabshelf-api

pub mod health;
pub mod tabs;

pub use health::health_routes;
pub use tabs::{create_tab, get_tab, list_tabs, rate_tab};
