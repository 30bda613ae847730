//! # TabShelf Common Library
//!
//! Core of the tablature catalog:
//! - Storage engine for tabs and ratings (SQLite via sqlx)
//! - Rating aggregation computed at read time
//! - Error taxonomy shared with the HTTP service
//! - Configuration loading and root folder resolution
//! - Example tab seeding

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod seed;

pub use aggregate::{
    get_with_aggregate, list_with_aggregates, with_aggregate, RatingSummary, TabWithRating,
};
pub use error::{Error, Result};
