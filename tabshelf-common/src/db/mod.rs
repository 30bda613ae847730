//! Storage engine: schema, models, and queries for tabs and ratings

pub mod init;
pub mod models;
pub mod ratings;
pub mod tabs;

pub use init::*;
pub use models::*;
pub use ratings::*;
pub use tabs::*;
