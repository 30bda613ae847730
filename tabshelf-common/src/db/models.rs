//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A stored tablature document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: i64,
    pub title: String,
    pub artist: String,
    /// Opaque tablature text; never parsed
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Written once at insertion; no operation updates a tab
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by a client when creating a tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTab {
    pub title: String,
    pub artist: String,
    pub content: String,
}

impl NewTab {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            content: content.into(),
        }
    }

    /// Reject blank fields before anything reaches the store
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("title", &self.title),
            ("artist", &self.artist),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

/// A single 1-5 score submitted against one tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub tab_id: i64,
    pub rating: i64,
    /// Deduplication key; `None` for anonymous submissions
    pub client_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
