//! Rating aggregation
//!
//! Average rating and vote count are derived from the `ratings` rows on
//! every read. Nothing is cached, so a rating committed before a read is
//! always reflected in it.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::models::Tab;
use crate::db::tabs::{search_pattern, tab_from_row};
use crate::{Error, Result};

/// Derived (average rating, vote count) pair for one tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean of all ratings rounded to one decimal; `0.0` when unrated
    pub average_rating: f64,
    pub vote_count: i64,
}

impl RatingSummary {
    /// Build a summary from the sum and number of ratings
    ///
    /// Rounding is half away from zero on the first decimal and is done in
    /// integer arithmetic, so e.g. 17/4 = 4.25 always yields 4.3.
    pub fn from_totals(rating_sum: i64, vote_count: i64) -> Self {
        if vote_count <= 0 {
            return Self::default();
        }

        // Ratings are 1-5, so the sum is positive and half-up is half-away-from-zero.
        let tenths = (rating_sum * 20 + vote_count) / (vote_count * 2);

        Self {
            average_rating: tenths as f64 / 10.0,
            vote_count,
        }
    }
}

/// A tab joined with its freshly computed rating summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabWithRating {
    #[serde(flatten)]
    pub tab: Tab,
    pub average_rating: f64,
    pub vote_count: i64,
}

impl TabWithRating {
    pub fn new(tab: Tab, summary: RatingSummary) -> Self {
        Self {
            tab,
            average_rating: summary.average_rating,
            vote_count: summary.vote_count,
        }
    }

    pub fn summary(&self) -> RatingSummary {
        RatingSummary {
            average_rating: self.average_rating,
            vote_count: self.vote_count,
        }
    }
}

/// Compute the current rating summary for a tab
pub async fn rating_summary(pool: &SqlitePool, tab_id: i64) -> Result<RatingSummary> {
    let (rating_sum, vote_count): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(rating), 0), COUNT(*) FROM ratings WHERE tab_id = ?",
    )
    .bind(tab_id)
    .fetch_one(pool)
    .await?;

    Ok(RatingSummary::from_totals(rating_sum, vote_count))
}

/// Attach the current rating summary to an already loaded tab
pub async fn with_aggregate(pool: &SqlitePool, tab: Tab) -> Result<TabWithRating> {
    let summary = rating_summary(pool, tab.id).await?;
    Ok(TabWithRating::new(tab, summary))
}

/// Load one tab together with its rating summary
pub async fn get_with_aggregate(pool: &SqlitePool, id: i64) -> Result<TabWithRating> {
    let row = sqlx::query(
        r#"
        SELECT t.id, t.title, t.artist, t.content, t.created_at, t.updated_at,
               COALESCE(SUM(r.rating), 0) AS rating_sum,
               COUNT(r.id) AS vote_count
        FROM tabs t
        LEFT JOIN ratings r ON r.tab_id = t.id
        WHERE t.id = ?
        GROUP BY t.id
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => aggregated_from_row(&row),
        None => Err(Error::NotFound(format!("tab {}", id))),
    }
}

/// List tabs with their rating summaries
///
/// Same filter and ordering as [`crate::db::list_tabs`].
pub async fn list_with_aggregates(
    pool: &SqlitePool,
    search: Option<&str>,
) -> Result<Vec<TabWithRating>> {
    let rows = match search_pattern(search) {
        Some(pattern) => {
            sqlx::query(
                r#"
                SELECT t.id, t.title, t.artist, t.content, t.created_at, t.updated_at,
                       COALESCE(SUM(r.rating), 0) AS rating_sum,
                       COUNT(r.id) AS vote_count
                FROM tabs t
                LEFT JOIN ratings r ON r.tab_id = t.id
                WHERE t.title LIKE ? ESCAPE '\' OR t.artist LIKE ? ESCAPE '\'
                GROUP BY t.id
                ORDER BY t.id DESC
                "#,
            )
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT t.id, t.title, t.artist, t.content, t.created_at, t.updated_at,
                       COALESCE(SUM(r.rating), 0) AS rating_sum,
                       COUNT(r.id) AS vote_count
                FROM tabs t
                LEFT JOIN ratings r ON r.tab_id = t.id
                GROUP BY t.id
                ORDER BY t.id DESC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(aggregated_from_row).collect()
}

fn aggregated_from_row(row: &SqliteRow) -> Result<TabWithRating> {
    let tab = tab_from_row(row)?;
    let rating_sum: i64 = row.try_get("rating_sum")?;
    let vote_count: i64 = row.try_get("vote_count")?;
    Ok(TabWithRating::new(tab, RatingSummary::from_totals(rating_sum, vote_count)))
}
