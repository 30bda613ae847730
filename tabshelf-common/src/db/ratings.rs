//! Rating persistence
//!
//! A rating is written with one constrained `INSERT`. The store, not an
//! application-level pre-check, decides between success, a missing tab, and
//! a duplicate `(tab_id, client_key)` pair, so two racing submissions from
//! the same client cannot both succeed.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use super::models::Rating;
use crate::{Error, Result};

/// Lowest accepted star rating
pub const MIN_RATING: i64 = 1;

/// Highest accepted star rating
pub const MAX_RATING: i64 = 5;

/// Record a rating for a tab and return the new rating id
///
/// Any supplied `client_key`, including an empty string, is stored verbatim
/// and limited to one rating per tab. Only `None` is anonymous, and anonymous
/// ratings are never deduplicated.
pub async fn add_rating(
    pool: &SqlitePool,
    tab_id: i64,
    rating: i64,
    client_key: Option<&str>,
) -> Result<i64> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::Validation(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO ratings (tab_id, rating, client_key, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(tab_id)
    .bind(rating)
    .bind(client_key)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| classify_insert_error(e, tab_id, client_key))?;

    let id = result.last_insert_rowid();
    debug!(rating_id = id, tab_id, rating, anonymous = client_key.is_none(), "Recorded rating");

    Ok(id)
}

/// Map a constraint failure from the ratings insert onto the error taxonomy
fn classify_insert_error(err: sqlx::Error, tab_id: i64, client_key: Option<&str>) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_foreign_key_violation() {
            return Error::NotFound(format!("tab {}", tab_id));
        }
        if db_err.is_unique_violation() {
            if let Some(key) = client_key {
                warn!(tab_id, client_key = key, "Rejected duplicate rating");
                return Error::DuplicateRating {
                    tab_id,
                    client_key: key.to_string(),
                };
            }
        }
        if db_err.is_check_violation() {
            return Error::Validation(db_err.message().to_string());
        }
    }
    Error::Storage(err)
}

/// Number of ratings stored for a tab
pub async fn count_ratings(pool: &SqlitePool, tab_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE tab_id = ?")
        .bind(tab_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// All ratings for a tab, oldest first
pub async fn list_ratings(pool: &SqlitePool, tab_id: i64) -> Result<Vec<Rating>> {
    let rows = sqlx::query(
        r#"
        SELECT id, tab_id, rating, client_key, created_at
        FROM ratings
        WHERE tab_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(tab_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(rating_from_row).collect()
}

fn rating_from_row(row: &SqliteRow) -> Result<Rating> {
    Ok(Rating {
        id: row.try_get("id")?,
        tab_id: row.try_get("tab_id")?,
        rating: row.try_get("rating")?,
        client_key: row.try_get("client_key")?,
        created_at: row.try_get("created_at")?,
    })
}
