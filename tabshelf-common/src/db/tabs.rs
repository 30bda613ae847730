//! Tab persistence: create, fetch, and search

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::models::{NewTab, Tab};
use crate::{Error, Result};

/// Insert a new tab and return its server-assigned id
pub async fn create_tab(pool: &SqlitePool, new_tab: &NewTab) -> Result<i64> {
    new_tab.validate()?;

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO tabs (title, artist, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new_tab.title)
    .bind(&new_tab.artist)
    .bind(&new_tab.content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_check_violation() => {
            Error::Validation(db_err.message().to_string())
        }
        other => Error::Storage(other),
    })?;

    let id = result.last_insert_rowid();
    debug!(tab_id = id, title = %new_tab.title, artist = %new_tab.artist, "Created tab");

    Ok(id)
}

/// Load a single tab by id
pub async fn get_tab(pool: &SqlitePool, id: i64) -> Result<Tab> {
    let row = sqlx::query(
        r#"
        SELECT id, title, artist, content, created_at, updated_at
        FROM tabs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => tab_from_row(&row),
        None => Err(Error::NotFound(format!("tab {}", id))),
    }
}

/// List tabs, newest first, optionally filtered by title or artist
///
/// Matching is an ASCII case-insensitive substring test (SQLite `LIKE`).
/// A blank search term lists every tab.
pub async fn list_tabs(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<Tab>> {
    let rows = match search_pattern(search) {
        Some(pattern) => {
            sqlx::query(
                r#"
                SELECT id, title, artist, content, created_at, updated_at
                FROM tabs
                WHERE title LIKE ? ESCAPE '\' OR artist LIKE ? ESCAPE '\'
                ORDER BY id DESC
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
                SELECT id, title, artist, content, created_at, updated_at
                FROM tabs
                ORDER BY id DESC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(tab_from_row).collect()
}

/// Count stored tabs
pub async fn count_tabs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Build the `LIKE` pattern for a search term
///
/// Returns `None` for absent or blank terms. `%`, `_` and `\` in the term
/// are escaped so they match literally.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|t| !t.is_empty())?;

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');

    Some(pattern)
}

pub(crate) fn tab_from_row(row: &SqliteRow) -> Result<Tab> {
    Ok(Tab {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
