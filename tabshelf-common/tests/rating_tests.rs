//! Integration tests for rating submission and aggregation
//!
//! Covers the catalog's core guarantees:
//! - exact round trip of created tabs
//! - zero aggregate for unrated tabs
//! - mean/vote count over anonymous rating sequences
//! - one rating per (tab, client key), including under concurrent submission
//! - rejection of out-of-range ratings and unknown tabs
//! - case-insensitive title/artist search

use futures::future::join_all;
use sqlx::SqlitePool;
use tabshelf_common::db::{
    add_rating, count_ratings, create_tab, get_tab, init_database, init_memory_database,
    list_tabs, NewTab,
};
use tabshelf_common::{get_with_aggregate, list_with_aggregates, Error, RatingSummary};

async fn setup() -> SqlitePool {
    init_memory_database()
        .await
        .expect("Failed to create in-memory database")
}

async fn summary(pool: &SqlitePool, tab_id: i64) -> (f64, i64) {
    let aggregated = get_with_aggregate(pool, tab_id).await.unwrap();
    (aggregated.average_rating, aggregated.vote_count)
}

#[tokio::test]
async fn test_create_then_get_returns_exact_fields() {
    let pool = setup().await;

    let inputs = [
        NewTab::new("Nothing Else Matters", "Metallica", "e|-----0-----|"),
        NewTab::new("  Padded Title ", "Artist with ünïcödé", "line one\nline two\n"),
        NewTab::new("Tab", "Band", "x"),
    ];

    let mut seen_ids = Vec::new();
    for input in &inputs {
        let id = create_tab(&pool, input).await.unwrap();
        assert!(!seen_ids.contains(&id), "id {} was reused", id);
        seen_ids.push(id);

        let tab = get_tab(&pool, id).await.unwrap();
        assert_eq!(tab.id, id);
        assert_eq!(tab.title, input.title);
        assert_eq!(tab.artist, input.artist);
        assert_eq!(tab.content, input.content);
        assert_eq!(tab.updated_at, tab.created_at);
    }
}

#[tokio::test]
async fn test_unrated_tab_has_zero_aggregate() {
    let pool = setup().await;
    let id = create_tab(&pool, &NewTab::new("Hurt", "Johnny Cash", "e|---|"))
        .await
        .unwrap();

    assert_eq!(summary(&pool, id).await, (0.0, 0));
}

#[tokio::test]
async fn test_anonymous_sequences_average_and_count() {
    let sequences: &[&[i64]] = &[
        &[5],
        &[1, 2],
        &[5, 4, 4],
        &[3, 3, 3, 3],
        &[5, 4, 4, 4],
        &[1, 5, 1, 5, 2],
        &[2, 2, 3, 3, 4, 4, 5],
    ];

    let pool = setup().await;

    for ratings in sequences {
        let id = create_tab(&pool, &NewTab::new("Seq", "Band", "x")).await.unwrap();
        for r in ratings.iter() {
            add_rating(&pool, id, *r, None).await.unwrap();
        }

        let sum: i64 = ratings.iter().sum();
        let n = ratings.len() as i64;
        let expected = ((sum as f64 / n as f64) * 10.0).round() / 10.0;

        let (average, count) = summary(&pool, id).await;
        assert_eq!(count, n, "vote count for {:?}", ratings);
        assert!(
            (average - expected).abs() < 1e-9,
            "average for {:?}: got {}, expected {}",
            ratings,
            average,
            expected
        );
        assert_eq!(RatingSummary::from_totals(sum, n).average_rating, average);
    }
}

#[tokio::test]
async fn test_duplicate_client_rating_leaves_aggregate_unchanged() {
    let pool = setup().await;
    let id = create_tab(&pool, &NewTab::new("Song", "Band", "x")).await.unwrap();

    add_rating(&pool, id, 2, Some("client-1")).await.unwrap();
    let second = add_rating(&pool, id, 5, Some("client-1")).await;

    assert!(matches!(second, Err(Error::DuplicateRating { .. })));
    assert_eq!(summary(&pool, id).await, (2.0, 1));
}

#[tokio::test]
async fn test_out_of_range_ratings_write_nothing() {
    let pool = setup().await;
    let id = create_tab(&pool, &NewTab::new("Song", "Band", "x")).await.unwrap();

    assert!(matches!(add_rating(&pool, id, 0, None).await, Err(Error::Validation(_))));
    assert!(matches!(add_rating(&pool, id, 6, Some("k")).await, Err(Error::Validation(_))));
    assert_eq!(count_ratings(&pool, id).await.unwrap(), 0);
    assert_eq!(summary(&pool, id).await, (0.0, 0));
}

#[tokio::test]
async fn test_rating_unknown_tab_is_not_found() {
    let pool = setup().await;

    let result = add_rating(&pool, 9999, 4, None).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_rating_scenario() {
    let pool = setup().await;

    let id = create_tab(
        &pool,
        &NewTab::new("Nothing Else Matters", "Metallica", "e|...|"),
    )
    .await
    .unwrap();
    assert_eq!(id, 1);

    add_rating(&pool, id, 5, Some("ip_a")).await.unwrap();
    assert_eq!(summary(&pool, id).await, (5.0, 1));

    let duplicate = add_rating(&pool, id, 3, Some("ip_a")).await;
    assert!(matches!(duplicate, Err(Error::DuplicateRating { .. })));
    assert_eq!(summary(&pool, id).await, (5.0, 1));

    add_rating(&pool, id, 3, Some("ip_b")).await.unwrap();
    assert_eq!(summary(&pool, id).await, (4.0, 2));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let pool = setup().await;

    create_tab(&pool, &NewTab::new("Wish You Were Here", "Pink Floyd", "x")).await.unwrap();
    let stairway = create_tab(&pool, &NewTab::new("Stairway to Heaven", "Led Zeppelin", "x"))
        .await
        .unwrap();

    for term in ["heaven", "HEAVEN", "Heaven", "  heaven  "] {
        let tabs = list_tabs(&pool, Some(term)).await.unwrap();
        assert_eq!(tabs.len(), 1, "search {:?}", term);
        assert_eq!(tabs[0].id, stairway);
    }

    let aggregated = list_with_aggregates(&pool, Some("heaven")).await.unwrap();
    assert_eq!(aggregated.len(), 1);
    assert_eq!(aggregated[0].tab.title, "Stairway to Heaven");

    assert!(list_tabs(&pool, Some("metallica")).await.unwrap().is_empty());
    assert_eq!(list_tabs(&pool, Some("")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_reads_current_state() {
    let pool = setup().await;
    let id = create_tab(&pool, &NewTab::new("Song", "Band", "x")).await.unwrap();

    let before = list_with_aggregates(&pool, None).await.unwrap();
    assert_eq!(before[0].vote_count, 0);

    add_rating(&pool, id, 4, None).await.unwrap();

    let after = list_with_aggregates(&pool, None).await.unwrap();
    assert_eq!(after[0].vote_count, 1);
    assert_eq!(after[0].average_rating, 4.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_submissions_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("tabshelf.db")).await.unwrap();
    let id = create_tab(&pool, &NewTab::new("Race", "Band", "x")).await.unwrap();

    let handles = (1..=8).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move { add_rating(&pool, id, (i % 5) + 1, Some("same-client")).await })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(Error::DuplicateRating { .. })))
        .count();

    assert_eq!(successes, 1, "results: {:?}", results);
    assert_eq!(duplicates, 7, "results: {:?}", results);
    assert_eq!(count_ratings(&pool, id).await.unwrap(), 1);
    assert_eq!(summary(&pool, id).await.1, 1);

    pool.close().await;
}
