//! Repository integration tests against in-memory SQLite

use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use meetwatch_common::model::{MeetingDraft, RecurrencePattern};
use meetwatch_common::time::parse_timestamp;
use meetwatch_server::db;

async fn test_pool() -> Pool<Sqlite> {
    // Single connection so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::init::create_schema(&pool).await.expect("schema");
    pool
}

fn dt(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap()
}

fn draft(title: &str, scheduled: &str) -> MeetingDraft {
    MeetingDraft {
        title: title.to_string(),
        link: "https://meet.example.com/room".to_string(),
        scheduled_time: dt(scheduled),
        duration: 30,
        is_recurring: false,
        recurrence_pattern: None,
        alert_timing: 5,
    }
}

#[tokio::test]
async fn test_open_pool_creates_file_and_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("meetings.db");

    let pool = db::init::open_pool(&path).await.unwrap();
    assert!(path.exists());

    // Schema is usable straight away
    db::meetings::create(&pool, &draft("First", "2024-01-05T10:00:00"))
        .await
        .unwrap();
    assert_eq!(db::meetings::list_active(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_and_find_round_trip() {
    let pool = test_pool().await;

    let mut input = draft("Standup", "2024-01-05T10:00:00");
    input.is_recurring = true;
    input.recurrence_pattern = Some(RecurrencePattern::Weekly {
        interval: 1,
        days_of_week: Some(vec![1, 3, 5]),
    });

    let created = db::meetings::create(&pool, &input).await.unwrap();
    assert!(created.id > 0);
    assert!(created.is_active);
    assert!(created.created_at.is_some());

    let found = db::meetings::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("meeting exists");
    assert_eq!(found.title, "Standup");
    assert_eq!(found.scheduled_time, dt("2024-01-05T10:00:00"));
    assert_eq!(
        found.recurrence_pattern,
        Some(RecurrencePattern::Weekly {
            interval: 1,
            days_of_week: Some(vec![1, 3, 5]),
        })
    );
}

#[tokio::test]
async fn test_list_active_ordered_by_time() {
    let pool = test_pool().await;

    db::meetings::create(&pool, &draft("Later", "2024-01-05T15:00:00"))
        .await
        .unwrap();
    db::meetings::create(&pool, &draft("Earlier", "2024-01-05T09:00:00"))
        .await
        .unwrap();

    let meetings = db::meetings::list_active(&pool).await.unwrap();
    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[0].title, "Earlier");
    assert_eq!(meetings[1].title, "Later");
}

#[tokio::test]
async fn test_malformed_row_is_skipped_not_fatal() {
    let pool = test_pool().await;
    db::meetings::create(&pool, &draft("Good", "2024-01-05T10:00:00"))
        .await
        .unwrap();

    // Hand-corrupted row: unparseable timestamp and pattern JSON
    sqlx::query(
        "INSERT INTO meetings (title, link, scheduled_time, duration, is_recurring, recurrence_pattern)
         VALUES ('Bad', 'https://meet.example.com/x', 'soonish', 30, 1, '{oops')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let meetings = db::meetings::list_active(&pool).await.unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0].title, "Good");
}

#[tokio::test]
async fn test_soft_delete_excludes_from_queries() {
    let pool = test_pool().await;
    let created = db::meetings::create(&pool, &draft("Gone", "2024-01-05T10:00:00"))
        .await
        .unwrap();

    assert!(db::meetings::soft_delete(&pool, created.id).await.unwrap());

    assert!(db::meetings::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(db::meetings::list_active(&pool).await.unwrap().is_empty());

    // Second delete finds no active row
    assert!(!db::meetings::soft_delete(&pool, created.id).await.unwrap());
}

#[tokio::test]
async fn test_update_rewrites_fields() {
    let pool = test_pool().await;
    let created = db::meetings::create(&pool, &draft("Before", "2024-01-05T10:00:00"))
        .await
        .unwrap();

    let mut changed = draft("After", "2024-01-06T11:30:00");
    changed.alert_timing = 15;
    let updated = db::meetings::update(&pool, created.id, &changed)
        .await
        .unwrap()
        .expect("meeting exists");

    assert_eq!(updated.title, "After");
    assert_eq!(updated.scheduled_time, dt("2024-01-06T11:30:00"));
    assert_eq!(updated.alert_timing, 15);
}

#[tokio::test]
async fn test_update_missing_returns_none() {
    let pool = test_pool().await;
    let result = db::meetings::update(&pool, 999, &draft("X", "2024-01-05T10:00:00"))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_live_window() {
    let pool = test_pool().await;

    // 30 minute meeting started 10 minutes ago
    db::meetings::create(&pool, &draft("Running", "2024-01-05T09:50:00"))
        .await
        .unwrap();
    // Ended an hour ago
    db::meetings::create(&pool, &draft("Finished", "2024-01-05T08:00:00"))
        .await
        .unwrap();
    // Not started yet
    db::meetings::create(&pool, &draft("Pending", "2024-01-05T14:00:00"))
        .await
        .unwrap();

    let live = db::meetings::list_live(&pool, dt("2024-01-05T10:00:00"))
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].title, "Running");
}

#[tokio::test]
async fn test_list_today_bounds() {
    let pool = test_pool().await;

    db::meetings::create(&pool, &draft("Today early", "2024-01-05T00:30:00"))
        .await
        .unwrap();
    db::meetings::create(&pool, &draft("Today late", "2024-01-05T23:00:00"))
        .await
        .unwrap();
    db::meetings::create(&pool, &draft("Tomorrow", "2024-01-06T09:00:00"))
        .await
        .unwrap();
    db::meetings::create(&pool, &draft("Yesterday", "2024-01-04T09:00:00"))
        .await
        .unwrap();

    let today = db::meetings::list_today(&pool, dt("2024-01-05T12:00:00"))
        .await
        .unwrap();
    let titles: Vec<_> = today.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Today early", "Today late"]);
}
