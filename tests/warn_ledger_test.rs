//! Warn ledger integration tests
//!
//! These tests exercise the atomic counter semantics against a real
//! PostgreSQL database. They are ignored by default; point
//! `TEST_DATABASE_URL` at a scratch database and run with `--ignored`.

#![allow(non_snake_case)]

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use ChatWarden::database::DatabaseService;
use ChatWarden::models::{ChatSettingsPatch, RestrictionKind, WarnMode};
use ChatWarden::services::escalation_decision;

async fn setup() -> DatabaseService {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/chatwarden_test".to_string());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    DatabaseService::new(pool)
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (TEST_DATABASE_URL)"]
async fn test_increment_counts_up_to_limit_and_resets() {
    let db = setup().await;
    let (chat, user) = (-9_001, 1);
    db.warns.reset_all(chat, user).await.unwrap();

    assert_eq!(db.warns.increment(chat, user, 3).await.unwrap(), 1);
    assert_eq!(db.warns.increment(chat, user, 3).await.unwrap(), 2);
    assert_eq!(db.warns.get(chat, user).await.unwrap(), 2);

    // The third warn reaches the limit: the returned count reports it,
    // but the committed state is already reset to zero.
    assert_eq!(db.warns.increment(chat, user, 3).await.unwrap(), 3);
    assert_eq!(db.warns.get(chat, user).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (TEST_DATABASE_URL)"]
async fn test_remove_last_reports_whether_anything_was_removed() {
    let db = setup().await;
    let (chat, user) = (-9_002, 1);
    db.warns.reset_all(chat, user).await.unwrap();

    assert!(!db.warns.remove_last(chat, user).await.unwrap());
    db.warns.increment(chat, user, 10).await.unwrap();
    assert!(db.warns.remove_last(chat, user).await.unwrap());
    assert_eq!(db.warns.get(chat, user).await.unwrap(), 0);
    assert!(!db.warns.remove_last(chat, user).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (TEST_DATABASE_URL)"]
async fn test_reset_all_is_idempotent() {
    let db = setup().await;
    let (chat, user) = (-9_003, 1);
    db.warns.reset_all(chat, user).await.unwrap();

    db.warns.increment(chat, user, 10).await.unwrap();
    db.warns.increment(chat, user, 10).await.unwrap();
    assert!(db.warns.reset_all(chat, user).await.unwrap());
    assert!(!db.warns.reset_all(chat, user).await.unwrap());
    assert_eq!(db.warns.get(chat, user).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (TEST_DATABASE_URL)"]
async fn test_concurrent_increments_are_not_lost() {
    let db = setup().await;
    let (chat, user) = (-9_004, 1);
    db.warns.reset_all(chat, user).await.unwrap();

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let warns = db.warns.clone();
            tokio::spawn(async move { warns.increment(chat, user, 100).await.unwrap() })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(db.warns.get(chat, user).await.unwrap(), 5);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (TEST_DATABASE_URL)"]
async fn test_settings_defaults_and_patching() {
    let db = setup().await;
    let chat = -9_005;

    let defaults = db.settings.get(chat).await.unwrap();
    assert_eq!(defaults.warn_limit, 3);
    assert_eq!(defaults.warn_mode, WarnMode::Mute);

    // A genuine change reports true, a no-op patch reports false.
    let patch = ChatSettingsPatch { warn_limit: Some(5), ..Default::default() };
    assert!(db.settings.update(chat, patch.clone()).await.unwrap());
    assert!(!db.settings.update(chat, patch).await.unwrap());

    let patch = ChatSettingsPatch {
        warn_mode: Some(WarnMode::Tmute),
        warn_duration: Some(Some("1h".to_string())),
        ..Default::default()
    };
    assert!(db.settings.update(chat, patch).await.unwrap());

    let stored = db.settings.get(chat).await.unwrap();
    assert_eq!(stored.warn_limit, 5);
    assert_eq!(stored.warn_mode, WarnMode::Tmute);
    assert_eq!(stored.warn_duration.as_deref(), Some("1h"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (TEST_DATABASE_URL)"]
async fn test_second_warn_escalates_once_with_a_timed_mute() {
    let db = setup().await;
    let (chat, user) = (-9_006, 1);
    db.warns.reset_all(chat, user).await.unwrap();

    let patch = ChatSettingsPatch {
        warn_limit: Some(2),
        warn_mode: Some(WarnMode::Tmute),
        warn_duration: Some(Some("1h".to_string())),
        ..Default::default()
    };
    db.settings.update(chat, patch).await.unwrap();
    let settings = db.settings.get(chat).await.unwrap();
    let now = Utc::now();

    // First warn: counted, no escalation.
    let count = db.warns.increment(chat, user, settings.warn_limit).await.unwrap();
    assert_eq!(count, 1);
    assert!(escalation_decision(&settings, count, user, now).unwrap().is_none());

    // Second warn reaches the limit: exactly one intent, counter back to 0.
    let count = db.warns.increment(chat, user, settings.warn_limit).await.unwrap();
    assert_eq!(count, 2);
    let intent = escalation_decision(&settings, count, user, now)
        .unwrap()
        .expect("escalation intent");
    assert_eq!(intent.kind, RestrictionKind::Mute);
    assert_eq!(intent.until, Some(now + Duration::hours(1)));
    assert_eq!(db.warns.get(chat, user).await.unwrap(), 0);
}
