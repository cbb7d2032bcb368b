use std::sync::Arc;

use sgwc_registry::config::GlobalConfig;
use sgwc_registry::models::worker::{Registration, WorkerStatus};
use sgwc_registry::persistence::{counter_repo::CounterRepo, db};
use sgwc_registry::registry::WorkerRegistry;
use sgwc_registry::AppError;

fn config(limit: u32) -> GlobalConfig {
    GlobalConfig::from_toml_str(&format!("form_limit_per_admin = {limit}")).expect("config")
}

fn registration(admin: &str) -> Registration {
    Registration {
        admin_id: admin.into(),
        zone: Some("nfr".into()),
        name: Some("Ravi Kumar".into()),
        ..Registration::default()
    }
}

#[tokio::test]
async fn register_assigns_form_number_and_persists() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(pool, &config(500));

    let record = registry.register(registration("admin-1")).await.expect("register");
    assert_eq!(record.form_no, "SGWC/NFR/000501");
    assert_eq!(record.status, WorkerStatus::Verified);

    let fetched = registry.get(&record.id).await.expect("get");
    assert_eq!(fetched.form_no, record.form_no);
    assert_eq!(fetched.admin_id, "admin-1");
    assert_eq!(fetched.profile, record.profile);
}

#[tokio::test]
async fn missing_admin_spends_no_number() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(Arc::clone(&pool), &config(500));

    let result = registry.register(registration("  ")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(CounterRepo::new(pool).get().await.expect("get"), None);
}

#[tokio::test]
async fn malformed_zone_spends_no_number_and_stores_nothing() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(Arc::clone(&pool), &config(500));

    for zone in ["n\u{1}fr", "NF/R"] {
        let mut bad = registration("admin-1");
        bad.zone = Some(zone.into());
        let result = registry.register(bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "zone {zone:?}");
    }

    assert!(registry.list().await.expect("list").is_empty());
    assert_eq!(CounterRepo::new(pool).get().await.expect("get"), None);
}

#[tokio::test]
async fn quota_is_enforced_per_admin() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(Arc::clone(&pool), &config(2));

    registry.register(registration("admin-1")).await.expect("first");
    registry.register(registration("admin-1")).await.expect("second");

    let third = registry.register(registration("admin-1")).await;
    match third {
        Err(AppError::LimitReached(msg)) => assert_eq!(msg, "Limit Reached (2 forms)"),
        other => panic!("expected LimitReached, got {other:?}"),
    }

    // The refused request did not consume a number.
    let counter = CounterRepo::new(pool).get().await.expect("get").expect("exists");
    assert_eq!(counter.last_id, 502);

    let other_admin = registry.register(registration("admin-2")).await.expect("other admin");
    assert_eq!(other_admin.form_no, "SGWC/NFR/000503");
}

#[tokio::test]
async fn unknown_worker_is_not_found() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(pool, &config(500));
    assert!(matches!(registry.get("nope").await, Err(AppError::NotFound(_))));
    assert!(matches!(
        registry.record_scan("nope", Some("https://drive.example/x")).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn record_scan_attaches_trimmed_link() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(pool, &config(500));
    let record = registry.register(registration("admin-1")).await.expect("register");

    let updated = registry
        .record_scan(&record.id, Some("  https://drive.example/scan  "))
        .await
        .expect("record scan");
    assert_eq!(updated.scan_link.as_deref(), Some("https://drive.example/scan"));
    assert_eq!(updated.status, WorkerStatus::Verified);

    let blank = registry.record_scan(&record.id, Some("   ")).await.expect("blank link");
    assert_eq!(blank.scan_link.as_deref(), Some("https://drive.example/scan"));
}

#[tokio::test]
async fn list_returns_newest_first() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let registry = WorkerRegistry::new(pool, &config(500));
    let first = registry.register(registration("admin-1")).await.expect("first");
    let second = registry.register(registration("admin-1")).await.expect("second");

    let all = registry.list().await.expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}
