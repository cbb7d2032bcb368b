use std::sync::Arc;

use sgwc_registry::models::worker::{Registration, WorkerRecord, WorkerStatus};
use sgwc_registry::persistence::{db, worker_repo::WorkerRepo};
use sgwc_registry::AppError;

async fn repo() -> WorkerRepo {
    let pool = db::connect_memory().await.expect("db connect");
    WorkerRepo::new(Arc::new(pool))
}

fn record(admin: &str, form_no: &str, name: Option<&str>) -> WorkerRecord {
    Registration {
        admin_id: admin.into(),
        zone: Some("nfr".into()),
        name: name.map(Into::into),
        mobile_no: Some("9876543210".into()),
        division: Some("Lumding".into()),
        ..Registration::default()
    }
    .into_record(form_no.into())
}

#[tokio::test]
async fn in_memory_connect_creates_tables() {
    let pool = db::connect_memory().await.expect("db connect");
    for table in ["worker", "sequence_counter"] {
        let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("table '{table}' should be queryable: {e}"));
        assert_eq!(row.0, 0, "table '{table}' should start empty");
    }
}

#[tokio::test]
async fn insert_and_get_round_trip() {
    let repo = repo().await;
    let record = record("admin-1", "SGWC/NFR/000501", Some("Ravi Kumar"));
    repo.insert(&record).await.expect("insert");

    let fetched = repo.get_by_id(&record.id).await.expect("get").expect("exists");
    assert_eq!(fetched.form_no, "SGWC/NFR/000501");
    assert_eq!(fetched.profile.name.as_deref(), Some("Ravi Kumar"));
    assert_eq!(fetched.profile.division.as_deref(), Some("Lumding"));
    assert_eq!(fetched.status, WorkerStatus::Verified);
    assert_eq!(fetched.scan_link, None);
    assert_eq!(fetched.created_at.timestamp_micros(), record.created_at.timestamp_micros());
}

#[tokio::test]
async fn unknown_id_is_none() {
    let repo = repo().await;
    assert!(repo.get_by_id("missing").await.expect("get").is_none());
}

#[tokio::test]
async fn duplicate_form_number_is_rejected() {
    let repo = repo().await;
    repo.insert(&record("admin-1", "SGWC/NFR/000501", None)).await.expect("insert");
    let result = repo.insert(&record("admin-2", "SGWC/NFR/000501", None)).await;
    assert!(matches!(result, Err(AppError::Db(_))));
}

#[tokio::test]
async fn list_is_newest_first() {
    let repo = repo().await;
    let mut older = record("admin-1", "SGWC/NFR/000501", Some("First"));
    older.created_at -= chrono::Duration::minutes(5);
    let newer = record("admin-1", "SGWC/NFR/000502", Some("Second"));
    repo.insert(&older).await.expect("insert older");
    repo.insert(&newer).await.expect("insert newer");

    let all = repo.list_all().await.expect("list");
    let forms: Vec<&str> = all.iter().map(|w| w.form_no.as_str()).collect();
    assert_eq!(forms, ["SGWC/NFR/000502", "SGWC/NFR/000501"]);
}

#[tokio::test]
async fn count_is_per_admin() {
    let repo = repo().await;
    repo.insert(&record("admin-1", "SGWC/NFR/000501", None)).await.expect("insert");
    repo.insert(&record("admin-1", "SGWC/NFR/000502", None)).await.expect("insert");
    repo.insert(&record("admin-2", "SGWC/NFR/000503", None)).await.expect("insert");

    assert_eq!(repo.count_for_admin("admin-1").await.expect("count"), 2);
    assert_eq!(repo.count_for_admin("admin-2").await.expect("count"), 1);
    assert_eq!(repo.count_for_admin("admin-3").await.expect("count"), 0);
}

#[tokio::test]
async fn verification_sets_status_and_keeps_link_when_absent() {
    let repo = repo().await;
    let mut pending = record("admin-1", "SGWC/NFR/000501", None);
    pending.status = WorkerStatus::Pending;
    repo.insert(&pending).await.expect("insert");

    let updated = repo
        .update_verification(&pending.id, WorkerStatus::Verified, Some("https://drive.example/scan"))
        .await
        .expect("update");
    assert_eq!(updated.status, WorkerStatus::Verified);
    assert_eq!(updated.scan_link.as_deref(), Some("https://drive.example/scan"));
    assert_eq!(updated.form_no, pending.form_no, "form number never changes");

    let kept = repo
        .update_verification(&pending.id, WorkerStatus::Verified, None)
        .await
        .expect("update without link");
    assert_eq!(kept.scan_link.as_deref(), Some("https://drive.example/scan"));
}

#[tokio::test]
async fn verification_of_unknown_worker_is_not_found() {
    let repo = repo().await;
    let result = repo.update_verification("missing", WorkerStatus::Verified, None).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
