use std::sync::Arc;

use sgwc_registry::persistence::{counter_repo::CounterRepo, db};
use sgwc_registry::AppError;

async fn repo() -> CounterRepo {
    let pool = db::connect_memory().await.expect("db connect");
    CounterRepo::new(Arc::new(pool))
}

#[tokio::test]
async fn counter_is_absent_until_created() {
    let repo = repo().await;
    assert_eq!(repo.get().await.expect("get"), None);
}

#[tokio::test]
async fn create_initializes_at_floor() {
    let repo = repo().await;
    let counter = repo.create(500).await.expect("create");
    assert_eq!(counter.last_id, 500);
}

#[tokio::test]
async fn create_never_reinitializes_existing_counter() {
    let repo = repo().await;
    repo.create(500).await.expect("create");
    repo.increment_and_fetch().await.expect("increment");
    repo.increment_and_fetch().await.expect("increment");

    let again = repo.create(500).await.expect("second create");
    assert_eq!(again.last_id, 502, "existing counter must survive a second create");

    let other_floor = repo.create(9000).await.expect("create with another floor");
    assert_eq!(other_floor.last_id, 502);
}

#[tokio::test]
async fn increment_returns_strictly_increasing_values() {
    let repo = repo().await;
    repo.create(500).await.expect("create");

    let mut previous = 500;
    for _ in 0..10 {
        let next = repo.increment_and_fetch().await.expect("increment").last_id;
        assert_eq!(next, previous + 1);
        previous = next;
    }
    assert_eq!(repo.get().await.expect("get").map(|c| c.last_id), Some(510));
}

#[tokio::test]
async fn increment_without_counter_is_not_found() {
    let repo = repo().await;
    let result = repo.increment_and_fetch().await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
