use std::sync::Arc;

use sgwc_registry::allocator::FormNumberAllocator;
use sgwc_registry::models::counter::sequence_of;
use sgwc_registry::persistence::{counter_repo::CounterRepo, db};
use sgwc_registry::AppError;

#[tokio::test]
async fn first_numbers_follow_the_floor_regardless_of_zone() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let allocator = FormNumberAllocator::new(pool, 500);

    assert_eq!(allocator.allocate(Some("nfr")).await.expect("first"), "SGWC/NFR/000501");
    assert_eq!(allocator.allocate(Some("CR")).await.expect("second"), "SGWC/CR/000502");
}

#[tokio::test]
async fn zone_is_normalized() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let allocator = FormNumberAllocator::new(pool, 500);

    let lower = allocator.allocate(Some("nfr")).await.expect("lower");
    let upper = allocator.allocate(Some("NFR")).await.expect("upper");
    let empty = allocator.allocate(Some("")).await.expect("empty");
    let absent = allocator.allocate(None).await.expect("absent");

    assert!(lower.starts_with("SGWC/NFR/"));
    assert!(upper.starts_with("SGWC/NFR/"));
    assert!(empty.starts_with("SGWC/NA/"));
    assert!(absent.starts_with("SGWC/NA/"));
}

#[tokio::test]
async fn new_allocator_resumes_existing_counter() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));

    let first = FormNumberAllocator::new(Arc::clone(&pool), 500);
    first.allocate(None).await.expect("allocate");
    first.allocate(None).await.expect("allocate");

    // A restarted process seeds again; the stored counter must win.
    let restarted = FormNumberAllocator::new(Arc::clone(&pool), 500);
    let next = restarted.allocate(None).await.expect("allocate after restart");
    assert_eq!(sequence_of(&next), Some(503));

    let stored = CounterRepo::new(pool).get().await.expect("get").expect("counter exists");
    assert_eq!(stored.last_id, 503);
}

#[tokio::test]
async fn closed_store_fails_without_returning_a_number() {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let allocator = FormNumberAllocator::new(Arc::clone(&pool), 500);
    allocator.allocate(None).await.expect("allocate");

    pool.close().await;

    let result = allocator.allocate(None).await;
    assert!(matches!(result, Err(AppError::Allocation(_))), "got {result:?}");
}
