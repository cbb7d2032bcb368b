//! Form numbers stay unique under concurrent allocation against a
//! file-backed database.

use std::collections::BTreeSet;
use std::sync::Arc;

use sgwc_registry::allocator::FormNumberAllocator;
use sgwc_registry::models::counter::sequence_of;
use sgwc_registry::persistence::db;

const TASKS: i64 = 40;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_are_unique_and_gapless() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = Arc::new(db::connect(&dir.path().join("registry.db")).await.expect("connect"));

    // Two allocators stand in for two service instances sharing one file.
    let first = Arc::new(FormNumberAllocator::new(Arc::clone(&pool), 500));
    let second = Arc::new(FormNumberAllocator::new(Arc::clone(&pool), 500));

    let mut handles = Vec::new();
    for i in 0..TASKS {
        let allocator = if i % 2 == 0 {
            Arc::clone(&first)
        } else {
            Arc::clone(&second)
        };
        let zone = if i % 3 == 0 { "nfr" } else { "cr" };
        handles.push(tokio::spawn(async move { allocator.allocate(Some(zone)).await }));
    }

    let mut sequences = BTreeSet::new();
    for handle in handles {
        let form_no = handle.await.expect("join").expect("allocate");
        let seq = sequence_of(&form_no).expect("well-formed form number");
        assert!(sequences.insert(seq), "duplicate sequence {seq}");
    }

    let expected: BTreeSet<i64> = (501..=500 + TASKS).collect();
    assert_eq!(sequences, expected);
}

#[tokio::test]
async fn counter_survives_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("registry.db");

    {
        let pool = Arc::new(db::connect(&path).await.expect("connect"));
        let allocator = FormNumberAllocator::new(Arc::clone(&pool), 500);
        allocator.allocate(Some("nfr")).await.expect("first");
        allocator.allocate(Some("nfr")).await.expect("second");
        pool.close().await;
    }

    let pool = Arc::new(db::connect(&path).await.expect("reconnect"));
    let allocator = FormNumberAllocator::new(pool, 900);
    assert_eq!(
        allocator.allocate(Some("er")).await.expect("after restart"),
        "SGWC/ER/000503"
    );
}
