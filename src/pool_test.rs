//! Tests for the unit-of-work pool

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use super::UnitOfWorkPool;
use crate::record::PersistedRecord;
use crate::store::{MemoryStore, Store};

/// Store double whose unit-of-work creation can be made to fail
#[derive(Debug, Default)]
struct TestStore {
    created: AtomicU64,
    fail_create: AtomicBool,
}

#[derive(Debug, thiserror::Error)]
#[error("unit of work unavailable")]
struct CreateFailed;

impl Store for TestStore {
    type Handle = u64;
    type Error = CreateFailed;

    fn create_unit_of_work(&self) -> Result<Self::Handle, Self::Error> {
        if self.fail_create.load(Ordering::Relaxed) {
            return Err(CreateFailed);
        }
        Ok(self.created.fetch_add(1, Ordering::Relaxed))
    }

    fn commit(&self, _handle: &u64, _record: &PersistedRecord) -> Result<(), Self::Error> {
        Ok(())
    }

    fn rollback(&self, _handle: &u64, _record: &PersistedRecord) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

#[test]
fn test_first_acquire_creates_handle() {
    let store = Arc::new(TestStore::default());
    let pool = UnitOfWorkPool::new(Arc::clone(&store), 500);

    assert_eq!(pool.usage(), 0);
    let handle = pool.acquire().unwrap();

    assert_eq!(*handle, 0);
    assert_eq!(pool.usage(), 1);
    assert_eq!(store.created.load(Ordering::Relaxed), 1);
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 0);
}

#[test]
fn test_handle_reused_below_threshold() {
    let store = Arc::new(TestStore::default());
    let pool = UnitOfWorkPool::new(store, 10);

    let first = pool.acquire().unwrap();
    for _ in 0..9 {
        let handle = pool.acquire().unwrap();
        assert!(Arc::ptr_eq(&first, &handle));
    }

    assert_eq!(pool.usage(), 10);
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 0);
}

#[test]
fn test_rotation_replaces_handle_and_resets_counter() {
    let store = Arc::new(TestStore::default());
    let pool = UnitOfWorkPool::new(Arc::clone(&store), 3);

    let first = pool.acquire().unwrap();
    pool.acquire().unwrap();
    pool.acquire().unwrap();
    assert_eq!(pool.usage(), 3);

    // Fourth acquisition crosses the threshold
    let rotated = pool.acquire().unwrap();

    assert!(!Arc::ptr_eq(&first, &rotated));
    assert_eq!(pool.usage(), 1);
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 1);
    assert_eq!(store.created.load(Ordering::Relaxed), 2);
}

#[test]
fn test_rotation_at_every_threshold_crossing() {
    let store = Arc::new(TestStore::default());
    let pool = UnitOfWorkPool::new(store, 2);

    for _ in 0..7 {
        pool.acquire().unwrap();
    }

    // Rotations on acquisitions 3, 5 and 7
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 3);
    assert_eq!(pool.usage(), 1);
}

#[test]
fn test_501_acquisitions_rotate_exactly_once() {
    let store = Arc::new(TestStore::default());
    let pool = UnitOfWorkPool::new(Arc::clone(&store), 500);

    for _ in 0..501 {
        pool.acquire().unwrap();
    }

    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 1);
    assert_eq!(pool.metrics().acquisitions.load(Ordering::Relaxed), 501);
    assert_eq!(pool.usage(), 1);
    assert_eq!(store.created.load(Ordering::Relaxed), 2);
}

#[test]
fn test_works_with_memory_store() {
    let store = Arc::new(MemoryStore::new());
    let pool = UnitOfWorkPool::new(Arc::clone(&store), 5);

    for _ in 0..11 {
        pool.acquire().unwrap();
    }

    assert_eq!(store.units_created(), 3);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_initial_creation_failure_leaves_pool_retryable() {
    let store = Arc::new(TestStore::default());
    store.fail_create.store(true, Ordering::Relaxed);
    let pool = UnitOfWorkPool::new(Arc::clone(&store), 500);

    assert!(pool.acquire().is_err());
    assert_eq!(pool.usage(), 0);

    store.fail_create.store(false, Ordering::Relaxed);
    assert!(pool.acquire().is_ok());
    assert_eq!(pool.usage(), 1);
}

#[test]
fn test_rotation_failure_keeps_old_handle_and_counter() {
    let store = Arc::new(TestStore::default());
    let pool = UnitOfWorkPool::new(Arc::clone(&store), 1);

    let first = pool.acquire().unwrap();
    assert_eq!(pool.usage(), 1);

    // Next acquisition must rotate, but creation fails
    store.fail_create.store(true, Ordering::Relaxed);
    assert!(pool.acquire().is_err());
    assert_eq!(pool.usage(), 1);
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 0);

    // Creation recovers; the retried rotation succeeds
    store.fail_create.store(false, Ordering::Relaxed);
    let rotated = pool.acquire().unwrap();
    assert!(!Arc::ptr_eq(&first, &rotated));
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 1);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[test]
fn test_concurrent_acquisitions_rotate_exactly_per_threshold() {
    let store = Arc::new(TestStore::default());
    let pool = Arc::new(UnitOfWorkPool::new(Arc::clone(&store), 100));

    let mut handles = vec![];
    for _ in 0..10 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                pool.acquire().unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // 1000 acquisitions at 100 per handle: 10 handles, 9 rotations,
    // and the last handle is exactly full
    assert_eq!(pool.metrics().acquisitions.load(Ordering::Relaxed), 1000);
    assert_eq!(pool.metrics().rotations.load(Ordering::Relaxed), 9);
    assert_eq!(store.created.load(Ordering::Relaxed), 10);
    assert_eq!(pool.usage(), 100);
}
