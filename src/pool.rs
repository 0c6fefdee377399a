//! Unit-of-work pool with rotation by usage count
//!
//! Owns exactly one reusable unit-of-work handle at a time and reissues
//! it to every caller. A long-lived handle amortizes store-session
//! overhead but retains a reference to every record created under it,
//! so after a fixed number of acquisitions the pool swaps in a fresh
//! handle and lets the old one drain via its `Arc` refcount.
//!
//! The increment and the swap happen under a single mutex, so exactly
//! one rotation occurs per threshold crossing no matter how many
//! threads race through `acquire`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::store::Store;

/// Pool state guarded by one lock: the current handle and its usage count
struct PoolInner<S: Store> {
    /// Current handle; created lazily on first acquisition
    handle: Option<Arc<S::Handle>>,

    /// Acquisitions served by the current handle
    usage: u32,
}

/// Metrics for pool monitoring
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Total successful acquisitions
    pub acquisitions: AtomicU64,

    /// Handle replacements (excludes the initial creation)
    pub rotations: AtomicU64,
}

impl PoolMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            acquisitions: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
        }
    }
}

/// Pool owning one reusable unit-of-work handle
///
/// Thread-safe; `acquire` may be called concurrently from arbitrary
/// dispatcher threads.
pub struct UnitOfWorkPool<S: Store> {
    store: Arc<S>,
    threshold: u32,
    inner: Mutex<PoolInner<S>>,
    metrics: PoolMetrics,
}

impl<S: Store> UnitOfWorkPool<S> {
    /// Create a pool rotating its handle after `threshold` acquisitions
    ///
    /// The first handle is created lazily, on the first `acquire`, so
    /// construction itself cannot fail.
    pub fn new(store: Arc<S>, threshold: u32) -> Self {
        Self {
            store,
            threshold,
            inner: Mutex::new(PoolInner {
                handle: None,
                usage: 0,
            }),
            metrics: PoolMetrics::new(),
        }
    }

    /// Acquire the current handle, rotating it first if it has reached
    /// the usage threshold
    ///
    /// The acquisition that triggers a rotation is counted against the
    /// fresh handle, so after a rotation the usage count is 1. If
    /// creating the replacement fails, the pool state is left untouched
    /// and a later acquisition retries the rotation.
    pub fn acquire(&self) -> Result<Arc<S::Handle>, S::Error> {
        let mut inner = self.inner.lock();

        if let Some(handle) = inner.handle.clone() {
            if inner.usage < self.threshold {
                inner.usage += 1;
                self.metrics.acquisitions.fetch_add(1, Ordering::Relaxed);
                return Ok(handle);
            }

            // Threshold reached: replace the handle. The old Arc drops
            // here; everything it retained becomes reclaimable once
            // in-flight commits release their clones.
            let fresh = Arc::new(self.store.create_unit_of_work()?);
            inner.handle = Some(Arc::clone(&fresh));
            inner.usage = 1;
            drop(inner);

            self.metrics.acquisitions.fetch_add(1, Ordering::Relaxed);
            self.metrics.rotations.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("unit of work rotated");
            return Ok(fresh);
        }

        // First acquisition: create the initial handle
        let fresh = Arc::new(self.store.create_unit_of_work()?);
        inner.handle = Some(Arc::clone(&fresh));
        inner.usage = 1;
        drop(inner);

        self.metrics.acquisitions.fetch_add(1, Ordering::Relaxed);
        Ok(fresh)
    }

    /// Acquisitions served by the current handle
    pub fn usage(&self) -> u32 {
        self.inner.lock().usage
    }

    /// The configured rotation threshold
    #[inline]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
