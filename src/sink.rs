//! The store sink
//!
//! [`StoreSink::deliver`] is the single entry point the dispatcher
//! calls, synchronously, from whatever thread emits the message. It is
//! infallible by contract: every persistence failure is absorbed at
//! this boundary, the record is dropped, and the host application never
//! observes an error. A dropped record is the intended outcome of a
//! failure, not an omission.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::SinkConfig;
use crate::event::{EventSeverity, LogEvent};
use crate::pool::UnitOfWorkPool;
use crate::record::PersistedRecord;
use crate::store::Store;

/// Metrics for the store sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Events that passed the severity gate
    events_received: AtomicU64,

    /// Events discarded by the severity gate
    events_below_level: AtomicU64,

    /// Records successfully committed
    records_committed: AtomicU64,

    /// Records dropped after a persistence failure
    records_dropped: AtomicU64,

    /// Rollback attempts after failed commits
    rollbacks: AtomicU64,

    /// Rollback attempts that themselves failed
    rollback_failures: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            events_below_level: AtomicU64::new(0),
            records_committed: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            rollbacks: AtomicU64::new(0),
            rollback_failures: AtomicU64::new(0),
        }
    }

    /// Record an event past the severity gate
    #[inline]
    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an event discarded by the severity gate
    #[inline]
    pub fn record_below_level(&self) {
        self.events_below_level.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful commit
    #[inline]
    pub fn record_committed(&self) {
        self.records_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped record
    #[inline]
    pub fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rollback attempt
    #[inline]
    pub fn record_rollback(&self) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed rollback
    #[inline]
    pub fn record_rollback_failure(&self) {
        self.rollback_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_below_level: self.events_below_level.load(Ordering::Relaxed),
            records_committed: self.records_committed.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
            rollback_failures: self.rollback_failures.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.events_received.store(0, Ordering::Relaxed);
        self.events_below_level.store(0, Ordering::Relaxed);
        self.records_committed.store(0, Ordering::Relaxed);
        self.records_dropped.store(0, Ordering::Relaxed);
        self.rollbacks.store(0, Ordering::Relaxed);
        self.rollback_failures.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_below_level: u64,
    pub records_committed: u64,
    pub records_dropped: u64,
    pub rollbacks: u64,
    pub rollback_failures: u64,
}

/// Sink that persists log events as records in a backing store
///
/// Safe to share across threads; `deliver` takes `&self`. Once stopped,
/// a sink stays stopped: deliveries become no-ops and there is no
/// restart.
pub struct StoreSink<S: Store> {
    store: Arc<S>,
    pool: UnitOfWorkPool<S>,
    min_severity: EventSeverity,
    stopped: AtomicBool,
    metrics: SinkMetrics,
}

impl<S: Store> StoreSink<S> {
    /// Create a sink over the given store
    pub fn new(store: Arc<S>, config: SinkConfig) -> Self {
        let pool = UnitOfWorkPool::new(Arc::clone(&store), config.rotation_threshold);
        Self {
            store,
            pool,
            min_severity: config.min_severity,
            stopped: AtomicBool::new(false),
            metrics: SinkMetrics::new(),
        }
    }

    /// Deliver one log event; never fails
    ///
    /// Gates on the configured minimum severity, then acquires a unit of
    /// work, builds the record and commits it. Any failure along the way
    /// (handle creation, commit, even a panicking store implementation)
    /// is absorbed here: the record is rolled back best-effort and
    /// dropped. Nothing propagates to the caller.
    pub fn deliver(&self, event: &LogEvent) {
        if self.stopped.load(Ordering::Acquire) {
            return;
        }

        // The dispatcher is expected to gate upstream with the same
        // ordering; re-checking here keeps a misconfigured dispatcher
        // from flooding the store.
        if event.severity < self.min_severity {
            self.metrics.record_below_level();
            return;
        }
        self.metrics.record_received();

        match panic::catch_unwind(AssertUnwindSafe(|| self.persist(event))) {
            Ok(Ok(())) => self.metrics.record_committed(),
            Ok(Err(error)) => {
                tracing::trace!(error = %error, "log record dropped");
                self.metrics.record_dropped();
            }
            Err(_) => {
                tracing::trace!("log record dropped: store panicked");
                self.metrics.record_dropped();
            }
        }
    }

    /// Persist one event under the pooled unit of work
    fn persist(&self, event: &LogEvent) -> Result<(), S::Error> {
        let handle = self.pool.acquire()?;
        let record = PersistedRecord::from_event(event);

        if let Err(error) = self.store.commit(&handle, &record) {
            self.metrics.record_rollback();
            if let Err(rollback_error) = self.store.rollback(&handle, &record) {
                self.metrics.record_rollback_failure();
                tracing::trace!(error = %rollback_error, "rollback failed");
            }
            return Err(error);
        }

        Ok(())
    }

    /// Stop the sink; idempotent, one-way
    ///
    /// A delivery already past the stopped check may still complete.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            tracing::info!("store sink stopped");
        }
    }

    /// Whether the sink has been stopped
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// The configured minimum severity
    #[inline]
    pub fn min_severity(&self) -> EventSeverity {
        self.min_severity
    }

    /// The unit-of-work pool
    #[inline]
    pub fn pool(&self) -> &UnitOfWorkPool<S> {
        &self.pool
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Get snapshot of metrics
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
