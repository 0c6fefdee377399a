//! Backing-store contract
//!
//! The sink treats the store as opaque: it asks for unit-of-work
//! handles, commits records under them, and rolls back on failure. Any
//! of the three calls may fail at any time; the sink absorbs all of it.
//!
//! [`MemoryStore`] is the reference implementation, used by the tests
//! and handy for development without an external store.

use std::convert::Infallible;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::record::PersistedRecord;

/// A backing store that persists log records under units of work
///
/// `Handle` is a scope of persistence operations: records committed
/// under it stay referenced by it until it is dropped. Implementations
/// must allow `commit` and `rollback` to be called from arbitrary
/// threads.
pub trait Store: Send + Sync {
    /// Opaque unit-of-work handle
    type Handle: Send + Sync;

    /// Store-level failure; never escapes the sink
    type Error: Error + Send + Sync + 'static;

    /// Open a fresh unit of work
    fn create_unit_of_work(&self) -> Result<Self::Handle, Self::Error>;

    /// Persist a record under the given unit of work
    fn commit(&self, handle: &Self::Handle, record: &PersistedRecord) -> Result<(), Self::Error>;

    /// Discard a record whose commit failed
    fn rollback(
        &self,
        handle: &Self::Handle,
        record: &PersistedRecord,
    ) -> Result<(), Self::Error>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Unit-of-work handle issued by [`MemoryStore`]
///
/// Carries only an id; the in-memory store keeps no per-unit state, so
/// a rollback of a never-committed record is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryUnitOfWork {
    id: u64,
}

impl MemoryUnitOfWork {
    /// Get the handle id (monotonic per store)
    #[inline]
    pub fn id(self) -> u64 {
        self.id
    }
}

/// In-memory store that never fails
///
/// Commits append to a shared vector. Used as the reference
/// implementation of the [`Store`] contract; failure and panic behavior
/// is exercised with purpose-built doubles in the test files.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<PersistedRecord>>,
    units_created: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether no records have been committed
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Snapshot of all committed records, in commit order
    pub fn records(&self) -> Vec<PersistedRecord> {
        self.records.lock().clone()
    }

    /// Number of unit-of-work handles created so far
    pub fn units_created(&self) -> u64 {
        self.units_created.load(Ordering::Relaxed)
    }
}

impl Store for MemoryStore {
    type Handle = MemoryUnitOfWork;
    type Error = Infallible;

    fn create_unit_of_work(&self) -> Result<Self::Handle, Self::Error> {
        let id = self.units_created.fetch_add(1, Ordering::Relaxed);
        Ok(MemoryUnitOfWork { id })
    }

    fn commit(&self, _handle: &Self::Handle, record: &PersistedRecord) -> Result<(), Self::Error> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn rollback(
        &self,
        _handle: &Self::Handle,
        _record: &PersistedRecord,
    ) -> Result<(), Self::Error> {
        // Nothing was retained for a failed commit
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
