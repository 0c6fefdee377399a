//! logsink - store-backed log sink
//!
//! Receives structured log events pushed by an application runtime and
//! persists them as records in a backing store. The one invariant that
//! shapes everything here: **logging can never be the cause of an
//! application-visible fault**. Delivery is infallible at the public
//! boundary; a record that cannot be persisted is silently dropped.
//!
//! # Architecture
//!
//! ```text
//! [Dispatcher] --deliver(event)--> [StoreSink]
//!                                      │ severity gate
//!                                      ▼
//!                              [UnitOfWorkPool] --rotate every N uses
//!                                      │ acquire()
//!                                      ▼
//!                              [normalize fields] --> PersistedRecord
//!                                      │
//!                                      ▼
//!                              [Store::commit] --on error--> rollback,
//!                                                            swallow
//! ```
//!
//! The pool keeps one long-lived unit-of-work handle and reissues it to
//! every delivery, replacing it after a fixed usage count. Reuse
//! amortizes store-session overhead; rotation bounds how much the handle
//! can retain before it becomes reclaimable.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use logsink::{EventSeverity, LogEvent, MemoryStore, SinkLifecycle};
//!
//! let store = Arc::new(MemoryStore::new());
//! let lifecycle = SinkLifecycle::new(store);
//! lifecycle.configure(EventSeverity::Warning)?;
//!
//! let sink = lifecycle.sink();
//! sink.deliver(&LogEvent::new(EventSeverity::Error, "disk full"));
//!
//! lifecycle.stop();
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Log events and the dispatcher-side severity scale
pub mod event;

/// Persisted records and the store-side severity scale
pub mod record;

/// Field normalization (severity mapping, truncation, cause rendering)
pub mod normalize;

/// Backing-store contract and the in-memory reference store
pub mod store;

/// Unit-of-work pool with rotation by usage count
pub mod pool;

/// The sink itself: severity gate, persist path, never-fails boundary
pub mod sink;

/// Configure-once, stop-idempotent sink lifecycle
pub mod lifecycle;

/// Configuration defaults and limits
pub mod config;

/// Configuration error taxonomy
mod error;

// =============================================================================
// Public re-exports
// =============================================================================

pub use config::SinkConfig;
pub use error::ConfigError;
pub use event::{EventSeverity, LogEvent};
pub use lifecycle::SinkLifecycle;
pub use pool::UnitOfWorkPool;
pub use record::{PersistedRecord, RecordSeverity};
pub use sink::{MetricsSnapshot, SinkMetrics, StoreSink};
pub use store::{MemoryStore, Store};
