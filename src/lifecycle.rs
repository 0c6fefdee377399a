//! Sink lifecycle
//!
//! An explicit factory the host's startup code owns: configure the
//! minimum severity once, obtain the single sink instance lazily, stop
//! it idempotently at shutdown. The lifecycle is passed by reference to
//! whatever wires the dispatcher; there is no global lookup.
//!
//! Configuration must happen before the first call to [`sink`]
//! (normally during single-threaded startup); afterwards it fails with
//! [`ConfigError::AlreadyInitialized`]. No ordering is enforced beyond
//! that check.
//!
//! [`sink`]: SinkLifecycle::sink

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::SinkConfig;
use crate::error::ConfigError;
use crate::event::EventSeverity;
use crate::sink::StoreSink;
use crate::store::Store;

/// Factory for the single sink instance over a store
pub struct SinkLifecycle<S: Store> {
    store: Arc<S>,
    config: Mutex<SinkConfig>,
    sink: OnceLock<Arc<StoreSink<S>>>,
}

impl<S: Store> SinkLifecycle<S> {
    /// Create a lifecycle with the default configuration
    /// (minimum severity INFO)
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, SinkConfig::default())
    }

    /// Create a lifecycle with full configuration
    pub fn with_config(store: Arc<S>, config: SinkConfig) -> Self {
        Self {
            store,
            config: Mutex::new(config),
            sink: OnceLock::new(),
        }
    }

    /// Set the minimum severity for the sink
    ///
    /// Fails with [`ConfigError::AlreadyInitialized`] once the sink has
    /// been created; call this before the first [`sink`](Self::sink).
    pub fn configure(&self, min_severity: EventSeverity) -> Result<(), ConfigError> {
        if self.sink.get().is_some() {
            return Err(ConfigError::AlreadyInitialized);
        }
        self.config.lock().min_severity = min_severity;
        Ok(())
    }

    /// Set the minimum severity from a severity name
    ///
    /// Fails with [`ConfigError::InvalidSeverity`] for a name outside
    /// the dispatcher's scale, otherwise behaves like
    /// [`configure`](Self::configure).
    pub fn configure_from_name(&self, name: &str) -> Result<(), ConfigError> {
        let severity = EventSeverity::from_name(name).ok_or_else(|| {
            ConfigError::InvalidSeverity {
                name: name.to_string(),
            }
        })?;
        self.configure(severity)
    }

    /// Get the sink, creating it on first call
    ///
    /// Creation is thread-safe and happens exactly once; every call
    /// returns the same instance.
    pub fn sink(&self) -> Arc<StoreSink<S>> {
        let sink = self.sink.get_or_init(|| {
            let config = *self.config.lock();
            tracing::info!(min_severity = %config.min_severity, "store sink starting");
            Arc::new(StoreSink::new(Arc::clone(&self.store), config))
        });
        Arc::clone(sink)
    }

    /// Whether the sink instance has been created
    pub fn is_initialized(&self) -> bool {
        self.sink.get().is_some()
    }

    /// Stop the sink if it was created; idempotent
    ///
    /// Safe to call concurrently with in-flight deliveries and before
    /// the sink ever existed.
    pub fn stop(&self) {
        if let Some(sink) = self.sink.get() {
            sink.stop();
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;
