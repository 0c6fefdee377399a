//! Log events as delivered by the dispatcher
//!
//! A [`LogEvent`] is what the external dispatcher pushes into the sink,
//! one per emitted log message. Every field except severity and
//! timestamp is optional; the sink normalizes whatever it gets.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Failure attached to a log event, rendered into the persisted record
/// as a stack trace
pub type EventCause = Arc<dyn Error + Send + Sync + 'static>;

/// Severity scale used by the dispatcher
///
/// Ordering follows declaration order: `Trace` is the lowest, `None` is
/// above everything and disables all logging when used as a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventSeverity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    /// Not a message level: as a minimum severity it suppresses all output
    None,
}

impl EventSeverity {
    /// All members, in ascending order
    pub const ALL: [EventSeverity; 7] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::None,
    ];

    /// Get string representation
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::None => "NONE",
        }
    }

    /// Parse from a severity name (case-insensitive)
    ///
    /// Returns `None` for names outside the scale; callers decide whether
    /// that is an error (configuration) or a mapping miss (normalization).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log event pushed by the dispatcher
///
/// Immutable once built. `payload` is any displayable value; the sink
/// stores its textual representation. `cause` is an error whose full
/// source chain is rendered into the persisted record.
pub struct LogEvent {
    /// When the message was emitted
    pub timestamp: DateTime<Utc>,

    /// Message severity on the dispatcher's scale
    pub severity: EventSeverity,

    /// Name of the emitting component, if known
    pub origin: Option<String>,

    /// Message payload; stringified during normalization
    pub payload: Option<Box<dyn fmt::Display + Send + Sync>>,

    /// Failure that triggered the message, if any
    pub cause: Option<EventCause>,
}

impl LogEvent {
    /// Create an event with the given severity and payload, timestamped now
    pub fn new(severity: EventSeverity, payload: impl fmt::Display + Send + Sync + 'static) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            origin: None,
            payload: Some(Box::new(payload)),
            cause: None,
        }
    }

    /// Create an event with no payload, timestamped now
    pub fn empty(severity: EventSeverity) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            origin: None,
            payload: None,
            cause: None,
        }
    }

    /// Set the emitting component name
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Attach the failure that triggered this event
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Override the emission timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Debug for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("timestamp", &self.timestamp)
            .field("severity", &self.severity)
            .field("origin", &self.origin)
            .field("payload", &self.payload.as_ref().map(|p| p.to_string()))
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;
