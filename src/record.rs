//! Persisted log records
//!
//! [`PersistedRecord`] is the shape handed to the backing store, built
//! from a [`LogEvent`] by the normalization functions. The store-side
//! severity scale is defined independently of the dispatcher's and the
//! two are bridged by name, so a severity with no store-side member
//! persists as `None` rather than failing.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::event::LogEvent;
use crate::normalize;

/// Severity scale of persisted records
///
/// Deliberately has no `None` member: `None` is a gating value on the
/// dispatcher side, not a severity a message can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordSeverity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl RecordSeverity {
    /// All members, in ascending order
    pub const ALL: [RecordSeverity; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
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
        }
    }

    /// Parse from a severity name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for RecordSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log record in its persisted shape
///
/// Owned transiently by a unit of work until committed; discarded via
/// rollback when the commit fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecord {
    /// When the message was emitted
    pub timestamp: DateTime<Utc>,

    /// Mapped severity; `None` when the event severity has no
    /// store-side member
    pub severity: Option<RecordSeverity>,

    /// Emitting component name, truncated to 128 characters
    pub origin: Option<String>,

    /// Textual representation of the event payload
    pub message: Option<String>,

    /// Rendered failure chain, if the event carried a cause
    pub stack_trace: Option<String>,

    /// Whether a stack trace is present
    pub has_stack_trace: bool,
}

impl PersistedRecord {
    /// Build a record from an event, normalizing every field
    ///
    /// Each field is normalized independently; all normalization
    /// functions are total, so this never fails on malformed or absent
    /// data.
    pub fn from_event(event: &LogEvent) -> Self {
        let stack_trace =
            normalize::cause(event.cause.as_deref().map(|c| c as &dyn std::error::Error));
        let has_stack_trace = stack_trace.is_some();

        Self {
            timestamp: event.timestamp,
            severity: normalize::severity(event.severity),
            origin: normalize::origin(event.origin.as_deref()),
            message: normalize::message(event.payload.as_deref().map(|p| p as &dyn fmt::Display)),
            stack_trace,
            has_stack_trace,
        }
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
