//! Field normalization
//!
//! Converts raw event fields into their persisted representation. All
//! functions here are pure and total: absent data maps to `None`, and a
//! severity outside the store-side scale maps to `None` rather than
//! failing. The sink relies on that totality to build records without
//! per-field guards.

use std::error::Error;
use std::fmt;

use crate::config::MAX_ORIGIN_CHARS;
use crate::event::EventSeverity;
use crate::record::RecordSeverity;

/// Map a dispatcher severity onto the store-side scale
///
/// Mapping is by name and deliberately lenient: if the two scales ever
/// diverge, an unmatched severity persists as `None` instead of dropping
/// the message. Tightening this would change which messages get stored.
pub fn severity(severity: EventSeverity) -> Option<RecordSeverity> {
    RecordSeverity::from_name(severity.as_str())
}

/// Normalize an origin name, truncating to [`MAX_ORIGIN_CHARS`]
///
/// Truncation counts characters, not bytes, so a multi-byte name is
/// never cut inside a code point.
pub fn origin(origin: Option<&str>) -> Option<String> {
    let name = origin?;
    match name.char_indices().nth(MAX_ORIGIN_CHARS) {
        Some((idx, _)) => Some(name[..idx].to_string()),
        None => Some(name.to_string()),
    }
}

/// Normalize a message payload to its textual representation
pub fn message(payload: Option<&dyn fmt::Display>) -> Option<String> {
    payload.map(|payload| payload.to_string())
}

/// Render a failure and its full source chain as a single trace string
///
/// Equivalent to a standard trace dump: the top-level error first, each
/// underlying source on its own `caused by:` line.
pub fn cause(cause: Option<&dyn Error>) -> Option<String> {
    let error = cause?;
    let mut trace = error.to_string();

    let mut source = error.source();
    while let Some(current) = source {
        trace.push_str("\ncaused by: ");
        trace.push_str(&current.to_string());
        source = current.source();
    }

    Some(trace)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;
