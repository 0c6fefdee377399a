//! Sink configuration
//!
//! Defaults and limits shared by the pool, the normalizer and the sink.

use crate::event::EventSeverity;

// =============================================================================
// Constants
// =============================================================================

/// Default minimum severity when never configured
pub const DEFAULT_MIN_SEVERITY: EventSeverity = EventSeverity::Info;

/// Unit-of-work acquisitions before the pool replaces its handle
///
/// A reused handle accumulates a reference to every record created under
/// it; rotation bounds peak retention under sustained load.
pub const DEFAULT_ROTATION_THRESHOLD: u32 = 500;

/// Maximum persisted origin length, in characters
pub const MAX_ORIGIN_CHARS: usize = 128;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a [`StoreSink`](crate::StoreSink)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Only events of this severity or higher are persisted
    /// (`EventSeverity::None` disables all persistence)
    pub min_severity: EventSeverity,

    /// Unit-of-work acquisitions before handle rotation
    pub rotation_threshold: u32,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            min_severity: DEFAULT_MIN_SEVERITY,
            rotation_threshold: DEFAULT_ROTATION_THRESHOLD,
        }
    }
}

impl SinkConfig {
    /// Set the minimum severity
    pub fn with_min_severity(mut self, min_severity: EventSeverity) -> Self {
        self.min_severity = min_severity;
        self
    }

    /// Set the rotation threshold
    pub fn with_rotation_threshold(mut self, threshold: u32) -> Self {
        self.rotation_threshold = threshold;
        self
    }
}
