//! Configuration errors
//!
//! The only failures this crate surfaces. Everything that happens at
//! delivery time is absorbed inside the sink.

/// Errors from sink configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Minimum severity set after the sink instance was already created
    #[error("sink already initialized; set the minimum severity before the first call to sink()")]
    AlreadyInitialized,

    /// Severity name outside the dispatcher's scale
    #[error("invalid severity name: {name:?}")]
    InvalidSeverity { name: String },
}
