//! Observability subsystem for hostfn
//!
//! Structured logging through `tracing`. Events carry key/value fields
//! (`resolver`, `function`, `plugin`) rather than formatted strings.
//!
//! # Usage
//!
//! ```ignore
//! use hostfn::observability::{init_logging, LogConfig};
//!
//! let mut config = LogConfig::default();
//! config.apply_env();
//! init_logging(&config)?;
//!
//! tracing::info!(resolver = "sayHello", plugin = "greeter", "Registered function.");
//! ```

mod logger;

pub use logger::{
    env_flag_enabled, init_logging, parse_bool, LogConfig, DEBUG_ENV, JSON_LOGS_ENV, TRACE_ENV,
};

use thiserror::Error;

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Observability errors
///
/// Never fatal to registration; the binary reports them and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

impl ObservabilityError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ObservabilityError::InvalidFilter { .. } => "HOSTFN_LOG_INVALID_FILTER",
            ObservabilityError::Init(_) => "HOSTFN_LOG_INIT_FAILED",
        }
    }
}
