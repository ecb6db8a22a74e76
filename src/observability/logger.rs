//! Structured logging setup
//!
//! Library code logs through `tracing` macros with key/value fields. The
//! binary installs a `tracing-subscriber` formatter once at startup, writing
//! to stderr so command output on stdout stays clean.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::{ObservabilityError, ObservabilityResult};

/// Emit JSON log lines instead of human-readable ones
pub const JSON_LOGS_ENV: &str = "HOSTFN_JSON_LOGS";
/// Raise the log level to debug
pub const DEBUG_ENV: &str = "HOSTFN_DEBUG";
/// Raise the log level to trace
pub const TRACE_ENV: &str = "HOSTFN_TRACE";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// JSON output
    #[serde(default)]
    pub json: bool,

    /// `EnvFilter` directives, e.g. `info` or `hostfn=debug,warn`
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

impl LogConfig {
    /// Apply `HOSTFN_JSON_LOGS`, `HOSTFN_DEBUG` and `HOSTFN_TRACE`
    pub fn apply_env(&mut self) {
        let json = std::env::var(JSON_LOGS_ENV).ok().and_then(|v| parse_bool(&v));
        self.apply_flags(json, env_flag_enabled(DEBUG_ENV), env_flag_enabled(TRACE_ENV));
    }

    /// Apply explicit overrides; debug and trace only ever raise the level
    pub fn apply_flags(&mut self, json: Option<bool>, debug: bool, trace: bool) {
        if let Some(json) = json {
            self.json = json;
        }
        if trace {
            self.filter = "trace".to_string();
        } else if debug && self.filter != "trace" {
            self.filter = "debug".to_string();
        }
    }

    /// Build the filter
    pub fn env_filter(&self) -> ObservabilityResult<EnvFilter> {
        EnvFilter::try_new(&self.filter).map_err(|e| ObservabilityError::InvalidFilter {
            filter: self.filter.clone(),
            reason: e.to_string(),
        })
    }
}

/// Parse a boolean flag: `1`, `t`, `true` or `0`, `f`, `false`, any case
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("t") || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("f") || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Returns true if the environment variable holds a true boolean
pub fn env_flag_enabled(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false)
}

/// Install the global subscriber
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> ObservabilityResult<()> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ObservabilityError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        for v in ["1", "t", "T", "true", "TRUE", "True", " true "] {
            assert_eq!(parse_bool(v), Some(true), "{}", v);
        }
        for v in ["0", "f", "F", "false", "FALSE"] {
            assert_eq!(parse_bool(v), Some(false), "{}", v);
        }
        for v in ["", "yes", "2", "on"] {
            assert_eq!(parse_bool(v), None, "{}", v);
        }
    }

    #[test]
    fn test_unset_flag_is_false() {
        assert!(!env_flag_enabled("HOSTFN_TEST_FLAG_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_flags_raise_level() {
        let mut config = LogConfig::default();
        config.apply_flags(None, true, false);
        assert_eq!(config.filter, "debug");
        assert!(!config.json);

        config.apply_flags(Some(true), false, true);
        assert_eq!(config.filter, "trace");
        assert!(config.json);

        config.apply_flags(None, true, false);
        assert_eq!(config.filter, "trace");
    }

    #[test]
    fn test_env_filter_validation() {
        assert!(LogConfig::default().env_filter().is_ok());

        let bad = LogConfig {
            json: false,
            filter: "hostfn=loud".to_string(),
        };
        assert!(matches!(bad.env_filter(), Err(ObservabilityError::InvalidFilter { .. })));
    }

    #[test]
    fn test_config_defaults() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());
    }
}
