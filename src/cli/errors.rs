//! CLI-specific error types

use std::fmt;
use std::io;

use crate::manifest::ManifestError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Plugin metadata could not be read
    MetadataError,
    /// Manifest could not be read
    ManifestError,
    /// Schema generation failed or was incomplete
    SchemaError,
    /// Module could not be compiled
    WasmError,
    /// Background registration failed
    RegistrationError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "HOSTFN_CLI_CONFIG_ERROR",
            Self::IoError => "HOSTFN_CLI_IO_ERROR",
            Self::MetadataError => "HOSTFN_CLI_METADATA_ERROR",
            Self::ManifestError => "HOSTFN_CLI_MANIFEST_ERROR",
            Self::SchemaError => "HOSTFN_CLI_SCHEMA_ERROR",
            Self::WasmError => "HOSTFN_CLI_WASM_ERROR",
            Self::RegistrationError => "HOSTFN_CLI_REGISTRATION_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Metadata error
    pub fn metadata_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::MetadataError, msg)
    }

    /// Schema error
    pub fn schema_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SchemaError, msg)
    }

    /// Wasm error
    pub fn wasm_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::WasmError, msg)
    }

    /// Registration error
    pub fn registration_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RegistrationError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ManifestError> for CliError {
    fn from(e: ManifestError) -> Self {
        Self::new(CliErrorCode::ManifestError, e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::schema_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
