//! Schema generation errors
//!
//! Error codes:
//! - HOSTFN_INVALID_TYPE
//! - HOSTFN_UNSUPPORTED_TYPE
//! - HOSTFN_UNKNOWN_TYPE
//! - HOSTFN_UNSUPPORTED_MAP_KEY
//! - HOSTFN_NAME_COLLISION
//! - HOSTFN_INVALID_DEFAULT
//! - HOSTFN_DUPLICATE_RESOLVER
//! - HOSTFN_UNSUPPORTED_SDK
//!
//! Everything except an unsupported SDK is recovered per function: the
//! generator drops the offending function and keeps going.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Type string could not be parsed
    #[error("Invalid type '{ty}': {reason}")]
    InvalidType { ty: String, reason: String },

    /// Type string parsed, but has no schema equivalent
    #[error("Unsupported type '{0}'")]
    UnsupportedType(String),

    /// Named type missing from the plugin's type catalog
    #[error("Unknown type '{0}': not defined in the plugin's type catalog")]
    UnknownType(String),

    /// Map whose key does not translate to a scalar
    #[error("Unsupported map key in '{0}': map keys must be scalars")]
    UnsupportedMapKey(String),

    /// Two different structures derive the same schema name
    #[error("Type name collision on '{name}': {existing} conflicts with {incoming}")]
    NameCollision {
        name: String,
        existing: String,
        incoming: String,
    },

    /// Default value that cannot be rendered for its parameter
    #[error("Invalid default for parameter '{parameter}': {reason}")]
    InvalidDefault { parameter: String, reason: String },

    /// Two exports of one plugin map to the same resolver name
    #[error("Duplicate resolver '{resolver}' for function '{function}'")]
    DuplicateResolver { resolver: String, function: String },

    /// SDK identity with no type syntax
    #[error("Unsupported SDK '{0}'")]
    UnsupportedSdk(String),

    /// Error raised while translating a specific function
    #[error("Function '{function}': {source}")]
    Function {
        function: String,
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Create an invalid type error
    pub fn invalid_type(ty: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidType {
            ty: ty.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid default error
    pub fn invalid_default(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefault {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Attach the name of the function being translated
    pub fn in_function(function: impl Into<String>, error: SchemaError) -> Self {
        Self::Function {
            function: function.into(),
            source: Box::new(error),
        }
    }

    /// Name of the function the error belongs to, if any
    pub fn function_name(&self) -> Option<&str> {
        match self {
            SchemaError::Function { function, .. } => Some(function),
            SchemaError::DuplicateResolver { function, .. } => Some(function),
            _ => None,
        }
    }

    /// The underlying error, without function context
    pub fn root(&self) -> &SchemaError {
        match self {
            SchemaError::Function { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidType { .. } => "HOSTFN_INVALID_TYPE",
            SchemaError::UnsupportedType(_) => "HOSTFN_UNSUPPORTED_TYPE",
            SchemaError::UnknownType(_) => "HOSTFN_UNKNOWN_TYPE",
            SchemaError::UnsupportedMapKey(_) => "HOSTFN_UNSUPPORTED_MAP_KEY",
            SchemaError::NameCollision { .. } => "HOSTFN_NAME_COLLISION",
            SchemaError::InvalidDefault { .. } => "HOSTFN_INVALID_DEFAULT",
            SchemaError::DuplicateResolver { .. } => "HOSTFN_DUPLICATE_RESOLVER",
            SchemaError::UnsupportedSdk(_) => "HOSTFN_UNSUPPORTED_SDK",
            SchemaError::Function { source, .. } => source.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            SchemaError::UnknownType("x.Foo".into()).code(),
            "HOSTFN_UNKNOWN_TYPE"
        );
        assert_eq!(
            SchemaError::UnsupportedSdk("functions-rs".into()).code(),
            "HOSTFN_UNSUPPORTED_SDK"
        );
    }

    #[test]
    fn test_function_context() {
        let err = SchemaError::in_function("add", SchemaError::UnsupportedType("chan int".into()));

        assert_eq!(err.function_name(), Some("add"));
        assert_eq!(err.code(), "HOSTFN_UNSUPPORTED_TYPE");
        assert_eq!(err.root(), &SchemaError::UnsupportedType("chan int".into()));

        let display = err.to_string();
        assert!(display.contains("add"));
        assert!(display.contains("chan int"));
    }
}
