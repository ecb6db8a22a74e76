//! Schema generation subsystem for hostfn
//!
//! Translates plugin function signatures into one GraphQL schema document per
//! plugin.
//!
//! # Design Principles
//!
//! - Nullability is tracked per reference occurrence
//! - Type names are derived deterministically from structure or source name
//! - Errors are contained to the function that caused them
//! - Repeated generation over unchanged input is byte-identical

mod defaults;
mod errors;
mod generator;
mod pool;
mod translate;
mod types;

pub use defaults::render_default;
pub use errors::{SchemaError, SchemaResult};
pub use generator::{generate, resolver_name, FunctionSchema, GeneratedSchema, ParameterSchema, SCHEMA_BANNER};
pub use pool::TypePool;
pub use translate::Translator;
pub use types::{
    is_builtin_scalar, DefinitionKind, Field, TypeDefinition, TypeRef, TypeRefKind, BOOLEAN, FLOAT, INPUT_SUFFIX, INT,
    INT64, PAIR_SUFFIX, STRING, TIMESTAMP, UINT, UINT64, VOID,
};
