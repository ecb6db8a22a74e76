//! # Plugins
//!
//! What the host knows about each compiled plugin: its metadata (SDK,
//! exported function signatures, user types) and its module's export list.

pub mod host;
pub mod metadata;
pub mod module;
pub mod sdk;

pub use host::{LoadedPlugin, MemPluginHost, PluginHost};
pub use metadata::{FunctionExport, Parameter, PluginMetadata, SourceField, SourceTypeDefinition, TypeCatalog};
pub use module::{compile_module, ExportedFunction, PluginModule, StaticModule};
pub use sdk::{parse_name_and_version, Sdk};
