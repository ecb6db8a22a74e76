//! # Plugin Modules
//!
//! The only thing registration needs from a compiled module is the ordered
//! list of its exported functions. The first export name of each function is
//! its canonical name.

use std::fmt;

use wasmtime::{Engine, ExternType, Module};

use super::metadata::PluginMetadata;

/// A function exported by a compiled module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFunction {
    export_names: Vec<String>,
}

impl ExportedFunction {
    /// Create an exported function with one or more export names
    pub fn new<I, S>(export_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            export_names: export_names.into_iter().map(Into::into).collect(),
        }
    }

    /// All names the function is exported under
    pub fn export_names(&self) -> &[String] {
        &self.export_names
    }

    /// The canonical (first) export name
    pub fn canonical_name(&self) -> Option<&str> {
        self.export_names.first().map(String::as_str)
    }
}

/// Capability: a module exposing its exported functions in order
pub trait PluginModule: fmt::Debug + Send + Sync {
    fn exported_functions(&self) -> Vec<ExportedFunction>;
}

impl PluginModule for Module {
    fn exported_functions(&self) -> Vec<ExportedFunction> {
        self.exports()
            .filter(|export| matches!(export.ty(), ExternType::Func(_)))
            .map(|export| ExportedFunction::new([export.name()]))
            .collect()
    }
}

/// Compile a module from binary or text format
pub fn compile_module(engine: &Engine, bytes: impl AsRef<[u8]>) -> wasmtime::Result<Module> {
    Module::new(engine, bytes)
}

/// In-memory module with a fixed export list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticModule {
    functions: Vec<ExportedFunction>,
}

impl StaticModule {
    /// Create a module exporting each name as its own function
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            functions: names.into_iter().map(|n| ExportedFunction::new([n])).collect(),
        }
    }

    /// Create a module exporting every function declared in the metadata
    pub fn from_metadata(metadata: &PluginMetadata) -> Self {
        Self::from_names(metadata.functions.iter().map(|f| f.name.clone()))
    }
}

impl PluginModule for StaticModule {
    fn exported_functions(&self) -> Vec<ExportedFunction> {
        self.functions.clone()
    }
}
