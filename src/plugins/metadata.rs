//! # Plugin Metadata
//!
//! Function exports and type catalog extracted from a compiled plugin. The
//! JSON form is what plugin builds embed and what the CLI reads:
//!
//! ```json
//! {
//!   "plugin": "people@1.0.0",
//!   "sdk": "functions-go@0.10.0",
//!   "functions": [
//!     { "name": "getPerson", "parameters": [], "result": "testdata.Person" }
//!   ],
//!   "types": {
//!     "testdata.Person": { "fields": [{ "name": "name", "type": "string" }] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::sdk::{parse_name_and_version, Sdk};
use crate::schema::SchemaResult;

/// A declared function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Source-language type string
    #[serde(rename = "type")]
    pub type_name: String,

    /// Default value; `Some(Value::Null)` is an explicit null default
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub default: Option<Value>,
}

// A present `null` must stay distinguishable from an absent default.
fn deserialize_present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A function exported by a plugin, as declared in its source language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExport {
    /// Function name as declared
    pub name: String,

    /// Parameters in declared order
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Result type string, if the function returns anything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl FunctionExport {
    /// Create a function with no parameters and no result
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            result: None,
        }
    }

    /// Append a parameter without a default
    pub fn with_parameter(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> &mut Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_name: type_name.into(),
            default: None,
        });
        self
    }

    /// Append a parameter with a default value
    pub fn with_default_parameter(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: impl Into<Value>,
    ) -> &mut Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_name: type_name.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Set the result type
    pub fn with_result(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.result = Some(type_name.into());
        self
    }
}

/// A field of a catalog type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Structural definition of a user type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTypeDefinition {
    /// Fields in declared order; empty for opaque types
    #[serde(default)]
    pub fields: Vec<SourceField>,
}

impl SourceTypeDefinition {
    /// Append a field
    pub fn with_field(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> &mut Self {
        self.fields.push(SourceField {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }
}

/// User types of a plugin, keyed by source type name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCatalog {
    types: BTreeMap<String, SourceTypeDefinition>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or reset) a type and return it for field declarations
    pub fn add_type(&mut self, name: impl Into<String>) -> &mut SourceTypeDefinition {
        let def = self.types.entry(name.into()).or_default();
        def.fields.clear();
        def
    }

    /// Get a type by its exact source name
    pub fn get(&self, name: &str) -> Option<&SourceTypeDefinition> {
        self.types.get(name)
    }

    /// Get a type together with its stored name
    pub fn get_entry(&self, name: &str) -> Option<(&str, &SourceTypeDefinition)> {
        self.types.get_key_value(name).map(|(k, v)| (k.as_str(), v))
    }

    /// All types, in source name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceTypeDefinition)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Everything the schema generator needs to know about one plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin identity as `name@version`
    pub plugin: String,

    /// SDK identity as `sdk@version`
    pub sdk: String,

    /// Exported functions in declared order
    #[serde(default)]
    pub functions: Vec<FunctionExport>,

    /// User type definitions
    #[serde(default)]
    pub types: TypeCatalog,
}

impl PluginMetadata {
    /// Create metadata for a plugin built with the given SDK
    pub fn new(plugin: impl Into<String>, sdk: Sdk) -> Self {
        Self {
            plugin: plugin.into(),
            sdk: sdk.id().to_string(),
            functions: Vec::new(),
            types: TypeCatalog::new(),
        }
    }

    /// Parse metadata from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Plugin name without version
    pub fn name(&self) -> &str {
        parse_name_and_version(&self.plugin).0
    }

    /// Plugin version, if declared
    pub fn version(&self) -> Option<&str> {
        parse_name_and_version(&self.plugin).1
    }

    /// The SDK the plugin was built with
    pub fn sdk(&self) -> SchemaResult<Sdk> {
        Sdk::parse(&self.sdk)
    }

    /// Add (or replace) an exported function and return it for declarations
    pub fn add_function(&mut self, name: impl Into<String>) -> &mut FunctionExport {
        let name = name.into();
        let idx = match self.functions.iter().position(|f| f.name == name) {
            Some(idx) => {
                self.functions[idx] = FunctionExport::new(name);
                idx
            }
            None => {
                self.functions.push(FunctionExport::new(name));
                self.functions.len() - 1
            }
        };
        &mut self.functions[idx]
    }

    /// Get an exported function by declared name
    pub fn function(&self, name: &str) -> Option<&FunctionExport> {
        self.functions.iter().find(|f| f.name == name)
    }
}
