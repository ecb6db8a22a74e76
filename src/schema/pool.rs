//! Type definition pool
//!
//! Collects the definitions referenced during one generation pass. Names are
//! unique; a second registration under an existing name is accepted only when
//! the structure matches, otherwise it is a name collision.

use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{DefinitionKind, Field, TypeDefinition};

/// Definitions keyed by schema name, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePool {
    defs: BTreeMap<String, TypeDefinition>,
}

impl TypePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a definition by name
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.defs.get(name)
    }

    /// Check if a name is taken
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions, in name order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.defs.values()
    }

    /// Custom scalars, in name order
    pub fn scalars(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.iter().filter(|d| d.kind == DefinitionKind::Scalar)
    }

    /// Input objects and pairs, in name order
    pub fn inputs(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.iter().filter(|d| d.kind != DefinitionKind::Scalar && d.input)
    }

    /// Output objects and pairs, in name order
    pub fn outputs(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.iter().filter(|d| d.kind != DefinitionKind::Scalar && !d.input)
    }

    /// Register a custom scalar once
    pub fn add_scalar(&mut self, name: &str) -> SchemaResult<()> {
        self.register(TypeDefinition::scalar(name))
    }

    /// Register a scalar or pair definition, deduplicating by structure
    pub fn register(&mut self, def: TypeDefinition) -> SchemaResult<()> {
        match self.defs.get(&def.name) {
            Some(existing) if existing.kind == def.kind && existing.same_structure(&def) => Ok(()),
            Some(existing) => Err(SchemaError::NameCollision {
                name: def.name.clone(),
                existing: existing.describe(),
                incoming: def.describe(),
            }),
            None => {
                self.defs.insert(def.name.clone(), def);
                Ok(())
            }
        }
    }

    /// Reserve an object name for a catalog type
    ///
    /// Returns `true` when the object is already present (possibly still
    /// being filled in by an enclosing recursive call), `false` when a fresh
    /// placeholder was inserted and the caller must complete it.
    pub(crate) fn reserve_object(&mut self, name: &str, source: &str, input: bool) -> SchemaResult<bool> {
        let incoming = TypeDefinition::object(name, source, input);

        match self.defs.get(name) {
            Some(existing)
                if existing.kind == DefinitionKind::Object
                    && existing.input == input
                    && existing.source.as_deref() == Some(source) =>
            {
                Ok(true)
            }
            Some(existing) => Err(SchemaError::NameCollision {
                name: name.to_string(),
                existing: existing.describe(),
                incoming: incoming.describe(),
            }),
            None => {
                self.defs.insert(name.to_string(), incoming);
                Ok(false)
            }
        }
    }

    /// Fill in the fields of a reserved object
    pub(crate) fn complete_object(&mut self, name: &str, fields: Vec<Field>) {
        if let Some(def) = self.defs.get_mut(name) {
            def.fields = fields;
        }
    }
}
