//! # Function Registry
//!
//! Resolver name → plugin and function schema. Readers get a consistent
//! snapshot; reconcile builds the next map on the side and swaps it in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use crate::plugins::LoadedPlugin;
use crate::schema::FunctionSchema;

/// Function schemas generated for each plugin, by plugin name
pub type SchemasByPlugin = HashMap<String, Vec<FunctionSchema>>;

/// A registered resolver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolverEntry {
    /// Plugin implementing the function
    pub plugin: String,
    pub schema: FunctionSchema,
}

impl ResolverEntry {
    /// Declared function name
    pub fn function_name(&self) -> &str {
        self.schema.function_name()
    }

    /// Public field name
    pub fn resolver(&self) -> &str {
        self.schema.resolver()
    }
}

/// What a reconcile pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Resolvers added or replaced, sorted
    pub registered: Vec<String>,

    /// Resolvers already registered identically
    pub unchanged: usize,

    /// Resolvers removed, sorted
    pub unregistered: Vec<String>,
}

impl ReconcileOutcome {
    /// Returns true if the registry changed
    pub fn changed(&self) -> bool {
        !self.registered.is_empty() || !self.unregistered.is_empty()
    }
}

/// Live registry of resolvers
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    /// Published map, replaced wholesale by reconcile
    entries: RwLock<Arc<HashMap<String, ResolverEntry>>>,

    /// Serializes reconcile passes
    writer: Mutex<()>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a resolver entry
    pub fn get(&self, resolver: &str) -> Option<ResolverEntry> {
        self.snapshot().get(resolver).cloned()
    }

    /// The currently published map
    pub fn snapshot(&self) -> Arc<HashMap<String, ResolverEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Registered resolver names, sorted
    pub fn resolvers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered resolvers
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bring the registry in line with the loaded plugins and their schemas
    ///
    /// Plugins are visited in load order; when two plugins provide the same
    /// resolver, the later one wins. Entries whose plugin is no longer loaded,
    /// or whose function is in none of that plugin's schemas, are removed.
    pub fn reconcile(&self, plugins: &[LoadedPlugin], schemas: &SchemasByPlugin) -> ReconcileOutcome {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();

        let desired = desired_entries(plugins, schemas);
        let mut next: HashMap<String, ResolverEntry> = (*current).clone();
        let mut outcome = ReconcileOutcome::default();

        for (resolver, entry) in desired {
            if next.get(&resolver) == Some(&entry) {
                outcome.unchanged += 1;
                continue;
            }

            info!(
                resolver = %resolver,
                function = %entry.function_name(),
                plugin = %entry.plugin,
                "Registered function."
            );
            next.insert(resolver.clone(), entry);
            outcome.registered.push(resolver);
        }

        next.retain(|resolver, entry| {
            let plugin_loaded = plugins.iter().any(|p| p.name == entry.plugin);
            let in_schema = schemas.get(&entry.plugin).is_some_and(|fns| {
                fns.iter()
                    .any(|f| names_match(f.function_name(), entry.function_name()))
            });

            if plugin_loaded && in_schema {
                return true;
            }

            info!(
                resolver = %resolver,
                function = %entry.function_name(),
                plugin = %entry.plugin,
                "Unregistered function."
            );
            outcome.unregistered.push(resolver.clone());
            false
        });

        outcome.registered.sort();
        outcome.unregistered.sort();

        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        outcome
    }
}

/// Case-insensitive name comparison, folding non-ASCII letters too
fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Entries every loaded plugin asks for, later plugins overriding earlier ones
fn desired_entries(plugins: &[LoadedPlugin], schemas: &SchemasByPlugin) -> HashMap<String, ResolverEntry> {
    let mut desired: HashMap<String, ResolverEntry> = HashMap::new();

    for plugin in plugins {
        let Some(fn_schemas) = schemas.get(&plugin.name) else {
            continue;
        };

        for export in plugin.module.exported_functions() {
            let Some(export_name) = export.canonical_name() else {
                continue;
            };

            for schema in fn_schemas {
                if !names_match(export_name, schema.function_name()) {
                    continue;
                }

                let entry = ResolverEntry {
                    plugin: plugin.name.clone(),
                    schema: schema.clone(),
                };
                if let Some(previous) = desired.insert(schema.resolver.clone(), entry) {
                    if previous.plugin != plugin.name {
                        warn!(
                            resolver = %schema.resolver,
                            plugin = %plugin.name,
                            replaced = %previous.plugin,
                            "Resolver provided by more than one plugin; the last loaded plugin wins."
                        );
                    }
                }
            }
        }
    }

    desired
}
