//! # Plugin Host
//!
//! Read-only view of the plugins currently loaded, in load order.

use std::sync::{Arc, PoisonError, RwLock};

use super::metadata::PluginMetadata;
use super::module::PluginModule;

/// A plugin as seen by registration
#[derive(Debug, Clone)]
pub struct LoadedPlugin {
    /// Plugin name, without version
    pub name: String,
    pub metadata: Arc<PluginMetadata>,
    pub module: Arc<dyn PluginModule>,
}

impl LoadedPlugin {
    /// Create a loaded plugin named after its metadata
    pub fn new(metadata: PluginMetadata, module: Arc<dyn PluginModule>) -> Self {
        Self {
            name: metadata.name().to_string(),
            metadata: Arc::new(metadata),
            module,
        }
    }
}

/// Source of the currently loaded plugins
pub trait PluginHost: Send + Sync {
    /// Loaded plugins, oldest first
    fn loaded_plugins(&self) -> Vec<LoadedPlugin>;
}

/// In-memory plugin host
#[derive(Debug, Default)]
pub struct MemPluginHost {
    plugins: RwLock<Vec<LoadedPlugin>>,
}

impl MemPluginHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a plugin, replacing any plugin of the same name
    ///
    /// A reloaded plugin becomes the most recent one.
    pub fn load(&self, plugin: LoadedPlugin) {
        let mut plugins = self.plugins.write().unwrap_or_else(PoisonError::into_inner);
        plugins.retain(|p| p.name != plugin.name);
        plugins.push(plugin);
    }

    /// Unload a plugin by name; returns false if it was not loaded
    pub fn unload(&self, name: &str) -> bool {
        let mut plugins = self.plugins.write().unwrap_or_else(PoisonError::into_inner);
        let before = plugins.len();
        plugins.retain(|p| p.name != name);
        plugins.len() != before
    }

    /// Names of loaded plugins, oldest first
    pub fn names(&self) -> Vec<String> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Number of loaded plugins
    pub fn len(&self) -> usize {
        self.plugins.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if no plugin is loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PluginHost for MemPluginHost {
    fn loaded_plugins(&self) -> Vec<LoadedPlugin> {
        self.plugins.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
