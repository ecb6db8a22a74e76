//! # Application Manifest
//!
//! Only the parts of the manifest that affect which functions are exposed.
//! Functions named as the `embedder` of a collection search method are used
//! internally for vector generation and stay out of the public schema.
//!
//! ```json
//! {
//!   "collections": {
//!     "products": {
//!       "searchMethods": { "byName": { "embedder": "embedName" } }
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ManifestError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ManifestError::Io { .. } => "HOSTFN_MANIFEST_IO",
            ManifestError::Parse(_) => "HOSTFN_MANIFEST_INVALID",
        }
    }
}

/// Search method of a collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMethodInfo {
    /// Function that produces embeddings for this method
    #[serde(default)]
    pub embedder: String,
}

/// A collection declared in the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    #[serde(default)]
    pub search_methods: BTreeMap<String, SearchMethodInfo>,
}

/// Application manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionInfo>,
}

impl Manifest {
    /// Parse a manifest from JSON
    pub fn from_json(json: &str) -> ManifestResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a manifest file
    pub fn load(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Names of all functions used as embedders
    pub fn embedder_functions(&self) -> BTreeSet<String> {
        self.collections
            .values()
            .flat_map(|c| c.search_methods.values())
            .filter(|m| !m.embedder.is_empty())
            .map(|m| m.embedder.clone())
            .collect()
    }

    /// Returns true if the named function must stay out of the public schema
    pub fn is_excluded(&self, function: &str) -> bool {
        self.collections
            .values()
            .flat_map(|c| c.search_methods.values())
            .any(|m| !m.embedder.is_empty() && m.embedder == function)
    }
}

/// Shared, replaceable manifest
#[derive(Debug, Default)]
pub struct ManifestStore {
    current: RwLock<Arc<Manifest>>,
}

impl ManifestStore {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            current: RwLock::new(Arc::new(manifest)),
        }
    }

    /// Current manifest
    pub fn get(&self) -> Arc<Manifest> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the manifest; takes effect on the next registration
    pub fn set(&self, manifest: Manifest) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(manifest);
    }
}
