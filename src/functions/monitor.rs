//! # Registration Monitor
//!
//! Background worker that re-registers functions whenever plugins change.
//!
//! Triggers arrive on a bounded channel. A full channel means a registration
//! is already queued, so the request is coalesced. Passes run one at a time
//! on the worker; each one generates schemas for every loaded plugin,
//! reconciles the registry and raises the completion signal.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::registry::{FunctionRegistry, ReconcileOutcome, SchemasByPlugin};
use super::signal::RegistrationSignal;
use crate::manifest::ManifestStore;
use crate::plugins::{LoadedPlugin, PluginHost};
use crate::schema::generate;

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Registration requests that may queue before coalescing
    #[serde(default = "default_trigger_capacity")]
    pub trigger_capacity: usize,
}

fn default_trigger_capacity() -> usize {
    16
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            trigger_capacity: default_trigger_capacity(),
        }
    }
}

/// Handle for requesting a registration pass
#[derive(Debug, Clone)]
pub struct RegistrationTrigger {
    tx: mpsc::Sender<()>,
}

impl RegistrationTrigger {
    /// Request a pass without blocking
    ///
    /// Returns true if a pass is queued (either by this call or an earlier
    /// one), false if the monitor is gone.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!("Registration already pending");
                true
            }
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }
}

/// Background registration worker
pub struct RegistrationMonitor {
    host: Arc<dyn PluginHost>,
    manifest: Arc<ManifestStore>,
    registry: Arc<FunctionRegistry>,
    signal: Arc<RegistrationSignal>,
    requests: mpsc::Receiver<()>,
    shutdown: broadcast::Receiver<()>,
}

impl RegistrationMonitor {
    /// Create a monitor and the trigger that drives it
    ///
    /// A zero capacity is treated as one.
    pub fn new(
        config: &MonitorConfig,
        host: Arc<dyn PluginHost>,
        manifest: Arc<ManifestStore>,
        registry: Arc<FunctionRegistry>,
        signal: Arc<RegistrationSignal>,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, RegistrationTrigger) {
        let (tx, requests) = mpsc::channel(config.trigger_capacity.max(1));
        let monitor = Self {
            host,
            manifest,
            registry,
            signal,
            requests,
            shutdown,
        };
        (monitor, RegistrationTrigger { tx })
    }

    /// Run the monitor on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Consume triggers until shutdown or until every trigger is dropped
    pub async fn run(mut self) {
        debug!("Registration monitor started");

        loop {
            tokio::select! {
                request = self.requests.recv() => {
                    match request {
                        Some(()) => {
                            self.register_functions();
                        }
                        None => {
                            debug!("All registration triggers dropped");
                            break;
                        }
                    }
                }

                _ = self.shutdown.recv() => {
                    debug!("Shutdown signal received");
                    break;
                }
            }
        }

        debug!("Registration monitor stopped");
    }

    /// Run one registration pass now
    pub fn register_functions(&self) -> ReconcileOutcome {
        info!("Registering functions.");

        let plugins = self.host.loaded_plugins();
        let excluded = self.manifest.get().embedder_functions();
        let schemas = schemas_by_plugin(&plugins, |name| excluded.contains(name));
        let outcome = self.registry.reconcile(&plugins, &schemas);

        self.signal.notify();
        outcome
    }
}

/// Generate function schemas for every plugin
///
/// Per-function errors are logged and the plugin is registered with whatever
/// translated. A plugin whose schema cannot be generated at all gets no entry.
pub fn schemas_by_plugin(plugins: &[LoadedPlugin], excluded: impl Fn(&str) -> bool) -> SchemasByPlugin {
    let mut schemas = HashMap::with_capacity(plugins.len());

    for plugin in plugins {
        match generate(&plugin.metadata, &excluded) {
            Ok(generated) => {
                for err in &generated.errors {
                    warn!(
                        plugin = %plugin.name,
                        function = err.function_name().unwrap_or_default(),
                        code = err.code(),
                        error = %err,
                        "Function left out of the schema."
                    );
                }
                schemas.insert(plugin.name.clone(), generated.functions);
            }
            Err(err) => {
                error!(
                    plugin = %plugin.name,
                    code = err.code(),
                    error = %err,
                    "Failed to generate schema for plugin."
                );
            }
        }
    }

    schemas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::plugins::{MemPluginHost, PluginMetadata, Sdk, StaticModule};

    fn load(host: &MemPluginHost, name: &str, functions: &[&str]) {
        let mut md = PluginMetadata::new(name, Sdk::Go);
        for f in functions {
            md.add_function(*f).with_result("string");
        }
        let module = StaticModule::from_metadata(&md);
        host.load(LoadedPlugin::new(md, Arc::new(module)));
    }

    fn monitor(host: Arc<MemPluginHost>) -> (RegistrationMonitor, RegistrationTrigger, broadcast::Sender<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (monitor, trigger) = RegistrationMonitor::new(
            &MonitorConfig { trigger_capacity: 1 },
            host,
            Arc::new(ManifestStore::default()),
            Arc::new(FunctionRegistry::new()),
            Arc::new(RegistrationSignal::new()),
            shutdown_rx,
        );
        (monitor, trigger, shutdown_tx)
    }

    #[test]
    fn test_default_config() {
        assert_eq!(MonitorConfig::default().trigger_capacity, 16);
        let config: MonitorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_requests_coalesce_when_full() {
        let (monitor, trigger, _shutdown) = monitor(Arc::new(MemPluginHost::new()));

        assert!(trigger.request());
        assert!(trigger.request());

        drop(monitor);
        assert!(!trigger.request());
    }

    #[test]
    fn test_register_functions_uses_manifest() {
        let host = Arc::new(MemPluginHost::new());
        load(&host, "p", &["embed", "hello"]);
        let (monitor, _trigger, _shutdown) = monitor(host);

        monitor
            .manifest
            .set(Manifest::from_json(r#"{"collections":{"c":{"searchMethods":{"s":{"embedder":"embed"}}}}}"#).unwrap());
        let outcome = monitor.register_functions();

        assert_eq!(outcome.registered, vec!["hello"]);
        assert!(monitor.signal.is_pending());
    }

    #[test]
    fn test_schemas_by_plugin_skips_unsupported_sdk() {
        let mut md = PluginMetadata::new("broken", Sdk::Go);
        md.sdk = "functions-zig".into();
        md.add_function("f");
        let plugins = vec![LoadedPlugin::new(md, Arc::new(StaticModule::default()))];

        let schemas = schemas_by_plugin(&plugins, |_| false);
        assert!(schemas.is_empty());
    }
}
