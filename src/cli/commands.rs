//! CLI command implementations
//!
//! Each command loads its inputs from files, does its work through the
//! library, and hands the result to the io module. Command functions return
//! their output so they can be tested without capturing stdout.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use wasmtime::Engine;

use crate::functions::{FunctionRegistry, MonitorConfig, RegistrationMonitor, RegistrationSignal, ResolverEntry};
use crate::manifest::{Manifest, ManifestStore};
use crate::observability::{init_logging, LogConfig};
use crate::plugins::{compile_module, LoadedPlugin, MemPluginHost, PluginMetadata, PluginModule, StaticModule};
use crate::schema::generate as generate_schema;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_diagnostic, write_json, write_text};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logging (optional, defaults to human-readable `info`)
    #[serde(default)]
    pub log: LogConfig,

    /// Registration monitor (optional)
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.monitor.trigger_capacity == 0 {
            return Err(CliError::config_error("monitor.trigger_capacity must be > 0"));
        }

        if self.log.filter.trim().is_empty() {
            return Err(CliError::config_error("log.filter must not be empty"));
        }

        Ok(())
    }
}

/// Entry point used by the binary
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.log.apply_env();

    if let Err(e) = init_logging(&config.log) {
        write_diagnostic(&e.to_string())?;
    }

    match cli.command {
        Command::Generate {
            metadata,
            manifest,
            strict,
        } => {
            let document = generate(&metadata, manifest.as_deref(), strict)?;
            write_text(&document)
        }
        Command::Resolvers { metadata, manifest } => {
            let resolvers = resolvers(&metadata, manifest.as_deref(), &config.monitor)?;
            write_json(&resolvers)
        }
        Command::Exports { wasm } => {
            let names = exports(&wasm)?;
            write_json(&names)
        }
    }
}

/// Generate the schema document for one plugin
///
/// Functions left out of the schema are reported on stderr. With `strict`,
/// any such function fails the command.
pub fn generate(metadata_path: &Path, manifest_path: Option<&Path>, strict: bool) -> CliResult<String> {
    let metadata = load_metadata(metadata_path)?;
    let manifest = load_manifest(manifest_path)?;

    let schema = generate_schema(&metadata, |name| manifest.is_excluded(name))?;

    for err in &schema.errors {
        write_diagnostic(&format!("{}: {}", err.code(), err))?;
    }

    if strict && !schema.is_complete() {
        return Err(CliError::schema_error(format!(
            "{} function(s) left out of the schema for plugin '{}'",
            schema.errors.len(),
            metadata.name()
        )));
    }

    Ok(schema.document)
}

/// Load plugins in order, run one registration pass and return the resolvers
pub fn resolvers(
    metadata_paths: &[PathBuf],
    manifest_path: Option<&Path>,
    monitor_config: &MonitorConfig,
) -> CliResult<BTreeMap<String, ResolverEntry>> {
    let host = Arc::new(MemPluginHost::new());
    for path in metadata_paths {
        let metadata = load_metadata(path)?;
        let module = StaticModule::from_metadata(&metadata);
        host.load(LoadedPlugin::new(metadata, Arc::new(module)));
    }

    let manifest = Arc::new(ManifestStore::new(load_manifest(manifest_path)?));
    let registry = Arc::new(FunctionRegistry::new());
    let signal = Arc::new(RegistrationSignal::new());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (monitor, trigger) = RegistrationMonitor::new(
            monitor_config,
            host,
            manifest,
            registry.clone(),
            signal.clone(),
            shutdown_rx,
        );
        let handle = monitor.spawn();

        if !trigger.request() {
            return Err(CliError::registration_error("Registration monitor exited early"));
        }
        signal.wait().await;

        let _ = shutdown_tx.send(());
        handle
            .await
            .map_err(|e| CliError::registration_error(format!("Registration monitor failed: {}", e)))
    })?;

    Ok(registry.snapshot().iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// List the canonical names of a module's exported functions
pub fn exports(wasm_path: &Path) -> CliResult<Vec<String>> {
    let bytes = fs::read(wasm_path)
        .map_err(|e| CliError::wasm_error(format!("Failed to read {}: {}", wasm_path.display(), e)))?;

    let engine = Engine::default();
    let module = compile_module(&engine, &bytes)
        .map_err(|e| CliError::wasm_error(format!("Failed to compile {}: {}", wasm_path.display(), e)))?;

    Ok(module
        .exported_functions()
        .iter()
        .filter_map(|f| f.canonical_name().map(str::to_string))
        .collect())
}

fn load_metadata(path: &Path) -> CliResult<PluginMetadata> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::metadata_error(format!("Failed to read {}: {}", path.display(), e)))?;

    PluginMetadata::from_json(&content)
        .map_err(|e| CliError::metadata_error(format!("Invalid metadata in {}: {}", path.display(), e)))
}

fn load_manifest(path: Option<&Path>) -> CliResult<Manifest> {
    match path {
        Some(path) => Ok(Manifest::load(path)?),
        None => Ok(Manifest::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn write_metadata(dir: &TempDir, name: &str, plugin: &str, functions: serde_json::Value) -> PathBuf {
        let metadata = json!({
            "plugin": plugin,
            "sdk": "functions-go@0.10.0",
            "functions": functions,
        });
        write_file(dir, name, &metadata.to_string())
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hostfn.json", "{}");

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.monitor.trigger_capacity, 16);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hostfn.json", r#"{"monitor": {"trigger_capacity": 0}}"#);

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_rejects_empty_filter() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hostfn.json", r#"{"log": {"json": true, "filter": " "}}"#);

        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("log.filter"));
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::load(Path::new("/nonexistent/hostfn.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_generate_command() {
        let dir = TempDir::new().unwrap();
        let metadata = write_metadata(
            &dir,
            "math.json",
            "math@1.0.0",
            json!([
                {"name": "add", "parameters": [{"name": "a", "type": "int32"}, {"name": "b", "type": "int32"}], "result": "int32"},
                {"name": "embed", "parameters": [{"name": "text", "type": "string"}], "result": "[]float64"}
            ]),
        );
        let manifest = write_file(
            &dir,
            "manifest.json",
            r#"{"collections": {"c": {"searchMethods": {"s": {"embedder": "embed"}}}}}"#,
        );

        let document = generate(&metadata, Some(&manifest), true).unwrap();
        assert!(document.contains("  add(a: Int!, b: Int!): Int!\n"));
        assert!(!document.contains("embed"));
    }

    #[test]
    fn test_generate_strict_fails_on_errors() {
        let dir = TempDir::new().unwrap();
        let metadata = write_metadata(
            &dir,
            "p.json",
            "p",
            json!([{"name": "listen", "parameters": [{"name": "c", "type": "chan int"}]}]),
        );

        assert!(generate(&metadata, None, false).is_ok());

        let err = generate(&metadata, None, true).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
    }

    #[test]
    fn test_generate_invalid_metadata() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.json", "{not json");

        let err = generate(&path, None, false).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::MetadataError);
    }

    #[test]
    fn test_resolvers_last_plugin_wins() {
        let dir = TempDir::new().unwrap();
        let first = write_metadata(
            &dir,
            "a.json",
            "a@1.0.0",
            json!([{"name": "SayHello", "result": "string"}, {"name": "onlyA", "result": "string"}]),
        );
        let second = write_metadata(&dir, "b.json", "b@1.0.0", json!([{"name": "sayHello", "result": "string"}]));

        let resolvers = resolvers(&[first, second], None, &MonitorConfig::default()).unwrap();

        assert_eq!(resolvers.keys().collect::<Vec<_>>(), vec!["onlyA", "sayHello"]);
        assert_eq!(resolvers["sayHello"].plugin, "b");
        assert_eq!(resolvers["onlyA"].plugin, "a");
    }

    #[test]
    fn test_exports_from_text_module() {
        let dir = TempDir::new().unwrap();
        let wat = write_file(
            &dir,
            "plugin.wat",
            r#"(module (func (export "sayHello")) (global (export "g") i32 (i32.const 0)) (func (export "add")))"#,
        );

        assert_eq!(exports(&wat).unwrap(), vec!["sayHello", "add"]);
    }

    #[test]
    fn test_exports_invalid_module() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.wasm", "not a module");

        let err = exports(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::WasmError);
    }
}
