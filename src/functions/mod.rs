//! # hostfn Function Registration
//!
//! Keeps the resolver → plugin function mapping in step with the loaded
//! plugins. A background monitor runs registration passes on request; each
//! pass reconciles the registry and raises a coalescing completion signal.

pub mod monitor;
pub mod registry;
pub mod signal;

pub use monitor::{schemas_by_plugin, MonitorConfig, RegistrationMonitor, RegistrationTrigger};
pub use registry::{FunctionRegistry, ReconcileOutcome, ResolverEntry, SchemasByPlugin};
pub use signal::RegistrationSignal;
