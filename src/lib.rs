//! hostfn - GraphQL schemas and resolver registration for WebAssembly plugins
//!
//! Each loaded plugin ships metadata describing its exported functions and
//! the user types they use. The schema subsystem turns that metadata into a
//! GraphQL schema document; the functions subsystem keeps a resolver registry
//! in step with the set of loaded plugins.

pub mod cli;
pub mod functions;
pub mod languages;
pub mod manifest;
pub mod observability;
pub mod plugins;
pub mod schema;
