//! CLI module for hostfn
//!
//! Provides command-line interface for:
//! - generate: Print a plugin's schema document
//! - resolvers: Run one registration pass over a set of plugins
//! - exports: List a compiled module's exported functions

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exports, generate, resolvers, run, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_diagnostic, write_json, write_text};
