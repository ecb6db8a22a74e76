//! CLI argument definitions using clap
//!
//! Commands:
//! - hostfn generate --metadata <path> [--manifest <path>] [--strict]
//! - hostfn resolvers --metadata <path>... [--manifest <path>]
//! - hostfn exports --wasm <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hostfn - GraphQL schemas and resolver registration for WebAssembly plugins
#[derive(Parser, Debug)]
#[command(name = "hostfn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the schema document generated for a plugin
    Generate {
        /// Path to plugin metadata JSON
        #[arg(long)]
        metadata: PathBuf,

        /// Path to application manifest JSON
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Fail if any function was left out of the schema
        #[arg(long)]
        strict: bool,
    },

    /// Load plugins in order, register their functions and print the resolvers
    Resolvers {
        /// Paths to plugin metadata JSON, in load order
        #[arg(long, required = true, num_args = 1..)]
        metadata: Vec<PathBuf>,

        /// Path to application manifest JSON
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// List the functions exported by a compiled module
    Exports {
        /// Path to a .wasm or .wat module
        #[arg(long)]
        wasm: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
