//! # Kering CLI Module
//!
//! This module implements the CLI interface for Kering.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show store statistics
//! - `query` - Report recorded inspections of one part
//! - `ingest` - Ingest inspection events from a JSON file
//! - `export` - Write the Turtle snapshot to a file
//! - `init` - Initialize a new store file

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use kering_core::KeringError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Kering - Asset Inspection Fact Server
///
/// An append-only fact store for storm-surge-barrier assets, their parts,
/// and NEN 2767 inspection results. Facts in, durable Turtle out, pattern
/// queries back.
#[derive(Parser, Debug)]
#[command(name = "kering")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the durable store file (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub store: Option<PathBuf>,

    /// Path to a TOML config file (default: kering.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show store statistics
    Status,

    /// Report recorded inspections of one part
    Query {
        /// Asset local name
        #[arg(short, long, default_value = kering_core::primitives::DEFAULT_ASSET)]
        asset: String,

        /// Part index within the asset
        #[arg(short, long)]
        part: u64,
    },

    /// Ingest inspection events from a JSON file
    Ingest {
        /// Path to the input file (JSON array of events)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Write the Turtle snapshot to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Initialize a new store file with a seeded asset
    Init {
        /// Asset local name to seed
        #[arg(long, default_value = kering_core::primitives::DEFAULT_ASSET)]
        asset: String,

        /// Number of parts to seed
        #[arg(long, default_value = "1")]
        parts: u64,

        /// Force initialization even if the store file exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), KeringError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    let store_path = cli.store.unwrap_or_else(|| config.store.path.clone());
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            cmd_server(&store_path, &host, port).await
        }
        Some(Commands::Status) => cmd_status(&store_path, json_mode),
        Some(Commands::Query { asset, part }) => cmd_query(&store_path, json_mode, &asset, part),
        Some(Commands::Ingest { file }) => cmd_ingest(&store_path, json_mode, &file),
        Some(Commands::Export { output }) => cmd_export(&store_path, &output),
        Some(Commands::Init {
            asset,
            parts,
            force,
        }) => cmd_init(&store_path, &asset, parts, force),
        None => {
            // No subcommand - show status by default
            cmd_status(&store_path, json_mode)
        }
    }
}
