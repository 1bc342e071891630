//! # Kering - Asset Inspection Fact Server
//!
//! The main binary for the Kering fact store.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for store operations
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                apps/kering (THE BINARY)           │
//! │                                                   │
//! │     ┌─────────────┐         ┌─────────────┐       │
//! │     │   CLI       │         │   HTTP API  │       │
//! │     │  (clap)     │         │   (axum)    │       │
//! │     └──────┬──────┘         └──────┬──────┘       │
//! │            │                       │              │
//! │            └───────────┬───────────┘              │
//! │                        ▼                          │
//! │                ┌───────────────┐                  │
//! │                │  kering-core  │                  │
//! │                │  (THE LOGIC)  │                  │
//! │                └───────────────┘                  │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! kering server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! kering status
//! kering ingest -f inspections.json
//! kering query --asset oosterscheldekering --part 0
//! ```

use clap::Parser;
use kering::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments first; --verbose feeds the default log filter.
    let cli = cli::Cli::parse();

    // Initialize tracing — KERING_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("KERING_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "kering=debug,tower_http=debug"
    } else {
        "kering=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Kering startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗  ██╗███████╗██████╗ ██╗███╗   ██╗ ██████╗
  ██║ ██╔╝██╔════╝██╔══██╗██║████╗  ██║██╔════╝
  █████╔╝ █████╗  ██████╔╝██║██╔██╗ ██║██║  ███╗
  ██╔═██╗ ██╔══╝  ██╔══██╗██║██║╚██╗██║██║   ██║
  ██║  ██╗███████╗██║  ██║██║██║ ╚████║╚██████╔╝
  ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝╚═╝╚═╝  ╚═══╝ ╚═════╝

  Asset Inspection Fact Server v{}

  Append-only • Durable • Queryable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
