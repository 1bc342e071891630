//! # Kering - Asset Inspection Fact Server
//!
//! Library surface of THE BINARY: the axum HTTP API, the clap CLI, and the
//! TOML configuration layer over [`kering_core`].
//!
//! The binary in `main.rs` is a thin shell around these modules; integration
//! tests drive the router and the config loader through this crate root.

pub mod api;
pub mod cli;
pub mod config;
