//! # Configuration
//!
//! Optional TOML configuration for the Kering binary.
//!
//! Resolution order, strongest first:
//! 1. CLI flags (`--store`, `server --host/--port`)
//! 2. The config file (`--config PATH`, or `kering.toml` if present)
//! 3. Compiled defaults
//!
//! An explicitly passed config file must exist and parse; the implicit
//! `kering.toml` is skipped silently when absent.

use kering_core::KeringError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no `--config` flag
/// is given.
pub const DEFAULT_CONFIG_FILE: &str = "kering.toml";

/// Default path of the durable store file.
pub const DEFAULT_STORE_FILE: &str = "knowledge_graph.ttl";

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the durable Turtle file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Host the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl AppConfig {
    /// Load configuration from an explicit file path.
    ///
    /// The file must exist and parse; both failures abort startup rather
    /// than silently running on defaults the operator did not choose.
    pub fn load(path: &Path) -> Result<Self, KeringError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            KeringError::Io(format!("read config {}: {e}", path.display()))
        })?;
        Self::parse(&text, path)
    }

    /// Load `kering.toml` from the working directory if it exists,
    /// otherwise fall back to compiled defaults.
    pub fn load_default() -> Result<Self, KeringError> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn parse(text: &str, path: &Path) -> Result<Self, KeringError> {
        toml::from_str(text).map_err(|e| {
            KeringError::Io(format!("parse config {}: {e}", path.display()))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
