//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::api::{IngestItem, IngestItemResult};
use kering_core::{FactStore, KeringError, primitives::MAX_EVENTS_PER_REQUEST};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for event ingestion (16 MB).
///
/// An event file near this limit already holds far more events than
/// `MAX_EVENTS_PER_REQUEST` allows.
const MAX_INGEST_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), KeringError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| KeringError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(KeringError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and requires a
/// regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, KeringError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| KeringError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(KeringError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output file path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, KeringError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        KeringError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(KeringError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| KeringError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(store_path: &Path, host: &str, port: u16) -> Result<(), KeringError> {
    let store = FactStore::open(store_path)?;

    println!("Kering Asset Inspection Fact Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:  {}", host);
    println!("  Port:  {}", port);
    println!("  Store: {:?}", store_path);
    println!();
    println!("Endpoints:");
    println!("  POST /inspections                     - Ingest inspection events");
    println!("  POST /reports                         - Record an inspection from a report upload");
    println!("  GET  /status/{{asset_id}}/{{part_index}} - Inspections of one part");
    println!("  GET  /graph                           - Turtle snapshot");
    println!("  GET  /stats                           - Store statistics");
    println!("  GET  /health                          - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, store).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show store statistics.
pub fn cmd_status(store_path: &Path, json_mode: bool) -> Result<(), KeringError> {
    let store = FactStore::open(store_path)?;
    let stats = store.stats();

    if json_mode {
        let output = serde_json::json!({
            "store": store_path.to_string_lossy(),
            "statements": stats.statements,
            "parts": stats.parts,
            "inspections": stats.inspections,
            "next_inspection_index": store.next_inspection_index()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Kering Store Status");
    println!("===================");
    println!("Store: {:?}", store_path);
    println!();
    println!("Statements:  {}", stats.statements);
    println!("Parts:       {}", stats.parts);
    println!("Inspections: {}", stats.inspections);

    Ok(())
}

// =============================================================================
// QUERY COMMAND
// =============================================================================

/// Report recorded inspections of one part.
pub fn cmd_query(
    store_path: &Path,
    json_mode: bool,
    asset: &str,
    part: u64,
) -> Result<(), KeringError> {
    let store = FactStore::open(store_path)?;
    let pairs = store.part_status(asset, part)?;

    if json_mode {
        let inspections: Vec<_> = pairs
            .iter()
            .map(|(condition, date)| {
                serde_json::json!({ "condition": condition, "date": date })
            })
            .collect();
        let output = serde_json::json!({
            "asset": asset,
            "part_index": part,
            "inspections": inspections
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Inspections of {}_part{}:", asset, part);
    if pairs.is_empty() {
        println!("  (none recorded)");
    } else {
        for (condition, date) in &pairs {
            println!("  {} - {}", date, condition);
        }
    }

    Ok(())
}

// =============================================================================
// INGEST COMMAND
// =============================================================================

/// Ingest inspection events from a JSON file.
///
/// Events are processed independently, in file order; valid events are
/// committed even when neighbours fail. A summary (and, with failures, a
/// non-zero exit) reports the outcome.
pub fn cmd_ingest(store_path: &Path, json_mode: bool, file: &Path) -> Result<(), KeringError> {
    tracing::info!("Ingesting from {:?}", file);

    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_INGEST_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| KeringError::Io(format!("Read file: {}", e)))?;

    let items: Vec<IngestItem> = serde_json::from_slice(&contents)
        .map_err(|e| KeringError::Io(format!("Parse events: {}", e)))?;

    if items.len() > MAX_EVENTS_PER_REQUEST {
        return Err(KeringError::Io(format!(
            "Event count {} exceeds maximum {}",
            items.len(),
            MAX_EVENTS_PER_REQUEST
        )));
    }

    let mut store = FactStore::open(store_path)?;
    let mut results = Vec::with_capacity(items.len());
    for item in &items {
        let result = match item.to_event() {
            Ok(event) => match store.ingest_inspection(&event) {
                Ok(inspection) => IngestItemResult::success(&inspection),
                Err(e) => IngestItemResult::error(e.to_string()),
            },
            Err(msg) => IngestItemResult::error(msg),
        };
        results.push(result);
    }

    let ingested = results.iter().filter(|r| r.success).count();
    let failed = results.len() - ingested;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).unwrap_or_default()
        );
    } else {
        for (item, result) in items.iter().zip(&results) {
            if let Some(error) = &result.error {
                println!("FAILED  {} @ {}: {}", item.part_id, item.inspection_date, error);
            }
        }
        println!("Ingested {} events ({} failed)", ingested, failed);
        println!("Store now holds {} statements", store.len());
    }

    if failed > 0 {
        return Err(KeringError::Io(format!(
            "{} of {} events failed",
            failed,
            results.len()
        )));
    }

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the Turtle snapshot to a file.
pub fn cmd_export(store_path: &Path, output: &Path) -> Result<(), KeringError> {
    let validated_output = validate_output_path(output)?;

    let store = FactStore::open(store_path)?;
    let turtle = store.snapshot_turtle();

    std::fs::write(&validated_output, turtle.as_bytes())
        .map_err(|e| KeringError::Io(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", turtle.len(), validated_output);

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new store file with a seeded asset.
pub fn cmd_init(store_path: &Path, asset: &str, parts: u64, force: bool) -> Result<(), KeringError> {
    if store_path.exists() {
        if !force {
            return Err(KeringError::Io(
                "Store file already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(store_path)
            .map_err(|e| KeringError::Io(format!("Remove existing store: {}", e)))?;
    }

    let store = FactStore::open_with_seed(store_path, asset, parts)?;

    println!(
        "Initialized store at {:?}: asset {} with {} part(s), {} statements",
        store_path,
        asset,
        parts,
        store.len()
    );

    Ok(())
}
