//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use chrono::NaiveDate;
use kering_core::{InspectionEvent, Iri, StoreStats, vocab};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATS RESPONSE
// =============================================================================

/// Store statistics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub statements: usize,
    pub parts: usize,
    pub inspections: usize,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            statements: stats.statements,
            parts: stats.parts,
            inspections: stats.inspections,
        }
    }
}

// =============================================================================
// PART STATUS RESPONSE
// =============================================================================

/// One recorded inspection of a part: its condition label and date, both in
/// display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionPair {
    pub condition: String,
    pub date: String,
}

/// Status of one part of one asset.
///
/// `inspections` is empty (never null) when the part has no recorded
/// inspections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartStatusResponse {
    pub asset: String,
    pub part_index: u64,
    pub inspections: Vec<InspectionPair>,
}

// =============================================================================
// INGEST REQUEST/RESPONSE
// =============================================================================

/// One inspection event as submitted over HTTP or read from a CLI ingest
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestItem {
    /// Part reference: a full IRI, or a local name resolved against the
    /// instance namespace (e.g. `oosterscheldekering_part0`).
    pub part_id: String,
    /// NEN 2767 condition label, e.g. `"Good"`.
    pub condition: String,
    /// Inspection date, strict `YYYY-MM-DD`.
    pub inspection_date: String,
}

impl IngestItem {
    /// Convert to a core [`InspectionEvent`], validating the boundary
    /// format.
    ///
    /// Only the date format and part reference shape are checked here;
    /// part existence and the condition enumeration are the core's job.
    pub fn to_event(&self) -> Result<InspectionEvent, String> {
        let date = NaiveDate::parse_from_str(&self.inspection_date, "%Y-%m-%d").map_err(|_| {
            format!(
                "invalid inspection_date {:?}: expected YYYY-MM-DD",
                self.inspection_date
            )
        })?;
        if self.part_id.is_empty() {
            return Err("part_id must not be empty".to_string());
        }
        Ok(InspectionEvent::new(
            resolve_part_iri(&self.part_id),
            &self.condition,
            date,
        ))
    }
}

/// Resolve a part reference to an IRI.
///
/// Absolute IRIs pass through untouched; bare local names are minted in the
/// instance namespace, so callers can say `oosterscheldekering_part0`
/// without spelling out the full IRI.
#[must_use]
pub fn resolve_part_iri(part_id: &str) -> Iri {
    if part_id.starts_with("http://") || part_id.starts_with("https://") {
        Iri::new(part_id)
    } else {
        Iri::new(format!("{}{part_id}", vocab::DATA))
    }
}

/// Per-item outcome of a batch ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestItemResult {
    pub success: bool,
    pub inspection_id: Option<String>,
    pub error: Option<String>,
}

impl IngestItemResult {
    pub fn success(inspection: &Iri) -> Self {
        Self {
            success: true,
            inspection_id: Some(inspection.to_string()),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            inspection_id: None,
            error: Some(msg.into()),
        }
    }
}

/// Batch ingest response: one result per submitted item, in order.
///
/// Items are committed independently; a failing item never rolls back its
/// valid neighbours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub ingested: usize,
    pub failed: usize,
    pub results: Vec<IngestItemResult>,
}

impl IngestResponse {
    pub fn from_results(results: Vec<IngestItemResult>) -> Self {
        let ingested = results.iter().filter(|r| r.success).count();
        Self {
            ingested,
            failed: results.len() - ingested,
            results,
        }
    }
}

// =============================================================================
// REPORT UPLOAD
// =============================================================================

/// Query parameters of a report upload: the inspection event the document
/// evidences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportParams {
    pub part_id: String,
    pub condition: String,
    pub inspection_date: String,
}

/// Report upload response.
///
/// `report_bytes` echoes the size of the uploaded document; the body itself
/// is opaque to the store and is not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    pub inspection_id: Option<String>,
    pub report_bytes: usize,
    pub error: Option<String>,
}

impl ReportResponse {
    pub fn success(inspection: &Iri, report_bytes: usize) -> Self {
        Self {
            success: true,
            inspection_id: Some(inspection.to_string()),
            report_bytes,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>, report_bytes: usize) -> Self {
        Self {
            success: false,
            inspection_id: None,
            report_bytes,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error body for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =============================================================================
// TESTS
// =============================================================================
