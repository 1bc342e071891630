//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        ErrorResponse, HealthResponse, IngestItem, IngestItemResult, IngestResponse,
        InspectionPair, PartStatusResponse, ReportParams, ReportResponse, StatsResponse,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use kering_core::{KeringError, primitives::MAX_EVENTS_PER_REQUEST};

/// Map the core error taxonomy to HTTP statuses.
///
/// Unknown resources are 404, boundary validation failures 400, a failed
/// durable write 503 (the event is held in memory, the write will be
/// retried), everything else 500.
fn status_for(err: &KeringError) -> StatusCode {
    match err {
        KeringError::UnknownAsset(_) | KeringError::UnknownPart(_) => StatusCode::NOT_FOUND,
        KeringError::InvalidCondition(_)
        | KeringError::InvalidAssetName(_)
        | KeringError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        KeringError::Flush(_) => StatusCode::SERVICE_UNAVAILABLE,
        KeringError::CorruptStore { .. } | KeringError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &KeringError) -> Response {
    (status_for(err), Json(ErrorResponse::new(err.to_string()))).into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATS HANDLER
// =============================================================================

/// Get store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    (StatusCode::OK, Json(StatsResponse::from(store.stats())))
}

// =============================================================================
// PART STATUS HANDLER
// =============================================================================

/// All recorded inspections of one part, in insertion order.
///
/// A part with no inspections answers an empty list; an asset the store
/// does not know answers 404.
pub async fn part_status_handler(
    State(state): State<AppState>,
    Path((asset_id, part_index)): Path<(String, u64)>,
) -> Response {
    let store = state.store.read().await;
    match store.part_status(&asset_id, part_index) {
        Ok(pairs) => {
            let inspections = pairs
                .into_iter()
                .map(|(condition, date)| InspectionPair { condition, date })
                .collect();
            (
                StatusCode::OK,
                Json(PartStatusResponse {
                    asset: asset_id,
                    part_index,
                    inspections,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!("status query failed: {}", e);
            error_response(&e)
        }
    }
}

// =============================================================================
// INGEST HANDLER
// =============================================================================

/// Ingest a batch of inspection events.
///
/// Items are processed independently, in order, under one write guard:
/// valid items are committed even when neighbours fail. The response
/// carries one result per item.
pub async fn ingest_handler(
    State(state): State<AppState>,
    Json(items): Json<Vec<IngestItem>>,
) -> Response {
    if items.len() > MAX_EVENTS_PER_REQUEST {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "batch of {} events exceeds maximum {}",
                items.len(),
                MAX_EVENTS_PER_REQUEST
            ))),
        )
            .into_response();
    }

    let mut store = state.store.write().await;
    let mut results = Vec::with_capacity(items.len());
    for item in &items {
        let result = match item.to_event() {
            Ok(event) => match store.ingest_inspection(&event) {
                Ok(inspection) => IngestItemResult::success(&inspection),
                Err(e) => {
                    tracing::warn!("ingest failed for part {}: {}", item.part_id, e);
                    IngestItemResult::error(e.to_string())
                }
            },
            Err(msg) => IngestItemResult::error(msg),
        };
        results.push(result);
    }

    (StatusCode::OK, Json(IngestResponse::from_results(results))).into_response()
}

// =============================================================================
// REPORT HANDLER
// =============================================================================

/// Record one inspection event evidenced by an uploaded report document.
///
/// The document bytes are opaque: the store never inspects them and does
/// not retain them; the response only echoes their count. The event itself
/// comes from the query parameters.
pub async fn report_handler(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
    body: Bytes,
) -> Response {
    let item = IngestItem {
        part_id: params.part_id,
        condition: params.condition,
        inspection_date: params.inspection_date,
    };

    let event = match item.to_event() {
        Ok(event) => event,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ReportResponse::error(msg, body.len())),
            )
                .into_response();
        }
    };

    let mut store = state.store.write().await;
    match store.ingest_inspection(&event) {
        Ok(inspection) => {
            tracing::info!(
                "recorded inspection {} from a {}-byte report",
                inspection,
                body.len()
            );
            (
                StatusCode::OK,
                Json(ReportResponse::success(&inspection, body.len())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("report ingest failed for part {}: {}", item.part_id, e);
            (
                status_for(&e),
                Json(ReportResponse::error(e.to_string(), body.len())),
            )
                .into_response()
        }
    }
}

// =============================================================================
// GRAPH SNAPSHOT HANDLER
// =============================================================================

/// The complete graph in its durable Turtle form.
///
/// This is the stable snapshot external visualization tooling reads;
/// rendering itself is out of scope.
pub async fn graph_handler(State(state): State<AppState>) -> impl IntoResponse {
    let turtle = state.store.read().await.snapshot_turtle();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/turtle; charset=utf-8")],
        turtle,
    )
}
