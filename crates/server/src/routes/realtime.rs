// crates/server/src/routes/realtime.rs
//! Real-time session monitoring endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use claude_pulse_core::ScanReport;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/realtime - Scan every active session and report its state.
///
/// The scan is stateless, synchronous, blocking filesystem I/O, so it runs
/// on the blocking pool rather than a runtime worker. Overlapping requests
/// are safe; each performs its own independent scan.
pub async fn get_realtime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScanReport>, ApiError> {
    let report = tokio::task::spawn_blocking(move || state.scanner.scan())
        .await
        .map_err(|e| ApiError::Internal(format!("Scan task failed: {e}")))?;
    Ok(Json(report))
}

/// Create the realtime routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/realtime", get(get_realtime))
}
