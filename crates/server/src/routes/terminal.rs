// crates/server/src/routes/terminal.rs
//! Terminal window enumeration and focusing endpoints (macOS).

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::terminal::{self, FocusOutcome};

/// Request body for POST /api/focus-terminal.
#[derive(Debug, Deserialize)]
pub struct FocusTerminalRequest {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_path: String,
}

/// Request body for POST /api/focus-terminal-by-id.
#[derive(Debug, Deserialize)]
pub struct FocusByIdRequest {
    pub window_id: i64,
}

/// GET /api/terminal-windows - List all Terminal.app windows.
pub async fn get_terminal_windows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let windows = terminal::list_windows(state.projects_dir())
        .await
        .map_err(|e| ApiError::Unsupported(e.to_string()))?;
    let count = windows.len();
    let claude_count = windows.iter().filter(|w| w.is_claude).count();
    Ok(Json(serde_json::json!({
        "windows": windows,
        "count": count,
        "claude_count": claude_count,
    })))
}

/// POST /api/focus-terminal - Focus a window whose title contains the
/// project name (or the last segment of the project path).
pub async fn focus_terminal(
    Json(request): Json<FocusTerminalRequest>,
) -> Result<Response, ApiError> {
    let search_term = if !request.project_name.is_empty() {
        request.project_name.clone()
    } else {
        request
            .project_path
            .rsplit('/')
            .next()
            .unwrap_or("")
            .to_string()
    };
    if search_term.is_empty() {
        return Err(ApiError::BadRequest("No project specified".to_string()));
    }

    let outcome = terminal::focus_matching(&search_term)
        .await
        .map_err(|e| ApiError::Unsupported(e.to_string()))?;
    Ok(outcome_response(outcome))
}

/// POST /api/focus-terminal-by-id - Focus a window by its stable id.
pub async fn focus_terminal_by_id(
    Json(request): Json<FocusByIdRequest>,
) -> Result<Response, ApiError> {
    let outcome = terminal::focus_by_id(request.window_id)
        .await
        .map_err(|e| ApiError::Unsupported(e.to_string()))?;
    Ok(outcome_response(outcome))
}

/// A failed focus is a 404 with the outcome body, matching what the
/// dashboard frontend expects.
fn outcome_response(outcome: FocusOutcome) -> Response {
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(outcome)).into_response()
}

/// Create the terminal routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/terminal-windows", get(get_terminal_windows))
        .route("/focus-terminal", post(focus_terminal))
        .route("/focus-terminal-by-id", post(focus_terminal_by_id))
}
